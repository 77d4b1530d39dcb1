//! # Relata
//!
//! Related-content lookups for CMS records.
//!
//! Given a record, Relata returns other records related to it: first the
//! ones an author linked by hand in a dedicated field, then records that
//! share taxonomy terms or field values, ordered by how strongly they match
//! according to the schema's `searchweight`s.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! relata --dataset site.json --config related.json --http-port 8080
//! curl http://localhost:8080/related/entries/1?limit=5
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use relata::prelude::*;
//!
//! let schema = Schema::new()
//!     .with_contenttype("entries", ContentTypeDef::new("Entries"))
//!     .with_taxonomy("tags", TaxonomyDef::new("Tags"));
//! let store = ContentStore::from_dataset(Dataset::new(
//!     schema,
//!     vec![
//!         Record::new("entries", 1).with_terms("tags", ["rust"]),
//!         Record::new("entries", 2).with_terms("tags", ["rust"]),
//!     ],
//! ));
//! let config = ExtensionConfig::new().with("limit", 3);
//!
//! let current = store.get(&RecordId::new("entries", 1)).unwrap();
//! let related = RelatedContent::new(&store, &config, store.schema())
//!     .related(&current, &Options::new());
//! assert_eq!(related[0].key(), "entries/2");
//! ```
//!
//! ## Crate Structure
//!
//! - [`relata-core`](https://docs.rs/relata-core) - records, schema, filters and collaborator traits
//! - [`relata-similarity`](https://docs.rs/relata-similarity) - the related-content engine
//! - [`relata-storage`](https://docs.rs/relata-storage) - in-memory content store and JSON datasets
//! - [`relata-api`](https://docs.rs/relata-api) - REST API

// Re-export core types
pub use relata_core::{
    ClauseGroup, ConfigProvider, ContentTypeDef, ContentTypeSelector, Error, ExtensionConfig,
    FieldDef, Filter, FilterExpression, Literal, Options, QueryService, Record, RecordId, Result,
    Schema, Status, TaxonomyDef,
};

// Re-export the engine
pub use relata_similarity::{RelatedContent, RelatedEntry, RelatedResponse, Settings};

// Re-export storage
pub use relata_storage::{ContentStore, Dataset};

// Re-export API
pub use relata_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ConfigProvider, ContentStore, ContentTypeDef, Dataset, Error, ExtensionConfig, FieldDef,
        Options, QueryService, Record, RecordId, RelatedContent, RelatedEntry, RelatedResponse,
        Result, Schema, Status, TaxonomyDef,
    };
}
