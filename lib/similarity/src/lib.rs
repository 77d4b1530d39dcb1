//! # Relata Similarity
//!
//! The related-content engine.
//!
//! Given a content record, finds other records related to it in two ways:
//!
//! - **Manual relations**: links an author stored in a dedicated field
//! - **Automatic relations**: records sharing taxonomy terms or field values,
//!   weighted by the schema's `searchweight`s
//!
//! Manual relations come first in their stored order, automatic ones follow
//! by descending weight. The source record and duplicates are dropped and the
//! list is cut to the configured limit.
//!
//! ## Example
//!
//! ```rust
//! use relata_core::{
//!     ContentTypeDef, ContentTypeSelector, ExtensionConfig, Filter, FilterExpression,
//!     Options, QueryService, Record, RecordId, Result, Schema, TaxonomyDef,
//! };
//! use relata_similarity::RelatedContent;
//!
//! struct Store(Vec<Record>);
//!
//! impl QueryService for Store {
//!     fn content_by_selector(
//!         &self,
//!         selector: &ContentTypeSelector,
//!         filter: &FilterExpression,
//!     ) -> Result<Vec<Record>> {
//!         Ok(self.0.iter()
//!             .filter(|r| selector.contains(r.content_type()) && filter.matches(r))
//!             .cloned()
//!             .collect())
//!     }
//!
//!     fn content_by_id(&self, id: &RecordId) -> Result<Option<Record>> {
//!         Ok(self.0.iter().find(|r| &r.id == id).cloned())
//!     }
//! }
//!
//! let schema = Schema::new()
//!     .with_contenttype("entries", ContentTypeDef::new("Entries"))
//!     .with_taxonomy("category", TaxonomyDef::new("Category"));
//! let config = ExtensionConfig::new().with("limit", 5);
//!
//! let current = Record::new("entries", 1).with_terms("category", ["news"]);
//! let store = Store(vec![
//!     Record::new("entries", 2).with_terms("category", ["news"]),
//!     Record::new("entries", 3).with_terms("category", ["sports"]),
//! ]);
//!
//! let related = RelatedContent::new(&store, &config, &schema)
//!     .related(&current, &Options::new());
//! assert_eq!(related.len(), 1);
//! assert_eq!(related[0].key(), "entries/2");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Settings   │────>│   Manual    │────>│  Assemble   │
//! │ (config +   │     │  resolver   │     │ (dedupe,    │
//! │  options)   │     └─────────────┘     │  truncate)  │
//! └─────────────┘                         └─────────────┘
//!       │            ┌─────────────┐            ^
//!       └───────────>│ Query build │            │
//!                    │  + fetch    │     ┌─────────────┐
//!                    └─────────────┘────>│   Weigher   │
//!                                        └─────────────┘
//! ```

pub mod allowed;
pub mod assemble;
pub mod explain;
pub mod manual;
pub mod query;
pub mod related;
pub mod settings;
pub mod weigh;

// Re-export main types for convenience
pub use allowed::{allowed_contenttypes, AllowedField, AllowedFieldSet, AllowedTaxonomySet};
pub use assemble::{assemble, exclude_current, remove_duplicates};
pub use explain::{Origin, RelatedEntry, RelatedResponse, RelatedStats};
pub use manual::ManualFieldSpec;
pub use query::{build_candidate_query, build_filter, decode_relation_list, CandidateQuery};
pub use related::RelatedContent;
pub use settings::{ManualFieldKind, Settings, TaxonomyScope, DEFAULT_LIMIT};
pub use weigh::{flatten, Contribution, ScoredCandidate, Weigher};
