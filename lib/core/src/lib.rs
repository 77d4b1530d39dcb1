//! # Relata Core
//!
//! Core content model for the Relata related-content engine.
//!
//! This crate provides the types shared by every other Relata crate:
//!
//! - [`Record`] / [`RecordId`] - content items and their `contenttype/id` identity
//! - [`Schema`] - content types, fields, taxonomies and their searchweights
//! - [`FilterExpression`] - structured candidate filter (AND of OR groups)
//! - [`QueryService`] - the content query capability supplied by the CMS
//! - [`ConfigProvider`] - extension configuration access
//!
//! ## Example
//!
//! ```rust
//! use relata_core::{ClauseGroup, Filter, FilterExpression, Literal, Record};
//!
//! let record = Record::new("entries", 1).with_terms("tags", ["rust"]);
//!
//! let mut filter = FilterExpression::new();
//! filter.push(ClauseGroup::taxonomy("tags", vec![Literal::exact("rust")]));
//!
//! assert!(filter.matches(&record));
//! assert_eq!(filter.to_string(), "tags = rust; status = published");
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod query;
pub mod record;
pub mod schema;

pub use config::{overlay, ConfigProvider, ExtensionConfig, Options};
pub use error::{Error, Result};
pub use filter::{ClauseGroup, ContentTypeSelector, Filter, FilterExpression, Literal, Target};
pub use query::QueryService;
pub use record::{is_empty_value, Identify, Record, RecordId, Status};
pub use schema::{
    parse_non_negative, ContentTypeDef, FieldDef, Schema, TaxonomyDef, DEFAULT_SEARCHWEIGHT,
};
