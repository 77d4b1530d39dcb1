//! The comparable parts of the current record
//!
//! Only taxonomies and fields that are both configured as comparable and
//! actually set on the current record take part in candidate filtering and
//! weighting.

use crate::settings::{Settings, TaxonomyScope};
use relata_core::{is_empty_value, Record, Schema};
use serde_json::Value;
use std::collections::BTreeMap;

/// Content types that may supply related candidates, in schema order.
pub fn allowed_contenttypes(schema: &Schema, settings: &Settings) -> Vec<String> {
    schema
        .contenttypes
        .keys()
        .filter(|slug| settings.allows_contenttype(slug))
        .cloned()
        .collect()
}

/// Taxonomy slug to the current record's term slugs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedTaxonomySet {
    entries: BTreeMap<String, Vec<String>>,
}

impl AllowedTaxonomySet {
    /// Taxonomies set on `record` that the schema knows and `scope` allows.
    pub fn resolve(record: &Record, schema: &Schema, scope: &TaxonomyScope) -> Self {
        let mut entries = BTreeMap::new();

        for (slug, terms) in &record.taxonomies {
            if !schema.taxonomies.contains_key(slug) || !scope.allows(slug) {
                continue;
            }

            let mut unique: Vec<String> = Vec::with_capacity(terms.len());
            for term in terms {
                if !term.is_empty() && !unique.contains(term) {
                    unique.push(term.clone());
                }
            }

            if !unique.is_empty() {
                entries.insert(slug.clone(), unique);
            }
        }

        Self { entries }
    }

    pub fn get(&self, slug: &str) -> Option<&[String]> {
        self.entries.get(slug).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A comparable field value of the current record
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedField {
    pub field_type: String,
    pub value: Value,
}

/// Field slug to the current record's comparable value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowedFieldSet {
    entries: BTreeMap<String, AllowedField>,
}

impl AllowedFieldSet {
    /// Configured fields that are non-empty on `record` and declared on its
    /// content type.
    pub fn resolve(record: &Record, schema: &Schema, fields: &[String]) -> Self {
        let mut entries = BTreeMap::new();

        for slug in fields {
            let Some(value) = record.field(slug) else {
                continue;
            };
            if is_empty_value(value) {
                continue;
            }
            let Some(field_type) = schema.field_type(record.content_type(), slug) else {
                continue;
            };

            entries.insert(
                slug.clone(),
                AllowedField {
                    field_type: field_type.to_string(),
                    value: value.clone(),
                },
            );
        }

        Self { entries }
    }

    pub fn get(&self, slug: &str) -> Option<&AllowedField> {
        self.entries.get(slug)
    }

    pub fn contains_key(&self, slug: &str) -> bool {
        self.entries.contains_key(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AllowedField)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
