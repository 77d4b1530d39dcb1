//! Manual relations
//!
//! Resolves the author-curated links stored in the configured manual
//! relation field into published records, in the order they are stored.

use crate::query::decode_relation_list;
use crate::settings::{ManualFieldKind, Settings};
use relata_core::{is_empty_value, QueryService, Record, RecordId, Schema};
use serde_json::Value;
use tracing::{debug, warn};

/// The manual relation field and how its value is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualFieldSpec {
    /// A list of ids of `target`
    Array { field: String, target: String },
    /// A serialized list of `contenttype/id` strings
    RelationList { field: String },
    /// One id of `target`
    Single { field: String, target: String },
}

impl ManualFieldSpec {
    /// How `record` stores its manual links, if a manual field is configured and defined on the
    /// record's content type. Array and single fields also need a target
    /// content type in the field definition's `values`.
    pub fn from_settings(settings: &Settings, record: &Record, schema: &Schema) -> Option<Self> {
        let field = settings.manual_field.as_deref()?;

        let Some(def) = schema.field(record.content_type(), field) else {
            debug!(
                field,
                contenttype = record.content_type(),
                "manual relation field is not defined on the content type"
            );
            return None;
        };

        let spec = match settings.manual_field_kind {
            ManualFieldKind::RelationList => ManualFieldSpec::RelationList {
                field: field.to_string(),
            },
            kind => {
                let Some(target) = def.target_contenttype() else {
                    warn!(field, "manual relation field has no target content type");
                    return None;
                };
                let field = field.to_string();
                let target = target.to_string();
                if kind == ManualFieldKind::Array {
                    ManualFieldSpec::Array { field, target }
                } else {
                    ManualFieldSpec::Single { field, target }
                }
            }
        };

        Some(spec)
    }

    pub fn field(&self) -> &str {
        match self {
            ManualFieldSpec::Array { field, .. }
            | ManualFieldSpec::RelationList { field }
            | ManualFieldSpec::Single { field, .. } => field,
        }
    }

    /// Identities stored in the record's manual field, in stored order.
    /// Unreadable entries are skipped.
    pub fn identities(&self, record: &Record) -> Vec<RecordId> {
        let Some(value) = record.field(self.field()) else {
            return Vec::new();
        };
        if is_empty_value(value) {
            return Vec::new();
        }

        match self {
            ManualFieldSpec::Array { target, .. } => match value {
                Value::Array(ids) => ids
                    .iter()
                    .filter_map(|id| read_id(id).map(|id| RecordId::new(target.as_str(), id)))
                    .collect(),
                _ => {
                    warn!(field = self.field(), "array manual field does not hold a list");
                    Vec::new()
                }
            },
            ManualFieldSpec::RelationList { .. } => match decode_relation_list(value) {
                Some(queries) => queries
                    .iter()
                    .filter_map(|query| match query.parse::<RecordId>() {
                        Ok(id) => Some(id),
                        Err(e) => {
                            warn!(field = self.field(), error = %e, "skipping relation entry");
                            None
                        }
                    })
                    .collect(),
                None => {
                    warn!(field = self.field(), "relation list could not be decoded");
                    Vec::new()
                }
            },
            ManualFieldSpec::Single { target, .. } => read_id(value)
                .map(|id| vec![RecordId::new(target.as_str(), id)])
                .unwrap_or_default(),
        }
    }

    /// Fetch every stored identity and keep the published records.
    pub fn resolve(&self, record: &Record, query: &dyn QueryService) -> Vec<Record> {
        let mut related = Vec::new();

        for id in self.identities(record) {
            match query.content_by_id(&id) {
                Ok(Some(content)) if content.is_published() => related.push(content),
                Ok(Some(_)) => debug!(%id, "manual relation is not published"),
                Ok(None) => debug!(%id, "manual relation does not exist"),
                Err(e) => warn!(%id, error = %e, "failed to fetch manual relation"),
            }
        }

        related
    }
}

fn read_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
