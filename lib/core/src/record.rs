use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use crate::Error;

/// Identity of a content record: its content type plus its numeric id.
///
/// Rendered as `contenttype/id`, which is the key used for every equality
/// and deduplication check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    #[serde(rename = "contenttype")]
    pub content_type: String,
    pub id: u64,
}

impl RecordId {
    pub fn new(content_type: impl Into<String>, id: u64) -> Self {
        Self {
            content_type: content_type.into(),
            id,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.content_type, self.id)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    /// Parse a `contenttype/id` query string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (content_type, id) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::InvalidIdentity(s.to_string()))?;

        let content_type = content_type.trim();
        if content_type.is_empty() {
            return Err(Error::InvalidIdentity(s.to_string()));
        }

        let id = id
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::InvalidIdentity(s.to_string()))?;

        Ok(Self::new(content_type, id))
    }
}

/// Publication status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Published,
    Draft,
    Held,
    Timed,
    #[serde(other)]
    Unknown,
}

/// A single content item.
///
/// Taxonomies map a taxonomy slug to the term slugs assigned to the record,
/// in assignment order. Fields hold raw JSON values: scalars for plain
/// fields, arrays or serialized arrays for multi-value and relation fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default)]
    pub status: Status,
    #[serde(default, rename = "taxonomy")]
    pub taxonomies: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    #[must_use]
    pub fn new(content_type: impl Into<String>, id: u64) -> Self {
        Self {
            id: RecordId::new(content_type, id),
            status: Status::Published,
            taxonomies: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_terms<I, S>(mut self, taxonomy: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taxonomies
            .insert(taxonomy.into(), terms.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_field(mut self, slug: impl Into<String>, value: Value) -> Self {
        self.fields.insert(slug.into(), value);
        self
    }

    pub fn content_type(&self) -> &str {
        &self.id.content_type
    }

    /// The `contenttype/id` identity key
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }

    /// Term slugs assigned for a taxonomy; empty when the taxonomy is unset.
    pub fn terms(&self, taxonomy: &str) -> &[String] {
        self.taxonomies
            .get(taxonomy)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn field(&self, slug: &str) -> Option<&Value> {
        self.fields.get(slug)
    }
}

/// Anything that carries a record identity.
pub trait Identify {
    fn record_id(&self) -> &RecordId;
}

impl Identify for Record {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Whether a stored value counts as "not set".
///
/// Null, `false`, zero, `""`, `"0"` and empty collections are all empty;
/// there is nothing to compare or resolve for them.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
