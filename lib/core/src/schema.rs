//! Content schema: content types, their fields, and taxonomies.
//!
//! Both fields and taxonomies may carry a `searchweight`, the importance
//! multiplier used when scoring similar content. When it is absent the
//! weight defaults to [`DEFAULT_SEARCHWEIGHT`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Weight used for taxonomies and fields without a `searchweight`
pub const DEFAULT_SEARCHWEIGHT: u64 = 50;

/// The global schema of the CMS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub contenttypes: BTreeMap<String, ContentTypeDef>,
    #[serde(default, rename = "taxonomy", alias = "taxonomies")]
    pub taxonomies: BTreeMap<String, TaxonomyDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_contenttype(mut self, slug: impl Into<String>, def: ContentTypeDef) -> Self {
        self.contenttypes.insert(slug.into(), def);
        self
    }

    #[must_use]
    pub fn with_taxonomy(mut self, slug: impl Into<String>, def: TaxonomyDef) -> Self {
        self.taxonomies.insert(slug.into(), def);
        self
    }

    pub fn contenttype(&self, slug: &str) -> Option<&ContentTypeDef> {
        self.contenttypes.get(slug)
    }

    /// Definition of a field on a content type
    pub fn field(&self, contenttype: &str, field: &str) -> Option<&FieldDef> {
        self.contenttypes.get(contenttype)?.fields.get(field)
    }

    /// Declared type of a field on a content type
    pub fn field_type(&self, contenttype: &str, field: &str) -> Option<&str> {
        self.field(contenttype, field).map(|f| f.field_type.as_str())
    }

    /// Searchweight of a taxonomy; unknown taxonomies get the default.
    pub fn taxonomy_weight(&self, slug: &str) -> u64 {
        self.taxonomies
            .get(slug)
            .and_then(|t| t.searchweight)
            .unwrap_or(DEFAULT_SEARCHWEIGHT)
    }

    /// Searchweight of a field on a content type; unknown fields get the default.
    pub fn field_weight(&self, contenttype: &str, field: &str) -> u64 {
        self.field(contenttype, field)
            .and_then(|f| f.searchweight)
            .unwrap_or(DEFAULT_SEARCHWEIGHT)
    }
}

/// Definition of a content type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDef>,
}

impl ContentTypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, slug: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(slug.into(), def);
        self
    }
}

/// Definition of a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub field_type: String,

    /// Select fields name their source here, e.g. `pages/title` or
    /// `entries/title,slug`. The part before the first `/` is the target
    /// content type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_searchweight",
        skip_serializing_if = "Option::is_none"
    )]
    pub searchweight: Option<u64>,
}

impl FieldDef {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            values: None,
            searchweight: None,
        }
    }

    #[must_use]
    pub fn with_values(mut self, values: impl Into<String>) -> Self {
        self.values = Some(values.into());
        self
    }

    #[must_use]
    pub fn with_searchweight(mut self, weight: u64) -> Self {
        self.searchweight = Some(weight);
        self
    }

    /// Content type referenced by `values`, if any.
    pub fn target_contenttype(&self) -> Option<&str> {
        let values = self.values.as_deref()?;
        let target = values.split('/').next()?.trim();
        if target.is_empty() {
            None
        } else {
            Some(target)
        }
    }
}

/// Definition of a taxonomy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyDef {
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_searchweight",
        skip_serializing_if = "Option::is_none"
    )]
    pub searchweight: Option<u64>,
}

impl TaxonomyDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            searchweight: None,
        }
    }

    #[must_use]
    pub fn with_searchweight(mut self, weight: u64) -> Self {
        self.searchweight = Some(weight);
        self
    }
}

/// Accepts integers, floats and numeric strings.
///
/// Strings use their leading integer part (`"75px"` is 75, `"abc"` is 0),
/// and negative weights are clamped to zero.
fn deserialize_searchweight<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_non_negative))
}

/// Integer reading of a loosely typed config value, never negative.
pub fn parse_non_negative(value: &Value) -> Option<u64> {
    match value {
        Value::Null => None,
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u)
            } else if let Some(i) = n.as_i64() {
                Some(i.max(0) as u64)
            } else {
                n.as_f64().map(|f| if f > 0.0 { f.trunc() as u64 } else { 0 })
            }
        }
        Value::String(s) => Some(leading_integer(s)),
        Value::Bool(b) => Some(u64::from(*b)),
        _ => None,
    }
}

fn leading_integer(s: &str) -> u64 {
    let s = s.trim_start();
    if s.starts_with('-') {
        return 0;
    }
    let digits: String = s
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
