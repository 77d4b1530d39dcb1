//! Request settings
//!
//! Resolves the extension settings for one request from the configuration
//! and the caller's options. Every setting degrades to a usable default;
//! nothing here fails.

use relata_core::{overlay, ConfigProvider, Options};
use serde_json::Value;
use tracing::warn;

/// Number of results when `limit` is missing or unreadable
pub const DEFAULT_LIMIT: usize = 10;

/// Setting keys
pub mod keys {
    pub const LIMIT: &str = "limit";
    pub const MANUAL_FIELD: &str = "manual_related_content_field";
    pub const MANUAL_FIELD_TYPE: &str = "manual_related_content_field_type";
    pub const CONTENTTYPES: &str = "contenttypes";
    pub const TAXONOMIES: &str = "taxonomies";
    pub const FIELDS: &str = "fields";
}

/// How the manual relation field stores its links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManualFieldKind {
    /// A list of ids of the field's target content type
    Array,
    /// A serialized list of `contenttype/id` strings
    RelationList,
    /// One id of the field's target content type
    #[default]
    Single,
}

impl ManualFieldKind {
    /// `array`, `relationlist` and `json` are recognized; anything else is single.
    pub fn parse(kind: Option<&str>) -> Self {
        match kind.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("array") => ManualFieldKind::Array,
            Some("relationlist") | Some("json") => ManualFieldKind::RelationList,
            _ => ManualFieldKind::Single,
        }
    }
}

/// Which taxonomies may be compared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyScope {
    All,
    /// Only the listed taxonomies; an empty list disables taxonomy matching.
    Only(Vec<String>),
}

impl TaxonomyScope {
    pub fn allows(&self, slug: &str) -> bool {
        match self {
            TaxonomyScope::All => true,
            TaxonomyScope::Only(slugs) => slugs.iter().any(|s| s == slug),
        }
    }
}

/// Settings for a single related-content request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub limit: usize,
    pub manual_field: Option<String>,
    pub manual_field_kind: ManualFieldKind,
    /// `None` allows every content type
    pub contenttypes: Option<Vec<String>>,
    pub taxonomies: TaxonomyScope,
    pub fields: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            manual_field: None,
            manual_field_kind: ManualFieldKind::Single,
            contenttypes: None,
            taxonomies: TaxonomyScope::All,
            fields: Vec::new(),
        }
    }
}

impl Settings {
    pub fn resolve(config: &dyn ConfigProvider, options: &Options) -> Self {
        let get = |key: &str| overlay(config, options, key);

        let limit = match get(keys::LIMIT) {
            Some(value) => match read_limit(value) {
                Some(limit) => limit,
                None => {
                    warn!(%value, "unreadable limit, using default {}", DEFAULT_LIMIT);
                    DEFAULT_LIMIT
                }
            },
            None => {
                warn!("no limit configured, using default {}", DEFAULT_LIMIT);
                DEFAULT_LIMIT
            }
        };

        let manual_field = get(keys::MANUAL_FIELD)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let manual_field_kind =
            ManualFieldKind::parse(get(keys::MANUAL_FIELD_TYPE).and_then(Value::as_str));

        let contenttypes = get(keys::CONTENTTYPES)
            .and_then(string_list)
            .filter(|list| !list.is_empty());

        let taxonomies = match get(keys::TAXONOMIES) {
            None => TaxonomyScope::All,
            Some(value) => TaxonomyScope::Only(string_list(value).unwrap_or_default()),
        };

        let fields = get(keys::FIELDS).and_then(string_list).unwrap_or_default();

        Self {
            limit,
            manual_field,
            manual_field_kind,
            contenttypes,
            taxonomies,
            fields,
        }
    }

    pub fn allows_contenttype(&self, slug: &str) -> bool {
        match &self.contenttypes {
            None => true,
            Some(list) => list.iter().any(|s| s == slug),
        }
    }
}

/// A non-negative integer, or a string made only of digits.
fn read_limit(value: &Value) -> Option<usize> {
    let limit = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse::<u64>().ok()?
        }
        _ => return None,
    };
    Some(usize::try_from(limit).unwrap_or(usize::MAX))
}

/// A list of slugs; a lone string counts as a one-element list.
fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        Value::String(s) if !s.trim().is_empty() => Some(vec![s.trim().to_string()]),
        Value::String(_) => Some(Vec::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relata_core::ExtensionConfig;
    use serde_json::json;

    fn options(value: Value) -> Options {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&ExtensionConfig::new(), &Options::new());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_config_values() {
        let config = ExtensionConfig::from_json(
            r#"{
                "limit": 4,
                "manual_related_content_field": "related",
                "manual_related_content_field_type": "relationlist",
                "contenttypes": ["pages", "entries"],
                "taxonomies": ["tags"],
                "fields": ["author"]
            }"#,
        )
        .unwrap();

        let settings = Settings::resolve(&config, &Options::new());
        assert_eq!(settings.limit, 4);
        assert_eq!(settings.manual_field.as_deref(), Some("related"));
        assert_eq!(settings.manual_field_kind, ManualFieldKind::RelationList);
        assert_eq!(
            settings.contenttypes,
            Some(vec!["pages".to_string(), "entries".to_string()])
        );
        assert_eq!(settings.taxonomies, TaxonomyScope::Only(vec!["tags".into()]));
        assert_eq!(settings.fields, vec!["author".to_string()]);
    }

    #[test]
    fn test_options_override_config() {
        let config = ExtensionConfig::new().with("limit", 4).with("contenttypes", json!(["pages"]));
        let settings = Settings::resolve(
            &config,
            &options(json!({ "limit": "2", "contenttypes": "entries" })),
        );

        assert_eq!(settings.limit, 2);
        assert_eq!(settings.contenttypes, Some(vec!["entries".to_string()]));
    }

    #[test]
    fn test_taxonomy_scope() {
        let none = Settings::resolve(&ExtensionConfig::new().with("taxonomies", json!([])), &Options::new());
        assert_eq!(none.taxonomies, TaxonomyScope::Only(vec![]));
        assert!(!none.taxonomies.allows("tags"));

        let all = Settings::resolve(&ExtensionConfig::new(), &Options::new());
        assert!(all.taxonomies.allows("tags"));
    }

    #[test]
    fn test_empty_contenttypes_means_all() {
        let settings = Settings::resolve(
            &ExtensionConfig::new().with("contenttypes", json!([])),
            &Options::new(),
        );
        assert_eq!(settings.contenttypes, None);
        assert!(settings.allows_contenttype("anything"));
    }

    #[test]
    fn test_unreadable_limit_falls_back() {
        for value in [json!(["x"]), json!("abc"), json!("ten"), json!("5x"), json!(true), json!(-3), json!(2.5)] {
            let settings = Settings::resolve(&ExtensionConfig::new().with("limit", value.clone()), &Options::new());
            assert_eq!(settings.limit, DEFAULT_LIMIT, "limit {}", value);
        }

        let padded = Settings::resolve(&ExtensionConfig::new().with("limit", " 7 "), &Options::new());
        assert_eq!(padded.limit, 7);
        let zero = Settings::resolve(&ExtensionConfig::new().with("limit", 0), &Options::new());
        assert_eq!(zero.limit, 0);
    }

    #[test]
    fn test_manual_field_kind() {
        assert_eq!(ManualFieldKind::parse(Some("array")), ManualFieldKind::Array);
        assert_eq!(ManualFieldKind::parse(Some("JSON")), ManualFieldKind::RelationList);
        assert_eq!(ManualFieldKind::parse(Some("relationlist")), ManualFieldKind::RelationList);
        assert_eq!(ManualFieldKind::parse(Some("single")), ManualFieldKind::Single);
        assert_eq!(ManualFieldKind::parse(Some("other")), ManualFieldKind::Single);
        assert_eq!(ManualFieldKind::parse(None), ManualFieldKind::Single);
    }
}
