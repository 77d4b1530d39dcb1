//! Extension configuration and per-request options.
//!
//! Configuration is a flat JSON object of extension settings. Options passed
//! with a single request use the same keys and take precedence over the
//! configuration whenever they are present and non-null.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use crate::{Error, Result};

/// Per-request overrides of the extension configuration
pub type Options = Map<String, Value>;

/// Read access to extension configuration values
pub trait ConfigProvider {
    fn value(&self, key: &str) -> Option<&Value>;
}

impl ConfigProvider for Map<String, Value> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for &T {
    fn value(&self, key: &str) -> Option<&Value> {
        (**self).value(key)
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for Arc<T> {
    fn value(&self, key: &str) -> Option<&Value> {
        (**self).value(key)
    }
}

/// Resolve `key`: a non-null option wins over a non-null config value.
pub fn overlay<'a>(
    config: &'a dyn ConfigProvider,
    options: &'a Options,
    key: &str,
) -> Option<&'a Value> {
    options
        .get(key)
        .filter(|v| !v.is_null())
        .or_else(|| config.value(key).filter(|v| !v.is_null()))
}

/// Extension configuration loaded from a JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionConfig {
    values: Map<String, Value>,
}

impl ExtensionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(Error::InvalidConfig(format!(
                "extension config must be a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigProvider for ExtensionConfig {
    fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl From<Map<String, Value>> for ExtensionConfig {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}
