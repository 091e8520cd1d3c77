use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::ConfigError;

/// Key/value record collected before a run. Read-only once built.
///
/// Values are kept as text: strings verbatim, other scalars and nested
/// values as compact JSON. `null` entries are treated as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct RunInput {
    values: BTreeMap<String, String>,
    raw: Value,
}

impl RunInput {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| ConfigError::InvalidInput(e.to_string()))?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(map) = &value else {
            return Err(ConfigError::InvalidInput(
                "run input must be a JSON object".to_string(),
            ));
        };

        let values = map
            .iter()
            .filter_map(|(k, v)| {
                let text = match v {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((k.clone(), text))
            })
            .collect();

        Ok(Self { values, raw: value })
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json_str(&s)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Like [`RunInput::get`], but an empty value is absent. Whitespace is a value.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The input as originally supplied, pretty-printed.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

impl Default for RunInput {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            raw: Value::Object(serde_json::Map::new()),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RunInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values: BTreeMap<String, String> =
            iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let raw = Value::Object(
            values
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        );
        Self { values, raw }
    }
}
