use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// Ordered environment variables injected into the child on top of the
/// inherited environment.
///
/// Duplicate names resolve last-wins and keep the position of their first
/// occurrence. Overrides replace inherited variables of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentOverrides {
    vars: IndexMap<String, String>,
}

impl EnvironmentOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of string keys to string values.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("environment must be a JSON object of strings")
    }

    /// Like [`from_json`](Self::from_json), but malformed input degrades to
    /// `None` with a warning instead of failing the call.
    pub fn parse_lenient(json: &str) -> Option<Self> {
        match Self::from_json(json) {
            Ok(overrides) => Some(overrides),
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "ignoring malformed environment overrides");
                None
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvironmentOverrides
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (key, value) in iter {
            overrides.insert(key, value);
        }
        overrides
    }
}
