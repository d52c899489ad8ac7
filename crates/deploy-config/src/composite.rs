//! Layered configuration
//!
//! [`CompositeConfiguration`] holds an ordered list of sources. On a key
//! conflict the source registered first wins, so callers register the most
//! specific source first and fall-back defaults last.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::interpolate::interpolate;
use crate::source::ConfigSource;

/// Ordered list of configuration sources, first registered wins.
#[derive(Debug, Clone, Default)]
pub struct CompositeConfiguration {
    sources: Vec<ConfigSource>,
}

impl CompositeConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source with lower precedence than every source already
    /// registered.
    pub fn add_source(&mut self, source: ConfigSource) {
        self.sources.push(source);
    }

    /// Builder form of [`CompositeConfiguration::add_source`].
    pub fn with_source(mut self, source: ConfigSource) -> Self {
        self.add_source(source);
        self
    }

    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Raw value of `key` from the first source that defines it.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.sources.iter().find_map(|s| s.get(key))
    }

    /// Merge all sources into a single [`Configuration`].
    pub fn merge(&self) -> Configuration {
        let mut entries = BTreeMap::new();
        for source in &self.sources {
            for (key, value) in source.iter() {
                entries
                    .entry(key.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
        Configuration { entries }
    }
}

/// A merged, flat key/value configuration.
///
/// Values are stored raw. [`Configuration::get`] resolves `${...}`
/// references at lookup time against this configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key` with `${...}` references resolved.
    pub fn get(&self, key: &str) -> Option<String> {
        let raw = self.entries.get(key)?;
        let lookup = |name: &str| self.entries.get(name).cloned();
        Some(interpolate(raw, &lookup))
    }

    /// Value of `key` exactly as written in its source.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over raw entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All entries with `${...}` references resolved.
    pub fn resolved(&self) -> BTreeMap<String, String> {
        self.entries
            .keys()
            .filter_map(|k| self.get(k).map(|v| (k.clone(), v)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Configuration
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
