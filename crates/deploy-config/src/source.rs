//! Single configuration sources
//!
//! A [`ConfigSource`] is one flat key/value provider. File-backed sources
//! pick their format from the file extension; structured formats are
//! flattened into dotted keys so every source looks like a properties file.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value as JsonValue;

use crate::{Error, Result, properties};

/// File formats a [`ConfigSource`] can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Properties,
    Toml,
    Json,
    Yaml,
}

impl SourceFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "properties" => Some(Self::Properties),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// One flat key/value configuration provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    name: String,
    entries: BTreeMap<String, String>,
}

impl ConfigSource {
    /// Create an empty in-memory source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Create an in-memory source from key/value pairs.
    pub fn from_pairs<K, V, I>(name: impl Into<String>, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut source = Self::new(name);
        for (key, value) in pairs {
            source.insert(key, value);
        }
        source
    }

    /// Load a source from a file, detecting the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let format =
            SourceFormat::from_extension(&extension).ok_or_else(|| Error::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: extension.clone(),
            })?;

        let content = deploy_fs::read_text(path)?;
        Self::parse(path, format, &content)
    }

    /// Parse source text in the given format. `path` names the source in
    /// errors and in [`ConfigSource::name`].
    pub fn parse(path: &Path, format: SourceFormat, content: &str) -> Result<Self> {
        let parse_error = |message: String| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.as_str().into(),
            message,
        };

        let mut source = Self::new(path.display().to_string());
        match format {
            SourceFormat::Properties => {
                let entries = properties::parse(content).map_err(|e| parse_error(e.to_string()))?;
                for (key, value) in entries {
                    source.insert(key, value);
                }
            }
            SourceFormat::Toml => {
                let value: toml::Value =
                    toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                flatten_toml("", &value, &mut source.entries);
            }
            SourceFormat::Json => {
                let value: JsonValue =
                    serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                flatten_json("", &value, &mut source.entries);
            }
            SourceFormat::Yaml => {
                let value: JsonValue =
                    serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                flatten_json("", &value, &mut source.entries);
            }
        }

        tracing::debug!(
            source = %source.name,
            format = format.as_str(),
            keys = source.entries.len(),
            "Loaded configuration source"
        );
        Ok(source)
    }

    /// Insert an entry, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
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

    /// Iterate over entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn flatten_toml(prefix: &str, value: &toml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                flatten_toml(&join_key(prefix, key), child, out);
            }
        }
        toml::Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(toml_scalar).collect();
            out.insert(prefix.to_string(), joined.join(","));
        }
        scalar => {
            out.insert(prefix.to_string(), toml_scalar(scalar));
        }
    }
}

fn toml_scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON `null` is treated as an absent key.
fn flatten_json(prefix: &str, value: &JsonValue, out: &mut BTreeMap<String, String>) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                flatten_json(&join_key(prefix, key), child, out);
            }
        }
        JsonValue::Array(items) => {
            let joined: Vec<String> = items
                .iter()
                .filter(|v| !v.is_null())
                .map(json_scalar)
                .collect();
            out.insert(prefix.to_string(), joined.join(","));
        }
        JsonValue::Null => {}
        scalar => {
            out.insert(prefix.to_string(), json_scalar(scalar));
        }
    }
}

fn json_scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_properties() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("whirr.properties");
        fs::write(&path, "whirr.cluster-name=hadoop\nwhirr.provider=aws-ec2\n").unwrap();

        let source = ConfigSource::load(&path).unwrap();

        assert_eq!(source.get("whirr.cluster-name"), Some("hadoop"));
        assert_eq!(source.get("whirr.provider"), Some("aws-ec2"));
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_load_toml_flattens_tables() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cluster.toml");
        fs::write(
            &path,
            r#"
[whirr]
cluster-name = "hadoop"
instance-templates = ["1 hadoop-namenode", "2 hadoop-datanode"]
retries = 3
"#,
        )
        .unwrap();

        let source = ConfigSource::load(&path).unwrap();

        assert_eq!(source.get("whirr.cluster-name"), Some("hadoop"));
        assert_eq!(
            source.get("whirr.instance-templates"),
            Some("1 hadoop-namenode,2 hadoop-datanode")
        );
        assert_eq!(source.get("whirr.retries"), Some("3"));
    }

    #[test]
    fn test_load_json_skips_null() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cluster.json");
        fs::write(
            &path,
            r#"{"whirr": {"provider": "aws-ec2", "credential": null, "spot": true}}"#,
        )
        .unwrap();

        let source = ConfigSource::load(&path).unwrap();

        assert_eq!(source.get("whirr.provider"), Some("aws-ec2"));
        assert_eq!(source.get("whirr.spot"), Some("true"));
        assert!(!source.contains_key("whirr.credential"));
    }

    #[test]
    fn test_load_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cluster.yml");
        fs::write(&path, "whirr:\n  identity: AKIA\n  location-id: us-east-1\n").unwrap();

        let source = ConfigSource::load(&path).unwrap();

        assert_eq!(source.get("whirr.identity"), Some("AKIA"));
        assert_eq!(source.get("whirr.location-id"), Some("us-east-1"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cluster.ini");
        fs::write(&path, "a=b").unwrap();

        let err = ConfigSource::load(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension, .. } if extension == "ini"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[whirr\nname = ").unwrap();

        let err = ConfigSource::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { ref format, .. } if format == "TOML"));
    }

    #[test]
    fn test_missing_file_is_fs_error() {
        let temp = TempDir::new().unwrap();
        let err = ConfigSource::load(&temp.path().join("absent.properties")).unwrap_err();
        assert!(matches!(err, Error::Fs(_)));
    }

    #[test]
    fn test_from_pairs_last_duplicate_wins() {
        let source = ConfigSource::from_pairs("memory", [("a", "1"), ("a", "2")]);
        assert_eq!(source.get("a"), Some("2"));
        assert_eq!(source.name(), "memory");
    }
}
