//! Master-data fixtures.
//!
//! A dataset is a JSON object mapping a collection name to an array of
//! records. The console ships a sample set and can load another from disk.

use std::collections::HashMap;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use tracing::debug;

use crate::table::Row;

const SAMPLE: &str = include_str!("../data/sample.json");

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    collections: HashMap<String, Vec<Row>>,
}

impl Dataset {
    /// The bundled sample data.
    ///
    /// # Errors
    /// Fails only if the bundled file is malformed.
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE)
    }

    /// # Errors
    /// Fails if the file cannot be read or is not a valid dataset.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading dataset {}", path.display()))?;
        let dataset = Self::from_json(&content)
            .wrap_err_with(|| format!("parsing dataset {}", path.display()))?;
        debug!(path = %path.display(), collections = dataset.collections.len(), "Loaded dataset");
        Ok(dataset)
    }

    /// # Errors
    /// Fails unless `json` is an object of arrays of objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let root: HashMap<String, Vec<Value>> = serde_json::from_str(json)?;
        let mut collections = HashMap::with_capacity(root.len());
        for (name, records) in root {
            let rows = records
                .into_iter()
                .enumerate()
                .map(|(i, record)| {
                    Row::try_from(record)
                        .map_err(|_| eyre!("record {i} of `{name}` is not an object"))
                })
                .collect::<Result<Vec<_>>>()?;
            collections.insert(name, rows);
        }
        Ok(Self { collections })
    }

    /// Records of `collection`; unknown collections are empty.
    pub fn rows(&self, collection: &str) -> Vec<Row> {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    pub fn contains(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_parses() {
        let dataset = Dataset::sample().unwrap();
        for name in ["departments", "specimen_types", "colors", "instruments", "users"] {
            assert!(dataset.contains(name), "missing {name}");
            assert!(!dataset.rows(name).is_empty());
        }
    }

    #[test]
    fn test_non_object_record_rejected() {
        let err = Dataset::from_json(r#"{ "colors": [ { "name": "Red" }, 3 ] }"#).unwrap_err();
        assert!(err.to_string().contains("record 1 of `colors`"));
    }

    #[test]
    fn test_unknown_collection_is_empty() {
        let dataset = Dataset::from_json(r#"{ "colors": [] }"#).unwrap();
        assert!(dataset.rows("instruments").is_empty());
    }
}
