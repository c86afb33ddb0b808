//! JSON instance parser.

use crate::dataset::Dataset;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use u_packing_d3::{BinSpec, ItemSpec};

/// Errors that can occur when parsing instances.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid instance format: {0}")]
    InvalidFormat(String),
}

/// Parser for bin packing instances stored as JSON.
///
/// Expected layout:
///
/// ```json
/// {
///   "name": "example",
///   "bin": { "length": 10, "width": 8, "height": 6 },
///   "items": [ { "id": 1, "length": 8, "width": 6, "height": 4 } ]
/// }
/// ```
#[derive(Debug, Default)]
pub struct DatasetParser;

impl DatasetParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses an instance from a JSON file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Dataset, ParseError> {
        let content = fs::read_to_string(path)?;
        self.parse_json(&content)
    }

    /// Parses an instance from a JSON string.
    pub fn parse_json(&self, json: &str) -> Result<Dataset, ParseError> {
        let raw: RawDataset = serde_json::from_str(json)?;
        self.convert_raw_dataset(raw)
    }

    fn convert_raw_dataset(&self, raw: RawDataset) -> Result<Dataset, ParseError> {
        let bin = self.convert_raw_bin(raw.bin)?;

        let mut seen = HashSet::new();
        let items = raw
            .items
            .into_iter()
            .map(|item| {
                if !seen.insert(item.id) {
                    return Err(ParseError::InvalidFormat(format!(
                        "duplicate item id {}",
                        item.id
                    )));
                }
                self.convert_raw_item(item)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Dataset {
            name: raw.name,
            bin,
            items,
            best_known: raw.best_known,
        })
    }

    fn convert_raw_bin(&self, raw: RawBox) -> Result<BinSpec, ParseError> {
        if !positive(raw.length, raw.width, raw.height) {
            return Err(ParseError::InvalidFormat(format!(
                "bin dimensions must be positive, got {} x {} x {}",
                raw.length, raw.width, raw.height
            )));
        }
        Ok(BinSpec::new(raw.length, raw.width, raw.height))
    }

    fn convert_raw_item(&self, raw: RawItem) -> Result<ItemSpec, ParseError> {
        if !positive(raw.length, raw.width, raw.height) {
            return Err(ParseError::InvalidFormat(format!(
                "item {} has non-positive dimensions",
                raw.id
            )));
        }
        Ok(ItemSpec::new(raw.id, raw.length, raw.width, raw.height))
    }
}

fn positive(length: f64, width: f64, height: f64) -> bool {
    [length, width, height]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
}

/// Raw instance as parsed from JSON.
#[derive(Debug, Deserialize)]
struct RawDataset {
    name: String,
    bin: RawBox,
    items: Vec<RawItem>,
    #[serde(default)]
    best_known: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawBox {
    length: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: usize,
    length: f64,
    width: f64,
    height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance() {
        let json = r#"{
            "name": "tiny",
            "bin": { "length": 10, "width": 8, "height": 6 },
            "items": [
                { "id": 1, "length": 8, "width": 6, "height": 4 },
                { "id": 2, "length": 3, "width": 3, "height": 2 }
            ]
        }"#;

        let dataset = DatasetParser::new().parse_json(json).unwrap();

        assert_eq!(dataset.name, "tiny");
        assert_eq!(dataset.bin, BinSpec::new(10.0, 8.0, 6.0));
        assert_eq!(dataset.items.len(), 2);
        assert_eq!(dataset.items[1], ItemSpec::new(2, 3.0, 3.0, 2.0));
        assert_eq!(dataset.best_known, None);
    }

    #[test]
    fn test_rejects_bad_input() {
        let parser = DatasetParser::new();

        let zero_bin = r#"{"name": "x", "bin": {"length": 0, "width": 8, "height": 6}, "items": []}"#;
        assert!(matches!(
            parser.parse_json(zero_bin),
            Err(ParseError::InvalidFormat(_))
        ));

        let duplicate = r#"{"name": "x", "bin": {"length": 10, "width": 8, "height": 6},
            "items": [{"id": 1, "length": 1, "width": 1, "height": 1},
                      {"id": 1, "length": 2, "width": 2, "height": 2}]}"#;
        assert!(matches!(
            parser.parse_json(duplicate),
            Err(ParseError::InvalidFormat(_))
        ));

        assert!(matches!(
            parser.parse_json("{"),
            Err(ParseError::JsonError(_))
        ));
    }
}
