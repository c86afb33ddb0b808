//! Benchmark instance types and the built-in reference instances.

use serde::{Deserialize, Serialize};
use u_packing_d3::{BinSpec, ItemSpec};

/// A 3D bin packing instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Instance name.
    pub name: String,
    /// Bin shared by every packing of this instance.
    pub bin: BinSpec,
    /// Items to pack.
    pub items: Vec<ItemSpec>,
    /// Best known number of bins, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_known: Option<usize>,
}

impl Dataset {
    /// Creates an instance from `(length, width, height)` triples, numbering items from 1.
    pub fn from_dimensions(name: &str, bin: (f64, f64, f64), dims: &[(f64, f64, f64)]) -> Self {
        let items = dims
            .iter()
            .enumerate()
            .map(|(i, &(l, w, h))| ItemSpec::new(i + 1, l, w, h))
            .collect();
        Self {
            name: name.to_string(),
            bin: BinSpec::new(bin.0, bin.1, bin.2),
            items,
            best_known: None,
        }
    }

    /// Sum of item volumes.
    pub fn total_volume(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.length * i.width * i.height)
            .sum()
    }

    /// Volume lower bound on the number of bins.
    pub fn theoretical_min_bins(&self) -> usize {
        let bin_volume = self.bin.length * self.bin.width * self.bin.height;
        if bin_volume <= 0.0 {
            return 0;
        }
        (self.total_volume() / bin_volume).ceil() as usize
    }
}

/// Short description of a built-in instance.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    /// Key used on the command line.
    pub key: &'static str,
    /// Human readable description.
    pub description: &'static str,
}

const REFERENCE_BIN: (f64, f64, f64) = (10.0, 8.0, 6.0);

const SMALL: [(f64, f64, f64); 8] = [
    (8.0, 6.0, 4.0),
    (7.0, 5.0, 4.0),
    (6.0, 5.0, 3.0),
    (5.0, 4.0, 3.0),
    (4.0, 4.0, 3.0),
    (5.0, 3.0, 2.0),
    (4.0, 3.0, 2.0),
    (3.0, 3.0, 2.0),
];

const MEDIUM: [(f64, f64, f64); 12] = [
    (9.0, 7.0, 5.0),
    (8.0, 6.0, 5.0),
    (7.0, 6.0, 4.0),
    (6.0, 5.0, 4.0),
    (6.0, 5.0, 3.0),
    (5.0, 4.0, 3.0),
    (5.0, 4.0, 2.0),
    (4.0, 4.0, 3.0),
    (4.0, 3.0, 3.0),
    (4.0, 3.0, 2.0),
    (3.0, 3.0, 2.0),
    (3.0, 2.0, 2.0),
];

const LARGE: [(f64, f64, f64); 15] = [
    (9.0, 7.0, 5.0),
    (8.0, 7.0, 5.0),
    (8.0, 6.0, 5.0),
    (7.0, 6.0, 5.0),
    (7.0, 6.0, 4.0),
    (6.0, 5.0, 4.0),
    (6.0, 5.0, 4.0),
    (6.0, 5.0, 3.0),
    (5.0, 5.0, 3.0),
    (5.0, 4.0, 3.0),
    (5.0, 4.0, 3.0),
    (5.0, 4.0, 2.0),
    (4.0, 4.0, 3.0),
    (4.0, 4.0, 3.0),
    (4.0, 3.0, 3.0),
];

/// Lists the built-in instances.
pub fn builtin_instances() -> Vec<DatasetInfo> {
    vec![
        DatasetInfo {
            key: "small",
            description: "8 items, theoretical min: 2 bins",
        },
        DatasetInfo {
            key: "medium",
            description: "12 items, theoretical min: 3 bins",
        },
        DatasetInfo {
            key: "large",
            description: "15 items, theoretical min: 4 bins",
        },
    ]
}

/// Looks up a built-in instance by key (case-insensitive).
pub fn builtin_instance(key: &str) -> Option<Dataset> {
    let (name, dims): (&str, &[(f64, f64, f64)]) = match key.to_lowercase().as_str() {
        "small" => ("Small Instance (8 items)", &SMALL),
        "medium" => ("Medium Instance (12 items)", &MEDIUM),
        "large" => ("Large Instance (15 items)", &LARGE),
        _ => return None,
    };
    Some(Dataset::from_dimensions(name, REFERENCE_BIN, dims))
}
