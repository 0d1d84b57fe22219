//! Dataset rows and aggregation output.

use h3o::CellIndex;
use serde::{Deserialize, Serialize};

/// One synthetic row of the dataset: a base-resolution cell and its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(with = "cell_hex")]
    pub cell: CellIndex,
    pub level: i64,
    pub group_id: i64,
}

impl Record {
    #[inline]
    pub const fn new(cell: CellIndex, level: i64, group_id: i64) -> Self {
        Self {
            cell,
            level,
            group_id,
        }
    }
}

/// Median level of all records sharing an ancestor cell and a group id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBucket {
    #[serde(with = "cell_hex")]
    pub ancestor: CellIndex,
    pub group_id: i64,
    pub median_level: i64,
    /// Number of records reduced into this bucket.
    pub count: usize,
}

impl AggregateBucket {
    pub const fn key(&self) -> (CellIndex, i64) {
        (self.ancestor, self.group_id)
    }
}

/// Serde adapter writing a cell as its canonical hex string (`8911aa6483bffff`).
pub mod cell_hex {
    use h3o::CellIndex;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cell: &CellIndex, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(cell)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CellIndex, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<CellIndex>().map_err(D::Error::custom)
    }
}
