use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One row of the wide crime table: a borough/category pair with a count per month column.
#[derive(Debug, Clone, PartialEq)]
pub struct CrimeRow {
    pub borough: String,
    pub major_category: String,
    pub subcategory: String,
    pub monthly_counts: Vec<u64>,
}

/// Long-format record produced by melting the month columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeObservation {
    #[serde(rename = "BoroughName")]
    pub borough: String,
    #[serde(rename = "MajorCrimeCategory")]
    pub major_category: String,
    #[serde(rename = "CrimeSubcategory")]
    pub subcategory: String,
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "CrimeCount")]
    pub count: u64,
}

/// Wide table as read from disk, before melting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideCrimeTable {
    pub months: Vec<String>,
    pub rows: Vec<CrimeRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeTable {
    /// Month columns in file order.
    pub months: Vec<String>,
    pub observations: Vec<CrimeObservation>,
}

impl CrimeTable {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn for_borough<'a>(&'a self, borough: &'a str) -> impl Iterator<Item = &'a CrimeObservation> + 'a {
        self.observations.iter().filter(move |o| o.borough == borough)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoroughBoundaries {
    pub document: Arc<serde_json::Value>,
    /// `properties.name` of each named feature, in document order.
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn same(value: &str) -> Self {
        Self {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

/// Everything the dashboard serves. Either source may be absent when its file was missing or empty.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub crimes: Option<Arc<CrimeTable>>,
    pub boundaries: Option<Arc<BoroughBoundaries>>,
    pub loaded_at: DateTime<Utc>,
}

impl DashboardData {
    pub fn new(crimes: Option<CrimeTable>, boundaries: Option<BoroughBoundaries>) -> Self {
        Self {
            crimes: crimes.map(Arc::new),
            boundaries: boundaries.map(Arc::new),
            loaded_at: Utc::now(),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(None, None)
    }

    pub fn is_complete(&self) -> bool {
        self.crimes.is_some() && self.boundaries.is_some()
    }
}

/// Output of the extract step: raw bytes per source, `None` when the source is unavailable.
#[derive(Debug, Clone, Default)]
pub struct ExtractedSources {
    pub crime_csv: Option<Vec<u8>>,
    pub boundaries_json: Option<Vec<u8>>,
}
