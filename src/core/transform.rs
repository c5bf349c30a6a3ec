use crate::domain::model::{CrimeObservation, CrimeTable, DropdownOption, WideCrimeTable};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Unpivots the month columns: one observation per (row, month), row order then column order.
pub fn melt(wide: WideCrimeTable) -> CrimeTable {
    let mut observations = Vec::with_capacity(wide.rows.len() * wide.months.len());
    for row in wide.rows {
        for (month, count) in wide.months.iter().zip(row.monthly_counts) {
            observations.push(CrimeObservation {
                borough: row.borough.clone(),
                major_category: row.major_category.clone(),
                subcategory: row.subcategory.clone(),
                month: month.clone(),
                count,
            });
        }
    }
    CrimeTable {
        months: wide.months,
        observations,
    }
}

/// Sort key for month labels: `YYYYMM`, `YYYY-MM` and `YYYY-MM-DD` sort by date, anything else after them by text.
pub fn month_sort_key(label: &str) -> (bool, Option<NaiveDate>, String) {
    let date = NaiveDate::parse_from_str(&format!("{}01", label), "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", label), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(label, "%Y-%m-%d"))
        .ok();
    (date.is_none(), date, label.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategorySeries {
    pub subcategory: String,
    pub points: Vec<(String, u64)>,
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

impl CrimeTable {
    /// Total crimes per borough, sorted by borough name.
    pub fn borough_totals(&self) -> Vec<(String, u64)> {
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
        for o in &self.observations {
            *totals.entry(o.borough.as_str()).or_default() += o.count;
        }
        totals.into_iter().map(|(b, c)| (b.to_string(), c)).collect()
    }

    /// Total crimes per month for one borough, in month order.
    pub fn monthly_totals(&self, borough: &str) -> Vec<(String, u64)> {
        let mut totals: HashMap<&str, u64> = HashMap::new();
        for o in self.for_borough(borough) {
            *totals.entry(o.month.as_str()).or_default() += o.count;
        }
        let mut totals: Vec<(String, u64)> = totals
            .into_iter()
            .map(|(m, c)| (m.to_string(), c))
            .collect();
        totals.sort_by_cached_key(|(m, _)| month_sort_key(m));
        totals
    }

    /// Total crimes per major category for one borough, sorted by category name.
    pub fn category_totals(&self, borough: &str) -> Vec<(String, u64)> {
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
        for o in self.for_borough(borough) {
            *totals.entry(o.major_category.as_str()).or_default() += o.count;
        }
        totals.into_iter().map(|(k, c)| (k.to_string(), c)).collect()
    }

    /// One monthly series per subcategory of `major` in `borough`, subcategories in first-appearance order.
    pub fn subcategory_series(&self, borough: &str, major: &str) -> Vec<SubcategorySeries> {
        let mut sorted_months: Vec<&str> = self.months.iter().map(String::as_str).collect();
        sorted_months.sort_by_cached_key(|m| month_sort_key(m));
        let month_pos: HashMap<&str, usize> = sorted_months
            .iter()
            .enumerate()
            .map(|(i, m)| (*m, i))
            .collect();

        let mut order: Vec<&str> = Vec::new();
        let mut sums: HashMap<&str, BTreeMap<usize, u64>> = HashMap::new();
        for o in self.for_borough(borough).filter(|o| o.major_category == major) {
            let Some(pos) = month_pos.get(o.month.as_str()) else {
                continue;
            };
            let months = sums.entry(o.subcategory.as_str()).or_insert_with(|| {
                order.push(o.subcategory.as_str());
                BTreeMap::new()
            });
            *months.entry(*pos).or_default() += o.count;
        }

        order
            .into_iter()
            .map(|sub| SubcategorySeries {
                subcategory: sub.to_string(),
                points: sums
                    .remove(sub)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(pos, count)| (sorted_months[pos].to_string(), count))
                    .collect(),
            })
            .collect()
    }

    pub fn borough_names(&self) -> Vec<String> {
        unique_in_order(self.observations.iter().map(|o| o.borough.as_str()))
    }

    pub fn major_categories(&self, borough: &str) -> Vec<String> {
        unique_in_order(self.for_borough(borough).map(|o| o.major_category.as_str()))
    }
}

pub const NO_DATA_LABEL: &str = "No data available";

/// Borough dropdown entries; a single placeholder entry when crime data is unavailable.
pub fn borough_options(table: Option<&CrimeTable>) -> Vec<DropdownOption> {
    match table {
        Some(table) => table
            .borough_names()
            .iter()
            .map(|b| DropdownOption::same(b))
            .collect(),
        None => vec![DropdownOption {
            label: NO_DATA_LABEL.to_string(),
            value: String::new(),
        }],
    }
}

pub fn major_crime_options(table: &CrimeTable, borough: &str) -> Vec<DropdownOption> {
    table
        .major_categories(borough)
        .iter()
        .map(|m| DropdownOption::same(m))
        .collect()
}
