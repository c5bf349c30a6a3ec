use crate::domain::model::{BoroughBoundaries, CrimeRow, WideCrimeTable};
use crate::utils::error::{Result, SafeCityError};
use std::sync::Arc;

pub const BOROUGH_COLUMN: &str = "BoroughName";
const MAJOR_COLUMNS: [&str; 2] = ["MajorText", "MajorCrimeCategory"];
const MINOR_COLUMNS: [&str; 2] = ["MinorText", "CrimeSubcategory"];

fn malformed(source_name: &str, message: String) -> SafeCityError {
    SafeCityError::MalformedData {
        source_name: source_name.to_string(),
        message,
    }
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| candidates.iter().any(|c| h.trim() == *c))
}

/// Parses one count cell. Empty cells count as zero; integral floats such as `3.0` are accepted.
pub fn parse_count(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0);
    }
    if let Ok(n) = cell.parse::<u64>() {
        return Some(n);
    }
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Some(f as u64),
        _ => None,
    }
}

/// Reads the wide crime table. `MajorText`/`MinorText` are renamed to category/subcategory on the way in;
/// every column other than the three id columns is treated as a month.
pub fn parse_crime_csv(source_name: &str, bytes: &[u8]) -> Result<WideCrimeTable> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(SafeCityError::EmptyDataFile {
            path: source_name.to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(SafeCityError::EmptyDataFile {
            path: source_name.to_string(),
        });
    }

    let borough_idx = find_column(&headers, &[BOROUGH_COLUMN])
        .ok_or_else(|| malformed(source_name, format!("missing column {}", BOROUGH_COLUMN)))?;
    let major_idx = find_column(&headers, &MAJOR_COLUMNS)
        .ok_or_else(|| malformed(source_name, format!("missing column {}", MAJOR_COLUMNS[0])))?;
    let minor_idx = find_column(&headers, &MINOR_COLUMNS)
        .ok_or_else(|| malformed(source_name, format!("missing column {}", MINOR_COLUMNS[0])))?;

    let month_indices: Vec<usize> = (0..headers.len())
        .filter(|i| *i != borough_idx && *i != major_idx && *i != minor_idx)
        .collect();
    let months: Vec<String> = month_indices
        .iter()
        .map(|i| headers[*i].trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line_no = line + 2;

        let mut monthly_counts = Vec::with_capacity(month_indices.len());
        for (idx, month) in month_indices.iter().zip(&months) {
            let cell = record.get(*idx).unwrap_or("");
            let count = parse_count(cell).ok_or_else(|| {
                malformed(
                    source_name,
                    format!("line {}: column {} has non-count value '{}'", line_no, month, cell),
                )
            })?;
            monthly_counts.push(count);
        }

        rows.push(CrimeRow {
            borough: record.get(borough_idx).unwrap_or("").to_string(),
            major_category: record.get(major_idx).unwrap_or("").to_string(),
            subcategory: record.get(minor_idx).unwrap_or("").to_string(),
            monthly_counts,
        });
    }

    tracing::debug!(
        "Parsed {} crime rows with {} month columns from {}",
        rows.len(),
        months.len(),
        source_name
    );

    Ok(WideCrimeTable { months, rows })
}

/// Reads a GeoJSON FeatureCollection and indexes the `properties.name` of each feature.
pub fn parse_boundaries(source_name: &str, bytes: &[u8]) -> Result<BoroughBoundaries> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(SafeCityError::EmptyDataFile {
            path: source_name.to_string(),
        });
    }

    let document: serde_json::Value = serde_json::from_slice(bytes)?;

    match document.get("type").and_then(|t| t.as_str()) {
        Some("FeatureCollection") => {}
        other => {
            return Err(malformed(
                source_name,
                format!("expected a FeatureCollection, found {:?}", other),
            ))
        }
    }

    let features = document
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| malformed(source_name, "missing features array".to_string()))?;

    let names: Vec<String> = features
        .iter()
        .filter_map(|f| f.pointer("/properties/name").and_then(|n| n.as_str()))
        .map(str::to_string)
        .collect();

    if names.len() < features.len() {
        tracing::warn!(
            "{} of {} features in {} have no properties.name",
            features.len() - names.len(),
            features.len(),
            source_name
        );
    }

    Ok(BoroughBoundaries {
        document: Arc::new(document),
        names,
    })
}
