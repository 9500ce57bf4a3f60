use crate::models::StatsResponse;
use serde_json::{Map, Value};

/// Mean and standard deviation of the first column the backend reported.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStats {
    pub column: String,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTypeCounts {
    pub numeric: usize,
    pub total: usize,
}

/// Everything the statistics panel shows. A `None` card is not rendered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsSummary {
    pub sample: Option<SampleStats>,
    pub missing_total: Option<u64>,
    pub column_types: Option<ColumnTypeCounts>,
}

pub fn summarize(stats: &StatsResponse) -> StatsSummary {
    StatsSummary {
        sample: stats.basic_stats.as_ref().and_then(sample_stats),
        missing_total: stats.missing_values.as_ref().map(missing_total),
        column_types: stats.data_types.as_ref().map(column_type_counts),
    }
}

fn sample_stats(basic: &Map<String, Value>) -> Option<SampleStats> {
    let (column, values) = basic.iter().next()?;
    Some(SampleStats {
        column: column.clone(),
        mean: values.get("mean").and_then(Value::as_f64),
        std: values.get("std").and_then(Value::as_f64),
    })
}

pub fn missing_total(missing: &Map<String, Value>) -> u64 {
    missing
        .values()
        .filter_map(Value::as_u64)
        .fold(0u64, |acc, count| acc.saturating_add(count))
}

pub fn column_type_counts(types: &Map<String, Value>) -> ColumnTypeCounts {
    let numeric = types
        .values()
        .filter_map(Value::as_str)
        .filter(|dtype| is_numeric_dtype(dtype))
        .count();
    ColumnTypeCounts {
        numeric,
        total: types.len(),
    }
}

pub fn is_numeric_dtype(dtype: &str) -> bool {
    dtype.contains("int") || dtype.contains("float")
}

pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() => format!("{value:.2}"),
        _ => "N/A".to_string(),
    }
}
