use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Summary of the dataset the backend currently holds, as returned by a
/// successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub filename: String,
    pub shape: (u64, u64),
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub numeric_columns: Vec<String>,
    #[serde(default)]
    pub categorical_columns: Vec<String>,
    #[serde(default)]
    pub dtypes: BTreeMap<String, String>,
}

impl DatasetInfo {
    pub fn rows(&self) -> u64 {
        self.shape.0
    }

    pub fn cols(&self) -> u64 {
        self.shape.1
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    pub info: Option<DatasetInfo>,
    pub error: Option<String>,
}

/// `GET /stats`. Column maps keep the backend's key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub error: Option<String>,
    pub basic_stats: Option<Map<String, Value>>,
    pub missing_values: Option<Map<String, Value>>,
    pub data_types: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    pub error: Option<String>,
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
    #[serde(default)]
    pub total_rows: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotResponse {
    pub error: Option<String>,
    pub plot: Option<String>,
}

/// A file picked in the browser, before any validation.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: bytes::Bytes,
}

/// Where a selection came from. Drops may carry several files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadSource {
    Picker,
    Drop,
}

impl UploadSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "picker" => Some(Self::Picker),
            "drop" => Some(Self::Drop),
            _ => None,
        }
    }
}
