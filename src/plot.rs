use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart type requested from the backend. Unknown names pass through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlotKind {
    #[default]
    Histogram,
    Scatter,
    Bar,
    Correlation,
    Other(String),
}

pub const KNOWN_KINDS: [PlotKind; 4] = [
    PlotKind::Histogram,
    PlotKind::Scatter,
    PlotKind::Bar,
    PlotKind::Correlation,
];

impl PlotKind {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "histogram" => Self::Histogram,
            "scatter" => Self::Scatter,
            "bar" => Self::Bar,
            "correlation" => Self::Correlation,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Histogram => "histogram",
            Self::Scatter => "scatter",
            Self::Bar => "bar",
            Self::Correlation => "correlation",
            Self::Other(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Histogram => "Histogram",
            Self::Scatter => "Scatter Plot",
            Self::Bar => "Bar Chart",
            Self::Correlation => "Correlation Heatmap",
            Self::Other(name) => name,
        }
    }

    /// Which column selectors the controls show for this kind.
    pub fn visibility(&self) -> SelectorVisibility {
        match self {
            Self::Scatter => SelectorVisibility { x: true, y: true },
            Self::Correlation => SelectorVisibility { x: false, y: false },
            _ => SelectorVisibility { x: true, y: false },
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorVisibility {
    pub x: bool,
    pub y: bool,
}

/// Browser-side control values, as submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlotParams {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub x_col: Option<String>,
    #[serde(default)]
    pub y_col: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRequest {
    pub kind: PlotKind,
    pub x_col: Option<String>,
    pub y_col: Option<String>,
}

impl PlotRequest {
    pub fn new(kind: PlotKind, x_col: Option<String>, y_col: Option<String>) -> Self {
        Self {
            kind,
            x_col: x_col.filter(|col| !col.is_empty()),
            y_col: y_col.filter(|col| !col.is_empty()),
        }
    }

    /// Query pairs for `GET /plot`; empty columns are left out.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("type", self.kind.as_str().to_string())];
        if let Some(x) = &self.x_col {
            query.push(("x_col", x.clone()));
        }
        if let Some(y) = &self.y_col {
            query.push(("y_col", y.clone()));
        }
        query
    }
}

impl From<PlotParams> for PlotRequest {
    fn from(params: PlotParams) -> Self {
        Self::new(PlotKind::parse(&params.kind), params.x_col, params.y_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_shows_both_selectors() {
        assert_eq!(PlotKind::Scatter.visibility(), SelectorVisibility { x: true, y: true });
    }

    #[test]
    fn correlation_hides_both_selectors() {
        assert_eq!(
            PlotKind::Correlation.visibility(),
            SelectorVisibility { x: false, y: false }
        );
    }

    #[test]
    fn other_kinds_show_x_only() {
        for kind in [PlotKind::Histogram, PlotKind::Bar, PlotKind::parse("violin")] {
            assert_eq!(kind.visibility(), SelectorVisibility { x: true, y: false });
        }
    }

    #[test]
    fn unknown_kind_passes_through() {
        let kind = PlotKind::parse("violin");
        assert_eq!(kind, PlotKind::Other("violin".into()));
        assert_eq!(kind.as_str(), "violin");
    }

    #[test]
    fn empty_columns_are_omitted_from_query() {
        let request = PlotRequest::new(PlotKind::Histogram, Some("age".into()), Some(String::new()));
        assert_eq!(
            request.query(),
            vec![("type", "histogram".to_string()), ("x_col", "age".to_string())]
        );
    }

    #[test]
    fn hidden_selectors_still_send_their_values() {
        let request: PlotRequest = PlotParams {
            kind: "correlation".into(),
            x_col: Some("a".into()),
            y_col: Some("b".into()),
        }
        .into();
        assert_eq!(request.query().len(), 3);
    }
}
