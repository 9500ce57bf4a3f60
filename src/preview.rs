use crate::models::DataResponse;
use serde_json::Value;

/// Number of rows the backend sends back for a preview.
pub const PREVIEW_ROW_CAP: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: u64,
}

impl PreviewTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Headers come from the first row's keys; later rows are read through
/// those headers, so keys only present in later rows are not shown.
pub fn build_table(response: &DataResponse) -> PreviewTable {
    let headers: Vec<String> = response
        .data
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();

    let rows = response
        .data
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| row.get(header).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    PreviewTable {
        headers,
        rows,
        total_rows: response.total_rows,
    }
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(value) => value.clone(),
        Value::Bool(value) => value.to_string(),
        Value::Number(number) => match (number.as_i64(), number.as_u64(), number.as_f64()) {
            (Some(value), _, _) => value.to_string(),
            (_, Some(value), _) => value.to_string(),
            (_, _, Some(value)) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{value:.0}")
            }
            (_, _, Some(value)) => value.to_string(),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> DataResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn headers_follow_first_row_order() {
        let table = build_table(&response(json!({
            "data": [{"b": 1, "a": "x"}, {"a": "y", "b": 2}],
            "total_rows": 2
        })));
        assert_eq!(table.headers, vec!["b", "a"]);
        assert_eq!(table.rows, vec![vec!["1", "x"], vec!["2", "y"]]);
    }

    #[test]
    fn null_and_missing_cells_are_blank() {
        let table = build_table(&response(json!({
            "data": [{"a": 1, "b": null}, {"a": 2}],
            "total_rows": 500
        })));
        assert_eq!(table.rows[0], vec!["1", ""]);
        assert_eq!(table.rows[1], vec!["2", ""]);
        assert_eq!(table.total_rows, 500);
    }

    #[test]
    fn empty_result_has_no_columns() {
        let table = build_table(&response(json!({"data": [], "total_rows": 0})));
        assert!(table.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn whole_floats_print_like_integers() {
        assert_eq!(cell_text(&json!(3.0)), "3");
        assert_eq!(cell_text(&json!(2.5)), "2.5");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!(-7)), "-7");
    }
}
