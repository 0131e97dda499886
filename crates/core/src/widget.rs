//! Widget configuration types.
//!
//! A *dry* config is the template produced by the language model: its
//! chart fields hold placeholder expressions (`[[path]]`, `((path))`)
//! instead of values. Hydration resolves those placeholders against query
//! rows to produce the *wet* config serialized to the client.
//!
//! Dry configs are created per request and never persisted; wet configs
//! are produced once per request/response cycle and not mutated after.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// A single result row: column name to scalar or nested value.
///
/// Produced by the query engine; opaque to this crate except for path
/// lookups.
pub type Row = serde_json::Map<String, Value>;

/// Discriminates chart widgets from table widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Chart,
    Table,
}

/// Column data types a table widget can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDataType {
    String,
    Number,
    Date,
    Object,
    Array,
}

/// A table column descriptor. Passed through hydration unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Row key this column reads from.
    pub key: String,
    /// Human-readable column header.
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: ColumnDataType,
}

// ---------------------------------------------------------------------------
// Dry (template) side
// ---------------------------------------------------------------------------

/// A dataset template inside a dry chart config.
///
/// `label` is either a literal series name or a `((path))` grouping
/// expression; `data` is a `[[path]]` expression selecting the series
/// values from each row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetTemplate {
    pub label: String,
    pub data: String,
    /// Styling passed through verbatim.
    #[serde(
        rename = "backgroundColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<Vec<String>>,
}

/// Chart data section of a dry config: a labels expression plus dataset
/// templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryChartData {
    /// Labels placeholder expression. Absent means the chart has no
    /// labels axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(default)]
    pub datasets: Vec<DatasetTemplate>,
}

/// Chart section of a dry config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryChart {
    /// Render hint (e.g. `"bar"`, `"line"`). Opaque to the backend.
    #[serde(rename = "type")]
    pub chart_type: String,
    pub data: DryChartData,
}

/// A widget template as produced by the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryWidgetConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// SQL that produces the rows this widget is hydrated against.
    pub sql: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<DryChart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<TableColumn>>,
}

impl DryWidgetConfig {
    /// Decode a dry config from an untyped JSON value.
    ///
    /// Used by the LLM layer to decode tool-call arguments; the error
    /// message carries the serde failure for the caller to surface.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        serde_json::from_value(value)
            .map_err(|e| CoreError::Validation(format!("Invalid widget config: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Wet (materialized) side
// ---------------------------------------------------------------------------

/// A materialized chart dataset: one series of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Series label: the literal template label, or the group key (kept in
    /// its row representation) for grouped datasets.
    pub label: Value,
    pub data: Vec<Value>,
    #[serde(
        rename = "backgroundColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<Vec<String>>,
}

/// Chart data section of a wet config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WetChartData {
    /// Labels resolved per input row, in row order.
    ///
    /// Labels always mirror the raw row order, even when datasets are
    /// grouped -- a grouped series can therefore be shorter than the
    /// labels array. Callers rendering multi-series grouped charts need to
    /// account for the mismatch.
    pub labels: Vec<Value>,
    pub datasets: Vec<Dataset>,
}

/// Chart section of a wet config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WetChart {
    #[serde(rename = "type")]
    pub chart_type: String,
    pub data: WetChartData,
}

/// Table section of a wet config: the raw result rows, verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WetTable {
    pub data: Vec<Row>,
}

/// A fully materialized widget, ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WetWidgetConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub sql: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<WetChart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<TableColumn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<WetTable>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn dry_config_decodes_from_wire_shape() {
        let config = DryWidgetConfig::from_value(json!({
            "title": "Sales by day",
            "description": "Daily sales for the last week",
            "sql": "SELECT date, daily_sales FROM sales",
            "type": "chart",
            "chart": {
                "type": "bar",
                "data": {
                    "labels": "[[date]]",
                    "datasets": [
                        {"label": "Sales", "data": "[[daily_sales]]"}
                    ]
                }
            }
        }))
        .expect("valid config should decode");

        assert_eq!(config.widget_type, WidgetType::Chart);
        let chart = config.chart.expect("chart section");
        assert_eq!(chart.chart_type, "bar");
        assert_eq!(chart.data.labels.as_deref(), Some("[[date]]"));
        assert_eq!(chart.data.datasets.len(), 1);
    }

    #[test]
    fn table_config_decodes_column_descriptors() {
        let config = DryWidgetConfig::from_value(json!({
            "title": "Orders",
            "sql": "SELECT * FROM orders",
            "type": "table",
            "columns": [
                {"key": "id", "name": "Order ID", "dataType": "number"},
                {"key": "placed_at", "name": "Placed", "dataType": "date"}
            ]
        }))
        .expect("valid config should decode");

        assert_eq!(config.widget_type, WidgetType::Table);
        let columns = config.columns.expect("columns");
        assert_eq!(columns[0].data_type, ColumnDataType::Number);
        assert_eq!(columns[1].data_type, ColumnDataType::Date);
    }

    #[test]
    fn unknown_widget_type_is_rejected() {
        let result = DryWidgetConfig::from_value(json!({
            "title": "x",
            "sql": "SELECT 1",
            "type": "gauge",
        }));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn wet_config_serializes_camel_case_styling() {
        let dataset = Dataset {
            label: json!("Cars"),
            data: vec![json!(1), json!(2)],
            background_color: Some(vec!["#ff0000".to_string()]),
        };

        let value = serde_json::to_value(&dataset).expect("serialization should succeed");
        assert_eq!(value["backgroundColor"][0], "#ff0000");
        assert_eq!(value["label"], "Cars");
    }

    #[test]
    fn absent_sections_are_omitted_from_wire_output() {
        let wet = WetWidgetConfig {
            title: "t".to_string(),
            description: String::new(),
            sql: "SELECT 1".to_string(),
            widget_type: WidgetType::Chart,
            chart: None,
            columns: None,
            table: None,
        };

        let value = serde_json::to_value(&wet).expect("serialization should succeed");
        let object = value.as_object().expect("object");
        assert!(!object.contains_key("chart"));
        assert!(!object.contains_key("table"));
        assert!(!object.contains_key("columns"));
    }
}
