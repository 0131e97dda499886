//! The widget-hydration engine.
//!
//! [`hydrate`] substitutes the placeholder expressions of a dry widget
//! config with value arrays drawn from query rows. It is a total,
//! synchronous function over in-memory structures: absent paths resolve
//! to null, malformed placeholders act as literals, and a missing
//! chart/table section yields an output with that section omitted rather
//! than an error. Safe to call concurrently; no shared state.

use serde_json::Value;

use crate::path::resolve_in_row;
use crate::template::Template;
use crate::widget::{
    Dataset, DatasetTemplate, DryChart, DryWidgetConfig, Row, WetChart, WetChartData, WetTable,
    WetWidgetConfig, WidgetType,
};

/// Hydrate a dry widget config against query rows.
///
/// Chart configs get their labels and datasets materialized; table
/// configs carry the verbatim row array as `table.data`. Pass-through
/// fields (`title`, `description`, `sql`, `columns`, styling) are copied
/// unchanged.
pub fn hydrate(config: &DryWidgetConfig, rows: &[Row]) -> WetWidgetConfig {
    let chart = match (config.widget_type, config.chart.as_ref()) {
        (WidgetType::Chart, Some(chart)) => Some(hydrate_chart(chart, rows)),
        // A chart config without a chart section (or a table config) emits
        // no chart.
        _ => None,
    };

    let table = match config.widget_type {
        WidgetType::Table => Some(WetTable {
            data: rows.to_vec(),
        }),
        WidgetType::Chart => None,
    };

    WetWidgetConfig {
        title: config.title.clone(),
        description: config.description.clone(),
        sql: config.sql.clone(),
        widget_type: config.widget_type,
        chart,
        columns: config.columns.clone(),
        table,
    }
}

/// Materialize a chart section: labels in row order plus one or more
/// output datasets per template.
fn hydrate_chart(chart: &DryChart, rows: &[Row]) -> WetChart {
    // Labels mirror the raw row order. They are NOT re-derived from groups
    // even when a dataset is grouped, so a grouped series may be shorter
    // than the labels array.
    let labels = match chart.data.labels.as_deref() {
        Some(raw) => resolve_series(&Template::parse(raw), rows),
        None => Vec::new(),
    };

    let datasets = chart
        .data
        .datasets
        .iter()
        .flat_map(|template| hydrate_dataset(template, rows))
        .collect();

    WetChart {
        chart_type: chart.chart_type.clone(),
        data: WetChartData { labels, datasets },
    }
}

/// Hydrate one dataset template into one or more output datasets.
///
/// A literal label yields a single series; a `((path))` label partitions
/// the rows and yields one series per distinct group key.
fn hydrate_dataset(template: &DatasetTemplate, rows: &[Row]) -> Vec<Dataset> {
    let data_segments = Template::parse(&template.data).selector_segments();

    match Template::parse(&template.label) {
        Template::Group(group_segments) => {
            group_rows(rows, &group_segments, &data_segments)
                .into_iter()
                .map(|(key, data)| Dataset {
                    label: key,
                    data,
                    background_color: template.background_color.clone(),
                })
                .collect()
        }
        Template::Literal(text) => vec![Dataset {
            label: Value::String(text),
            data: resolve_values(rows, &data_segments),
            background_color: template.background_color.clone(),
        }],
        // A [[path]] label is not a grouping request; keep the bare path
        // text as the series name.
        Template::Field(segments) => vec![Dataset {
            label: Value::String(segments.join(".")),
            data: resolve_values(rows, &data_segments),
            background_color: template.background_color.clone(),
        }],
    }
}

/// Stable partition of rows by group key.
///
/// Groups appear in first-seen order and rows keep their original order
/// within each group. Key equality is JSON value equality (value + type:
/// the string `"1"` and the number `1` are distinct groups). Rows missing
/// the grouping path all land in a single group keyed by null.
fn group_rows(
    rows: &[Row],
    group_segments: &[String],
    data_segments: &[String],
) -> Vec<(Value, Vec<Value>)> {
    let mut groups: Vec<(Value, Vec<Value>)> = Vec::new();

    for row in rows {
        let key = resolve_value(row, group_segments);
        let datum = resolve_value(row, data_segments);

        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, data)) => data.push(datum),
            None => groups.push((key, vec![datum])),
        }
    }

    groups
}

/// Resolve a parsed template against every row, in row order.
fn resolve_series(template: &Template, rows: &[Row]) -> Vec<Value> {
    resolve_values(rows, &template.selector_segments())
}

/// Resolve a path against every row, in row order, defaulting to null.
fn resolve_values(rows: &[Row], segments: &[String]) -> Vec<Value> {
    rows.iter()
        .map(|row| resolve_value(row, segments))
        .collect()
}

/// Resolve a path against one row, defaulting to null.
fn resolve_value(row: &Row, segments: &[String]) -> Value {
    resolve_in_row(row, segments)
        .cloned()
        .unwrap_or(Value::Null)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
