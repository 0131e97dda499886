//! Row path resolution.
//!
//! Paths address values inside a row (or any nested JSON value) using
//! dot-separated keys with bracketed array indices: `items[0].price`
//! resolves the same as `items.0.price`. An absent path is an ordinary,
//! expected outcome signalled by `None` -- never an error.

use serde_json::Value;

use crate::widget::Row;

/// Split a path expression into traversal segments.
///
/// Bracketed indices are rewritten to plain segments before splitting
/// (`a[2].c` becomes `["a", "2", "c"]`), so arrays and objects traverse
/// uniformly. Empty segments from leading, trailing, or doubled dots are
/// discarded.
pub fn split_path(path: &str) -> Vec<String> {
    path.replace('[', ".")
        .replace(']', "")
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve a path expression against a nested value.
///
/// Returns `None` when any segment along the path is absent. A final value
/// of JSON `null` is still a present value and resolves to `Some(Null)`.
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    resolve_segments(value, &split_path(path))
}

/// Resolve pre-split segments against a nested value.
///
/// Descends by object key, or by index when the current value is an array
/// and the segment parses as one. Traversal stops at the first absent
/// segment or null intermediate.
pub fn resolve_segments<'a>(value: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = value;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            // Scalars and null have no children to descend into.
            _ => return None,
        };
    }

    Some(current)
}

/// Resolve pre-split segments against a result row.
///
/// The first segment is a column lookup; remaining segments descend into
/// the column value. An empty segment list resolves to `None` (a row has
/// no "whole value" representation on the wire).
pub fn resolve_in_row<'a>(row: &'a Row, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let column = row.get(first)?;
    resolve_segments(column, rest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // -- Path splitting --

    #[test]
    fn splits_dotted_path() {
        assert_eq!(split_path("a.b.c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn rewrites_bracket_indices() {
        assert_eq!(split_path("items[0].price"), vec!["items", "0", "price"]);
        assert_eq!(split_path("a[2][3].b"), vec!["a", "2", "3", "b"]);
    }

    #[test]
    fn discards_empty_segments() {
        assert_eq!(split_path(".a..b."), vec!["a", "b"]);
        assert!(split_path("").is_empty());
    }

    // -- Resolution --

    #[test]
    fn resolves_nested_object_path() {
        let value = json!({"a": {"b": {"c": 42}}});
        assert_eq!(resolve(&value, "a.b.c"), Some(&json!(42)));
    }

    #[test]
    fn resolves_array_index_path() {
        let value = json!({"items": [{"price": 1}, {"price": 2}]});
        assert_eq!(resolve(&value, "items[1].price"), Some(&json!(2)));
    }

    #[test]
    fn missing_path_resolves_to_none() {
        let value = json!({"a": {}});
        assert_eq!(resolve(&value, "a.b.c"), None);
    }

    #[test]
    fn descending_into_scalar_resolves_to_none() {
        let value = json!({"a": 5});
        assert_eq!(resolve(&value, "a.b"), None);
    }

    #[test]
    fn null_intermediate_resolves_to_none() {
        let value = json!({"a": null});
        assert_eq!(resolve(&value, "a.b"), None);
    }

    #[test]
    fn explicit_null_leaf_is_present() {
        let value = json!({"a": {"b": null}});
        assert_eq!(resolve(&value, "a.b"), Some(&Value::Null));
    }

    #[test]
    fn out_of_bounds_index_resolves_to_none() {
        let value = json!({"items": [1, 2]});
        assert_eq!(resolve(&value, "items[5]"), None);
    }

    #[test]
    fn non_numeric_index_into_array_resolves_to_none() {
        let value = json!({"items": [1, 2]});
        assert_eq!(resolve(&value, "items.first"), None);
    }

    // -- Row resolution --

    #[test]
    fn resolves_row_column() {
        let row = match json!({"daily_sales": "50"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let segments = split_path("daily_sales");
        assert_eq!(resolve_in_row(&row, &segments), Some(&json!("50")));
    }

    #[test]
    fn empty_segments_resolve_to_none() {
        let row = Row::new();
        assert_eq!(resolve_in_row(&row, &[]), None);
    }
}
