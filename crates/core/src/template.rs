//! Placeholder template parsing.
//!
//! Dry widget configs carry two placeholder notations: `[[path]]` selects
//! a field from each row, `((path))` requests that rows be partitioned by
//! the value at the path. Each template string is parsed exactly once into
//! a tagged [`Template`]; hydration then operates on the tag instead of
//! re-matching notation per row. Anything that is not a well-formed
//! placeholder is a literal.

use crate::path::split_path;

/// A parsed template string from a dry widget config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Plain text, used verbatim (e.g. a dataset label such as `"Cars"`).
    Literal(String),
    /// `[[path]]` -- resolve the path against each row.
    Field(Vec<String>),
    /// `((path))` -- partition rows by the value at the path.
    Group(Vec<String>),
}

impl Template {
    /// Parse a template string into its tagged form.
    ///
    /// Malformed notation (unbalanced delimiters, empty path) degrades to
    /// [`Template::Literal`] rather than failing.
    pub fn parse(raw: &str) -> Self {
        if let Some(path) = strip_delimiters(raw, "[[", "]]") {
            return Template::Field(split_path(path));
        }
        if let Some(path) = strip_delimiters(raw, "((", "))") {
            return Template::Group(split_path(path));
        }
        Template::Literal(raw.to_string())
    }

    /// Whether this template partitions rows into groups.
    pub fn is_group(&self) -> bool {
        matches!(self, Template::Group(_))
    }

    /// Segments to use when the template is read as a value selector.
    ///
    /// `Field` and `Group` yield their parsed path. A `Literal` falls back
    /// to treating its raw text as a bare path, preserving the lenient
    /// behaviour of the notation stripper this parser replaced: a model
    /// that emits `"daily_sales"` instead of `"[[daily_sales]]"` still
    /// selects the column.
    pub fn selector_segments(&self) -> Vec<String> {
        match self {
            Template::Field(segments) | Template::Group(segments) => segments.clone(),
            Template::Literal(raw) => split_path(raw),
        }
    }
}

/// Strip a matching delimiter pair, returning the inner path.
///
/// Returns `None` when the delimiters do not both match or the inner text
/// is empty.
fn strip_delimiters<'a>(raw: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let inner = raw.strip_prefix(open)?.strip_suffix(close)?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
