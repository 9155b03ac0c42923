//! Terraform block rendering.
//!
//! The single formatting engine behind every compiler. Attribute values are
//! an explicit tagged enum ([`TfValue`]) instead of duck-typed JSON: a quoted
//! string and an unquoted expression are different variants, so a compiler
//! can never accidentally quote a resource reference. Rendering is
//! insertion-ordered and byte-stable - tests compare output text exactly.
//!
//! Layout rules:
//! - simple attributes (strings, expressions, numbers, booleans, `null`,
//!   inline lists) are `=`-aligned to the longest simple key in their block
//! - multiline lists, maps, and nested blocks use a single space and do not
//!   participate in alignment
//! - nested blocks are indented two spaces per level

use std::fmt::Write;

/// A Terraform attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum TfValue {
    /// Quoted string literal; may contain `${...}` interpolation.
    Str(String),
    /// Unquoted expression, e.g. `ibm_is_vpc.management_vpc.id`.
    Expr(String),
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Bool(bool),
    /// Literal `null`.
    Null,
    /// Inline list: `["a","b"]`, rendered on one line without spaces.
    List(Vec<TfValue>),
    /// Multiline list: one element per line, trailing comma on all but the
    /// last element.
    Lines(Vec<TfValue>),
    /// Object assignment: `key = { ... }`.
    Map(Vec<(String, TfValue)>),
    /// Nested block: `key { ... }`.
    Block(Vec<(String, TfValue)>),
    /// Repeated nested blocks under the same key, one per element.
    Blocks(Vec<Vec<(String, TfValue)>>),
}

impl TfValue {
    /// Quoted string from anything stringy.
    pub fn str(value: impl Into<String>) -> Self {
        TfValue::Str(value.into())
    }

    /// Unquoted expression from anything stringy.
    pub fn expr(value: impl Into<String>) -> Self {
        TfValue::Expr(value.into())
    }

    /// Inline list of quoted strings.
    pub fn str_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TfValue::List(values.into_iter().map(TfValue::str).collect())
    }

    /// Quoted string when present, `null` otherwise.
    pub fn opt_str(value: Option<&str>) -> Self {
        value.map_or(TfValue::Null, TfValue::str)
    }

    /// Integer when present, `null` otherwise.
    pub fn opt_int(value: Option<i64>) -> Self {
        value.map_or(TfValue::Null, TfValue::Int)
    }

    fn is_simple(&self) -> bool {
        matches!(
            self,
            TfValue::Str(_)
                | TfValue::Expr(_)
                | TfValue::Int(_)
                | TfValue::Bool(_)
                | TfValue::Null
                | TfValue::List(_)
        )
    }

    fn render_scalar(&self) -> String {
        match self {
            TfValue::Str(s) => format!("\"{s}\""),
            TfValue::Expr(e) => e.clone(),
            TfValue::Int(i) => i.to_string(),
            TfValue::Bool(b) => b.to_string(),
            TfValue::Null => "null".to_string(),
            TfValue::List(items) => {
                let rendered: Vec<String> =
                    items.iter().map(TfValue::render_scalar).collect();
                format!("[{}]", rendered.join(","))
            }
            // Non-scalar variants never reach here; render_attrs dispatches
            // them before asking for a scalar.
            other => panic!("not a scalar terraform value: {other:?}"),
        }
    }
}

/// Attribute list builder for one block. Keeps insertion order.
#[derive(Debug, Default, Clone)]
pub struct Attrs(Vec<(String, TfValue)>);

impl Attrs {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an attribute.
    pub fn add(&mut self, key: impl Into<String>, value: TfValue) -> &mut Self {
        self.0.push((key.into(), value));
        self
    }

    /// Append an attribute only when the value is present.
    pub fn add_if<T>(&mut self, key: impl Into<String>, value: Option<T>, f: impl FnOnce(T) -> TfValue) -> &mut Self {
        if let Some(value) = value {
            self.0.push((key.into(), f(value)));
        }
        self
    }

    /// Consume into the raw pair list.
    pub fn into_vec(self) -> Vec<(String, TfValue)> {
        self.0
    }
}

fn render_attrs(attrs: &[(String, TfValue)], indent: usize) -> String {
    let pad = " ".repeat(indent);
    let width = attrs
        .iter()
        .filter(|(_, value)| value.is_simple())
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (key, value) in attrs {
        match value {
            simple if simple.is_simple() => {
                let _ = writeln!(out, "{pad}{key:<width$} = {}", simple.render_scalar());
            }
            TfValue::Lines(items) => {
                let _ = writeln!(out, "{pad}{key} = [");
                for (index, item) in items.iter().enumerate() {
                    let comma = if index + 1 == items.len() { "" } else { "," };
                    let _ = writeln!(out, "{pad}  {}{comma}", item.render_scalar());
                }
                let _ = writeln!(out, "{pad}]");
            }
            TfValue::Map(inner) => {
                let _ = writeln!(out, "{pad}{key} = {{");
                out.push_str(&render_attrs(inner, indent + 2));
                let _ = writeln!(out, "{pad}}}");
            }
            TfValue::Block(inner) => {
                let _ = writeln!(out, "{pad}{key} {{");
                out.push_str(&render_attrs(inner, indent + 2));
                let _ = writeln!(out, "{pad}}}");
            }
            TfValue::Blocks(blocks) => {
                for inner in blocks {
                    let _ = writeln!(out, "{pad}{key} {{");
                    out.push_str(&render_attrs(inner, indent + 2));
                    let _ = writeln!(out, "{pad}}}");
                }
            }
            _ => unreachable!(),
        }
    }
    out
}

/// Render a labelled top-level block, e.g.
/// `resource "ibm_is_vpc" "management_vpc" { ... }`.
///
/// Output starts and ends with a newline so adjacent blocks concatenate into
/// a blank-line-separated sequence.
pub fn labelled_block(keyword: &str, labels: &[&str], attrs: &Attrs) -> String {
    let mut header = String::from(keyword);
    for label in labels {
        let _ = write!(header, " \"{label}\"");
    }
    format!("\n{header} {{\n{}}}\n", render_attrs(&attrs.0, 2))
}

/// Render a `resource` block. The symbolic name is used verbatim; callers
/// pass names already normalized by [`crate::tf::util::snake_case`].
pub fn resource(tf_type: &str, name: &str, attrs: &Attrs) -> String {
    labelled_block("resource", &[tf_type, name], attrs)
}

/// Render a `data` block.
pub fn data(tf_type: &str, name: &str, attrs: &Attrs) -> String {
    labelled_block("data", &[tf_type, name], attrs)
}

/// Render an unlabelled top-level block (`terraform { ... }`).
pub fn bare_block(keyword: &str, attrs: &Attrs) -> String {
    labelled_block(keyword, &[], attrs)
}
