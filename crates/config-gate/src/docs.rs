// crates/config-gate/src/docs.rs
// ============================================================================
// Module: Schema Documentation
// Description: Markdown field tables rendered from schema declarations.
// Purpose: Keep config reference docs derived from the schema itself.
// Dependencies: crate::schema, serde_json
// ============================================================================

//! ## Overview
//! Renders a [`Schema`] as a Markdown table with one row per declared field.
//! Nested mappings are flattened into dotted paths and mappings inside
//! sequences are listed under `field[]`. Lazy defaults are shown as
//! `(computed)` since their value differs per call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use crate::schema::DefaultValue;
use crate::schema::MappingSchema;
use crate::schema::Schema;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a Markdown reference for `schema` under a `## {title}` heading.
#[must_use]
pub fn schema_docs_markdown(title: &str, schema: &Schema) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {title}");
    out.push('\n');
    let mut rows = Vec::new();
    collect_rows("", schema, &mut rows);
    if rows.is_empty() {
        let _ = writeln!(out, "Value: `{}`", schema.describe());
        return out;
    }
    out.push_str("| Field | Type | Required | Default |\n");
    out.push_str("| --- | --- | --- | --- |\n");
    for row in rows {
        let _ = writeln!(
            out,
            "| `{}` | {} | {} | {} |",
            row.path,
            escape_cell(&row.kind),
            if row.required { "yes" } else { "no" },
            escape_cell(&row.default)
        );
    }
    out
}

/// One rendered table row.
struct Row {
    /// Dotted field path.
    path: String,
    /// Schema description.
    kind: String,
    /// Whether absence is an error.
    required: bool,
    /// Rendered default.
    default: String,
}

/// Appends rows for every field reachable from `schema`.
fn collect_rows(prefix: &str, schema: &Schema, rows: &mut Vec<Row>) {
    match schema {
        Schema::Mapping(mapping) => collect_mapping(prefix, mapping, rows),
        Schema::Sequence(sequence) => {
            if !prefix.is_empty() {
                collect_rows(&format!("{prefix}[]"), sequence.element(), rows);
            }
        }
        Schema::Scalar(_) | Schema::DynamicMapping(_) => {}
    }
}

/// Appends rows for one mapping and its nested mappings.
fn collect_mapping(prefix: &str, mapping: &MappingSchema, rows: &mut Vec<Row>) {
    for field in mapping.fields() {
        let path = if prefix.is_empty() {
            field.key().to_string()
        } else {
            format!("{prefix}.{}", field.key())
        };
        rows.push(Row {
            path: path.clone(),
            kind: field.schema().describe(),
            required: field.is_required() && !field.default_value().is_declared(),
            default: render_default(field.default_value()),
        });
        collect_rows(&path, field.schema(), rows);
    }
}

/// Renders a default for the table.
fn render_default(default: &DefaultValue) -> String {
    match default {
        DefaultValue::None => "-".to_string(),
        DefaultValue::Eager(value) => format!("`{value}`"),
        DefaultValue::Lazy(_) => "(computed)".to_string(),
    }
}

/// Escapes pipe characters inside a table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
