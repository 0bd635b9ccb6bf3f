//! CSV export
//!
//! Columns come from the keys of the first row, in insertion order. String
//! values are always quoted; everything else is quoted only when it would
//! otherwise break the line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Number, Value};
use tracing::info;

/// One exported line: column name to value, in column order
pub type CsvRow = Map<String, Value>;

/// Build a row from `(column, value)` pairs, keeping their order
pub fn row<const N: usize>(fields: [(&str, Value); N]) -> CsvRow {
    fields
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

/// Render rows as CSV, lines joined by `\n`. Empty input gives an empty string.
pub fn to_csv(rows: &[CsvRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| quote_if_needed(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        let line = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(field).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// Write `rows` to `<dir>/<filename>.csv`, creating `dir` if needed
pub async fn export_csv(rows: &[CsvRow], dir: &Path, filename: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(format!("{}.csv", filename));
    tokio::fs::write(&path, to_csv(rows))
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

fn field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => quote(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => quote_if_needed(&number(n)),
        nested @ (Value::Array(_) | Value::Object(_)) => quote(&nested.to_string()),
    }
}

/// Whole floats print without a fraction, `2500000` rather than `2500000.0`
fn number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn quote_if_needed(text: &str) -> String {
    if text.contains([',', '"', '\r', '\n']) {
        quote(text)
    } else {
        text.to_string()
    }
}
