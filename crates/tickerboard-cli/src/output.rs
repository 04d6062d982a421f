use std::io::{self, Write};

use serde_json::{Map, Value};
use tickerboard_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(&mut out, envelope)?,
    }

    Ok(())
}

fn render_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "source      : {}", envelope.meta.source)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    match &envelope.data {
        Value::Object(fields) => {
            for (key, value) in fields {
                render_field(out, key, value)?;
            }
        }
        other => render_field(out, "data", other)?,
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

fn render_field<W: Write>(out: &mut W, key: &str, value: &Value) -> Result<(), CliError> {
    match value {
        Value::Null => {}
        Value::String(text) => {
            writeln!(out, "{key}:")?;
            for line in text.lines() {
                writeln!(out, "  {line}")?;
            }
        }
        Value::Array(items) if !items.is_empty() && items.iter().all(is_flat_object) => {
            writeln!(out, "{key}:")?;
            let rows = items.iter().filter_map(Value::as_object).collect::<Vec<_>>();
            for line in format_rows(&rows) {
                writeln!(out, "  {line}")?;
            }
        }
        other => {
            writeln!(out, "{key}:")?;
            for line in serde_json::to_string_pretty(other)?.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }
    Ok(())
}

fn is_flat_object(value: &Value) -> bool {
    value.as_object().is_some_and(|fields| {
        fields
            .values()
            .all(|field| !matches!(field, Value::Object(_) | Value::Array(_)))
    })
}

/// Aligns rows under the keys of the first row.
fn format_rows(rows: &[&Map<String, Value>]) -> Vec<String> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let headers = first.keys().cloned().collect::<Vec<_>>();
    let cells = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| row.get(header).map(cell_text).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let join = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(join(headers.as_slice()));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(cells.iter().map(|row| join(row.as_slice())));
    lines
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tickerboard_core::{EnvelopeMeta, SourceKind};

    #[test]
    fn aligns_flat_rows_into_columns() {
        let rows = json!([
            {"Ticker": "AAPL", "Price": 189.5},
            {"Ticker": "GOOGL", "Price": 140},
        ]);
        let rows = rows
            .as_array()
            .expect("array")
            .iter()
            .filter_map(Value::as_object)
            .collect::<Vec<_>>();

        let lines = format_rows(&rows);
        assert_eq!(lines[0], "Ticker  Price");
        assert_eq!(lines[1], "------  -----");
        assert_eq!(lines[2], "AAPL    189.5");
        assert_eq!(lines[3], "GOOGL   140");
    }

    #[test]
    fn table_output_lists_warnings_and_sections() {
        let mut meta = EnvelopeMeta::new("request-1", SourceKind::Synthetic, 2).expect("valid");
        meta.push_warning("no data for ZZZZ");
        let envelope = Envelope::success(
            meta,
            json!({"status": "Loaded data for: AAPL", "summary": [{"Ticker": "AAPL"}]}),
        );

        let mut buffer = Vec::new();
        render_table(&mut buffer, &envelope).expect("renders");
        let text = String::from_utf8(buffer).expect("utf8");

        assert!(text.contains("source      : synthetic"));
        assert!(text.contains("  - no data for ZZZZ"));
        assert!(text.contains("status:\n  Loaded data for: AAPL"));
        assert!(text.contains("summary:\n  Ticker\n  ------\n  AAPL"));
    }
}
