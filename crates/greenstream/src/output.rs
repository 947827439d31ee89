//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Color is on for `always`, off for `never`, and for `auto` only on a
/// terminal with `NO_COLOR` unset.
pub fn should_color(mode: &ColorMode) -> bool {
    let auto = || io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    matches!(mode, ColorMode::Always) || (matches!(mode, ColorMode::Auto) && auto())
}

/// "up" / "down", green or red when color is enabled.
pub fn up_down(up: bool, color: bool) -> String {
    let word = if up { "up" } else { "down" };
    match (color, up) {
        (false, _) => word.to_owned(),
        (true, true) => word.green().to_string(),
        (true, false) => word.red().to_string(),
    }
}

// ── Number formatting ────────────────────────────────────────────────

/// One decimal, the precision footprints are reported with.
pub fn grams(value: f64) -> String {
    format!("{value:.1}")
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Serialize `data` for the structured formats; `None` for table and plain,
/// which the caller renders itself.
fn structured<T: Serialize + ?Sized>(format: &OutputFormat, data: &T) -> Option<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Table | OutputFormat::Plain => return None,
    };
    Some(rendered.expect("serialization should not fail"))
}

/// Rows through `to_row` for tables, `id_fn` per line for plain output.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    structured(format, data).unwrap_or_else(|| match format {
        OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
        _ => Table::new(data.iter().map(to_row))
            .with(Style::rounded())
            .to_string(),
    })
}

/// One item: `detail_fn` for the table view, `id_fn` for plain output.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String {
    structured(format, data).unwrap_or_else(|| match format {
        OutputFormat::Plain => id_fn(data),
        _ => detail_fn(data),
    })
}

/// Write to stdout unless quiet or empty. A closed pipe is ignored.
pub fn print_output(output: &str, quiet: bool) {
    if !quiet && !output.is_empty() {
        let _ = writeln!(io::stdout().lock(), "{output}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
        value: f64,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: "a", value: 1.0 },
            Item { id: "b", value: 2.5 },
        ]
    }

    fn render(format: &OutputFormat) -> String {
        render_list(
            format,
            &items(),
            |i| ItemRow { id: i.id.into() },
            |i| i.id.into(),
        )
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        assert_eq!(render(&OutputFormat::Plain), "a\nb");
    }

    #[test]
    fn compact_json_is_single_line() {
        assert_eq!(
            render(&OutputFormat::JsonCompact),
            r#"[{"id":"a","value":1.0},{"id":"b","value":2.5}]"#
        );
    }

    #[test]
    fn table_uses_row_headers() {
        let table = render(&OutputFormat::Table);
        assert!(table.contains("ID"));
        assert!(!table.contains("value"));
    }

    #[test]
    fn grams_rounds_to_one_decimal() {
        assert_eq!(grams(12.34), "12.3");
        assert_eq!(grams(0.0), "0.0");
    }

    #[test]
    fn up_down_without_color_is_plain_text() {
        assert_eq!(up_down(true, false), "up");
        assert_eq!(up_down(false, false), "down");
    }
}
