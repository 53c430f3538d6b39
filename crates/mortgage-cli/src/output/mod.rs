pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Dispatch output to the appropriate formatter.
///
/// `headline` names the field `minimal` prints when the command has one.
pub fn format_output(format: &OutputFormat, value: &Value, headline: Option<&str>) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value, headline),
    }
}

/// Render a scalar for human-facing formats.
///
/// The engine never rounds; money fields are shown to the cent here. Rates
/// keep their full precision.
pub(crate) fn display_scalar(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) => match Decimal::from_str(s) {
            Ok(d) if !key.contains("rate") => d.round_dp(2).to_string(),
            _ => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
