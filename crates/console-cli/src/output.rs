//! Output formatting for console-cli (table, json, csv)

use clap::ValueEnum;
use colored::Colorize;
use console_client::Navigator;
use serde::Serialize;
use tabled::{Table, Tabled};
use url::Url;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    let table = Table::new(data).to_string();
                    println!("{}", table);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
            OutputFormat::Csv => {
                print!("{}", render_csv(data));
            }
        }
    }

    /// Print key-value pairs (for single-record views)
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Csv => {
                let keys: Vec<String> = pairs.iter().map(|(k, _)| escape_csv(k)).collect();
                println!("{}", keys.join(","));
                let values: Vec<String> = pairs.iter().map(|(_, v)| escape_csv(v)).collect();
                println!("{}", values.join(","));
            }
        }
    }
}

/// Navigator for a terminal session: there is no page to replace, so point
/// the user at the legacy console instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, url: &Url) {
        eprintln!(
            "{} {}",
            "This view is served by the legacy console:".yellow(),
            url.as_str().bold()
        );
    }
}

/// Render data as CSV
fn render_csv<T: Serialize>(data: &[T]) -> String {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = data
        .iter()
        .filter_map(|item| match serde_json::to_value(item) {
            Ok(serde_json::Value::Object(row)) => Some(row),
            _ => None,
        })
        .collect();

    let Some(first) = rows.first() else {
        return String::new();
    };

    let headers: Vec<&str> = first.keys().map(|s| s.as_str()).collect();
    let mut out = headers.join(",");
    out.push('\n');

    for row in &rows {
        let values: Vec<String> = headers
            .iter()
            .map(|h| {
                row.get(*h)
                    .map(|v| match v {
                        serde_json::Value::String(s) => escape_csv(s),
                        other => escape_csv(&other.to_string()),
                    })
                    .unwrap_or_default()
            })
            .collect();
        out.push_str(&values.join(","));
        out.push('\n');
    }

    out
}

/// Escape a value for CSV output
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Join a list for a single table cell, `-` when empty
pub fn join_or_dash(values: Option<&[String]>) -> String {
    match values {
        Some(values) if !values.is_empty() => values.join(", "),
        _ => "-".to_string(),
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Registrar display for registrars command
#[derive(Debug, Tabled, Serialize)]
pub struct RegistrarRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub registrar_type: String,
    #[tabled(rename = "IANA ID")]
    pub iana_identifier: String,
    #[tabled(rename = "TLDs")]
    pub allowed_tlds: String,
}

/// Contact display for contacts command
#[derive(Debug, Tabled, Serialize)]
pub struct ContactRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Phone")]
    pub phone: String,
    #[tabled(rename = "Types")]
    pub types: String,
}

/// Domain display for domains command
#[derive(Debug, Tabled, Serialize)]
pub struct DomainRow {
    #[tabled(rename = "Domain")]
    pub domain_name: String,
    #[tabled(rename = "Created")]
    pub creation_time: String,
    #[tabled(rename = "Expires")]
    pub expiration_time: String,
    #[tabled(rename = "Statuses")]
    pub statuses: String,
}
