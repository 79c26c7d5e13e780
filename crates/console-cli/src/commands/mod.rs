//! Command implementations for console-cli

pub mod contacts;
pub mod domains;
pub mod registrars;
pub mod security;
pub mod user;
pub mod whois;

pub use contacts::contacts;
pub use domains::domains;
pub use registrars::{rdap, registrars, save_registrar};
pub use security::{password, security};
pub use user::whoami;
pub use whois::whois;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a JSON record to upload from a file
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

/// Display value for an optional field
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
