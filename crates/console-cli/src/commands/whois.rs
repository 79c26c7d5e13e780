//! Whois command - update WHOIS-published registrar fields

use anyhow::{Context, Result};
use console_client::{ConsoleClient, WhoisRegistrarFields};
use std::path::Path;

use super::read_json_file;
use crate::output::OutputContext;

/// Upload WHOIS fields from a JSON file
pub async fn whois(client: &ConsoleClient, file: &Path, ctx: &OutputContext) -> Result<()> {
    let fields: WhoisRegistrarFields = read_json_file(file)?;
    let saved = client
        .save_whois_fields(&fields)
        .await
        .context("Failed to save WHOIS fields")?;

    ctx.success(&format!(
        "Saved WHOIS fields for {}",
        saved.registrar_id.as_deref().unwrap_or("(unknown registrar)")
    ));
    Ok(())
}
