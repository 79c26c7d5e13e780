//! Registrar commands - list, update, and show published RDAP/WHOIS details

use anyhow::{bail, Context, Result};
use console_client::{Address, ConsoleClient, Registrar};
use serde_json::Value;
use std::path::Path;

use super::{or_dash, read_json_file};
use crate::output::{join_or_dash, OutputContext, RegistrarRow};

/// List all registrars visible to the current user
pub async fn registrars(client: &ConsoleClient, ctx: &OutputContext) -> Result<()> {
    let registrars = client.fetch_registrars().await?;

    let rows: Vec<RegistrarRow> = registrars
        .into_iter()
        .map(|r| RegistrarRow {
            id: or_dash(r.registrar_id.as_deref()),
            name: or_dash(r.registrar_name.as_deref()),
            registrar_type: or_dash(r.registrar_type.as_deref()),
            iana_identifier: format_iana_identifier(r.iana_identifier.as_ref()),
            allowed_tlds: join_or_dash(r.allowed_tlds.as_deref()),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}

/// Create or update a registrar from a JSON file
pub async fn save_registrar(client: &ConsoleClient, file: &Path, ctx: &OutputContext) -> Result<()> {
    let registrar: Registrar = read_json_file(file)?;
    let saved = client
        .save_registrar(&registrar)
        .await
        .context("Failed to save registrar")?;

    ctx.success(&format!(
        "Saved registrar {}",
        saved.registrar_id.as_deref().unwrap_or("(unnamed)")
    ));
    Ok(())
}

/// Show the details a registrar publishes through RDAP and WHOIS
pub async fn rdap(client: &ConsoleClient, registrar_id: &str, ctx: &OutputContext) -> Result<()> {
    let registrars = client.fetch_registrars().await?;
    let Some(registrar) = registrars
        .into_iter()
        .find(|r| r.registrar_id.as_deref() == Some(registrar_id))
    else {
        bail!("Registrar not found: {}", registrar_id);
    };

    let pairs = vec![
        ("Name", or_dash(registrar.registrar_name.as_deref())),
        (
            "IANA ID",
            format_iana_identifier(registrar.iana_identifier.as_ref()),
        ),
        ("Email", or_dash(registrar.email_address.as_deref())),
        ("Phone", or_dash(registrar.phone_number.as_deref())),
        ("Fax", or_dash(registrar.fax_number.as_deref())),
        ("URL", or_dash(registrar.url.as_deref())),
        ("WHOIS Server", or_dash(registrar.whois_server.as_deref())),
        (
            "Address",
            registrar
                .localized_address
                .as_ref()
                .map(format_address)
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];

    ctx.print_kv(&pairs);
    Ok(())
}

/// IANA identifier as shown in a table cell, unquoted when sent as a string
fn format_iana_identifier(id: Option<&Value>) -> String {
    match id {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Single-line postal address
fn format_address(address: &Address) -> String {
    let mut parts: Vec<String> = address.street.clone().unwrap_or_default();
    let locality = [address.city.as_deref(), address.state.as_deref(), address.zip.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if !locality.is_empty() {
        parts.push(locality);
    }
    if let Some(country) = address.country_code.as_deref() {
        parts.push(country.to_string());
    }

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}
