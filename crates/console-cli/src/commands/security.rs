//! Security commands - security settings and EPP password

use anyhow::{bail, Context, Result};
use console_client::{ConsoleClient, EppPassword, SecuritySettings};
use std::path::Path;

use super::read_json_file;
use crate::output::{join_or_dash, OutputContext};

/// Show a registrar's security settings, or replace them from a JSON file
pub async fn security(
    client: &ConsoleClient,
    registrar: &str,
    set: Option<&Path>,
    ctx: &OutputContext,
) -> Result<()> {
    let settings = match set {
        Some(path) => {
            let settings: SecuritySettings = read_json_file(path)?;
            let saved = client
                .save_security_settings(registrar, &settings)
                .await
                .context("Failed to save security settings")?;
            ctx.success(&format!("Saved security settings for {}", registrar));
            saved
        }
        None => client.fetch_security_settings(registrar).await?,
    };

    let pairs = vec![
        (
            "IP Allow List",
            join_or_dash(settings.ip_address_allow_list.as_deref()),
        ),
        (
            "Client Certificate",
            certificate_summary(settings.client_certificate.as_deref()),
        ),
        (
            "Failover Certificate",
            certificate_summary(settings.failover_client_certificate.as_deref()),
        ),
    ];

    ctx.print_kv(&pairs);
    Ok(())
}

/// Change a registrar's EPP password
pub async fn password(
    client: &ConsoleClient,
    registrar: &str,
    old_password: &str,
    new_password: &str,
    ctx: &OutputContext,
) -> Result<()> {
    if new_password.is_empty() {
        bail!("New password must not be empty");
    }

    let update = EppPassword::new(registrar, old_password, new_password);
    client
        .save_epp_password(&update)
        .await
        .context("Failed to update EPP password")?;

    ctx.success(&format!("Updated EPP password for {}", registrar));
    Ok(())
}

/// Certificates are long; show whether one is set and its size
fn certificate_summary(pem: Option<&str>) -> String {
    match pem {
        Some(pem) if !pem.trim().is_empty() => format!("set ({} bytes)", pem.len()),
        _ => "-".to_string(),
    }
}
