//! Contacts command - list or replace registrar contacts

use anyhow::{Context, Result};
use console_client::{ConsoleClient, Contact};
use std::path::Path;

use super::{or_dash, read_json_file};
use crate::output::{join_or_dash, ContactRow, OutputContext};

/// List a registrar's contacts, or replace them from a JSON file
pub async fn contacts(
    client: &ConsoleClient,
    registrar: &str,
    set: Option<&Path>,
    ctx: &OutputContext,
) -> Result<()> {
    let contacts = match set {
        Some(path) => {
            let contacts: Vec<Contact> = read_json_file(path)?;
            let saved = client
                .save_contacts(registrar, &contacts)
                .await
                .context("Failed to save contacts")?;
            ctx.success(&format!("Saved {} contact(s) for {}", saved.len(), registrar));
            saved
        }
        None => client.fetch_contacts(registrar).await?,
    };

    if contacts.is_empty() {
        ctx.info("No contacts found");
        return Ok(());
    }

    let rows: Vec<ContactRow> = contacts
        .iter()
        .map(|c| ContactRow {
            name: or_dash(c.name.as_deref()),
            email: or_dash(c.email_address.as_deref()),
            phone: or_dash(c.phone_number.as_deref()),
            types: join_or_dash(c.types.as_deref()),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}
