//! Domains command - page through a registrar's domains

use anyhow::Result;
use console_client::{ConsoleClient, DomainListQuery};

use super::or_dash;
use crate::output::{join_or_dash, DomainRow, OutputContext};

/// Paging and search options of the domains command
#[derive(Debug, Default, Clone)]
pub struct DomainListArgs {
    pub checkpoint_time: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total: Option<u64>,
    pub search: Option<String>,
}

impl DomainListArgs {
    pub fn to_query(&self, registrar: &str) -> DomainListQuery {
        DomainListQuery {
            registrar_id: registrar.to_string(),
            checkpoint_time: self.checkpoint_time.clone(),
            page_number: self.page,
            results_per_page: self.per_page,
            total_results: self.total,
            search_term: self.search.clone(),
        }
    }
}

/// List one page of domains
pub async fn domains(
    client: &ConsoleClient,
    registrar: &str,
    args: &DomainListArgs,
    ctx: &OutputContext,
) -> Result<()> {
    let result = client.fetch_domains(&args.to_query(registrar)).await?;

    let rows: Vec<DomainRow> = result
        .domains
        .iter()
        .map(|d| DomainRow {
            domain_name: or_dash(d.domain_name.as_deref()),
            creation_time: or_dash(d.creation_time.as_deref()),
            expiration_time: or_dash(d.registration_expiration_time.as_deref()),
            statuses: join_or_dash(d.statuses.as_deref()),
        })
        .collect();

    ctx.print(&rows);

    // Paging hint: the checkpoint keeps later pages consistent with this one
    if let Some(checkpoint) = result.checkpoint_time.as_deref() {
        ctx.info(&format!(
            "{} result(s) total, checkpoint {}",
            result.total_results.unwrap_or(rows.len() as u64),
            checkpoint
        ));
    }
    Ok(())
}
