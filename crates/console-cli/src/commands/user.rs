//! Whoami command - show the signed-in user

use anyhow::Result;
use console_client::ConsoleClient;

use super::or_dash;
use crate::output::OutputContext;

/// Show the current user's profile and registrar roles
pub async fn whoami(client: &ConsoleClient, ctx: &OutputContext) -> Result<()> {
    let user = client.fetch_user_data().await?;

    let roles = user
        .user_roles
        .as_ref()
        .filter(|roles| !roles.is_empty())
        .map(|roles| {
            roles
                .iter()
                .map(|(registrar, role)| format!("{}={}", registrar, role))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| "-".to_string());

    let pairs = vec![
        ("Email", or_dash(user.email_address.as_deref())),
        ("Global Role", or_dash(user.global_role.as_deref())),
        (
            "Admin",
            if user.is_admin.unwrap_or(false) {
                "Yes".to_string()
            } else {
                "No".to_string()
            },
        ),
        ("Registrar Roles", roles),
        ("Support Email", or_dash(user.support_email.as_deref())),
        ("Support Phone", or_dash(user.support_phone_number.as_deref())),
        ("Docs", or_dash(user.technical_docs_url.as_deref())),
    ];

    ctx.print_kv(&pairs);
    Ok(())
}
