//! Account deletion

use anyhow::Result;

use crate::cmd::checked_session;
use crate::context::AppContext;

/// Permanently delete the logged-in account and drop the local session.
pub async fn delete(ctx: &AppContext, yes: bool) -> Result<()> {
    checked_session(ctx)?;

    let confirmed = yes
        || ctx.confirm(
            "Are you sure you want to delete your account? This cannot be undone",
            false,
        )?;
    if !confirmed {
        ctx.print_info("Aborted.");
        return Ok(());
    }

    ctx.portal().delete_account(ctx.role).await?;
    ctx.print_success("Account deleted successfully");
    Ok(())
}
