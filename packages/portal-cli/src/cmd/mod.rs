//! Command implementations

pub mod account;
pub mod auth;
pub mod records;

use anyhow::Result;
use portal::{login_route, AccessDecision, DenyReason, Session};

use crate::context::AppContext;

/// Guard check run before every protected command.
///
/// On denial prints the portal's access message and fails with a hint for
/// getting back in. A corrupt session has already been cleared by the check.
pub fn checked_session(ctx: &AppContext) -> Result<Session> {
    match ctx.portal().authorize(ctx.role)? {
        AccessDecision::Allow(session) => Ok(session),
        AccessDecision::Deny(reason) => {
            let message = match reason {
                DenyReason::NotAuthenticated => {
                    format!("Please log in as {} to access this page", ctx.role)
                }
                DenyReason::InvalidSession => "Session invalid. Please log in again.".to_string(),
            };
            ctx.print_warning(&message);
            anyhow::bail!(
                "login required at {}: run `medichain --role {} login`",
                login_route(ctx.role),
                ctx.role
            )
        }
    }
}
