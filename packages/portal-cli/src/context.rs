//! Shared command context: configuration, portal handle, terminal helpers.

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use medichain_client::{ApiClient, Role};
use portal::{FileBackend, Portal, PortalConfig, SessionStore};

/// Context passed to every command.
pub struct AppContext {
    pub role: Role,
    pub quiet: bool,
    portal: Portal<FileBackend>,
}

impl AppContext {
    /// Build the context from environment configuration, opening (and
    /// creating if needed) the per-user session directory.
    pub fn new(role: Role, quiet: bool) -> Result<Self> {
        let config = PortalConfig::from_env();
        let portal = Portal::new(
            ApiClient::new().with_base_url(config.api_url),
            SessionStore::new(FileBackend::open(config.session_dir)?),
        );
        Ok(Self {
            role,
            quiet,
            portal,
        })
    }

    pub fn portal(&self) -> &Portal<FileBackend> {
        &self.portal
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).yellow());
        }
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }
}
