//! MediChain portal CLI
//!
//! Terminal front end for the patient and doctor portals: signup, session
//! management, and the dashboard record views.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use medichain_client::Role;
use std::process::ExitCode;

mod cmd;
mod context;

use context::AppContext;

#[derive(Parser)]
#[command(name = "medichain")]
#[command(about = "MediChain patient and doctor portal")]
#[command(version)]
struct Cli {
    /// Portal role to act as
    #[arg(short, long, global = true, value_enum, default_value = "patient")]
    role: RoleArg,

    /// Run in quiet mode (non-interactive, no prompts)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Portal role as a CLI argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Patient,
    Doctor,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Patient => Role::Patient,
            RoleArg::Doctor => Role::Doctor,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register,

    /// Log in and store the session
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Drop the stored session
    Logout,

    /// Show session and profile status
    Status,

    /// Exchange the refresh token for a fresh access token
    Refresh,

    /// List or book appointments
    #[command(subcommand)]
    Appointments(cmd::records::AppointmentsCommand),

    /// List or write prescriptions
    #[command(subcommand)]
    Prescriptions(cmd::records::PrescriptionsCommand),

    /// Lab reports for the logged-in patient
    History,

    /// Audit trail for the logged-in account
    Audit,

    /// Care team assignments
    CareTeam,

    /// Permanently delete the account
    DeleteAccount {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> ExitCode {
    // Load environment variables
    let _ = dotenvy::dotenv();

    init_tracing();

    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".bright_red(), e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

// Library traces stay on stderr so they never interleave with command output.
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::new(cli.role.into(), cli.quiet)?;

    match cli.command {
        Commands::Register => cmd::auth::register(&ctx).await,
        Commands::Login { email } => cmd::auth::login(&ctx, email).await,
        Commands::Logout => cmd::auth::logout(&ctx),
        Commands::Status => cmd::auth::status(&ctx),
        Commands::Refresh => cmd::auth::refresh(&ctx).await,
        Commands::Appointments(cmd) => cmd::records::appointments(&ctx, cmd).await,
        Commands::Prescriptions(cmd) => cmd::records::prescriptions(&ctx, cmd).await,
        Commands::History => cmd::records::history(&ctx).await,
        Commands::Audit => cmd::records::audit(&ctx).await,
        Commands::CareTeam => cmd::records::care_team(&ctx).await,
        Commands::DeleteAccount { yes } => cmd::account::delete(&ctx, yes).await,
    }
}
