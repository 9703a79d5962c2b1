pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::error::AdminError;
use crate::types::ResourceKind;

pub use config::AdminContext;

#[derive(Parser)]
#[command(name = "consult-admin")]
#[command(about = "consult-admin - Administration client for the consultation bot backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Administrator login and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Teacher accounts awaiting activation")]
    Teachers {
        #[command(subcommand)]
        cmd: commands::accounts::PendingCommands,
    },

    #[command(about = "Deanery accounts awaiting activation")]
    Deanery {
        #[command(subcommand)]
        cmd: commands::accounts::PendingCommands,
    },

    #[command(about = "All registered users")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UsersCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AdminContext::from_config()?;
    run_with(cli, &ctx).await
}

/// Dispatch against an already built context
pub async fn run_with(cli: Cli, ctx: &AdminContext) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, ctx, output_format.clone()).await,
        Commands::Teachers { cmd } => {
            commands::accounts::handle_pending(cmd, ResourceKind::InactiveTeachers, ctx, output_format.clone())
                .await
        }
        Commands::Deanery { cmd } => {
            commands::accounts::handle_pending(cmd, ResourceKind::InactiveDeanery, ctx, output_format.clone())
                .await
        }
        Commands::Users { cmd } => commands::users::handle(cmd, ctx, output_format.clone()).await,
    };

    // JSON callers get a machine-readable failure on stdout as well
    if let (Err(e), OutputFormat::Json) = (&result, &output_format) {
        utils::output_error(&output_format, &e.to_string(), error_code(e))?;
    }
    result
}

/// Machine-readable code for a command failure that came from the gateway
pub fn error_code(e: &anyhow::Error) -> Option<&'static str> {
    e.downcast_ref::<AdminError>()
        .or_else(|| e.downcast_ref::<AuthError>().and_then(AuthError::api_error))
        .map(AdminError::error_code)
}
