pub mod commands;
pub mod config;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, FileCredentials};

#[derive(Parser)]
#[command(name = "tenant-admin")]
#[command(about = "Administration CLI for the multi-tenant SaaS backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Backend base URL (overrides the current server)")]
    pub server_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Named backend servers")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Registration, login and password management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "User administration")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Tenants and user-tenant mappings")]
    Tenant {
        #[command(subcommand)]
        cmd: commands::tenant::TenantCommands,
    },

    #[command(about = "Subscriptions and their user and feature mappings")]
    Subscription {
        #[command(subcommand)]
        cmd: commands::subscription::SubscriptionCommands,
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

/// Everything a backend-facing command needs
pub struct Session {
    pub output_format: OutputFormat,
    pub api: ApiClient,
    pub credentials: Arc<FileCredentials>,
}

impl Session {
    pub fn connect(server_url: Option<&str>, output_format: OutputFormat) -> anyhow::Result<Self> {
        let base_url = config::resolve_base_url(server_url)?;
        let credentials = Arc::new(config::credentials()?);

        tracing::debug!("Using backend {}", base_url);
        let api = ApiClient::new(&base_url, credentials.clone())?;

        Ok(Self {
            output_format,
            api,
            credentials,
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server_url = cli.server_url.as_deref();

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format).await,
        Commands::Auth { cmd } => {
            commands::auth::handle(cmd, &Session::connect(server_url, output_format)?).await
        }
        Commands::User { cmd } => {
            commands::user::handle(cmd, &Session::connect(server_url, output_format)?).await
        }
        Commands::Tenant { cmd } => {
            commands::tenant::handle(cmd, &Session::connect(server_url, output_format)?).await
        }
        Commands::Subscription { cmd } => {
            commands::subscription::handle(cmd, &Session::connect(server_url, output_format)?).await
        }
    }
}
