//! Command line interface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cn_core::domain::entities::user::UserRole;
use cn_core::domain::value_objects::SignupRequest;
use cn_core::errors::ClientError;
use cn_shared::AppConfig;
use std::path::PathBuf;

use crate::app::MarketplaceClient;

#[derive(Debug, Parser)]
#[command(name = "campus-nest", version, about = "CampusNest marketplace client")]
pub struct Cli {
    /// API base URL, overriding configuration
    #[arg(long, global = true, env = "API_BASE_URL")]
    pub base_url: Option<String>,

    /// File holding the session credentials
    #[arg(
        long,
        global = true,
        env = "CREDENTIALS_PATH",
        default_value = ".campus-nest/credentials.json"
    )]
    pub credentials: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session credentials
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CAMPUS_NEST_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CAMPUS_NEST_PASSWORD", hide_env_values = true)]
        password: String,
        /// student or landlord
        #[arg(long, default_value = "student")]
        role: String,
    },
    /// Remove the stored credentials
    Logout,
    /// Show the signed-in user's profile
    Me,
    /// GET an API path and print the JSON response
    Get {
        /// Path relative to the API base URL, e.g. `apartments/`
        path: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Apply command line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        config.api.credentials_path = Some(self.credentials.clone());
    }
}

/// Execute one command
pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    if let Command::Config = cli.command {
        println!("{}", toml::to_string_pretty(&config).context("failed to render configuration")?);
        return Ok(());
    }

    let client = MarketplaceClient::from_config(&config).context("failed to build API client")?;

    match cli.command {
        Command::Login { email, password } => {
            let session = client.sign_in(&email, &password).await.map_err(explain)?;
            println!(
                "Signed in as {} ({})",
                session.user.display_name(),
                session.user.role.as_str()
            );
        }
        Command::Signup {
            username,
            email,
            password,
            role,
        } => {
            let request = SignupRequest {
                username,
                email,
                password,
                role: UserRole::from(role.as_str()),
            };
            let session = client.sign_up(request).await.map_err(explain)?;
            println!("Account created for {}", session.user.display_name());
        }
        Command::Logout => {
            client.sign_out().await.map_err(explain)?;
            println!("Signed out");
        }
        Command::Me => {
            let profile = client.profile().await.map_err(explain)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Get { path } => {
            let value: serde_json::Value = client.get_json(&path).await.map_err(explain)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Config => {}
    }
    Ok(())
}

fn explain(error: ClientError) -> anyhow::Error {
    if error.requires_sign_in() {
        anyhow::Error::new(error).context("session expired, run `campus-nest login` to sign in again")
    } else {
        anyhow::Error::new(error)
    }
}
