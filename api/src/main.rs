use anyhow::Result;
use clap::Parser;
use cn_api::cli::{self, Cli};
use cn_api::telemetry::init_tracing;
use cn_shared::{AppConfig, Environment};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    // Environment-specific file first so it wins over the generic one
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    cli.apply(&mut config);

    init_tracing(&config.logging)?;
    debug!(environment = %config.environment, base_url = %config.api.base_url, "Configuration loaded");

    cli::run(cli, config).await
}
