use std::process::ExitCode;

use tracing::{error, info};

use sooon::{Config, Database, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = sooon::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        sooon::logging::init_console_only(&config.logging.level);
    }

    info!("SOOON - community bulletin board");

    if let Err(e) = run(config).await {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(config: Config) -> sooon::Result<()> {
    config.validate()?;

    let db = Database::open(&config.database.path, config.database.max_connections).await?;
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    WebServer::new(&config, db)?.run().await
}
