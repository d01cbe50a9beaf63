use anyhow::Result;
use clap::Parser;
use detection_dashboard::config;
use detection_dashboard::db::DatabaseService;
use detection_dashboard::security::auth::AuthService;
use detection_dashboard::{AppState, RestApi};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "detection-dashboard")]
#[command(version)]
#[command(about = "Session-gated dashboard for camera detection and motion statistics")]
struct Args {
    /// TOML or JSON configuration file
    #[arg(short, long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Create the database schema and exit
    #[arg(long, action = clap::ArgAction::SetTrue)]
    init_db: bool,
}

async fn run_app(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;
    config.apply_env_overrides()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.api.log_level.as_str()),
    )
    .init();

    info!("Starting detection dashboard");
    info!("Configuration loaded");

    if config.security.secret_key == config::SecurityConfig::default().secret_key {
        warn!("Using the built-in session secret; set DASHBOARD_SECRET_KEY in production");
    }

    if args.init_db {
        let mut database = config.database.clone();
        database.auto_migrate = false;
        let db = DatabaseService::new(&database).await?;
        db.run_migrations().await?;
        info!("Schema ready at {}", database.path.display());
        return Ok(());
    }

    let db = DatabaseService::new(&config.database).await?;

    let auth_service = Arc::new(AuthService::new(&config.security));
    let state = AppState::new(db.pool.clone(), auth_service)?;

    let http_server = RestApi::new(&config.api, state);
    http_server.run().await?;

    db.pool.close().await;
    info!("Stopped");

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run_app(args).await {
        eprintln!("Application error: {:#}", e);
        std::process::exit(1);
    }
}
