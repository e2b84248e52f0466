pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod seed;
pub mod services;
pub mod state;

pub use config::Config;
use db::Store;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "serve" | "-s" | "--serve" => run_server(config).await,

        "seed" => run_seed(config).await,

        "init" | "--init" => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Unimart - Campus Marketplace Backend");
    println!("A second-hand trading API for students");
    println!();
    println!("USAGE:");
    println!("  unimart <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("  serve             Start the HTTP API server");
    println!("  seed              Insert demo users and listings into an empty database");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the port, database and auth settings.");
    println!("  Set UNIMART_JWT_SECRET to override the token signing secret.");
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("Unimart v{} starting...", env!("CARGO_PKG_VERSION"));

    if config.using_dev_secret() {
        warn!("Running with the built-in development JWT secret. Set UNIMART_JWT_SECRET before exposing this server.");
    }

    let port = config.server.port;
    let state = api::create_app_state_from_config(config).await?;
    let app = api::router(state).await;

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 API server running at http://{}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    info!("Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    server_handle.abort();
    info!("Server stopped");

    Ok(())
}

async fn run_seed(config: Config) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let (users, listings) = seed::seed_demo_data(&store, &config.auth).await?;

    if users == 0 {
        println!("Database already has users, nothing to do.");
    } else {
        println!("Seeded {} users and {} listings.", users, listings);
    }

    Ok(())
}
