use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use smashpass::{
    catalog, migration::Migrator, routes, tally, AppState, Config, DbSessionStore,
    ExpiredDeletion,
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "smashpass", version, about = "Smash-or-pass voting server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Recompute every creature's cached counters from the vote log
    RecalculateStats,
    /// Upsert creatures from a JSON array file
    ImportCatalog { path: PathBuf },
    /// Delete expired sessions
    PurgeSessions,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    // Load environment variables from .env file if present
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let db = connect(&config).await?;

    Migrator::up(&db, None).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(db, config).await?,
        Command::RecalculateStats => {
            let report = tally::recompute_all(&db).await?;
            info!(
                "Successfully recalculated all Pokemon stats ({} processed, {} corrected)",
                report.processed, report.corrected
            );
        }
        Command::ImportCatalog { path } => {
            catalog::import(&db, &path).await?;
        }
        Command::PurgeSessions => {
            DbSessionStore::new(db).delete_expired().await?;
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database");

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(10 * 60))
        .max_lifetime(Duration::from_secs(30 * 60));

    let db = Database::connect(opt).await?;
    info!("Connected to database");
    Ok(db)
}

async fn serve(db: DatabaseConnection, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = routes::session_layer(
        DbSessionStore::new(db.clone()),
        config.session_secure,
        config.session_inactivity_hours,
    );
    let app = routes::build_router(AppState::new(db, &config), sessions);

    info!(
        policy = ?config.selection_policy,
        "Server starting on http://{}",
        config.bind_addr
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
