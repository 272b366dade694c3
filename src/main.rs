use anyhow::Context;
use clap::{Parser, Subcommand};
use tower_sessions::cookie::Key;
use tracing_subscriber::EnvFilter;

use expense_tracker::{
    AppState, auth, build_router, config::Config, constants::DEFAULT_LOG_FILTER, database,
};

/// A small expense tracking server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (the default).
    Serve,
    /// Create a user with admin rights.
    CreateAdmin {
        #[arg(long)]
        username: String,
        /// Prompted for when not given.
        #[arg(long, env = "ADMIN_PASSWORD")]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::CreateAdmin { username, password } => create_admin(&username, password).await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let db = database::init_db(&config.data_path)
        .await
        .context("Failed to initialize database")?;

    let session_key = Key::try_from(config.session_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid session secret: {}", e))?;

    let state = AppState::new(db, config.store_backend);
    let app = build_router(state, session_key);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(
        backend = ?config.store_backend,
        "Server running on http://{}",
        bind_address
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn create_admin(username: &str, password: Option<String>) -> anyhow::Result<()> {
    let data_path = std::env::var("DATABASE_PATH")
        .unwrap_or_else(|_| expense_tracker::constants::DEFAULT_DATA_PATH.to_string());
    let db = database::init_db(&data_path)
        .await
        .context("Failed to initialize database")?;

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let user = auth::create_admin_user(&db, username, &password).await?;
    println!("Admin user \"{}\" created with id {}", user.username, user.id);

    Ok(())
}

fn prompt_password() -> anyhow::Result<String> {
    let first = rpassword::prompt_password("Enter a password: ")?;
    let second = rpassword::prompt_password("Enter the same password again: ")?;

    if first != second {
        anyhow::bail!("Passwords must match");
    }
    Ok(first)
}
