//! Library console - interactive library management over SQLite

use std::io;
use std::process::ExitCode;

use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use library_console::{config::AppConfig, shell::Shell, Repository};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Log file (never rotated) plus warnings on stderr
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_console={}", config.logging.level).into());
    let (log_writer, _log_guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        &config.logging.directory,
        &config.logging.file,
    ));
    let file_layer = if config.logging.format.eq_ignore_ascii_case("json") {
        fmt::layer().json().with_writer(log_writer).with_ansi(false).boxed()
    } else {
        fmt::layer().with_writer(log_writer).with_ansi(false).boxed()
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_filter(LevelFilter::WARN),
        )
        .init();

    tracing::info!("Starting library console v{}", env!("CARGO_PKG_VERSION"));

    print!("{}", library_console::shell::BANNER);
    println!("\nConnecting to {}...", config.database.url);

    let mut repository = Repository::new(config.database.clone());
    if let Err(e) = repository.connect(&config.database.url).await {
        eprintln!("Failed to connect to database: {}", e);
        eprintln!("Please check:");
        eprintln!("  1. The database URL is a valid sqlite: URL");
        eprintln!("  2. The database directory exists and is writable");
        eprintln!("  3. LIBRARY_DATABASE__URL or DATABASE_URL is set correctly");
        return Ok(ExitCode::FAILURE);
    }
    println!("✓ Connected successfully!");

    let mut shell = Shell::new(repository, config.library.clone(), io::stdin().lock(), io::stdout());
    let outcome = shell.run().await;

    let (mut repository, _) = shell.into_parts();
    repository.disconnect().await;
    outcome?;

    tracing::info!("Library console stopped");
    Ok(ExitCode::SUCCESS)
}
