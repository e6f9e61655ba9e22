use anyhow::Result;
use clap::Parser;
use intranet::config::Config;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "intranet.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let filter = match args.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(api_url = %config.api_url, "intranet client starting");

    cli::run(args.command, config).await
}
