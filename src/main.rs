use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labconsole::app::App;
use labconsole::cli::Args;
use labconsole::config::{self, KeyResolver};
use labconsole::dataset::Dataset;
use labconsole::screen::{ScreenRegistry, register_all};
use labconsole::theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting labconsole");

    let args = Args::parse();

    let mut config = config::load()?;
    if let Some(size) = args.page_size {
        config.table.default_page_size = size;
    }
    config.table.validate()?;

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let dataset = match &args.data {
        Some(path) => Dataset::load(path)?,
        None => Dataset::sample()?,
    };

    let mut registry = ScreenRegistry::new();
    register_all(&mut registry);

    let mut app = App::new(registry, dataset, config.table, resolver, theme)?;
    if let Some(screen) = &args.screen {
        app.open_screen(screen)?;
    }
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("labconsole").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "labconsole.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
