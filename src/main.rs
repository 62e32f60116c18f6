use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use insurance_dash::config::Config;
use insurance_dash::dashboard::App;
use insurance_dash::Dataset;

fn main() -> Result<()> {
    let config = Config::load()?;

    // The dashboard owns the terminal, so an interactive session logs to a file.
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create log directory {}", parent.display()))?;
            }
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    tracing::info!("Starting insurance_dash with data from {}", config.data_path.display());

    let dataset = match Dataset::load(&config.data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    let mut app = App::new(dataset, &config);
    app.run()?;

    tracing::info!("insurance_dash shutdown complete.");
    Ok(())
}
