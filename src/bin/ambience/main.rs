//! ambience - terminal host for the ambient engine
//!
//! Run with: cargo run
//! Logs go to `ambience.log` in the temp directory; set `RUST_LOG` for more.

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use app::Ambience;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    Ambience::new().run()
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging() -> EyreResult<()> {
    let path = std::env::temp_dir().join("ambience.log");
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
