//! # Crypt Engine
//!
//! Headless entry point for Crypt area transitions. Pass `--write-config` to
//! write a default config file instead of running.
//!
//! Ties together:
//! - Config: area names, fade timing, frame loop settings
//! - Scene: the lifecycle controller driving an in-memory scene host

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("crypt=info".parse()?))
        .init();

    info!("Crypt starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if std::env::args().skip(1).any(|arg| arg == "--write-config") {
        let path = app::write_default_config()?;
        info!("Default config written to {}", path.display());
        return Ok(());
    }

    let summary = app::run()?;
    info!(
        frames = summary.frames,
        completed = summary.completed,
        failed = summary.failed,
        current = ?summary.current_area,
        frame_cap = summary.hit_frame_cap,
        "Crypt shutdown complete"
    );
    Ok(())
}
