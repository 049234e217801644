//! Participant Dashboard - Excel survey upload, profiling charts & filterable table
//!
//! A Rust application for exploring the participants of an event session.

mod charts;
mod config;
mod data;
mod gui;
mod notice;
mod session;

use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = DashboardConfig::default();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title(&config.page_title)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    tracing::info!("Starting participant dashboard");

    // Run the application
    eframe::run_native(
        "Participant Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start the dashboard window: {}", e))
}
