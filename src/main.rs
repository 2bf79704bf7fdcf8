//! Silsilah - Entry Point
//!
//! Släktträd för familjer med panorering och zoom.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![allow(dead_code)]

mod app;
mod canvas;
mod db;
mod models;
mod services;
mod ui;
mod utils;

use app::SilsilahApp;
use eframe::egui;
use models::AppSettings;

fn main() -> eframe::Result<()> {
    // Initiera logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    tracing::info!("Startar Silsilah v{}", env!("CARGO_PKG_VERSION"));

    let settings = AppSettings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Silsilah Keluarga v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([800.0, 600.0])
            .with_app_id("silsilah"),
        ..Default::default()
    };

    eframe::run_native(
        "Silsilah",
        options,
        Box::new(|cc| Ok(Box::new(SilsilahApp::new(cc)?))),
    )
}
