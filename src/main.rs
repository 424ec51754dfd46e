mod app;
mod cache;
mod color;
mod config;
mod data;
mod format;
mod rates;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::SalaryDashboardApp;
use config::DashboardConfig;
use data::loader::{DataSource, DatasetLoader, HttpSource};
use eframe::egui;
use rates::{HttpRateSource, RateProvider};
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    let source: Box<dyn DataSource> =
        Box::new(HttpSource::new(&config.dataset_url, config.http_timeout));
    let rate_source = HttpRateSource::new(&config.rates_url, config.http_timeout)
        .context("building the exchange rate client")?;
    let rates = RateProvider::new(rate_source, config.rate_ttl);

    // Without a dataset there is nothing to show: fail before opening a window.
    let state = AppState::new(DatasetLoader::new(source), rates)
        .inspect_err(|e| log::error!("Failed to load dataset: {e}"))
        .context("loading the salary dataset")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Salary Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SalaryDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
