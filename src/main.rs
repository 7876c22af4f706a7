mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod error;
mod state;
mod ui;

use std::process::ExitCode;

use app::HouseLensApp;
use config::DashboardConfig;
use data::source::DataSource;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    let config = DashboardConfig::default();

    // The dataset is read before the window opens so a missing or malformed
    // file stops startup with a readable message.
    let state = match AppState::new(DataSource::new(&config.data_path)) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = eframe::run_native(
        &config.title,
        config.to_native_options(),
        Box::new(|_cc| Ok(Box::new(HouseLensApp::new(state)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("UI terminated with error: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
