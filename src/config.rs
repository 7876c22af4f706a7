use std::path::PathBuf;

use eframe::egui;

/// Fixed location of the house sale records, relative to the working directory.
pub const DATA_PATH: &str = "./house_prices_1000_extended.csv";

pub const WINDOW_TITLE: &str = "House Price Analytics Dashboard";

/// Startup configuration. There are no flags or config files; everything is
/// a compiled-in default.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub title: String,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DATA_PATH),
            title: WINDOW_TITLE.to_string(),
            inner_size: [1280.0, 900.0],
            min_inner_size: [720.0, 480.0],
        }
    }
}

impl DashboardConfig {
    pub fn to_native_options(&self) -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(&self.title)
                .with_inner_size(self.inner_size)
                .with_min_inner_size(self.min_inner_size),
            ..Default::default()
        }
    }
}
