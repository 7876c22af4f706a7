use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::dashboard::render;
use crate::error::DashboardError;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HouseLensApp {
    pub state: AppState,
}

impl HouseLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for HouseLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dataset = match self.state.dataset() {
            Ok(ds) => ds,
            Err(e) => {
                log::error!("{e}");
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.label(RichText::new(e.to_string()).color(Color32::RED));
                });
                return;
            }
        };

        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &dataset, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                if panels::side_panel(ui, &dataset, &mut self.state) {
                    ctx.request_repaint();
                }
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| match render(&dataset, &self.state.selection) {
            Ok(model) => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui: &mut Ui| {
                        charts::dashboard(ui, &dataset, &model, &self.state.colors);
                    });
            }
            Err(DashboardError::NoMatchingData) => {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading(
                        RichText::new(DashboardError::NoMatchingData.to_string())
                            .color(Color32::from_rgb(0xd4, 0x8a, 0x00)),
                    );
                });
            }
            Err(e) => {
                log::warn!("Skipping dashboard render: {e}");
                ui.label(RichText::new(e.to_string()).color(Color32::RED));
            }
        });
    }
}
