use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::color::ColorMap;
use crate::config::WINDOW_TITLE;
use crate::data::filter::filter;
use crate::data::model::HouseDataset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Returns `true` when the selection changed.
pub fn side_panel(ui: &mut Ui, dataset: &HouseDataset, state: &mut AppState) -> bool {
    let before = state.selection.clone();

    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            multi_select(
                ui,
                "Location",
                &dataset.locations,
                &mut state.selection.locations,
                Some(&state.colors.locations),
            );
            multi_select(
                ui,
                "House Type",
                &dataset.house_types,
                &mut state.selection.house_types,
                Some(&state.colors.house_types),
            );
            multi_select(
                ui,
                "Bedrooms",
                &dataset.bedrooms,
                &mut state.selection.bedrooms,
                Some(&state.colors.bedrooms),
            );

            ui.separator();
            ui.strong("Date Range");
            egui::Grid::new("date_range")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    ui.label("From");
                    ui.add(DatePickerButton::new(&mut state.selection.start).id_salt("start_date"));
                    ui.end_row();
                    ui.label("To");
                    ui.add(DatePickerButton::new(&mut state.selection.end).id_salt("end_date"));
                    ui.end_row();
                });
            if state.selection.start > state.selection.end {
                ui.label(RichText::new("Start date is after end date.").color(Color32::RED));
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_selection(dataset);
            }
        });

    let changed = state.selection != before;
    if changed {
        log::debug!("Filter selection changed: {:?}", state.selection);
    }
    changed
}

/// Collapsible checkbox list with All / None buttons.
fn multi_select<T>(
    ui: &mut Ui,
    title: &str,
    options: &[T],
    selected: &mut BTreeSet<T>,
    colors: Option<&ColorMap<T>>,
) where
    T: Ord + Clone + Display,
{
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(options.iter().cloned());
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });

            for val in options {
                let mut text = RichText::new(val.to_string());
                if let Some(cm) = colors {
                    text = text.color(cm.color_for(val));
                }

                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, text).changed() {
                    if checked {
                        selected.insert(val.clone());
                    } else {
                        selected.remove(val);
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with record counts.
pub fn top_bar(ui: &mut Ui, dataset: &HouseDataset, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(WINDOW_TITLE);
        ui.separator();
        ui.label(format!(
            "{} records loaded, {} visible",
            dataset.len(),
            filter(dataset, &state.selection).len()
        ));
        ui.separator();
        ui.label(RichText::new(state.source.path().display().to_string()).weak());
    });
}
