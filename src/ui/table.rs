use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;

const ROW_HEIGHT: f32 = 18.0;

/// Raw dump of the filtered records, in dataset order.
pub fn records_table(ui: &mut Ui, view: &FilteredView<'_>) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(40.0))
        .columns(Column::auto().at_least(90.0), 2)
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder())
        .max_scroll_height(360.0)
        .header(20.0, |mut header| {
            for title in ["#", "location", "house_type", "bedrooms", "price", "date"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let i = row.index();
                let rec = view.records[i];
                row.col(|ui| {
                    ui.label(i.to_string());
                });
                row.col(|ui| {
                    ui.label(&rec.location);
                });
                row.col(|ui| {
                    ui.label(&rec.house_type);
                });
                row.col(|ui| {
                    ui.label(rec.bedrooms.to_string());
                });
                row.col(|ui| {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("{:.2}", rec.price));
                    });
                });
                row.col(|ui| {
                    ui.label(rec.date.format("%Y-%m-%d").to_string());
                });
            });
        });
}
