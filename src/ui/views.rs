use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::DistanceRow;
use crate::data::query;
use crate::state::{AppState, QueryView, ViewResult};

use super::charts::{self, Orientation};
use super::map;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Central panel – one renderer per query
// ---------------------------------------------------------------------------

/// Render the result of the selected query.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Fast Food Restaurants");
    ui.label(RichText::new(state.view.title()).size(18.0).strong());
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view restaurants  (File → Open…)");
            });
            return;
        }
    };
    if dataset.is_empty() {
        charts::empty_placeholder(ui);
        return;
    }

    match (state.view, &state.result) {
        (QueryView::Map, _) => {
            map::restaurant_map(
                ui,
                query::map_records(dataset),
                &state.hex_cells,
                &state.config,
                &mut state.reset_map_view,
            )
        }
        (QueryView::Search, ViewResult::Addresses(addresses)) => address_table(ui, addresses),
        (QueryView::TopNames, ViewResult::Counts(entries)) => charts::pie_chart(ui, entries),
        (QueryView::TopNamesInProvince, ViewResult::Counts(entries)) => {
            charts::bar_chart(ui, "top_names_in_province", entries, Orientation::Horizontal)
        }
        (QueryView::TopProvincesForName, ViewResult::Counts(entries)) => {
            charts::bar_chart(ui, "top_provinces_for_name", entries, Orientation::Vertical)
        }
        (QueryView::Distances, ViewResult::Distances(rows)) => {
            ui.strong(
                "Distances from the selected restaurant to all restaurants in the same city, in miles",
            );
            distance_table(ui, rows);
        }
        _ => charts::empty_placeholder(ui),
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn address_table(ui: &mut Ui, addresses: &[String]) {
    if addresses.is_empty() {
        charts::empty_placeholder(ui);
        return;
    }
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("address");
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, addresses.len(), |mut row| {
                let i = row.index();
                row.col(|ui: &mut Ui| {
                    ui.label(i.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(addresses[i].as_str());
                });
            });
        });
}

fn distance_table(ui: &mut Ui, rows: &[DistanceRow]) {
    if rows.is_empty() {
        charts::empty_placeholder(ui);
        return;
    }
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(220.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["name", "address", "distance"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(r.name.as_str());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(r.address.as_str());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.6}", r.miles));
                });
            });
        });
}
