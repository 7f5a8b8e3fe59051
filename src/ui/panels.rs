use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{SelectionChain, Stage};
use crate::state::{AppState, QueryView, ViewResult};

// ---------------------------------------------------------------------------
// Left side panel – query picker and selectors
// ---------------------------------------------------------------------------

/// Render the left panel: which query to run and its selectors.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Query");
    ui.separator();

    ui.label("Please select a query:");
    let mut view = state.view;
    for v in QueryView::ALL {
        ui.radio_value(&mut view, v, v.title());
    }
    state.set_view(view);
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.view {
            QueryView::Map | QueryView::TopNames => {
                ui.label(RichText::new("No selections for this query.").weak());
            }
            QueryView::Search => {
                if let Some((stage, value)) = chain_selectors(ui, "search", &state.search) {
                    log::debug!("Search {stage:?} → {value}");
                    state.select_search(stage, value);
                }
            }
            QueryView::Distances => {
                if let Some((stage, value)) = chain_selectors(ui, "distances", &state.distances) {
                    log::debug!("Distances {stage:?} → {value}");
                    state.select_distance(stage, value);
                }
            }
            QueryView::TopNamesInProvince => {
                let options = state
                    .dataset
                    .as_ref()
                    .map(|ds| ds.provinces.iter().cloned().collect::<Vec<_>>())
                    .unwrap_or_default();
                if let Some(p) = select_box(
                    ui,
                    "ranking_province",
                    "Select a state",
                    &options,
                    state.ranking_province.as_deref(),
                ) {
                    state.select_ranking_province(p);
                }
                count_legend(ui, &state.result);
            }
            QueryView::TopProvincesForName => {
                if let Some(n) = select_box(
                    ui,
                    "ranking_name",
                    "Select a restaurant",
                    &state.name_options,
                    state.ranking_name.as_deref(),
                ) {
                    state.select_ranking_name(n);
                }
                count_legend(ui, &state.result);
            }
        });
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Province => "Select a state",
        Stage::City => "Select a city",
        Stage::Name => "Select a restaurant network",
        Stage::Address => "Select address",
    }
}

/// One select box per stage of `chain`. Returns the stage the user changed.
fn chain_selectors(ui: &mut Ui, salt: &str, chain: &SelectionChain) -> Option<(Stage, String)> {
    let mut change = None;
    for stage in chain.stages() {
        let id = format!("{salt}_{stage:?}");
        if let Some(value) = select_box(
            ui,
            &id,
            stage_label(stage),
            chain.options(stage),
            chain.selected(stage),
        ) {
            change = Some((stage, value));
        }
    }
    change
}

/// A labelled select box. Returns the option the user picked this frame.
fn select_box(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    current: Option<&str>,
) -> Option<String> {
    let mut picked = None;
    ui.strong(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or("–"))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            for opt in options {
                if ui
                    .selectable_label(current == Some(opt.as_str()), opt.as_str())
                    .clicked()
                    && current != Some(opt.as_str())
                {
                    picked = Some(opt.clone());
                }
            }
        });
    ui.add_space(6.0);
    picked
}

/// `(key, count)` table under the bar-chart selectors.
fn count_legend(ui: &mut Ui, result: &ViewResult) {
    let ViewResult::Counts(entries) = result else {
        return;
    };
    ui.separator();
    egui::Grid::new("count_legend")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for e in entries {
                ui.label(e.key.as_str());
                ui.label(e.count.to_string());
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                let path = state.config.data_path.clone();
                state.load_path(&path);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} restaurants in {} states ({} incomplete rows dropped)",
                ds.len(),
                ds.provinces.len(),
                ds.dropped_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
        if state.status_message.is_none() {
            state.config.data_path = path;
        }
    }
}
