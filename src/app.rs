use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, views};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RestaurantAtlasApp {
    pub state: AppState,
}

impl RestaurantAtlasApp {
    /// Build the app and load the configured dataset, if it exists.
    pub fn new(config: AppConfig) -> Self {
        let path = config.data_path.clone();
        let mut state = AppState::new(config);
        if path.exists() {
            state.load_path(&path);
        } else {
            log::warn!(
                "Dataset {} not found; use File → Open… to load one",
                path.display()
            );
        }
        Self { state }
    }
}

impl eframe::App for RestaurantAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: query picker + selectors ----
        egui::SidePanel::left("query_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map / chart / table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            views::central_panel(ui, &mut self.state);
        });
    }
}
