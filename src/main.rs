mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::RestaurantAtlasApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Restaurant Atlas – Fast Food Restaurants",
        options,
        Box::new(|_cc| Ok(Box::new(RestaurantAtlasApp::new(config)))),
    )
}
