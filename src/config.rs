use std::path::PathBuf;

/// Environment variable overriding the dataset path.
pub const DATA_PATH_ENV: &str = "RESTAURANT_ATLAS_DATA";

const DEFAULT_DATA_PATH: &str = "Fast_Food_Restaurants_8000_sample.csv";

/// Where the map opens: decimal degrees plus a zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialView {
    pub latitude: f64,
    pub longitude: f64,
    /// Web-map style zoom; 11 frames a city.
    pub zoom: f64,
}

impl InitialView {
    /// Half-width of the visible longitude span for this zoom level.
    pub fn half_span_deg(&self) -> f64 {
        180.0 / 2f64.powf(self.zoom)
    }
}

/// Startup configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    /// Hexagon circumradius for the map density layer, in metres.
    pub hex_radius_m: f64,
    /// Initial map viewport (San Francisco).
    pub initial_view: InitialView,
    /// Name labels are drawn only when at most this many restaurants are in view.
    pub label_limit: usize,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            hex_radius_m: 100.0,
            initial_view: InitialView {
                latitude: 37.77,
                longitude: -122.4,
                zoom: 11.0,
            },
            label_limit: 300,
            window_size: [1200.0, 800.0],
            min_window_size: [600.0, 400.0],
        }
    }
}

impl AppConfig {
    /// Defaults, with the data path taken from the environment when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(DATA_PATH_ENV).filter(|p| !p.is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.hex_radius_m, 100.0);
        assert_eq!(config.initial_view.latitude, 37.77);
    }

    #[test]
    fn test_zoom_span_halves_per_level() {
        let mut view = AppConfig::default().initial_view;
        let at_11 = view.half_span_deg();
        view.zoom = 12.0;
        assert!((view.half_span_deg() * 2.0 - at_11).abs() < 1e-12);
    }
}
