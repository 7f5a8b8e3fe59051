use std::path::Path;

use crate::config::AppConfig;
use crate::data::filter::{SelectionChain, Stage};
use crate::data::hexbin::{bin_points, HexCell};
use crate::data::loader::load_file;
use crate::data::model::{CountEntry, Dataset, DistanceRow};
use crate::data::query;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// The query the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryView {
    Map,
    Search,
    TopNames,
    TopNamesInProvince,
    TopProvincesForName,
    Distances,
}

impl QueryView {
    pub const ALL: [QueryView; 6] = [
        QueryView::Map,
        QueryView::Search,
        QueryView::TopNames,
        QueryView::TopNamesInProvince,
        QueryView::TopProvincesForName,
        QueryView::Distances,
    ];

    pub fn title(self) -> &'static str {
        match self {
            QueryView::Map => "Map",
            QueryView::Search => "Restaurant Search",
            QueryView::TopNames => "Top Ten Restaurants by Name",
            QueryView::TopNamesInProvince => "Top Ten Restaurants by State",
            QueryView::TopProvincesForName => "Top 5 States by Name",
            QueryView::Distances => "Show Distances",
        }
    }
}

/// Cached output of the current view's query.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewResult {
    /// Nothing loaded yet, or the map (drawn from `hex_cells` + the dataset).
    None,
    Addresses(Vec<String>),
    Counts(Vec<CountEntry>),
    Distances(Vec<DistanceRow>),
}

impl ViewResult {
    pub fn len(&self) -> usize {
        match self {
            ViewResult::None => 0,
            ViewResult::Addresses(v) => v.len(),
            ViewResult::Counts(v) => v.len(),
            ViewResult::Distances(v) => v.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// Which query is shown.
    pub view: QueryView,

    /// Province → city → name selectors for the search view.
    pub search: SelectionChain,
    /// Province → city → name → address selectors for the distance view.
    pub distances: SelectionChain,

    /// Province selector for the per-province name ranking.
    pub ranking_province: Option<String>,
    /// Name selector for the per-name province ranking, over every name.
    pub ranking_name: Option<String>,
    pub name_options: Vec<String>,

    /// Map density cells, computed once per dataset.
    pub hex_cells: Vec<HexCell>,
    /// Move the map back to the initial view on its next frame.
    pub reset_map_view: bool,

    /// Result of the current view's query (recomputed on selection change).
    pub result: ViewResult,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let empty = Dataset::default();
        Self {
            config,
            dataset: None,
            view: QueryView::Map,
            search: SelectionChain::new(&empty, Stage::Name),
            distances: SelectionChain::new(&empty, Stage::Address),
            ranking_province: None,
            ranking_name: None,
            name_options: Vec::new(),
            hex_cells: Vec::new(),
            reset_map_view: true,
            result: ViewResult::None,
            status_message: None,
        }
    }

    /// Load a file, replacing the dataset only on success.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset: reset every selector and recompute.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.search = SelectionChain::new(&dataset, Stage::Name);
        self.distances = SelectionChain::new(&dataset, Stage::Address);
        self.ranking_province = dataset.provinces.first().cloned();
        self.name_options = query::all_names(&dataset);
        self.ranking_name = self.name_options.first().cloned();

        let points: Vec<[f64; 2]> = query::map_records(&dataset)
            .iter()
            .map(|r| [r.longitude, r.latitude])
            .collect();
        self.hex_cells = bin_points(&points, self.config.hex_radius_m);
        self.reset_map_view = true;

        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    pub fn set_view(&mut self, view: QueryView) {
        if self.view != view {
            log::debug!("View switched to {}", view.title());
            self.view = view;
            self.recompute();
        }
    }

    /// Change a search-view selector.
    pub fn select_search(&mut self, stage: Stage, value: String) {
        if let Some(ds) = &self.dataset {
            self.search.select(ds, stage, value);
            self.recompute();
        }
    }

    /// Change a distance-view selector.
    pub fn select_distance(&mut self, stage: Stage, value: String) {
        if let Some(ds) = &self.dataset {
            self.distances.select(ds, stage, value);
            self.recompute();
        }
    }

    pub fn select_ranking_province(&mut self, province: String) {
        self.ranking_province = Some(province);
        self.recompute();
    }

    pub fn select_ranking_name(&mut self, name: String) {
        self.ranking_name = Some(name);
        self.recompute();
    }

    /// Re-run the current view's query against the dataset.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.result = ViewResult::None;
            return;
        };

        self.result = match self.view {
            QueryView::Map => ViewResult::None,
            QueryView::Search => {
                let chain = &self.search;
                match (&chain.province, &chain.city, &chain.name) {
                    (Some(p), Some(c), Some(n)) => {
                        ViewResult::Addresses(query::search_addresses(ds, p, c, n))
                    }
                    _ => ViewResult::Addresses(Vec::new()),
                }
            }
            QueryView::TopNames => ViewResult::Counts(query::top_names(ds, query::TOP_NAMES)),
            QueryView::TopNamesInProvince => ViewResult::Counts(match &self.ranking_province {
                Some(p) => query::top_names_in_province(ds, p, query::TOP_NAMES),
                None => Vec::new(),
            }),
            QueryView::TopProvincesForName => ViewResult::Counts(match &self.ranking_name {
                Some(n) => query::top_provinces_for_name(ds, n, query::TOP_PROVINCES),
                None => Vec::new(),
            }),
            QueryView::Distances => {
                let chain = &self.distances;
                match (&chain.province, &chain.city, &chain.name, &chain.address) {
                    (Some(p), Some(c), Some(n), Some(a)) => {
                        ViewResult::Distances(query::distances_from(ds, p, c, n, a))
                    }
                    _ => ViewResult::Distances(Vec::new()),
                }
            }
        };
        log::debug!("{}: {} result rows", self.view.title(), self.result.len());
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::data::model::fixtures::sample_dataset;

    fn loaded_state() -> AppState {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(sample_dataset());
        state
    }

    #[test]
    fn test_set_dataset_initialises_selectors() {
        let state = loaded_state();
        assert_eq!(state.ranking_province.as_deref(), Some("CA"));
        assert_eq!(state.ranking_name.as_deref(), Some("BURGER JOINT"));
        assert_eq!(state.search.province.as_deref(), Some("CA"));
        assert_eq!(state.distances.address.as_deref(), Some("4 Sunset Blvd"));
        assert_eq!(state.hex_cells.iter().map(|c| c.count).sum::<usize>(), 7);
        assert!(state.reset_map_view);
        assert_eq!(state.result, ViewResult::None);
    }

    #[test]
    fn test_view_switch_recomputes() {
        let mut state = loaded_state();
        state.set_view(QueryView::TopNames);
        assert!(matches!(&state.result, ViewResult::Counts(c) if c.len() == 3));

        state.set_view(QueryView::TopProvincesForName);
        state.select_ranking_name("MCDONALDS".to_string());
        match &state.result {
            ViewResult::Counts(c) => assert_eq!(c[0].key, "TX"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_search_follows_selection_chain() {
        let mut state = loaded_state();
        state.set_view(QueryView::Search);
        state.select_search(Stage::Province, "TX".to_string());
        assert_eq!(
            state.result,
            ViewResult::Addresses(vec!["5 Main St".to_string(), "6 Congress Ave".to_string()])
        );
    }

    #[test]
    fn test_distances_view() {
        let mut state = loaded_state();
        state.set_view(QueryView::Distances);
        state.select_distance(Stage::City, "SF".to_string());
        match &state.result {
            ViewResult::Distances(rows) => {
                assert_eq!(rows.len(), 3);
                assert_eq!(rows[0].address, "1 Market St");
                assert!(rows[0].miles < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_selection_yields_empty_result() {
        let mut state = loaded_state();
        state.set_view(QueryView::TopProvincesForName);
        state.select_ranking_name("NOT A CHAIN".to_string());
        assert_eq!(state.result, ViewResult::Counts(Vec::new()));

        state.set_view(QueryView::Search);
        state.select_search(Stage::Name, "NOT A CHAIN".to_string());
        assert_eq!(state.result, ViewResult::Addresses(Vec::new()));
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "name,city\nX,Y\n").unwrap();

        let mut state = loaded_state();
        state.load_path(&path);
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(7));
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("missing required column")));
    }

    #[test]
    fn test_nothing_loaded() {
        let mut state = AppState::new(AppConfig::default());
        state.set_view(QueryView::Distances);
        state.select_distance(Stage::Province, "CA".to_string());
        assert_eq!(state.result, ViewResult::None);
    }
}
