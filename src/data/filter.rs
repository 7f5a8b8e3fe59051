use std::collections::BTreeSet;

use super::model::{Dataset, Restaurant};
use super::query;

// ---------------------------------------------------------------------------
// Row predicate: exact match on the selector fields
// ---------------------------------------------------------------------------

/// Exact-match predicate over the fields the selectors drive.
/// A `None` field places no constraint on that column.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowFilter<'a> {
    pub province: Option<&'a str>,
    pub city: Option<&'a str>,
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
}

impl<'a> RowFilter<'a> {
    pub fn province(province: &'a str) -> Self {
        RowFilter {
            province: Some(province),
            ..Default::default()
        }
    }

    pub fn city(mut self, city: &'a str) -> Self {
        self.city = Some(city);
        self
    }

    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn address(mut self, address: &'a str) -> Self {
        self.address = Some(address);
        self
    }

    /// Whether a restaurant passes every active constraint.
    pub fn matches(&self, r: &Restaurant) -> bool {
        fn field_ok(want: Option<&str>, have: &str) -> bool {
            want.map_or(true, |w| w == have)
        }
        field_ok(self.province, &r.province)
            && field_ok(self.city, &r.city)
            && field_ok(self.name, &r.name)
            && field_ok(self.address, &r.address)
    }
}

/// Iterate the restaurants passing `filter`, in dataset order.
pub fn filtered<'d>(
    dataset: &'d Dataset,
    filter: RowFilter<'d>,
) -> impl Iterator<Item = &'d Restaurant> + 'd {
    dataset.restaurants.iter().filter(move |r| filter.matches(r))
}

/// Sorted, deduplicated values of one field over `rows`.
pub fn distinct_sorted<'d>(
    rows: impl Iterator<Item = &'d Restaurant>,
    field: fn(&Restaurant) -> &str,
) -> Vec<String> {
    rows.map(field)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Selection chain: province → city → name (→ address)
// ---------------------------------------------------------------------------

/// Position of a selector in the dependency chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Province,
    City,
    Name,
    Address,
}

/// Dependent selectors where every option list is derived from the
/// selections upstream of it.
///
/// Changing a selection re-derives every list downstream. A downstream
/// selection that is still a valid option is kept; otherwise it falls back
/// to the first option (or `None` when the list is empty).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChain {
    /// Last stage this chain drives (`Name` for search, `Address` for distances).
    last: Stage,

    pub province: Option<String>,
    pub city: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,

    pub province_options: Vec<String>,
    pub city_options: Vec<String>,
    pub name_options: Vec<String>,
    pub address_options: Vec<String>,
}

impl SelectionChain {
    /// Build a chain ending at `last`, every stage defaulting to its first option.
    pub fn new(dataset: &Dataset, last: Stage) -> Self {
        let mut chain = SelectionChain {
            last,
            province: None,
            city: None,
            name: None,
            address: None,
            province_options: Vec::new(),
            city_options: Vec::new(),
            name_options: Vec::new(),
            address_options: Vec::new(),
        };
        chain.refresh(dataset, Stage::Province);
        chain
    }

    /// Select a value at `stage` and re-derive everything downstream.
    pub fn select(&mut self, dataset: &Dataset, stage: Stage, value: String) {
        match stage {
            Stage::Province => self.province = Some(value),
            Stage::City => self.city = Some(value),
            Stage::Name => self.name = Some(value),
            Stage::Address => self.address = Some(value),
        }
        if stage < self.last {
            self.refresh(dataset, next_stage(stage));
        }
    }

    /// Option list for one stage.
    pub fn options(&self, stage: Stage) -> &[String] {
        match stage {
            Stage::Province => &self.province_options,
            Stage::City => &self.city_options,
            Stage::Name => &self.name_options,
            Stage::Address => &self.address_options,
        }
    }

    /// Current selection for one stage.
    pub fn selected(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::Province => self.province.as_deref(),
            Stage::City => self.city.as_deref(),
            Stage::Name => self.name.as_deref(),
            Stage::Address => self.address.as_deref(),
        }
    }

    /// Stages this chain drives, upstream first.
    pub fn stages(&self) -> impl Iterator<Item = Stage> {
        let last = self.last;
        [Stage::Province, Stage::City, Stage::Name, Stage::Address]
            .into_iter()
            .filter(move |s| *s <= last)
    }

    /// Recompute the option lists from `from` downwards.
    fn refresh(&mut self, dataset: &Dataset, from: Stage) {
        if from <= Stage::Province {
            self.province_options = query::provinces(dataset);
            self.province = keep_or_first(self.province.take(), &self.province_options);
        }
        if from <= Stage::City {
            self.city_options = match &self.province {
                Some(p) => query::cities(dataset, p),
                None => Vec::new(),
            };
            self.city = keep_or_first(self.city.take(), &self.city_options);
        }
        if from <= Stage::Name {
            self.name_options = match (&self.province, &self.city) {
                (Some(p), Some(c)) => query::names(dataset, p, c),
                _ => Vec::new(),
            };
            self.name = keep_or_first(self.name.take(), &self.name_options);
        }
        if self.last >= Stage::Address {
            self.address_options = match (&self.province, &self.city, &self.name) {
                (Some(p), Some(c), Some(n)) => query::addresses(dataset, p, c, n),
                _ => Vec::new(),
            };
            self.address = keep_or_first(self.address.take(), &self.address_options);
        }
    }
}

fn next_stage(stage: Stage) -> Stage {
    match stage {
        Stage::Province => Stage::City,
        Stage::City => Stage::Name,
        Stage::Name | Stage::Address => Stage::Address,
    }
}

/// Keep `current` when it is still an option, else default to the first one.
pub fn keep_or_first(current: Option<String>, options: &[String]) -> Option<String> {
    match current {
        Some(c) if options.contains(&c) => Some(c),
        _ => options.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::sample_dataset;

    #[test]
    fn test_row_filter_matches_all_fields() {
        let ds = sample_dataset();
        let f = RowFilter::province("CA").city("SF").name("BURGER JOINT");
        let hits: Vec<_> = filtered(&ds, f).map(|r| r.address.as_str()).collect();
        assert_eq!(hits, vec!["1 Market St", "3 Castro St"]);

        let f = f.address("3 Castro St");
        assert_eq!(filtered(&ds, f).count(), 1);
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let ds = sample_dataset();
        assert_eq!(filtered(&ds, RowFilter::default()).count(), ds.len());
    }

    #[test]
    fn test_chain_defaults_to_first_options() {
        let ds = sample_dataset();
        let chain = SelectionChain::new(&ds, Stage::Address);
        assert_eq!(chain.province.as_deref(), Some("CA"));
        assert_eq!(chain.city_options, vec!["LOS ANGELES", "SF"]);
        assert_eq!(chain.city.as_deref(), Some("LOS ANGELES"));
        assert_eq!(chain.name.as_deref(), Some("MCDONALDS"));
        assert_eq!(chain.address.as_deref(), Some("4 Sunset Blvd"));
    }

    #[test]
    fn test_upstream_change_rederives_downstream() {
        let ds = sample_dataset();
        let mut chain = SelectionChain::new(&ds, Stage::Address);
        chain.select(&ds, Stage::City, "SF".to_string());
        assert_eq!(chain.name_options, vec!["BURGER JOINT", "TACO SPOT"]);
        assert_eq!(chain.name.as_deref(), Some("BURGER JOINT"));
        assert_eq!(chain.address_options, vec!["1 Market St", "3 Castro St"]);

        chain.select(&ds, Stage::Province, "TX".to_string());
        assert_eq!(chain.city_options, vec!["AUSTIN"]);
        assert_eq!(chain.city.as_deref(), Some("AUSTIN"));
        assert_eq!(chain.name_options, vec!["MCDONALDS", "TACO SPOT"]);
        assert_eq!(chain.address_options, vec!["5 Main St", "6 Congress Ave"]);
    }

    #[test]
    fn test_valid_downstream_selection_survives() {
        let ds = sample_dataset();
        let mut chain = SelectionChain::new(&ds, Stage::Name);
        chain.select(&ds, Stage::City, "SF".to_string());
        chain.select(&ds, Stage::Name, "TACO SPOT".to_string());
        // Re-selecting the same province keeps SF and TACO SPOT valid.
        chain.select(&ds, Stage::Province, "CA".to_string());
        assert_eq!(chain.city.as_deref(), Some("SF"));
        assert_eq!(chain.name.as_deref(), Some("TACO SPOT"));
        assert!(chain.address_options.is_empty());
        assert_eq!(chain.stages().count(), 3);
    }

    #[test]
    fn test_chain_over_empty_dataset() {
        let ds = Dataset::default();
        let chain = SelectionChain::new(&ds, Stage::Address);
        assert!(chain.province.is_none());
        assert!(chain.city_options.is_empty());
        assert!(chain.address.is_none());
    }
}
