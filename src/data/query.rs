use std::collections::HashMap;

use super::filter::{distinct_sorted, filtered, RowFilter};
use super::model::{CountEntry, Dataset, DistanceRow, Restaurant};

/// Entries kept by the per-name rankings.
pub const TOP_NAMES: usize = 10;
/// Entries kept by the per-province ranking.
pub const TOP_PROVINCES: usize = 5;

// ---------------------------------------------------------------------------
// Map view
// ---------------------------------------------------------------------------

/// Every restaurant, unfiltered.
pub fn map_records(dataset: &Dataset) -> &[Restaurant] {
    &dataset.restaurants
}

// ---------------------------------------------------------------------------
// Selector option lists
// ---------------------------------------------------------------------------

pub fn provinces(dataset: &Dataset) -> Vec<String> {
    dataset.provinces.iter().cloned().collect()
}

pub fn cities(dataset: &Dataset, province: &str) -> Vec<String> {
    distinct_sorted(filtered(dataset, RowFilter::province(province)), |r| {
        r.city.as_str()
    })
}

pub fn names(dataset: &Dataset, province: &str, city: &str) -> Vec<String> {
    distinct_sorted(
        filtered(dataset, RowFilter::province(province).city(city)),
        |r| r.name.as_str(),
    )
}

/// Every distinct name in the dataset.
pub fn all_names(dataset: &Dataset) -> Vec<String> {
    distinct_sorted(dataset.restaurants.iter(), |r| r.name.as_str())
}

pub fn addresses(dataset: &Dataset, province: &str, city: &str, name: &str) -> Vec<String> {
    distinct_sorted(
        filtered(dataset, RowFilter::province(province).city(city).name(name)),
        |r| r.address.as_str(),
    )
}

// ---------------------------------------------------------------------------
// Restaurant search
// ---------------------------------------------------------------------------

/// Address of every row equal on province, city and name, in dataset
/// order. Duplicate rows yield duplicate addresses.
pub fn search_addresses(dataset: &Dataset, province: &str, city: &str, name: &str) -> Vec<String> {
    filtered(dataset, RowFilter::province(province).city(city).name(name))
        .map(|r| r.address.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// Group `rows` by `key`, count, and keep the `n` largest groups.
///
/// Sorted by count descending; equal counts keep first-seen order.
fn top_counts<'d>(
    rows: impl Iterator<Item = &'d Restaurant>,
    key: fn(&Restaurant) -> &str,
    n: usize,
) -> Vec<CountEntry> {
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<CountEntry> = Vec::new();

    for r in rows {
        let k = key(r);
        match slot.get(k) {
            Some(&i) => entries[i].count += 1,
            None => {
                slot.insert(k, entries.len());
                entries.push(CountEntry {
                    key: k.to_string(),
                    count: 1,
                });
            }
        }
    }

    // `sort_by` is stable, which preserves first-seen order among ties.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}

/// The `n` most common names across the whole dataset.
pub fn top_names(dataset: &Dataset, n: usize) -> Vec<CountEntry> {
    top_counts(dataset.restaurants.iter(), |r| r.name.as_str(), n)
}

/// The `n` most common names within one province.
pub fn top_names_in_province(dataset: &Dataset, province: &str, n: usize) -> Vec<CountEntry> {
    top_counts(
        filtered(dataset, RowFilter::province(province)),
        |r| r.name.as_str(),
        n,
    )
}

/// The `n` provinces with the most locations of one name.
pub fn top_provinces_for_name(dataset: &Dataset, name: &str, n: usize) -> Vec<CountEntry> {
    let filter = RowFilter {
        name: Some(name),
        ..Default::default()
    };
    top_counts(filtered(dataset, filter), |r| r.province.as_str(), n)
}

/// Fraction of each entry relative to the sum of `entries` (not the dataset
/// total). Empty when `entries` is empty or all counts are zero.
pub fn shares(entries: &[CountEntry]) -> Vec<f64> {
    let total: usize = entries.iter().map(|e| e.count).sum();
    if total == 0 {
        return Vec::new();
    }
    entries
        .iter()
        .map(|e| e.count as f64 / total as f64)
        .collect()
}

// ---------------------------------------------------------------------------
// Distances
// ---------------------------------------------------------------------------

/// Distance from the selected restaurant to every restaurant in the same
/// province and city (itself included), nearest first.
///
/// The reference is the first row matching all four selections; when none
/// matches the result is empty.
pub fn distances_from(
    dataset: &Dataset,
    province: &str,
    city: &str,
    name: &str,
    address: &str,
) -> Vec<DistanceRow> {
    let reference = RowFilter::province(province)
        .city(city)
        .name(name)
        .address(address);
    let Some(origin) = filtered(dataset, reference).next().map(Restaurant::position) else {
        return Vec::new();
    };

    let mut rows: Vec<DistanceRow> = filtered(dataset, RowFilter::province(province).city(city))
        .map(|r| DistanceRow {
            name: r.name.clone(),
            address: r.address.clone(),
            miles: origin.distance_miles(&r.position()),
        })
        .collect();
    rows.sort_by(|a, b| a.miles.total_cmp(&b.miles));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{restaurant, sample_dataset};

    fn keys(entries: &[CountEntry]) -> Vec<(&str, usize)> {
        entries.iter().map(|e| (e.key.as_str(), e.count)).collect()
    }

    fn assert_non_increasing(entries: &[CountEntry]) {
        for pair in entries.windows(2) {
            assert!(pair[0].count >= pair[1].count, "not sorted: {entries:?}");
        }
    }

    /// `n` distinct names, the i-th appearing `i + 1` times.
    fn many_names(n: usize) -> Dataset {
        let mut rows = Vec::new();
        for i in 0..n {
            for j in 0..=i {
                let province = if j % 2 == 0 { "CA" } else { "NV" };
                rows.push(restaurant(
                    &format!("CHAIN {i}"),
                    &format!("{j} Road"),
                    "TOWN",
                    province,
                    36.0,
                    -119.0,
                ));
            }
        }
        Dataset::from_restaurants(rows, 0)
    }

    #[test]
    fn test_map_records_is_everything() {
        let ds = sample_dataset();
        assert_eq!(map_records(&ds).len(), ds.len());
    }

    #[test]
    fn test_option_lists() {
        let ds = sample_dataset();
        assert_eq!(provinces(&ds), vec!["CA", "TX"]);
        assert_eq!(cities(&ds, "TX"), vec!["AUSTIN"]);
        assert_eq!(names(&ds, "CA", "SF"), vec!["BURGER JOINT", "TACO SPOT"]);
        assert_eq!(all_names(&ds), vec!["BURGER JOINT", "MCDONALDS", "TACO SPOT"]);
        assert_eq!(
            addresses(&ds, "TX", "AUSTIN", "MCDONALDS"),
            vec!["5 Main St", "6 Congress Ave"]
        );
        assert!(cities(&ds, "ZZ").is_empty());
    }

    #[test]
    fn test_search_present_and_absent_triples() {
        let ds = sample_dataset();
        for r in &ds.restaurants {
            let found = search_addresses(&ds, &r.province, &r.city, &r.name);
            assert!(found.contains(&r.address));
        }
        assert!(search_addresses(&ds, "TX", "SF", "BURGER JOINT").is_empty());
        assert!(search_addresses(&ds, "CA", "SF", "MCDONALDS").is_empty());
    }

    #[test]
    fn test_top_names_counts_and_ties() {
        let ds = sample_dataset();
        let top = top_names(&ds, TOP_NAMES);
        // MCDONALDS 3, then BURGER JOINT and TACO SPOT tied at 2 in first-seen order.
        assert_eq!(
            keys(&top),
            vec![("MCDONALDS", 3), ("BURGER JOINT", 2), ("TACO SPOT", 2)]
        );
    }

    #[test]
    fn test_rankings_truncate() {
        let ds = many_names(15);
        let top = top_names(&ds, TOP_NAMES);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].key, "CHAIN 14");
        assert_non_increasing(&top);

        let in_ca = top_names_in_province(&ds, "CA", TOP_NAMES);
        assert_eq!(in_ca.len(), 10);
        assert_non_increasing(&in_ca);

        let provinces = top_provinces_for_name(&ds, "CHAIN 3", TOP_PROVINCES);
        assert!(provinces.len() <= 5);
        assert_eq!(keys(&provinces), vec![("CA", 2), ("NV", 2)]);
    }

    #[test]
    fn test_top_provinces_truncates_to_five() {
        let provinces = ["AZ", "CA", "CO", "ID", "NM", "NV", "OR", "UT"];
        let mut rows = Vec::new();
        for (i, province) in provinces.iter().enumerate() {
            for j in 0..=i {
                let address = format!("{j} Ave");
                rows.push(restaurant("PIZZA", &address, "TOWN", province, 40.0, -110.0));
            }
        }
        for j in 0..20 {
            rows.push(restaurant("TACOS", &format!("{j} Ave"), "TOWN", "WA", 47.0, -122.0));
        }
        let ds = Dataset::from_restaurants(rows, 0);

        let top = top_provinces_for_name(&ds, "PIZZA", TOP_PROVINCES);
        assert_eq!(top.len(), 5);
        assert_non_increasing(&top);
        assert_eq!(keys(&top), vec![("UT", 8), ("OR", 7), ("NV", 6), ("NM", 5), ("ID", 4)]);
    }

    #[test]
    fn test_top_names_in_province_filters() {
        let ds = sample_dataset();
        let tx = top_names_in_province(&ds, "TX", TOP_NAMES);
        assert_eq!(keys(&tx), vec![("MCDONALDS", 2), ("TACO SPOT", 1)]);
        assert!(top_names_in_province(&ds, "ZZ", TOP_NAMES).is_empty());
    }

    #[test]
    fn test_top_provinces_for_name() {
        let ds = sample_dataset();
        let mc = top_provinces_for_name(&ds, "MCDONALDS", TOP_PROVINCES);
        assert_eq!(keys(&mc), vec![("TX", 2), ("CA", 1)]);
        assert!(top_provinces_for_name(&ds, "NOPE", TOP_PROVINCES).is_empty());
    }

    #[test]
    fn test_shares_relative_to_returned_set() {
        let ds = many_names(15);
        let top = top_names(&ds, TOP_NAMES);
        let s = shares(&top);
        assert_eq!(s.len(), top.len());
        assert!((s.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        // 15 out of the top-10 sum (15 + 14 + ... + 6 = 105), not the 120 total.
        assert!((s[0] - 15.0 / 105.0).abs() < 1e-9);
        assert!(shares(&[]).is_empty());
    }

    #[test]
    fn test_distances_example() {
        let ds = Dataset::from_restaurants(
            vec![
                restaurant("BURGER JOINT", "addr1", "SF", "CA", 37.0, -122.0),
                restaurant("TACO SPOT", "addr2", "SF", "CA", 37.01, -122.0),
            ],
            0,
        );
        let rows = distances_from(&ds, "CA", "SF", "BURGER JOINT", "addr1");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "BURGER JOINT");
        assert_eq!(rows[0].address, "addr1");
        assert!(rows[0].miles < 1e-6);
        assert_eq!(rows[1].name, "TACO SPOT");
        assert!((rows[1].miles - 0.69).abs() < 0.01, "got {}", rows[1].miles);
    }

    #[test]
    fn test_distances_sorted_and_scoped_to_city() {
        let ds = sample_dataset();
        let rows = distances_from(&ds, "CA", "SF", "BURGER JOINT", "3 Castro St");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].address, "3 Castro St");
        assert!(rows[0].miles < 1e-6);
        for pair in rows.windows(2) {
            assert!(pair[0].miles <= pair[1].miles);
        }
        assert!(rows.iter().all(|r| r.name != "MCDONALDS"));
    }

    #[test]
    fn test_distances_unknown_reference_is_empty() {
        let ds = sample_dataset();
        assert!(distances_from(&ds, "CA", "SF", "BURGER JOINT", "nowhere").is_empty());
        assert!(distances_from(&ds, "TX", "SF", "BURGER JOINT", "1 Market St").is_empty());
    }

    #[test]
    fn test_distances_leave_dataset_untouched() {
        let ds = sample_dataset();
        let before = ds.restaurants.clone();
        let _ = distances_from(&ds, "TX", "AUSTIN", "MCDONALDS", "5 Main St");
        assert_eq!(ds.restaurants, before);
    }
}
