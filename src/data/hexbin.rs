//! Hexagonal density binning for the map view.
//!
//! Points are projected onto a local equirectangular plane (metres) around a
//! reference latitude, assigned to pointy-top hexagons of a fixed
//! circumradius, and projected back to degrees for drawing.

use std::collections::BTreeMap;

use super::geo::EARTH_RADIUS_MILES;

const METERS_PER_MILE: f64 = 1609.344;
const EARTH_RADIUS_METERS: f64 = EARTH_RADIUS_MILES * METERS_PER_MILE;
const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial hex coordinate `(q, r)`.
pub type HexCoord = (i64, i64);

/// One populated hexagon, positions in decimal degrees `[lon, lat]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    pub count: usize,
    pub center: [f64; 2],
    pub corners: [[f64; 2]; 6],
}

/// A hexagon grid anchored at a reference latitude.
#[derive(Debug, Clone, Copy)]
pub struct HexGrid {
    radius_m: f64,
    cos_lat0: f64,
}

impl HexGrid {
    pub fn new(radius_m: f64, reference_lat_deg: f64) -> Self {
        HexGrid {
            radius_m,
            // Clamp so the projection stays finite near the poles.
            cos_lat0: reference_lat_deg.to_radians().cos().max(1e-6),
        }
    }

    /// Grid anchored at the mean latitude of `points`.
    pub fn for_points(points: &[[f64; 2]], radius_m: f64) -> Self {
        let mean_lat = if points.is_empty() {
            0.0
        } else {
            points.iter().map(|p| p[1]).sum::<f64>() / points.len() as f64
        };
        HexGrid::new(radius_m, mean_lat)
    }

    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            lon.to_radians() * EARTH_RADIUS_METERS * self.cos_lat0,
            lat.to_radians() * EARTH_RADIUS_METERS,
        )
    }

    fn unproject(&self, x: f64, y: f64) -> [f64; 2] {
        [
            (x / (EARTH_RADIUS_METERS * self.cos_lat0)).to_degrees(),
            (y / EARTH_RADIUS_METERS).to_degrees(),
        ]
    }

    /// The hexagon containing a `lon`/`lat` point (degrees).
    pub fn cell_of(&self, lon: f64, lat: f64) -> HexCoord {
        let (x, y) = self.project(lon, lat);
        let q = (SQRT_3 / 3.0 * x - y / 3.0) / self.radius_m;
        let r = (2.0 / 3.0 * y) / self.radius_m;
        cube_round(q, r)
    }

    fn center_xy(&self, (q, r): HexCoord) -> (f64, f64) {
        let (q, r) = (q as f64, r as f64);
        (
            self.radius_m * (SQRT_3 * q + SQRT_3 / 2.0 * r),
            self.radius_m * 1.5 * r,
        )
    }

    pub fn center(&self, coord: HexCoord) -> [f64; 2] {
        let (x, y) = self.center_xy(coord);
        self.unproject(x, y)
    }

    pub fn corners(&self, coord: HexCoord) -> [[f64; 2]; 6] {
        let (cx, cy) = self.center_xy(coord);
        std::array::from_fn(|i| {
            let angle = (60.0 * i as f64 - 30.0).to_radians();
            self.unproject(
                cx + self.radius_m * angle.cos(),
                cy + self.radius_m * angle.sin(),
            )
        })
    }
}

/// Round fractional axial coordinates to the nearest hexagon.
fn cube_round(q: f64, r: f64) -> HexCoord {
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
    let (dq, dr, ds) = ((rq - q).abs(), (rr - r).abs(), (rs - s).abs());
    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i64, rr as i64)
}

/// Count `[lon, lat]` points per hexagon of circumradius `radius_m`.
///
/// Only populated cells are returned, ordered by coordinate.
pub fn bin_points(points: &[[f64; 2]], radius_m: f64) -> Vec<HexCell> {
    if points.is_empty() || radius_m <= 0.0 {
        return Vec::new();
    }
    let grid = HexGrid::for_points(points, radius_m);

    let mut counts: BTreeMap<HexCoord, usize> = BTreeMap::new();
    for p in points {
        *counts.entry(grid.cell_of(p[0], p[1])).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(coord, count)| HexCell {
            count,
            center: grid.center(coord),
            corners: grid.corners(coord),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geo::GeoPoint;

    fn sf_points() -> Vec<[f64; 2]> {
        let mut pts = Vec::new();
        for i in 0..20 {
            for j in 0..20 {
                pts.push([-122.45 + i as f64 * 0.003, 37.75 + j as f64 * 0.002]);
            }
        }
        pts
    }

    #[test]
    fn test_counts_are_conserved() {
        let pts = sf_points();
        let cells = bin_points(&pts, 100.0);
        let total: usize = cells.iter().map(|c| c.count).sum();
        assert_eq!(total, pts.len());
        assert!(cells.len() > 1);
    }

    #[test]
    fn test_point_lies_within_its_cell() {
        let pts = sf_points();
        let grid = HexGrid::for_points(&pts, 100.0);
        for p in &pts {
            let c = grid.center(grid.cell_of(p[0], p[1]));
            let miles = GeoPoint::from_degrees(p[0], p[1])
                .distance_miles(&GeoPoint::from_degrees(c[0], c[1]));
            assert!(miles * METERS_PER_MILE <= 100.5, "point {p:?} is {miles} mi from {c:?}");
        }
    }

    #[test]
    fn test_coincident_points_share_a_cell() {
        let pts = vec![[-122.4, 37.77]; 5];
        let cells = bin_points(&pts, 100.0);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].count, 5);
    }

    #[test]
    fn test_corners_surround_center() {
        let grid = HexGrid::new(100.0, 37.77);
        let coord = grid.cell_of(-122.4, 37.77);
        let c = grid.center(coord);
        for corner in grid.corners(coord) {
            let miles = GeoPoint::from_degrees(c[0], c[1])
                .distance_miles(&GeoPoint::from_degrees(corner[0], corner[1]));
            assert!((miles * METERS_PER_MILE - 100.0).abs() < 1.0);
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(bin_points(&[], 100.0).is_empty());
        assert!(bin_points(&[[0.0, 0.0]], 0.0).is_empty());
    }
}
