use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{Plot, PlotBounds, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::density_color;
use crate::config::{AppConfig, InitialView};
use crate::data::hexbin::HexCell;
use crate::data::model::Restaurant;

// ---------------------------------------------------------------------------
// Restaurant map (central panel)
// ---------------------------------------------------------------------------

/// Render every restaurant on a lon/lat plot: hexagon density underneath,
/// point markers on top, and name labels once zoomed in far enough.
///
/// While `reset_view` is set the plot jumps to the configured initial view,
/// then the flag is cleared so the user can pan and zoom freely.
pub fn restaurant_map(
    ui: &mut Ui,
    restaurants: &[Restaurant],
    cells: &[HexCell],
    config: &AppConfig,
    reset_view: &mut bool,
) {
    let view = config.initial_view;
    let cos_lat = view.latitude.to_radians().cos();
    let max_count = cells.iter().map(|c| c.count).max().unwrap_or(0);

    Plot::new("restaurant_map")
        .data_aspect((1.0 / cos_lat) as f32)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if std::mem::take(reset_view) {
                plot_ui.set_plot_bounds(initial_bounds(&view));
            }

            for cell in cells {
                let color = density_color(cell.count, max_count);
                let outline: PlotPoints = cell.corners.iter().copied().collect();
                plot_ui.polygon(
                    Polygon::new(outline)
                        .fill_color(color.gamma_multiply(0.8))
                        .stroke(Stroke::new(0.5, color)),
                );
            }

            if let Some(cell) = plot_ui
                .pointer_coordinate()
                .and_then(|p| hovered_cell(cells, p, cos_lat))
            {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(cell.center[0], cell.center[1]),
                        RichText::new(format!("{} restaurants", cell.count)).strong(),
                    )
                    .anchor(Align2::CENTER_TOP),
                );
            }

            let points: PlotPoints = restaurants
                .iter()
                .map(|r| [r.longitude, r.latitude])
                .collect();
            plot_ui.points(Points::new(points).radius(1.5).color(Color32::DARK_GRAY));

            // Labels only once few enough restaurants are inside the viewport.
            let bounds = plot_ui.plot_bounds();
            let ([min_x, min_y], [max_x, max_y]) = (bounds.min(), bounds.max());
            let visible: Vec<&Restaurant> = restaurants
                .iter()
                .filter(|r| {
                    (min_x..=max_x).contains(&r.longitude) && (min_y..=max_y).contains(&r.latitude)
                })
                .collect();
            if visible.len() <= config.label_limit {
                for r in visible {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(r.longitude, r.latitude),
                            RichText::new(r.name.as_str()).size(11.0).color(Color32::BLACK),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            }
        });
}

/// Plot bounds centred on `view`, with the latitude span shrunk by
/// cos(latitude) to match the plot's data aspect.
fn initial_bounds(view: &InitialView) -> PlotBounds {
    let half_lon = view.half_span_deg();
    let half_lat = half_lon * view.latitude.to_radians().cos();
    PlotBounds::from_min_max(
        [view.longitude - half_lon, view.latitude - half_lat],
        [view.longitude + half_lon, view.latitude + half_lat],
    )
}

/// The cell under the pointer: nearest centre, if within one circumradius.
fn hovered_cell(cells: &[HexCell], pointer: PlotPoint, cos_lat: f64) -> Option<&HexCell> {
    // Squared distance with longitude scaled to latitude degrees.
    let dist2 = |a: [f64; 2], b: [f64; 2]| {
        let dx = (a[0] - b[0]) * cos_lat;
        let dy = a[1] - b[1];
        dx * dx + dy * dy
    };
    let p = [pointer.x, pointer.y];
    cells
        .iter()
        .min_by(|a, b| dist2(a.center, p).total_cmp(&dist2(b.center, p)))
        .filter(|c| dist2(c.center, p) <= dist2(c.center, c.corners[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_bounds_centre_on_view() {
        let view = AppConfig::default().initial_view;
        let bounds = initial_bounds(&view);
        let ([min_x, min_y], [max_x, max_y]) = (bounds.min(), bounds.max());

        assert!(((min_x + max_x) / 2.0 - view.longitude).abs() < 1e-9);
        assert!(((min_y + max_y) / 2.0 - view.latitude).abs() < 1e-9);
        assert!((max_x - min_x - 2.0 * view.half_span_deg()).abs() < 1e-9);
        assert!(max_y - min_y < max_x - min_x);
    }
}
