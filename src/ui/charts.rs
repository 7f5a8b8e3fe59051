use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{uniform_grid_spacer, Bar, BarChart, GridMark, Plot};

use crate::color::generate_palette;
use crate::data::model::CountEntry;
use crate::data::query::shares;

// ---------------------------------------------------------------------------
// Pie chart (top names)
// ---------------------------------------------------------------------------

/// Pie chart of `entries`, each slice labelled with its key and its share of
/// the entries' total.
pub fn pie_chart(ui: &mut Ui, entries: &[CountEntry]) {
    let fractions = shares(entries);
    if fractions.is_empty() {
        empty_placeholder(ui);
        return;
    }

    let side = ui.available_width().min(ui.available_height() - 40.0).clamp(200.0, 640.0);
    let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
    let center = response.rect.center();
    let radius = side * 0.32;
    let colors = generate_palette(entries.len());
    let at = |angle: f32, r: f32| center + Vec2::new(angle.cos(), -angle.sin()) * r;

    // Counter-clockwise from three o'clock.
    let mut start = 0.0_f32;
    for ((entry, &fraction), &color) in entries.iter().zip(&fractions).zip(&colors) {
        let sweep = fraction as f32 * TAU;

        // Each fan stays within a quarter turn so it is convex.
        let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
        for p in 0..pieces {
            let a0 = start + sweep * p as f32 / pieces as f32;
            let a1 = start + sweep * (p + 1) as f32 / pieces as f32;
            let steps = ((a1 - a0) / 0.05).ceil().max(1.0) as usize;
            let mut points: Vec<Pos2> = Vec::with_capacity(steps + 2);
            points.push(center);
            points.extend(
                (0..=steps).map(|s| at(a0 + (a1 - a0) * s as f32 / steps as f32, radius)),
            );
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }
        painter.line_segment([center, at(start, radius)], Stroke::new(1.5, Color32::WHITE));

        let mid = start + sweep / 2.0;
        let label_anchor = if mid.cos() >= 0.0 {
            Align2::LEFT_CENTER
        } else {
            Align2::RIGHT_CENTER
        };
        painter.text(
            at(mid, radius * 1.1),
            label_anchor,
            &entry.key,
            FontId::proportional(13.0),
            ui.visuals().text_color(),
        );
        painter.text(
            at(mid, radius * 0.6),
            Align2::CENTER_CENTER,
            format!("{:.1}%", fraction * 100.0),
            FontId::proportional(12.0),
            Color32::BLACK,
        );

        start += sweep;
    }

    let total: usize = entries.iter().map(|e| e.count).sum();
    ui.label(
        egui::RichText::new(format!(
            "Percentages are shares of the top {} names ({total} restaurants), not of the whole dataset.",
            entries.len()
        ))
        .weak(),
    );
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Category labels for integer axis marks.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

/// Bar chart of `entries`, one bar per key, first entry at the origin.
pub fn bar_chart(ui: &mut Ui, id: &str, entries: &[CountEntry], orientation: Orientation) {
    if entries.is_empty() {
        empty_placeholder(ui);
        return;
    }

    let colors = generate_palette(entries.len());
    let bars: Vec<Bar> = entries
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (e, color))| {
            Bar::new(i as f64, e.count as f64)
                .name(&e.key)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let mut chart = BarChart::new(bars);
    if orientation == Orientation::Horizontal {
        chart = chart.horizontal();
    }

    let labels: Vec<String> = entries.iter().map(|e| e.key.clone()).collect();
    let plot = Plot::new(id)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid(false);
    let plot = match orientation {
        Orientation::Horizontal => plot
            .x_axis_label("Restaurants")
            .y_axis_formatter(category_formatter(labels))
            .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0])),
        Orientation::Vertical => plot
            .y_axis_label("Restaurants")
            .x_axis_formatter(category_formatter(labels))
            .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0])),
    };

    plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

pub fn empty_placeholder(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("No matching restaurants");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(value: f64) -> GridMark {
        GridMark {
            value,
            step_size: 1.0,
        }
    }

    #[test]
    fn test_category_formatter() {
        let fmt = category_formatter(vec!["CA".to_string(), "TX".to_string()]);
        let range = 0.0..=1.0;
        assert_eq!(fmt(mark(0.0), &range), "CA");
        assert_eq!(fmt(mark(1.0), &range), "TX");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(-1.0), &range), "");
        assert_eq!(fmt(mark(7.0), &range), "");
    }
}
