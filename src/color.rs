use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Used for pie slices and bar charts.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Density ramp: hexagon count → Color32
// ---------------------------------------------------------------------------

/// Yellow (sparse) to dark red (dense), like a heat map.
pub fn density_color(count: usize, max_count: usize) -> Color32 {
    let sparse: Hsl = Hsl::new(55.0, 0.95, 0.70);
    let dense: Hsl = Hsl::new(0.0, 0.85, 0.35);
    let t = if max_count <= 1 {
        0.0
    } else {
        // Log scale: ln(count) / ln(max).
        ((count.max(1) as f32).ln() / (max_count as f32).ln()).clamp(0.0, 1.0)
    };
    to_color32(sparse.mix(dense, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(10);
        assert_eq!(colors.len(), 10);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_density_ramp_ends() {
        assert_eq!(density_color(1, 50), density_color(1, 1));
        assert_ne!(density_color(1, 50), density_color(50, 50));
    }
}
