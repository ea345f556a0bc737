use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use ftth_viewer::data::model::OntStatus;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting at `hue_offset` degrees.
pub fn generate_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Status colours
// ---------------------------------------------------------------------------

/// Fixed colour per terminal status, shared by every chart.
#[derive(Debug, Clone)]
pub struct StatusColors {
    ok: Color32,
    fail: Color32,
    down: Color32,
}

impl Default for StatusColors {
    fn default() -> Self {
        // hues 120° (green), 240° (blue), 0° (red)
        let p = generate_palette(3, 120.0);
        Self {
            ok: p[0],
            down: p[1],
            fail: p[2],
        }
    }
}

impl StatusColors {
    pub fn color_for(&self, status: OntStatus) -> Color32 {
        match status {
            OntStatus::Ok => self.ok,
            OntStatus::Fail => self.fail,
            OntStatus::Down => self.down,
        }
    }
}

/// Bar fill for plain (single-series) charts.
pub const BAR_FILL: Color32 = Color32::from_rgb(90, 140, 210);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_sizes() {
        assert!(generate_palette(0, 0.0).is_empty());
        assert_eq!(generate_palette(5, 0.0).len(), 5);
    }

    #[test]
    fn status_colours_are_distinct() {
        let c = StatusColors::default();
        assert_ne!(c.color_for(OntStatus::Ok), c.color_for(OntStatus::Fail));
        assert_ne!(c.color_for(OntStatus::Fail), c.color_for(OntStatus::Down));
        assert_ne!(c.color_for(OntStatus::Ok), c.color_for(OntStatus::Down));
    }

    #[test]
    fn ok_is_green_fail_is_red() {
        let c = StatusColors::default();
        let ok = c.color_for(OntStatus::Ok);
        let fail = c.color_for(OntStatus::Fail);
        assert!(ok.g() > ok.r() && ok.g() > ok.b());
        assert!(fail.r() > fail.g() && fail.r() > fail.b());
    }
}
