use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.65, 0.55))
        })
        .collect()
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Continuous scales: value → Color32
// ---------------------------------------------------------------------------

/// Two-stop colour gradient over a numeric range.
#[derive(Debug, Clone, Copy)]
pub struct ValueScale {
    min: f64,
    max: f64,
    low: Hsl,
    high: Hsl,
}

impl ValueScale {
    /// Purple → yellow, for salary bars.
    pub fn viridis_like(values: impl IntoIterator<Item = f64>) -> Self {
        Self::over(
            values,
            Hsl::new(270.0, 0.55, 0.35),
            Hsl::new(55.0, 0.9, 0.55),
        )
    }

    /// Red → green, for the per-country table.
    pub fn red_to_green(values: impl IntoIterator<Item = f64>) -> Self {
        Self::over(
            values,
            Hsl::new(0.0, 0.7, 0.5),
            Hsl::new(120.0, 0.6, 0.4),
        )
    }

    fn over(values: impl IntoIterator<Item = f64>, low: Hsl, high: Hsl) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        ValueScale {
            min,
            max,
            low,
            high,
        }
    }

    /// Colour for `value`; the midpoint colour if the range is degenerate.
    pub fn color_for(&self, value: f64) -> Color32 {
        let span = self.max - self.min;
        let t = if span.is_finite() && span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        to_color32(self.low.mix(self.high, t as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_len() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[2]);
    }

    #[test]
    fn scale_endpoints_differ() {
        let scale = ValueScale::viridis_like([10.0, 20.0]);
        assert_ne!(scale.color_for(10.0), scale.color_for(20.0));
        assert_eq!(scale.color_for(-5.0), scale.color_for(10.0));
    }

    #[test]
    fn degenerate_scale_is_total() {
        let scale = ValueScale::red_to_green(std::iter::empty());
        let _ = scale.color_for(1.0);
        let single = ValueScale::red_to_green([3.0]);
        assert_eq!(single.color_for(3.0), single.color_for(100.0));
    }
}
