// Color palettes for measures and the heatmap value ramp

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Color palette for categorical series (measures, bar categories).
pub struct ColorPalette {
    colors: Vec<Rgb>,
}

impl ColorPalette {
    /// Default categorical palette. The first two entries are the series
    /// blue/red pair; the rest cover additional measures or categories.
    pub fn category10() -> Self {
        ColorPalette {
            colors: vec![
                Rgb(0x4c, 0x8c, 0xf5), // blue
                Rgb(0xe3, 0x5b, 0x5b), // red
                Rgb(0x7f, 0xb0, 0x69), // green
                Rgb(0xf4, 0xa2, 0x61), // orange
                Rgb(0xa6, 0x6d, 0xa6), // purple
                Rgb(0x9b, 0x2c, 0x2c), // maroon
                Rgb(0x6f, 0xa8, 0xdc), // light blue
                Rgb(0xe7, 0x6f, 0x51), // terracotta
                Rgb(0x8d, 0x99, 0xae), // slate
                Rgb(0x2a, 0x9d, 0x8f), // teal
            ],
        }
    }

    /// Get the color for an index (wraps around past the palette size).
    pub fn get_color(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    /// Assign one color per name, in order.
    pub fn assign_colors(&self, names: &[String]) -> Vec<Rgb> {
        names.iter().enumerate().map(|(i, _)| self.get_color(i)).collect()
    }
}

/// Sequential ramp for the heatmap: light at zero, dark at the maximum.
pub struct ValueRamp {
    low: Rgb,
    high: Rgb,
}

impl ValueRamp {
    /// The heatmap's default ramp (off-white to dark red).
    pub fn heat() -> Self {
        ValueRamp { low: Rgb(0xff, 0xf5, 0xf0), high: Rgb(0x7f, 0x00, 0x00) }
    }

    /// Linearly interpolate the ramp at `t` in [0, 1]; out-of-range values
    /// are clamped.
    pub fn at(&self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * t).round() as u8
        };
        Rgb(
            lerp(self.low.0, self.high.0),
            lerp(self.low.1, self.high.1),
            lerp(self.low.2, self.high.2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        let palette = ColorPalette::category10();
        assert_eq!(palette.get_color(0), Rgb(0x4c, 0x8c, 0xf5));
        assert_eq!(palette.get_color(1), Rgb(0xe3, 0x5b, 0x5b));
        assert_eq!(palette.get_color(10), palette.get_color(0));
        assert_eq!(palette.get_color(11), palette.get_color(1));
    }

    #[test]
    fn test_assign_colors_in_order() {
        let palette = ColorPalette::category10();
        let names = vec!["Camera".to_string(), "Police".to_string()];
        let colors = palette.assign_colors(&names);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0], palette.get_color(0));
        assert_eq!(colors[1], palette.get_color(1));
    }

    #[test]
    fn test_ramp_endpoints() {
        let ramp = ValueRamp::heat();
        assert_eq!(ramp.at(0.0), Rgb(0xff, 0xf5, 0xf0));
        assert_eq!(ramp.at(1.0), Rgb(0x7f, 0x00, 0x00));
    }

    #[test]
    fn test_ramp_clamps() {
        let ramp = ValueRamp::heat();
        assert_eq!(ramp.at(-0.5), ramp.at(0.0));
        assert_eq!(ramp.at(2.0), ramp.at(1.0));
    }

    #[test]
    fn test_ramp_midpoint_between_endpoints() {
        let ramp = ValueRamp::heat();
        let mid = ramp.at(0.5);
        assert!(mid.0 < 0xff && mid.0 > 0x7f);
    }
}
