use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl: Hsl = Hsl::new(hue, 0.6, 0.55);
            to_color32(hsl.into_color())
        })
        .collect()
}

/// Position `t` in `[0, 1]` on a light-to-dark teal ramp.
pub fn teal_scale(t: f32) -> Color32 {
    let light: Hsl = Hsl::new(170.0, 0.45, 0.82);
    let dark: Hsl = Hsl::new(190.0, 0.75, 0.28);
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    to_color32(light.mix(dark, t).into_color())
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a category (location, house type, bedroom
/// count) to distinct colours. Built from the full dataset so a category keeps
/// its colour while filters change.
#[derive(Debug, Clone)]
pub struct ColorMap<K: Ord> {
    mapping: BTreeMap<K, Color32>,
    default_color: Color32,
}

impl<K: Ord + Clone> ColorMap<K> {
    pub fn new<'a>(values: impl IntoIterator<Item = &'a K>) -> Self
    where
        K: 'a,
    {
        let values: Vec<&K> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for<Q>(&self, value: &Q) -> Color32
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(5);
        assert_eq!(colours.len(), 5);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_values_fall_back_to_gray() {
        let locations = vec!["Pune".to_string(), "Goa".to_string()];
        let map = ColorMap::new(&locations);
        assert_ne!(map.color_for("Pune"), map.color_for("Goa"));
        assert_eq!(map.color_for("Delhi"), Color32::GRAY);
    }

    #[test]
    fn teal_scale_darkens_with_value() {
        let lo = teal_scale(0.0);
        let hi = teal_scale(1.0);
        let lum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(lum(lo) > lum(hi));
        assert_eq!(teal_scale(f32::NAN), teal_scale(0.5));
    }
}
