use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};

use crate::cluster::ClusterSet;

pub const MIN_DARKNESS: u16 = 100;
pub const MAX_BRIGHTNESS: u16 = 665;

/// Acceptable range for the sum of a color's three channels, both ends
/// exclusive. Sums at or below `min_darkness` are too dark, sums at or above
/// `max_brightness` too close to white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessWindow {
    pub min_darkness: u16,
    pub max_brightness: u16,
}

impl Default for BrightnessWindow {
    fn default() -> Self {
        BrightnessWindow { min_darkness: MIN_DARKNESS, max_brightness: MAX_BRIGHTNESS }
    }
}

impl BrightnessWindow {
    pub fn accepts(&self, color: Srgb<u8>) -> bool {
        let summed = u16::from(color.red) + u16::from(color.green) + u16::from(color.blue);
        summed > self.min_darkness && summed < self.max_brightness
    }
}

/// A palette entry: an opaque color and the share of the image it covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedColor {
    pub color: Srgba<u8>,
    /// Fraction of all visited pixels, in `[0, 1]`.
    pub weight: f32,
}

/// Turns clusters ranked by weight into colors.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorSelector {
    window: BrightnessWindow,
}

impl ColorSelector {
    pub fn new(window: BrightnessWindow) -> Self {
        ColorSelector { window }
    }

    /// Picks the heaviest cluster inside the brightness window, falling back
    /// to the heaviest cluster overall. Fully transparent black when there are
    /// no clusters at all.
    pub fn select(&self, ranked: &ClusterSet) -> Srgba<u8> {
        ranked
            .iter()
            .map(|cluster| cluster.centroid())
            .find(|&centroid| self.window.accepts(centroid))
            .or_else(|| ranked.iter().next().map(|cluster| cluster.centroid()))
            .map(|c| Srgba::new(c.red, c.green, c.blue, u8::MAX))
            .unwrap_or_else(|| Srgba::new(0, 0, 0, 0))
    }

    /// Every ranked cluster, up to `limit`, weighted by `total_pixels`. No
    /// brightness filtering happens here.
    pub fn palette(&self, ranked: &ClusterSet, total_pixels: u64, limit: usize) -> Vec<WeightedColor> {
        ranked
            .iter()
            .take(limit)
            .map(|cluster| {
                let c = cluster.centroid();
                WeightedColor {
                    color: Srgba::new(c.red, c.green, c.blue, u8::MAX),
                    weight: normalize(cluster.weight(), total_pixels),
                }
            })
            .collect()
    }
}

fn normalize(weight: u32, total_pixels: u64) -> f32 {
    if total_pixels == 0 {
        return 0.0;
    }
    (f64::from(weight) / total_pixels as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Cluster;

    fn ranked(entries: &[((u8, u8, u8), u32)]) -> ClusterSet {
        let mut set: ClusterSet = entries
            .iter()
            .map(|&((r, g, b), points)| {
                let mut cluster = Cluster::new(r, g, b);
                for _ in 0..points {
                    cluster.add_point(r, g, b);
                }
                cluster.recompute_centroid();
                cluster
            })
            .collect();
        set.sort_by_weight_descending();
        set
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let window = BrightnessWindow::default();
        assert!(!window.accepts(Srgb::new(100, 0, 0)));
        assert!(window.accepts(Srgb::new(101, 0, 0)));
        assert!(window.accepts(Srgb::new(255, 255, 154)));
        assert!(!window.accepts(Srgb::new(255, 255, 155)));
        assert!(!window.accepts(Srgb::new(255, 255, 255)));
    }

    #[test]
    fn skips_too_bright_and_too_dark() {
        let set = ranked(&[((255, 255, 255), 10), ((0, 0, 0), 8), ((203, 90, 39), 3), ((10, 200, 10), 2)]);
        let color = ColorSelector::default().select(&set);
        assert_eq!(color, Srgba::new(203, 90, 39, 255));
    }

    #[test]
    fn falls_back_to_heaviest() {
        let set = ranked(&[((5, 5, 5), 3), ((250, 250, 250), 9)]);
        let color = ColorSelector::default().select(&set);
        assert_eq!(color, Srgba::new(250, 250, 250, 255));
    }

    #[test]
    fn empty_selects_transparent() {
        let color = ColorSelector::default().select(&ClusterSet::default());
        assert_eq!(color, Srgba::new(0, 0, 0, 0));
    }

    #[test]
    fn custom_window() {
        let set = ranked(&[((250, 250, 250), 9), ((30, 30, 30), 3)]);
        let selector = ColorSelector::new(BrightnessWindow { min_darkness: 0, max_brightness: 766 });
        assert_eq!(selector.select(&set), Srgba::new(250, 250, 250, 255));

        let selector = ColorSelector::new(BrightnessWindow { min_darkness: 50, max_brightness: 700 });
        assert_eq!(selector.select(&set), Srgba::new(30, 30, 30, 255));
    }

    #[test]
    fn palette_is_unfiltered_and_weighted() {
        let set = ranked(&[((255, 255, 255), 6), ((0, 0, 0), 2)]);
        let palette = ColorSelector::default().palette(&set, 10, 4);

        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0].color, Srgba::new(255, 255, 255, 255));
        assert_eq!(palette[0].weight, 0.6);
        assert_eq!(palette[1].weight, 0.2);
    }

    #[test]
    fn palette_respects_limit_and_zero_total() {
        let set = ranked(&[((1, 1, 1), 3), ((2, 2, 2), 2), ((3, 3, 3), 1)]);
        let palette = ColorSelector::default().palette(&set, 0, 2);

        assert_eq!(palette.len(), 2);
        assert!(palette.iter().all(|entry| entry.weight == 0.0));
    }
}
