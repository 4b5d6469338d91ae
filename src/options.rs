use serde::{Deserialize, Serialize};

use crate::select::BrightnessWindow;

pub const DEFAULT_CLUSTERS: usize = 4;
pub const MAX_SAMPLE: usize = 10;
pub const MAX_ROUNDS: usize = 50;
/// Longest edge images are shrunk to before clustering.
pub const THUMBNAIL_EDGE: u32 = 256;
/// Cheaper alternative to [`THUMBNAIL_EDGE`].
pub const COMPACT_EDGE: u32 = 64;

/// Tunables for one clustering run.
///
/// Deserializes from partial JSON; absent fields keep their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Requested number of clusters. `0` means [`DEFAULT_CLUSTERS`].
    pub cluster_count: usize,
    /// Random pixels tried per cluster while looking for an unused seed color.
    pub max_sample: usize,
    /// Upper bound on assign/recompute rounds.
    pub max_rounds: usize,
    pub brightness: BrightnessWindow,
    pub max_edge: u32,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            cluster_count: DEFAULT_CLUSTERS,
            max_sample: MAX_SAMPLE,
            max_rounds: MAX_ROUNDS,
            brightness: BrightnessWindow::default(),
            max_edge: THUMBNAIL_EDGE,
        }
    }
}

impl Options {
    pub fn with_cluster_count(mut self, cluster_count: usize) -> Self {
        self.cluster_count = cluster_count;
        self
    }

    pub fn with_max_sample(mut self, max_sample: usize) -> Self {
        self.max_sample = max_sample;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_brightness(mut self, brightness: BrightnessWindow) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_max_edge(mut self, max_edge: u32) -> Self {
        self.max_edge = max_edge;
        self
    }

    /// Cluster count with `0` mapped to the default.
    pub fn clusters(&self) -> usize {
        match self.cluster_count {
            0 => DEFAULT_CLUSTERS,
            n => n,
        }
    }
}
