use log::{debug, trace};

use crate::cluster::{Cluster, ClusterSet};
use crate::options::Options;
use crate::sampler::{Bounds, Sampler, SeededSampler};

/// A bounded pixel grid the engine can read.
///
/// Implementations are expected to be small already (see
/// [`shrink`](crate::source::shrink)); every round visits every pixel.
pub trait PixelSource {
    fn pixel_bounds(&self) -> Bounds;

    /// The 8-bit RGB value at absolute coordinates, or `None` when the pixel
    /// is fully transparent.
    fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]>;
}

/// How the assign/recompute loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every centroid stayed put for a full round.
    Converged,
    /// The round budget ran out first.
    Exhausted,
    /// Nothing to cluster: empty or fully transparent image.
    Empty,
}

/// Result of a clustering run, clusters ranked heaviest first.
#[derive(Clone, Debug)]
pub struct Clustering {
    clusters: ClusterSet,
    bounds: Bounds,
    rounds: usize,
    outcome: Outcome,
}

impl Clustering {
    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }

    pub fn into_clusters(self) -> ClusterSet {
        self.clusters
    }

    /// Pixels visited per round, transparent ones included.
    pub fn total_pixels(&self) -> u64 {
        self.bounds.area()
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

/// Seeds clusters from sampled pixels, iterates until the centroids stop
/// moving (or the budget runs out) and ranks the result by weight.
#[derive(Clone, Debug)]
pub struct ClusteringEngine<S> {
    sampler: S,
    cluster_count: usize,
    max_sample: usize,
    max_rounds: usize,
}

impl ClusteringEngine<SeededSampler> {
    pub fn new(options: &Options) -> Self {
        Self::with_sampler(options, SeededSampler::default())
    }
}

impl<S: Sampler> ClusteringEngine<S> {
    pub fn with_sampler(options: &Options, sampler: S) -> Self {
        ClusteringEngine {
            sampler,
            cluster_count: options.clusters(),
            max_sample: options.max_sample,
            max_rounds: options.max_rounds,
        }
    }

    pub fn run<P: PixelSource + ?Sized>(mut self, image: &P) -> Clustering {
        let bounds = image.pixel_bounds();
        let mut clusters = self.seed(image, bounds);
        debug!("seeded {} of {} clusters", clusters.len(), self.cluster_count);

        let (rounds, outcome) = self.iterate(image, bounds, &mut clusters);
        debug!("clustering finished after {rounds} rounds: {outcome:?}");

        clusters.sort_by_weight_descending();

        Clustering { clusters, bounds, rounds, outcome }
    }

    /// Picks a distinct starting color per cluster. Stops at the first cluster
    /// for which no unused color turns up within the sample budget.
    fn seed<P: PixelSource + ?Sized>(&mut self, image: &P, bounds: Bounds) -> ClusterSet {
        let mut clusters = ClusterSet::with_capacity(self.cluster_count);
        if bounds.is_empty() {
            return clusters;
        }

        for _ in 0..self.cluster_count {
            let mut seeded = None;

            for _ in 0..self.max_sample {
                let (x, y) = self.sampler.next_point(bounds);
                let Some([r, g, b]) = image.rgb_at(x, y) else {
                    continue;
                };
                if !clusters.contains_centroid(r, g, b) {
                    seeded = Some(Cluster::new(r, g, b));
                    break;
                }
            }

            match seeded {
                Some(cluster) => clusters.push(cluster),
                None => break,
            }
        }

        clusters
    }

    fn iterate<P: PixelSource + ?Sized>(
        &self,
        image: &P,
        bounds: Bounds,
        clusters: &mut ClusterSet,
    ) -> (usize, Outcome) {
        if clusters.is_empty() {
            return (0, Outcome::Empty);
        }

        for round in 1..=self.max_rounds {
            for x in bounds.min_x..bounds.min_x + bounds.width {
                for y in bounds.min_y..bounds.min_y + bounds.height {
                    let Some([r, g, b]) = image.rgb_at(x, y) else {
                        continue;
                    };
                    if let Some(closest) = clusters.closest(r, g, b) {
                        closest.add_point(r, g, b);
                    }
                }
            }

            // Compare against the old centroids before any of them move.
            let converged = clusters.iter().all(Cluster::compare_centroid_with_aggregate);
            clusters.iter_mut().for_each(Cluster::recompute_centroid);
            trace!("round {round}: converged = {converged}");

            if converged {
                return (round, Outcome::Converged);
            }
        }

        (self.max_rounds, Outcome::Exhausted)
    }
}
