use palette::Srgb;

// ------------------------------------------------------------
// Single cluster
// ------------------------------------------------------------

/// One k-means cluster in 8-bit RGB space.
///
/// Pixels assigned during a round are summed into `aggregate`; at the end of
/// the round the mean becomes the new centroid and the pixel count becomes the
/// cluster's weight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cluster {
    centroid: [u8; 3],
    aggregate: [u64; 3],
    counter: u32,
    /// Number of pixels that produced the current centroid.
    weight: u32,
}

impl Cluster {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        let mut cluster = Cluster::default();
        cluster.set_centroid(r, g, b);
        cluster
    }

    pub fn set_centroid(&mut self, r: u8, g: u8, b: u8) {
        self.centroid = [r, g, b];
        self.aggregate = [0; 3];
        self.counter = 0;
        self.weight = 0;
    }

    pub fn centroid(&self) -> Srgb<u8> {
        let [r, g, b] = self.centroid;
        Srgb::new(r, g, b)
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    #[inline]
    pub fn is_at_centroid(&self, r: u8, g: u8, b: u8) -> bool {
        self.centroid == [r, g, b]
    }

    #[inline]
    pub fn add_point(&mut self, r: u8, g: u8, b: u8) {
        self.aggregate[0] += u64::from(r);
        self.aggregate[1] += u64::from(g);
        self.aggregate[2] += u64::from(b);
        self.counter += 1;
    }

    /// Whether the mean of the points gathered this round equals the current
    /// centroid. A cluster that gathered nothing never counts as converged.
    pub fn compare_centroid_with_aggregate(&self) -> bool {
        self.counter > 0 && self.mean() == self.centroid
    }

    /// Moves the centroid to the mean of this round's points and clears the
    /// aggregate. Empty clusters keep their centroid and weight.
    pub fn recompute_centroid(&mut self) {
        if self.counter == 0 {
            return;
        }
        self.centroid = self.mean();
        self.weight = self.counter;
        self.aggregate = [0; 3];
        self.counter = 0;
    }

    /// Squared euclidean distance to the centroid. Only meaningful relative to
    /// other clusters of the same run.
    #[inline]
    pub fn distance_squared(&self, r: u8, g: u8, b: u8) -> u32 {
        [r, g, b]
            .iter()
            .zip(self.centroid)
            .map(|(&channel, centre)| {
                let d = u32::from(channel.abs_diff(centre));
                d * d
            })
            .sum()
    }

    fn mean(&self) -> [u8; 3] {
        let n = u64::from(self.counter);
        // Each channel sum is at most 255 * counter, so the quotient fits in u8.
        self.aggregate.map(|sum| (sum / n) as u8)
    }
}

// ------------------------------------------------------------
// Ordered set of clusters
// ------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    pub fn with_capacity(capacity: usize) -> Self {
        ClusterSet { clusters: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, cluster: Cluster) {
        self.clusters.push(cluster);
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Cluster> {
        self.clusters.iter_mut()
    }

    pub fn contains_centroid(&self, r: u8, g: u8, b: u8) -> bool {
        self.clusters.iter().any(|c| c.is_at_centroid(r, g, b))
    }

    /// The cluster nearest to the given color. On equal distances the one
    /// inserted first wins. `None` only when the set is empty.
    pub fn closest(&mut self, r: u8, g: u8, b: u8) -> Option<&mut Cluster> {
        let mut best_idx = None;
        let mut best_dist = u32::MAX;

        for (idx, cluster) in self.clusters.iter().enumerate() {
            let dist = cluster.distance_squared(r, g, b);
            if best_idx.is_none() || dist < best_dist {
                best_dist = dist;
                best_idx = Some(idx);
            }
        }

        self.clusters.get_mut(best_idx?)
    }

    /// Heaviest first; `sort_by` is stable so equal weights keep their order.
    pub fn sort_by_weight_descending(&mut self) {
        self.clusters.sort_by(|a, b| b.weight.cmp(&a.weight));
    }
}

impl<'a> IntoIterator for &'a ClusterSet {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Cluster> for ClusterSet {
    fn from_iter<T: IntoIterator<Item = Cluster>>(iter: T) -> Self {
        ClusterSet { clusters: iter.into_iter().collect() }
    }
}
