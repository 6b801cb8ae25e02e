use std::collections::VecDeque;
use std::sync::Arc;

use derive_builder::Builder;
use log::{debug, info};
use noisy_float::prelude::*;

use crate::cancel::CancelToken;
use crate::error::{Error, InvalidParameter};
use crate::metric::{IndexedMetric, TryMetric};
use crate::progress_bar::Progress;
use crate::vptree::VPTree;

/// Label assigned to items that belong to no cluster
pub const OUTLIER: isize = -1;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum PointState {
    Unvisited,
    Noise,
    Assigned(usize),
}

/// DBSCAN clustering in a caller-defined metric space
///
/// The items to be clustered are opaque: the only information used
/// about them is the metric passed to [cluster](Clusterer::cluster).
/// Neighbourhood queries go through a [VPTree], so the metric is
/// evaluated far fewer than `n²` times for well-behaved inputs.
///
/// `min_cluster_size` and `epsilon` select the clustering;
/// `bucket_size` and `seed` only affect the tree shape, never the
/// resulting labels.
///
/// # Example
///
/// ```
/// use metric_dbscan::dbscan::ClustererBuilder;
///
/// let items = [0., 1., 2., 10., 11., 12.];
/// let metric = |a: &f64, b: &f64| (a - b).abs();
/// let labels = ClustererBuilder::default()
///     .min_cluster_size(2)
///     .epsilon(1.5)
///     .build()?
///     .cluster(&items, &metric)?;
/// assert_eq!(labels, [0, 0, 0, 1, 1, 1]);
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Builder)]
pub struct Clusterer {
    /// Number of neighbours, including the point itself, that make a
    /// point a cluster core point
    min_cluster_size: usize,
    /// Neighbourhood radius
    epsilon: f64,
    /// Number of items a vantage point tree leaf may hold
    #[builder(default = "1")]
    bucket_size: usize,
    /// Seed for the vantage point choices
    #[builder(default)]
    seed: u64,
    /// Optional progress sink
    #[builder(default)]
    progress: Option<Arc<dyn Progress>>,
    /// Optional cooperative cancellation token
    #[builder(default)]
    cancel: Option<CancelToken>,
}

/// Cluster `items` with default options
///
/// This is shorthand for running a [Clusterer] with the given
/// `min_cluster_size` and `epsilon` and everything else at its default.
/// The returned vector holds one entry per item: the id of its cluster,
/// or [OUTLIER] if it belongs to none.
pub fn cluster_items<P, M>(
    items: &[P],
    metric: &M,
    min_cluster_size: usize,
    epsilon: f64,
) -> Result<Vec<isize>, Error>
where
    M: TryMetric<P>,
{
    let clusterer = Clusterer {
        min_cluster_size,
        epsilon,
        bucket_size: 1,
        seed: 0,
        progress: None,
        cancel: None,
    };
    clusterer.cluster(items, metric)
}

impl Clusterer {
    /// Assign each item to a cluster or to [OUTLIER]
    ///
    /// Cluster ids are dense, starting at 0, in the order in which the
    /// clusters are first discovered while scanning the items in input
    /// order. An empty `items` slice yields an empty label vector, not
    /// an error. The output is fully determined by the items, the
    /// metric, and the clustering parameters including `seed`.
    pub fn cluster<P, M>(
        &self,
        items: &[P],
        metric: &M,
    ) -> Result<Vec<isize>, Error>
    where
        M: TryMetric<P>,
    {
        self.validate()?;
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let eps = n64(self.epsilon);
        let metric = IndexedMetric::new(items, metric);
        let mut dist = |a, b| metric.distance(a, b);
        let tree = VPTree::build(
            items.len(),
            self.bucket_size,
            self.seed,
            &mut dist,
        )?;

        let total = items.len();
        let mut state = vec![PointState::Unvisited; total];
        let mut clusters = 0;
        let mut seeds = VecDeque::new();
        for point in 0..total {
            self.check_cancelled()?;
            if state[point] != PointState::Unvisited {
                self.report_progress(point + 1, total);
                continue;
            }
            let neighbours = tree.within(point, eps, &mut dist)?;
            if neighbours.len() < self.min_cluster_size {
                state[point] = PointState::Noise;
                self.report_progress(point + 1, total);
                continue;
            }
            let cluster = clusters;
            clusters += 1;
            debug!("cluster {cluster} seeded by item {point}");
            state[point] = PointState::Assigned(cluster);
            seeds.extend(neighbours);
            while let Some(next) = seeds.pop_front() {
                match state[next] {
                    PointState::Assigned(_) => {}
                    PointState::Noise => {
                        // border point of this cluster, not expanded
                        state[next] = PointState::Assigned(cluster);
                    }
                    PointState::Unvisited => {
                        state[next] = PointState::Assigned(cluster);
                        self.check_cancelled()?;
                        let expanded = tree.within(next, eps, &mut dist)?;
                        if expanded.len() >= self.min_cluster_size {
                            // only core points grow the cluster; anything
                            // already claimed is skipped when dequeued
                            seeds.extend(expanded);
                        }
                    }
                }
            }
            self.report_progress(point + 1, total);
        }
        if let Some(progress) = &self.progress {
            progress.finish()
        }
        let noutliers = state
            .iter()
            .filter(|&&s| s == PointState::Noise)
            .count();
        info!("found {clusters} clusters and {noutliers} outliers among {total} items");

        let labels = state
            .into_iter()
            .map(|s| match s {
                PointState::Assigned(cluster) => cluster as isize,
                _ => OUTLIER,
            })
            .collect();
        Ok(labels)
    }

    fn validate(&self) -> Result<(), InvalidParameter> {
        if self.min_cluster_size < 2 {
            return Err(InvalidParameter::MinClusterSize(self.min_cluster_size));
        }
        if self.epsilon.is_nan() || self.epsilon < 0. {
            return Err(InvalidParameter::Epsilon(self.epsilon));
        }
        if self.bucket_size == 0 {
            return Err(InvalidParameter::BucketSize);
        }
        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), Error> {
        match &self.cancel {
            Some(cancel) if cancel.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    fn report_progress(&self, processed: usize, total: usize) {
        if let Some(progress) = &self.progress {
            progress.report(processed, total)
        }
    }
}
