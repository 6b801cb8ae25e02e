use thiserror::Error;

/// A clustering error
///
/// Every error aborts the running call. No partial cluster assignment
/// is ever returned and no metric call is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter is outside its allowed range
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] InvalidParameter),
    /// The metric returned a value that is not a distance
    #[error(
        "invalid metric: d(items[{a}], items[{b}]) = {value}, \
         but distances have to be finite and non-negative"
    )]
    InvalidMetric {
        /// Index of the first item passed to the metric
        a: usize,
        /// Index of the second item passed to the metric
        b: usize,
        /// The offending return value
        value: f64,
    },
    /// The metric callback itself reported an error
    #[error("metric evaluation failed")]
    MetricFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Cooperative cancellation was observed
    #[error("clustering cancelled")]
    Cancelled,
}

/// An out-of-range clustering parameter
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum InvalidParameter {
    /// `min_cluster_size` below the smallest meaningful value
    ///
    /// With a minimum cluster size of one every point would be a core
    /// point and the clustering would degenerate.
    #[error("min_cluster_size is {0}, but has to be at least 2")]
    MinClusterSize(usize),
    /// Negative or NaN neighbourhood radius
    #[error("epsilon is {0}, but has to be non-negative")]
    Epsilon(f64),
    /// Vantage point tree buckets have to hold at least one item
    #[error("bucket_size is 0, but has to be at least 1")]
    BucketSize,
}
