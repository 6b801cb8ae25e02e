pub use crate::{
    cancel::CancelToken,
    dbscan::{cluster_items, Clusterer, ClustererBuilder, OUTLIER},
    error::Error,
    metric::{AbsoluteDifference, EditDistance, Metric, TryMetric},
    progress_bar::{Progress, ProgressBar},
    vptree::VPTree,
};
