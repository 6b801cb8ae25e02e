//! `metric-dbscan` clusters collections of opaque items with DBSCAN.
//!
//! In contrast to most DBSCAN implementations there is no assumption
//! that items are points in a vector space. The only information used
//! about them is a caller-supplied [metric](metric::Metric), i.e. a
//! symmetric non-negative distance function that vanishes exactly on
//! equal items and satisfies the triangle inequality. Neighbourhood
//! queries are answered by a [vantage point tree](vptree::VPTree),
//! which exploits the triangle inequality to keep the number of metric
//! evaluations small.
//!
//! # How to use
//!
//! ```
//! use metric_dbscan::prelude::*;
//!
//! let items = [0., 1., 2., 10., 11., 12.];
//! let metric = |a: &f64, b: &f64| (a - b).abs();
//! let labels = cluster_items(&items, &metric, 2, 1.5)?;
//! assert_eq!(labels, [0, 0, 0, 1, 1, 1]);
//! # Ok::<_, metric_dbscan::error::Error>(())
//! ```
//!
//! Items in no cluster are labelled [OUTLIER](dbscan::OUTLIER).
//! Progress reporting, cooperative cancellation, and tree tuning are
//! available through the [ClustererBuilder](dbscan::ClustererBuilder).
//!
//! ## Most relevant modules
//!
//! - [prelude] exports a list of the most relevant classes and objects
//! - [dbscan] contains the clustering driver and its options
//! - [metric] for user-defined distance functions
//! - [vptree] for standalone radius queries

/// Cooperative cancellation
pub mod cancel;
/// DBSCAN driver
pub mod dbscan;
/// Clustering errors
pub mod error;
/// Distance functions
pub mod metric;
/// Most important exports
pub mod prelude;
/// Progress bar
pub mod progress_bar;
/// Vantage point tree
pub mod vptree;

use lazy_static::lazy_static;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
lazy_static! {
    pub static ref VERSION_MAJOR: u32 =
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap();
    pub static ref VERSION_MINOR: u32 =
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap();
    pub static ref VERSION_PATCH: u32 =
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap();
}
