mod opt;

use crate::opt::Opt;

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use itertools::Itertools;
use log::{debug, info};
use metric_dbscan::prelude::*;

fn main() -> Result<()> {
    let opt = Opt::parse();
    let env = Env::default().filter_or("METRIC_DBSCAN_LOG", &opt.loglevel);
    env_logger::init_from_env(env);
    debug!("settings: {opt:?}");

    let input = fs::read_to_string(&opt.infile)
        .with_context(|| format!("failed to read {:?}", opt.infile))?;
    let items: Vec<&str> = input.lines().collect();
    info!("read {} items from {:?}", items.len(), opt.infile);

    let progress = ProgressBar::new(items.len(), "items scanned:");
    let labels = ClustererBuilder::default()
        .min_cluster_size(opt.min_cluster_size)
        .epsilon(opt.epsilon)
        .bucket_size(opt.bucket_size)
        .seed(opt.seed)
        .progress(Some(Arc::new(progress) as Arc<dyn Progress>))
        .build()?
        .cluster(&items, &EditDistance::default())?;

    let mut clusters: Vec<Vec<&str>> = Vec::new();
    let mut outliers = Vec::new();
    for (&label, &item) in labels.iter().zip(items.iter()) {
        if label == OUTLIER {
            outliers.push(item);
        } else {
            let label = label as usize;
            // border points can carry a label first seen later on
            if label >= clusters.len() {
                clusters.resize_with(label + 1, Vec::new);
            }
            clusters[label].push(item);
        }
    }
    info!(
        "found {} clusters and {} outliers",
        clusters.len(),
        outliers.len()
    );
    for (id, members) in clusters.iter().enumerate() {
        println!("cluster {id}: {}", members.iter().join(", "));
    }
    if !outliers.is_empty() {
        println!("outliers: {}", outliers.iter().join(", "));
    }
    Ok(())
}
