use std::path::PathBuf;

use clap::Parser;

/// Cluster the lines of a text file by edit distance
#[derive(Debug, Parser)]
#[clap(about, version)]
pub(crate) struct Opt {
    /// Input file with one item per line
    #[clap(name = "INFILE", value_parser)]
    pub(crate) infile: PathBuf,

    /// Neighbourhood radius
    ///
    /// Two lines are neighbours if their edit distance is at most this
    /// large.
    #[clap(long, short, default_value = "1.")]
    pub(crate) epsilon: f64,

    /// Number of neighbours that make a line a cluster core point
    ///
    /// The line itself counts towards this number.
    #[clap(long, short, default_value = "2")]
    pub(crate) min_cluster_size: usize,

    /// Number of items per vantage point tree bucket
    #[clap(long, default_value = "1")]
    pub(crate) bucket_size: usize,

    /// Seed for the vantage point choices
    #[clap(long, default_value = "0")]
    pub(crate) seed: u64,

    /// Verbosity level
    #[clap(
        short,
        long,
        default_value = "Info",
        help = "Verbosity level.
Possible values with increasing amount of output are
'off', 'error', 'warn', 'info', 'debug', 'trace'.\n"
    )]
    pub(crate) loglevel: String,
}
