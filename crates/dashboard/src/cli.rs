use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

/// Serve an interactive dashboard of the CORD-19 dataset.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None, max_term_width = 72)]
pub(crate) struct Args {
    /// Run verbosely. Print additional progress information to the
    /// standard error stream. This option conflicts with the
    /// `--quiet` option.
    #[arg(short, long, conflicts_with = "quiet")]
    pub(crate) verbose: bool,

    /// Operate quietly; do not show progress. This option conflicts
    /// with the `--verbose` option.
    #[arg(short, long, conflicts_with = "verbose")]
    pub(crate) quiet: bool,

    /// The port to listen on. Defaults to the `dashboard.port` config
    /// option or 8501.
    #[arg(short, long)]
    pub(crate) port: Option<u16>,

    /// The address to listen on. Defaults to the `dashboard.address`
    /// config option or 127.0.0.1.
    #[arg(long)]
    pub(crate) address: Option<IpAddr>,

    /// Read the dataset from `filename`.
    #[arg(
        long,
        value_name = "filename",
        env = "CORD19_DATA",
        hide_env_values = true
    )]
    pub(crate) data: Option<PathBuf>,

    /// Read the summary statistics from `filename`.
    #[arg(long, value_name = "filename")]
    pub(crate) stats: Option<PathBuf>,
}

impl Args {
    pub(crate) fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
