use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::*;
use crate::prelude::*;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None, max_term_width = 72)]
pub(crate) struct Args {
    #[command(flatten)]
    pub(crate) global: GlobalArgs,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Debug, clap::Args)]
pub(crate) struct GlobalArgs {
    /// Run verbosely. Print additional progress information to the
    /// standard error stream. This option conflicts with the
    /// `--quiet` option.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub(crate) verbose: bool,

    /// Operate quietly; do not show progress. This option conflicts
    /// with the `--verbose` option.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub(crate) quiet: bool,

    /// Read the dataset from `filename`. By default, the dataset is
    /// read from `data/cord19_sample.csv` (or the `paths.data` config
    /// option) relative to the workspace root.
    #[arg(
        long,
        global = true,
        value_name = "filename",
        env = "CORD19_DATA",
        hide_env_values = true
    )]
    pub(crate) data: Option<PathBuf>,
}

impl GlobalArgs {
    /// Returns the default log filter, which can be overridden by the
    /// `RUST_LOG` environment variable.
    pub(crate) fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Discovers the workspace and loads its dataset.
    pub(crate) fn load(&self) -> ExplorerResult<(Workspace, Dataset)> {
        let workspace = Workspace::discover()?;
        let path = match self.data {
            Some(ref path) => path.clone(),
            None => workspace.data_path(),
        };

        if !path.is_file() {
            bail!(
                "data file not found (path = {}); run `cord19 download \
                 --method demo` to create it",
                path.display()
            );
        }

        let dataset = Dataset::from_path(&path)?;
        log::info!("loaded {} papers from {}", dataset.len(), path.display());
        Ok((workspace, dataset))
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    Completions(Completions),
    Config(Config),
    #[clap(alias = "fetch")]
    Download(Download),
    Export(Export),
    Generate(Generate),
    #[clap(alias = "menu")]
    Interactive(Interactive),
    Journal(Journal),
    Plot(Plot),
    Report(Report),
    Search(Search),
    Stats(Stats),
    Titles(Titles),
}
