use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use cord19::{generate, AppStats, SampleSpec};

use crate::prelude::*;
use crate::utils::{heading, table, thousands, truncate};

/// Generate a synthetic sample dataset and its summary statistics.
#[derive(Debug, Parser)]
pub(crate) struct Generate {
    /// The number of records to generate. Defaults to the
    /// `generator.size` config option or 2000.
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// The random seed. Defaults to the `generator.seed` config option
    /// or 42.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the dataset into `filename`. By default, the dataset is
    /// written to `data/cord19_sample.csv`.
    #[arg(short, long, value_name = "filename")]
    output: Option<PathBuf>,

    /// Write the summary statistics into `filename`. By default, the
    /// statistics are written to `data/app_stats.json`.
    #[arg(long, value_name = "filename")]
    stats: Option<PathBuf>,
}

fn create_parent(path: &Path) -> ExplorerResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            Ok(fs::create_dir_all(parent)?)
        }
        _ => Ok(()),
    }
}

fn print_head(dataset: &Dataset, n: usize) {
    let mut table = table(["cord_uid", "title", "journal", "publish_time"]);
    for paper in dataset.iter().take(n) {
        table.add_row([
            paper.cord_uid.clone(),
            truncate(paper.title.as_deref().unwrap_or_default(), 50),
            paper.journal.clone().unwrap_or_default(),
            paper
                .publish_time
                .map(|date| date.to_string())
                .unwrap_or_default(),
        ]);
    }

    println!("{table}");
}

impl Generate {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let workspace = Workspace::discover()?;
        let config = workspace.config();

        let size = self.size.unwrap_or(config.size());
        let seed = self.seed.unwrap_or(config.seed());
        let output = self.output.unwrap_or_else(|| workspace.data_path());
        let stats_path = self.stats.unwrap_or_else(|| workspace.stats_path());

        log::info!("generating {size} records (seed = {seed})");
        let dataset = generate(&SampleSpec::sample()?, size, seed)?;

        create_parent(&output)?;
        dataset.to_path(&output)?;

        let summary = Summary::from_dataset(&dataset)?;
        create_parent(&stats_path)?;
        AppStats::new(summary.clone(), true).save(&stats_path)?;

        if args.quiet {
            return Ok(());
        }

        heading("SAMPLE DATA SUMMARY");
        println!("Total papers: {}", thousands(summary.total_papers));
        if let Some(range) = summary.date_range {
            println!("Date range: {} to {}", range.start, range.end);
        }
        println!("Unique journals: {}", thousands(summary.unique_journals));
        if let Some(ref top) = summary.top_journal {
            println!("Top journal: {} ({} papers)", top.name, thousands(top.papers));
        }
        if let Some(year) = summary.peak_year {
            println!("Peak year: {year}");
        }

        println!("\nFirst records:");
        print_head(&dataset, 5);

        println!("\nSaved: {}", output.display());
        println!("Saved: {}", stats_path.display());
        Ok(())
    }
}
