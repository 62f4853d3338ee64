use std::path::PathBuf;

use clap::Parser;
use dialoguer::Confirm;

use super::export::export_data;
use super::interactive;
use super::plot::create_plots;
use super::stats::print_stats;
use super::titles::print_titles;
use crate::prelude::*;
use crate::utils::{heading, thousands};

/// Run the full analysis (statistics, titles, charts and export).
#[derive(Debug, Parser)]
pub(crate) struct Report {
    /// Don't ask whether to start the interactive session afterwards.
    #[arg(long)]
    no_prompt: bool,

    /// Write charts and exported files into `path`. By default, the
    /// files are written to the `outputs` directory.
    #[arg(short, long, value_name = "path")]
    output: Option<PathBuf>,
}

impl Report {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let (workspace, dataset) = args.load()?;
        let output_dir = self.output.unwrap_or_else(|| workspace.output_dir());
        println!("Loaded {} papers.", thousands(dataset.len()));

        print_stats(&dataset, 10)?;
        print_titles(&dataset, 15);
        create_plots(&dataset, &output_dir, false)?;
        export_data(&dataset, &output_dir)?;

        if !self.no_prompt {
            heading("INTERACTIVE EXPLORATION");
            let explore = Confirm::new()
                .with_prompt("Would you like to explore the data interactively?")
                .default(false)
                .show_default(true)
                .interact()?;

            if explore {
                return interactive::run(&dataset, &output_dir);
            }
        }

        println!(
            "\nAnalysis complete! Charts, exported data samples and summary \
             statistics are in {}.",
            output_dir.display()
        );
        Ok(())
    }
}
