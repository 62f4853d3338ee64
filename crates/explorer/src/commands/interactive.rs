use std::path::{Path, PathBuf};

use clap::Parser;
use dialoguer::Input;

use super::export::export_data;
use super::journal::drill_down;
use super::plot::create_plots;
use super::search::print_matches;
use super::stats::print_stats;
use super::titles::print_titles;
use crate::prelude::*;
use crate::utils::heading;

const MENU: [&str; 7] = [
    "Show basic statistics",
    "Analyze paper titles",
    "Create visualizations",
    "Export sample data",
    "Search papers by keyword",
    "Show specific journal papers",
    "Exit",
];

/// Explore the dataset with an interactive menu.
#[derive(Debug, Parser)]
pub(crate) struct Interactive {
    /// Write charts and exported files into `path`. By default, the
    /// files are written to the `outputs` directory.
    #[arg(short, long, value_name = "path")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Stats,
    Titles,
    Plot,
    Export,
    Search,
    Journal,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Stats),
            "2" => Some(Self::Titles),
            "3" => Some(Self::Plot),
            "4" => Some(Self::Export),
            "5" => Some(Self::Search),
            "6" => Some(Self::Journal),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

fn perform(
    choice: Choice,
    dataset: &Dataset,
    output_dir: &Path,
) -> ExplorerResult<()> {
    match choice {
        Choice::Stats => print_stats(dataset, 10)?,
        Choice::Titles => print_titles(dataset, 15),
        Choice::Plot => {
            create_plots(dataset, output_dir, false)?;
        }
        Choice::Export => export_data(dataset, output_dir)?,
        Choice::Search => {
            let keyword: String = Input::new()
                .with_prompt("Enter keyword to search in titles")
                .allow_empty(true)
                .interact_text()?;

            if !keyword.trim().is_empty() {
                print_matches(dataset, keyword.trim(), 10);
            }
        }
        Choice::Journal => drill_down(dataset, None, 10)?,
        Choice::Exit => {}
    }

    Ok(())
}

/// Runs the menu loop until the user chooses to exit. Errors of a menu
/// entry are reported and the loop continues.
pub(crate) fn run(dataset: &Dataset, output_dir: &Path) -> ExplorerResult<()> {
    loop {
        heading("CORD-19 DATA EXPLORER - INTERACTIVE MENU");
        for (idx, entry) in MENU.iter().enumerate() {
            println!("{}. {entry}", idx + 1);
        }

        let input: String = Input::new()
            .with_prompt(format!("Enter your choice (1-{})", MENU.len()))
            .interact_text()?;

        match Choice::parse(&input) {
            Some(Choice::Exit) => {
                println!("Thanks for exploring the CORD-19 dataset!");
                return Ok(());
            }
            Some(choice) => {
                if let Err(e) = perform(choice, dataset, output_dir) {
                    if matches!(e, ExplorerError::Dialoguer(_)) {
                        return Err(e);
                    }
                    eprintln!("error: {e:#}");
                }
            }
            None => println!(
                "Invalid choice! Please enter a number from 1-{}.",
                MENU.len()
            ),
        }
    }
}

impl Interactive {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let (workspace, dataset) = args.load()?;
        let output_dir = self.output.unwrap_or_else(|| workspace.output_dir());
        run(&dataset, &output_dir)
    }
}
