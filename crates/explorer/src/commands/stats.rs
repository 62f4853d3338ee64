use clap::Parser;

use crate::prelude::*;
use crate::utils::{heading, table, thousands};

/// Print descriptive statistics of the dataset.
#[derive(Debug, Parser)]
pub(crate) struct Stats {
    /// The number of journals to list.
    #[arg(short = 'k', long, default_value = "10")]
    top: usize,
}

pub(crate) fn print_stats(dataset: &Dataset, top: usize) -> ExplorerResult<()> {
    let summary = Summary::from_dataset(dataset)?;

    heading("CORD-19 DATASET OVERVIEW");
    println!("Total papers: {}", thousands(summary.total_papers));
    match summary.date_range {
        Some(range) => println!("Date range: {} to {}", range.start, range.end),
        None => println!("Date range: n/a"),
    }
    println!("Unique journals: {}", thousands(summary.unique_journals));
    println!(
        "Data sources: {}",
        summary
            .sources
            .iter()
            .map(|(source, _)| source.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    println!("\nPublications by year:");
    let mut years = table(["year", "papers"]);
    for (year, count) in summary.yearly_distribution.iter() {
        years.add_row([year.to_string(), thousands(count)]);
    }
    println!("{years}");

    println!("\nTop {top} journals:");
    let mut journals = table(["#", "journal", "papers"]);
    for (idx, (journal, count)) in summary.journals.iter().take(top).enumerate() {
        journals.add_row([
            (idx + 1).to_string(),
            journal.clone(),
            thousands(count),
        ]);
    }
    println!("{journals}");

    println!("\nSource distribution:");
    let mut sources = table(["source", "papers", "share"]);
    for (source, count) in summary.sources.iter() {
        sources.add_row([
            source.clone(),
            thousands(count),
            format!("{:.1}%", summary.percentage(*count)),
        ]);
    }
    println!("{sources}");

    Ok(())
}

impl Stats {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let (_, dataset) = args.load()?;
        print_stats(&dataset, self.top)
    }
}
