use clap::Parser;
use cord19::Paper;

use crate::prelude::*;
use crate::utils::{thousands, truncate};

/// Search paper titles for a keyword (case-insensitive).
#[derive(Debug, Parser)]
pub(crate) struct Search {
    /// The maximum number of papers to print.
    #[arg(short = 'n', long, default_value = "10")]
    limit: usize,

    /// The keyword to search for. Leading and trailing whitespace is
    /// ignored.
    #[arg(value_parser = non_blank)]
    keyword: String,
}

fn non_blank(s: &str) -> Result<String, String> {
    match s.trim() {
        "" => Err("the keyword must not be empty".into()),
        keyword => Ok(keyword.to_string()),
    }
}

/// Formats a paper as `title (journal, year)`.
pub(crate) fn format_paper(paper: &Paper, journal: bool) -> String {
    let title = truncate(paper.title.as_deref().unwrap_or_default(), 80);
    let year = paper
        .publication_year
        .map(|year| year.to_string())
        .unwrap_or_else(|| "n/a".into());

    if journal {
        let journal = paper.journal.as_deref().unwrap_or("n/a");
        format!("{title} ({journal}, {year})")
    } else {
        format!("{title} ({year})")
    }
}

/// Prints the first `limit` papers and the number of remaining papers.
pub(crate) fn print_papers(dataset: &Dataset, limit: usize, journal: bool) {
    for (idx, paper) in dataset.iter().take(limit).enumerate() {
        println!("  {}. {}", idx + 1, format_paper(paper, journal));
    }

    if dataset.len() > limit {
        println!("  ... and {} more papers", thousands(dataset.len() - limit));
    }
}

pub(crate) fn print_matches(dataset: &Dataset, keyword: &str, limit: usize) {
    let matches = dataset.search_titles(keyword);
    println!(
        "\nFound {} papers containing '{keyword}':",
        thousands(matches.len())
    );
    print_papers(&matches, limit, true);
}

impl Search {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let (_, dataset) = args.load()?;
        print_matches(&dataset, &self.keyword, self.limit);
        Ok(())
    }
}
