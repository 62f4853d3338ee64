use clap::Parser;
use cord19::text::{title_frequencies, TitleStats};

use crate::prelude::*;
use crate::utils::{heading, table, thousands};

/// Analyze the words of the paper titles.
#[derive(Debug, Parser)]
pub(crate) struct Titles {
    /// The number of words to list.
    #[arg(short = 'k', long, default_value = "15")]
    top: usize,
}

pub(crate) fn print_titles(dataset: &Dataset, top: usize) {
    let stats = TitleStats::from_dataset(dataset);

    heading("TITLE ANALYSIS");
    match (stats.avg_length, stats.avg_words) {
        (Some(length), Some(words)) => {
            println!("Average title length: {length:.1} characters");
            println!("Average words per title: {words:.1} words");
        }
        _ => println!("No titles available."),
    }

    let freqs = title_frequencies(dataset);
    if freqs.is_empty() {
        return;
    }

    println!("\nMost frequent words in titles:");
    let mut words = table(["#", "word", "occurrences"]);
    for (idx, (word, count)) in freqs.most_common(top).into_iter().enumerate() {
        words.add_row([(idx + 1).to_string(), word, thousands(count)]);
    }
    println!("{words}");
}

impl Titles {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let (_, dataset) = args.load()?;
        print_titles(&dataset, self.top);
        Ok(())
    }
}
