use clap::Parser;
use dialoguer::Input;

use super::search::print_papers;
use crate::prelude::*;
use crate::utils::thousands;

const TOP_JOURNALS: usize = 10;

/// List the top journals and print the papers of one of them.
#[derive(Debug, Parser)]
pub(crate) struct Journal {
    /// The maximum number of papers to print.
    #[arg(short = 'n', long, default_value = "10")]
    limit: usize,

    /// The rank of the journal in the list of top journals. If no rank
    /// is given, the user is asked for one.
    number: Option<usize>,
}

/// Returns the name of the journal with the given rank (starting at
/// 1).
fn select(journals: &[(String, u64)], number: usize) -> ExplorerResult<&str> {
    match number.checked_sub(1).and_then(|idx| journals.get(idx)) {
        Some((name, _)) => Ok(name),
        None => bail!(
            "invalid journal number `{number}` (expected 1-{})",
            journals.len()
        ),
    }
}

fn ask(max: usize) -> ExplorerResult<usize> {
    let input: String = Input::new()
        .with_prompt(format!("Enter journal number (1-{max})"))
        .interact_text()?;

    match input.trim().parse::<usize>() {
        Ok(number) => Ok(number),
        Err(_) => bail!("invalid input `{}`", input.trim()),
    }
}

pub(crate) fn drill_down(
    dataset: &Dataset,
    number: Option<usize>,
    limit: usize,
) -> ExplorerResult<()> {
    let summary = Summary::from_dataset(dataset)?;
    let journals: Vec<_> =
        summary.journals.into_iter().take(TOP_JOURNALS).collect();

    if journals.is_empty() {
        println!("No journal information available.");
        return Ok(());
    }

    println!("\nTop {} journals:", journals.len());
    for (idx, (name, count)) in journals.iter().enumerate() {
        println!("  {}. {name} ({} papers)", idx + 1, thousands(count));
    }

    let number = match number {
        Some(number) => number,
        None => ask(journals.len())?,
    };

    let journal = select(&journals, number)?;
    println!("\nPapers from {journal}:");
    print_papers(&dataset.with_journal(journal), limit, false);
    Ok(())
}

impl Journal {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let (_, dataset) = args.load()?;
        drill_down(&dataset, self.number, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_by_rank() {
        let journals = vec![("BMJ".to_string(), 3), ("Cell".to_string(), 1)];
        assert_eq!(select(&journals, 1).ok(), Some("BMJ"));
        assert_eq!(select(&journals, 2).ok(), Some("Cell"));
        assert!(select(&journals, 0).is_err());
        assert!(select(&journals, 3).is_err());
    }
}
