use clap::{Parser, ValueEnum};
use cord19::acquire::{Acquirer, Method, Outcome};
use cord19::Cord19Error;
use dialoguer::Confirm;
use humansize::{make_format, BINARY};

use crate::prelude::*;
use crate::utils::{table, thousands};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    /// Generate synthetic demo records.
    #[default]
    Demo,
    /// Download the metadata table and keep a random sample.
    Sample,
    /// Download the full archive with the `kaggle` client.
    Kaggle,
}

impl From<MethodArg> for Method {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Demo => Method::Demo,
            MethodArg::Sample => Method::Sample,
            MethodArg::Kaggle => Method::Kaggle,
        }
    }
}

/// Download (or generate) the CORD-19 dataset.
#[derive(Debug, Parser)]
pub(crate) struct Download {
    /// How to acquire the dataset.
    #[arg(short, long, value_enum, default_value_t = MethodArg::Demo)]
    method: MethodArg,

    /// Overwrite existing data files without asking.
    #[arg(short, long)]
    force: bool,

    /// The number of synthetic records (demo method). Defaults to the
    /// `generator.size` config option or 2000.
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// The random seed. Defaults to the `generator.seed` config option
    /// or 42.
    #[arg(long)]
    seed: Option<u64>,

    /// The URL of the metadata table (sample method).
    #[arg(long, value_name = "url")]
    url: Option<String>,
}

fn print_outcome(outcome: &Outcome) {
    for path in outcome.files.iter() {
        println!("Saved: {}", path.display());
    }

    if let Some(ref dataset) = outcome.dataset {
        println!(
            "Dataset shape: ({}, {})",
            thousands(dataset.len()),
            cord19::dataset::HEADER.len()
        );

        if let Some((start, end)) = dataset.date_range() {
            println!("Date range: {start} to {end}");
        }
    }
}

impl Download {
    /// Asks for confirmation if the data directory contains data
    /// files. Returns `false` if the user declines.
    fn confirm_overwrite(&self, acquirer: &Acquirer) -> ExplorerResult<bool> {
        let files = acquirer.existing_files()?;
        if self.force || files.is_empty() {
            return Ok(true);
        }

        let formatter = make_format(BINARY);
        let mut table = table(["file", "size"]);
        for file in files.iter() {
            table.add_row([file.path.display().to_string(), formatter(file.size)]);
        }

        println!("Existing data files:\n{table}");
        Ok(Confirm::new()
            .with_prompt("Do you want to overwrite the existing data?")
            .default(false)
            .show_default(true)
            .interact()?)
    }

    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let mut acquirer = Acquirer::new(Workspace::discover()?).quiet(args.quiet);
        if let Some(size) = self.size {
            acquirer = acquirer.size(size);
        }
        if let Some(seed) = self.seed {
            acquirer = acquirer.seed(seed);
        }
        if let Some(ref url) = self.url {
            acquirer = acquirer.sample_url(url.as_str());
        }

        if !self.confirm_overwrite(&acquirer)? {
            println!("Download cancelled.");
            return Ok(());
        }

        let method = Method::from(self.method);
        match acquirer.run(method) {
            Ok(outcome) => print_outcome(&outcome),
            Err(
                e @ (Cord19Error::Download(_)
                | Cord19Error::DependencyMissing(_)),
            ) if method != Method::Demo => {
                eprintln!("error: {e}");

                let fallback = Confirm::new()
                    .with_prompt("Generate synthetic demo data instead?")
                    .default(true)
                    .show_default(true)
                    .interact()?;

                if !fallback {
                    return Err(e.into());
                }

                print_outcome(&acquirer.run(Method::Demo)?);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }
}
