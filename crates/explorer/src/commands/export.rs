use std::path::{Path, PathBuf};

use clap::Parser;
use cord19::export::export;

use crate::prelude::*;
use crate::utils::{heading, thousands};

/// Export recent papers, the papers of the top journal and the
/// summary statistics.
#[derive(Debug, Parser)]
pub(crate) struct Export {
    /// Write the files into `path`. By default, the files are written
    /// to the `outputs` directory.
    #[arg(short, long, value_name = "path")]
    output: Option<PathBuf>,
}

pub(crate) fn export_data(dataset: &Dataset, output_dir: &Path) -> ExplorerResult<()> {
    heading("EXPORTING SAMPLE DATA");

    let report = export(dataset, output_dir)?;
    println!(
        "Exported {} recent papers to: {}",
        thousands(report.recent.records),
        report.recent.path.display()
    );

    match report.top_journal {
        Some((name, exported)) => println!(
            "Exported {} papers from {name} to: {}",
            thousands(exported.records),
            exported.path.display()
        ),
        None => println!("No journal information; skipped top journal export."),
    }

    println!("Exported summary statistics to: {}", report.summary.display());
    Ok(())
}

impl Export {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let (workspace, dataset) = args.load()?;
        let output_dir = self.output.unwrap_or_else(|| workspace.output_dir());
        export_data(&dataset, &output_dir)
    }
}
