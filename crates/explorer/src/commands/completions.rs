use std::fs::File;
use std::io::{stdout, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Args;
use crate::prelude::*;

const BIN_NAME: &str = "cord19";

/// Print a completion script for the `cord19` command.
///
/// The script completes the explorer's subcommands (e.g. `stats`,
/// `plot` or `journal`) and their options.
#[derive(Debug, clap::Parser)]
pub(crate) struct Completions {
    /// Write the script to `filename` instead of `stdout`.
    #[arg(long, short, value_name = "filename")]
    output: Option<PathBuf>,

    /// The target shell.
    #[arg(value_name = "shell")]
    shell: Shell,
}

fn write_script<W: Write>(shell: Shell, wtr: &mut W) -> ExplorerResult<()> {
    generate(shell, &mut Args::command(), BIN_NAME, wtr);
    wtr.flush()?;
    Ok(())
}

impl Completions {
    pub(crate) fn execute(self) -> ExplorerResult<()> {
        match self.output {
            Some(path) => write_script(self.shell, &mut File::create(path)?),
            None => write_script(self.shell, &mut stdout().lock()),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn script_mentions_commands() -> TestResult {
        let mut script = Vec::new();
        write_script(Shell::Bash, &mut script)?;

        let script = String::from_utf8(script)?;
        assert!(script.contains(BIN_NAME));
        assert!(script.contains("journal"));
        Ok(())
    }

    #[test]
    fn script_to_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cord19.fish");

        let path_arg = path.to_string_lossy().to_string();
        Completions::try_parse_from(["completions", "-o", &path_arg, "fish"])?
            .execute()?;

        assert!(std::fs::read_to_string(&path)?.contains(BIN_NAME));
        Ok(())
    }
}
