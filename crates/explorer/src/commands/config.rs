use clap::Parser;

use crate::prelude::*;

/// Get and set config options (`cord19.toml`).
#[derive(Debug, Parser)]
pub(crate) struct Config {
    /// Get the value for the given key.
    #[arg(long, conflicts_with_all = ["value", "unset", "set"])]
    get: bool,

    /// Remove the key from the config.
    #[arg(long, conflicts_with_all = ["value", "get", "set"])]
    unset: bool,

    /// Set the value for the given key.
    #[arg(long, requires = "value", conflicts_with_all = ["get", "unset"])]
    set: bool,

    /// The name of the config option (e.g. `generator.seed`).
    #[arg(value_parser = clap::builder::PossibleValuesParser::new(cord19::config::KEYS))]
    name: String,

    /// The (new) value of the config option.
    #[arg(conflicts_with_all = ["get", "unset"])]
    value: Option<String>,
}

impl Config {
    pub(crate) fn execute(self) -> ExplorerResult<()> {
        let mut workspace = Workspace::discover()?;
        let config = workspace.config_mut();
        let name = self.name.as_str();

        if let Some(value) = self.value {
            config.set(name, &value)?;
            config.save()?;
            log::debug!("updated {}", config.path().display());
        } else if self.unset {
            config.unset(name)?;
            config.save()?;
        } else {
            println!(
                "{name} = {}",
                config.get(name)?.unwrap_or_else(|| "None".into())
            );
        }

        Ok(())
    }
}
