use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{bail, Cord19Error, Cord19Result};

pub const DEFAULT_SIZE: usize = 2000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_SAMPLE_SIZE: usize = 5000;
pub const DEFAULT_SAMPLE_URL: &str =
    "https://raw.githubusercontent.com/allenai/cord19/master/metadata.csv";
pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;

/// The names of all config options.
pub const KEYS: [&str; 9] = [
    "paths.data",
    "paths.stats",
    "paths.output",
    "generator.size",
    "generator.seed",
    "download.sample_url",
    "download.sample_size",
    "dashboard.address",
    "dashboard.port",
];

/// Toolkit config (`cord19.toml`).
///
/// All options are optional; unset options fall back to the built-in
/// defaults. Relative paths are resolved against the directory that
/// contains the config file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The path of the config.
    #[serde(skip)]
    path: PathBuf,

    #[serde(default, skip_serializing_if = "Paths::is_empty")]
    pub paths: Paths,

    #[serde(default, skip_serializing_if = "Generator::is_empty")]
    pub generator: Generator,

    #[serde(default, skip_serializing_if = "Download::is_empty")]
    pub download: Download,

    #[serde(default, skip_serializing_if = "Dashboard::is_empty")]
    pub dashboard: Dashboard,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paths {
    /// The dataset file.
    pub data: Option<PathBuf>,

    /// The statistics file written by the generator.
    pub stats: Option<PathBuf>,

    /// The directory for charts and exported files.
    pub output: Option<PathBuf>,
}

impl Paths {
    fn is_empty(&self) -> bool {
        self.data.is_none() && self.stats.is_none() && self.output.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    /// Number of records to generate.
    pub size: Option<usize>,

    /// Seed of the random number generator.
    pub seed: Option<u64>,
}

impl Generator {
    fn is_empty(&self) -> bool {
        self.size.is_none() && self.seed.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Download {
    /// Location of the remote metadata sample.
    pub sample_url: Option<String>,

    /// Maximum number of records kept from the remote sample.
    pub sample_size: Option<usize>,
}

impl Download {
    fn is_empty(&self) -> bool {
        self.sample_url.is_none() && self.sample_size.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub address: Option<String>,
    pub port: Option<u16>,
}

impl Dashboard {
    fn is_empty(&self) -> bool {
        self.address.is_none() && self.port.is_none()
    }
}

fn parse<T>(name: &str, value: &str) -> Cord19Result<T>
where
    T: std::str::FromStr,
{
    value
        .parse::<T>()
        .map_err(|_| Cord19Error::other(format!("invalid value `{value}` for `{name}`")))
}

impl Config {
    /// Creates a new default config and sets the file location.
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().into(),
            ..Default::default()
        }
    }

    /// Loads an existing config from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Cord19Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.path = path.into();

        Ok(config)
    }

    /// Saves the config.
    pub fn save(&self) -> Cord19Result<()> {
        let content = toml::to_string(self).map_err(Cord19Error::other)?;
        let mut out = File::create(&self.path)?;
        out.write_all(content.as_bytes())?;
        Ok(())
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value of a config option, or `None` if the option
    /// isn't set.
    pub fn get(&self, name: &str) -> Cord19Result<Option<String>> {
        let display = |path: &Option<PathBuf>| {
            path.as_ref().map(|p| p.display().to_string())
        };

        Ok(match name {
            "paths.data" => display(&self.paths.data),
            "paths.stats" => display(&self.paths.stats),
            "paths.output" => display(&self.paths.output),
            "generator.size" => self.generator.size.map(|v| v.to_string()),
            "generator.seed" => self.generator.seed.map(|v| v.to_string()),
            "download.sample_url" => self.download.sample_url.clone(),
            "download.sample_size" => {
                self.download.sample_size.map(|v| v.to_string())
            }
            "dashboard.address" => self.dashboard.address.clone(),
            "dashboard.port" => self.dashboard.port.map(|v| v.to_string()),
            name => bail!("unknown config option `{name}`"),
        })
    }

    /// Sets a config option. The value is validated, but the config is
    /// not saved.
    pub fn set(&mut self, name: &str, value: &str) -> Cord19Result<()> {
        match name {
            "paths.data" => self.paths.data = Some(value.into()),
            "paths.stats" => self.paths.stats = Some(value.into()),
            "paths.output" => self.paths.output = Some(value.into()),
            "generator.size" => {
                self.generator.size = Some(parse(name, value)?)
            }
            "generator.seed" => {
                self.generator.seed = Some(parse(name, value)?)
            }
            "download.sample_url" => {
                let url = url::Url::parse(value).map_err(|e| {
                    Cord19Error::other(format!("invalid url `{value}`: {e}"))
                })?;
                self.download.sample_url = Some(url.to_string());
            }
            "download.sample_size" => {
                self.download.sample_size = Some(parse(name, value)?)
            }
            "dashboard.address" => {
                self.dashboard.address = Some(value.to_string())
            }
            "dashboard.port" => {
                self.dashboard.port = Some(parse(name, value)?)
            }
            name => bail!("unknown config option `{name}`"),
        }

        Ok(())
    }

    /// Removes a config option.
    pub fn unset(&mut self, name: &str) -> Cord19Result<()> {
        match name {
            "paths.data" => self.paths.data = None,
            "paths.stats" => self.paths.stats = None,
            "paths.output" => self.paths.output = None,
            "generator.size" => self.generator.size = None,
            "generator.seed" => self.generator.seed = None,
            "download.sample_url" => self.download.sample_url = None,
            "download.sample_size" => self.download.sample_size = None,
            "dashboard.address" => self.dashboard.address = None,
            "dashboard.port" => self.dashboard.port = None,
            name => bail!("unknown config option `{name}`"),
        }

        Ok(())
    }

    pub fn size(&self) -> usize {
        self.generator.size.unwrap_or(DEFAULT_SIZE)
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn sample_url(&self) -> &str {
        self.download
            .sample_url
            .as_deref()
            .unwrap_or(DEFAULT_SAMPLE_URL)
    }

    pub fn sample_size(&self) -> usize {
        self.download.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE)
    }

    pub fn address(&self) -> &str {
        self.dashboard.address.as_deref().unwrap_or(DEFAULT_ADDRESS)
    }

    pub fn port(&self) -> u16 {
        self.dashboard.port.unwrap_or(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.size(), 2000);
        assert_eq!(config.seed(), 42);
        assert_eq!(config.sample_size(), 5000);
        assert_eq!(config.port(), 8501);
        assert!(config.sample_url().ends_with("metadata.csv"));
    }

    #[test]
    fn get_set_unset() -> TestResult {
        let mut config = Config::default();
        for key in KEYS {
            assert_eq!(config.get(key)?, None);
        }

        config.set("generator.seed", "7")?;
        config.set("paths.output", "reports")?;
        assert_eq!(config.get("generator.seed")?.as_deref(), Some("7"));
        assert_eq!(config.seed(), 7);
        assert_eq!(config.get("paths.output")?.as_deref(), Some("reports"));

        assert!(config.set("generator.seed", "-1").is_err());
        assert!(config.set("dashboard.port", "70000").is_err());
        assert!(config.set("download.sample_url", "not a url").is_err());
        assert!(config.set("runtime.num_jobs", "4").is_err());
        assert!(config.get("runtime.num_jobs").is_err());

        config.unset("generator.seed")?;
        assert_eq!(config.seed(), 42);
        Ok(())
    }

    #[test]
    fn save_and_load() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cord19.toml");

        let mut config = Config::create(&path);
        config.set("generator.size", "500")?;
        config.set("dashboard.address", "0.0.0.0")?;
        config.save()?;

        let content = fs::read_to_string(&path)?;
        assert!(content.contains("[generator]"));
        assert!(!content.contains("[paths]"));

        let loaded = Config::from_path(&path)?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.size(), 500);
        assert_eq!(loaded.address(), "0.0.0.0");
        Ok(())
    }
}
