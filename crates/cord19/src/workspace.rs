use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Cord19Result;

/// The directory tree the toolkit operates on.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// The root directory of the workspace.
    root_dir: PathBuf,
    config: Config,
}

impl Workspace {
    pub const CONFIG: &'static str = "cord19.toml";
    pub const DATA_DIR: &'static str = "data";
    pub const RAW_DIR: &'static str = "raw";
    pub const PROCESSED_DIR: &'static str = "processed";
    pub const OUTPUT_DIR: &'static str = "outputs";
    pub const DATA_FILE: &'static str = "cord19_sample.csv";
    pub const STATS_FILE: &'static str = "app_stats.json";

    /// Creates a workspace rooted at `root_dir`. If the directory
    /// contains a [Config], the config is loaded.
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Cord19Result<Self> {
        let root_dir = root_dir.as_ref().to_path_buf();
        let path = root_dir.join(Self::CONFIG);
        let config = if path.is_file() {
            Config::from_path(&path)?
        } else {
            Config::create(&path)
        };

        Ok(Self { root_dir, config })
    }

    /// Discovers the root of the workspace.
    ///
    /// The root is the closest directory, starting with the current
    /// directory, which contains a `cord19.toml` file. If there is no
    /// such directory, the current directory is used.
    pub fn discover() -> Cord19Result<Self> {
        Self::discover_from(std::env::current_dir()?)
    }

    pub fn discover_from<P: AsRef<Path>>(start: P) -> Cord19Result<Self> {
        let start = start.as_ref();
        let mut root_dir = start.to_path_buf();

        loop {
            if root_dir.join(Self::CONFIG).is_file() {
                log::debug!("found workspace at {}", root_dir.display());
                return Self::new(root_dir);
            }

            if !root_dir.pop() {
                return Self::new(start);
            }
        }
    }

    #[inline]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    #[inline]
    pub fn data_dir(&self) -> PathBuf {
        self.root_dir.join(Self::DATA_DIR)
    }

    #[inline]
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir().join(Self::RAW_DIR)
    }

    #[inline]
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir().join(Self::PROCESSED_DIR)
    }

    /// Returns the path of the dataset file.
    pub fn data_path(&self) -> PathBuf {
        match self.config.paths.data {
            Some(ref path) => self.resolve(path),
            None => self.data_dir().join(Self::DATA_FILE),
        }
    }

    /// Returns the path of the statistics file.
    pub fn stats_path(&self) -> PathBuf {
        match self.config.paths.stats {
            Some(ref path) => self.resolve(path),
            None => self.data_dir().join(Self::STATS_FILE),
        }
    }

    /// Returns the directory for charts and exported files.
    pub fn output_dir(&self) -> PathBuf {
        match self.config.paths.output {
            Some(ref path) => self.resolve(path),
            None => self.root_dir.join(Self::OUTPUT_DIR),
        }
    }

    /// Resolves a path relative to the root directory. Absolute paths
    /// are returned unchanged.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.root_dir.join(path)
    }

    /// Creates the `data`, `data/raw` and `data/processed` directories.
    pub fn setup_directories(&self) -> Cord19Result<()> {
        fs::create_dir_all(self.raw_dir())?;
        fs::create_dir_all(self.processed_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn discover_parent() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(Workspace::CONFIG),
            "[paths]\ndata = \"papers.csv\"\n",
        )?;

        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested)?;

        let ws = Workspace::discover_from(&nested)?;
        assert_eq!(ws.root_dir(), dir.path());
        assert_eq!(ws.data_path(), dir.path().join("papers.csv"));
        assert_eq!(ws.stats_path(), dir.path().join("data/app_stats.json"));
        Ok(())
    }

    #[test]
    fn fallback_to_start() -> TestResult {
        let dir = tempfile::tempdir()?;
        let ws = Workspace::discover_from(dir.path())?;

        assert_eq!(ws.root_dir(), dir.path());
        assert_eq!(ws.data_path(), dir.path().join("data/cord19_sample.csv"));
        assert_eq!(ws.output_dir(), dir.path().join("outputs"));
        assert_eq!(ws.config().path(), dir.path().join("cord19.toml"));
        Ok(())
    }

    #[test]
    fn absolute_paths() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut ws = Workspace::new(dir.path())?;
        ws.config_mut().set("paths.output", "/tmp/reports")?;
        assert_eq!(ws.output_dir(), PathBuf::from("/tmp/reports"));
        Ok(())
    }

    #[test]
    fn setup_directories() -> TestResult {
        let dir = tempfile::tempdir()?;
        let ws = Workspace::new(dir.path())?;
        ws.setup_directories()?;
        ws.setup_directories()?;

        assert!(ws.raw_dir().is_dir());
        assert!(ws.processed_dir().is_dir());
        Ok(())
    }
}
