use std::path::{Path, PathBuf};
use std::sync::Arc;

use cord19::cache::FileMemo;
use cord19::{AppStats, Cord19Error, Dataset, Summary};

use crate::error::DashboardResult;

/// Shared server state.
///
/// The dataset and the statistics file are loaded lazily and cached
/// until the files are modified.
#[derive(Debug)]
pub(crate) struct AppState {
    data_path: PathBuf,
    stats_path: PathBuf,
    datasets: FileMemo<Dataset>,
    stats: FileMemo<AppStats>,
}

impl AppState {
    pub(crate) fn new(data_path: PathBuf, stats_path: PathBuf) -> Self {
        Self {
            data_path,
            stats_path,
            datasets: FileMemo::new(|path: &Path| Dataset::from_path(path)),
            stats: FileMemo::new(|path: &Path| AppStats::from_path(path)),
        }
    }

    #[inline]
    pub(crate) fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Returns the base dataset.
    pub(crate) fn dataset(&self) -> DashboardResult<Arc<Dataset>> {
        Ok(self.datasets.get(&self.data_path)?)
    }

    /// Returns the statistics file. If there is no such file, the
    /// statistics are computed from the base dataset.
    pub(crate) fn stats(&self) -> DashboardResult<Arc<AppStats>> {
        match self.stats.get(&self.stats_path) {
            Ok(stats) => Ok(stats),
            Err(Cord19Error::MissingDataFile(_)) => {
                let dataset = self.dataset()?;
                let summary = Summary::from_dataset(&dataset)?;
                Ok(Arc::new(AppStats::new(summary, false)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use cord19::{generate, SampleSpec};

    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn stats_fallback() -> TestResult {
        let dir = tempfile::tempdir()?;
        let data = dir.path().join("papers.csv");
        let stats = dir.path().join("app_stats.json");
        generate(&SampleSpec::demo()?, 20, 3)?.to_path(&data)?;

        let state = AppState::new(data, stats.clone());
        assert_eq!(state.dataset()?.len(), 20);

        let computed = state.stats()?;
        assert_eq!(computed.summary.total_papers, 20);
        assert!(!computed.sample_data);

        AppStats::new(Summary::default(), true).save(&stats)?;
        let loaded = state.stats()?;
        assert!(loaded.sample_data);
        assert_eq!(loaded.summary.total_papers, 0);
        Ok(())
    }

    #[test]
    fn missing_dataset() -> TestResult {
        let dir = tempfile::tempdir()?;
        let state = AppState::new(
            dir.path().join("missing.csv"),
            dir.path().join("stats.json"),
        );

        assert!(state.dataset().is_err());
        assert!(state.stats().is_err());
        fs::write(dir.path().join("missing.csv"), "cord_uid\na\n")?;
        assert_eq!(state.dataset()?.len(), 1);
        Ok(())
    }
}
