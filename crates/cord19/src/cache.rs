use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use crate::error::{Cord19Error, Cord19Result};

type Loader<T> = Box<dyn Fn(&Path) -> Cord19Result<T> + Send + Sync>;

/// A memoized file loader.
///
/// Values are cached by path and modification time of the file; a
/// value is loaded again as soon as the file has been modified.
pub struct FileMemo<T> {
    load: Loader<T>,
    entries: Mutex<HashMap<PathBuf, (SystemTime, Arc<T>)>>,
}

impl<T> FileMemo<T> {
    pub fn new<F>(load: F) -> Self
    where
        F: Fn(&Path) -> Cord19Result<T> + Send + Sync + 'static,
    {
        Self {
            load: Box::new(load),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value for `path`, loading it if the file is unknown
    /// or has been modified since it was loaded.
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Cord19Result<Arc<T>> {
        let path = path.as_ref();
        let mtime = match fs::metadata(path) {
            Ok(metadata) => metadata.modified()?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Cord19Error::MissingDataFile(path.into()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut entries =
            self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((modified, value)) = entries.get(path) {
            if *modified == mtime {
                return Ok(value.clone());
            }
        }

        log::debug!("loading {}", path.display());
        let value = Arc::new((self.load)(path)?);
        entries.insert(path.into(), (mtime, value.clone()));
        Ok(value)
    }
}

impl<T> std::fmt::Debug for FileMemo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileMemo").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn reload_on_modification() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.txt");
        fs::write(&path, "first")?;

        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let memo = FileMemo::new(move |path| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(fs::read_to_string(path)?)
        });

        let first = memo.get(&path)?;
        let again = memo.get(&path)?;
        assert_eq!(first.as_str(), "first");
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        let mut file = File::create(&path)?;
        file.write_all(b"second")?;
        file.set_modified(SystemTime::now() + Duration::from_secs(60))?;
        drop(file);

        assert_eq!(memo.get(&path)?.as_str(), "second");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[test]
    fn missing_file() {
        let memo = FileMemo::new(|path| Ok(fs::read(path)?));
        let result = memo.get("/nonexistent/cord19_sample.csv");
        assert!(matches!(result, Err(Cord19Error::MissingDataFile(_))));
    }
}
