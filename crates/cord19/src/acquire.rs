//! Producing a dataset file inside a [Workspace].

use std::fmt;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::time::Duration;

use tempfile::NamedTempFile;

use crate::dataset::Dataset;
use crate::error::{Cord19Error, Cord19Result};
use crate::generate::{generate, SampleSpec};
use crate::progress::ProgressBarBuilder;
use crate::workspace::Workspace;

pub const KAGGLE_DATASET: &str =
    "allen-institute-for-ai/CORD-19-research-challenge";

const PBAR_DOWNLOAD: &str = "Downloading {msg}: {binary_bytes}/{binary_total_bytes} \
        ({binary_bytes_per_sec}) | elapsed: {elapsed_precise}";

const PBAR_DOWNLOAD_UNKNOWN: &str = "Downloading {msg}: {binary_bytes} \
        ({binary_bytes_per_sec}) | elapsed: {elapsed_precise}";

const DEMO_FILE: &str = "cord19_demo.csv";
const RAW_SAMPLE_FILE: &str = "metadata_sample.csv";

/// How a dataset is acquired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Generate synthetic records.
    #[default]
    Demo,
    /// Download the metadata table and draw a sample.
    Sample,
    /// Download the full archive with the `kaggle` client.
    Kaggle,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demo => write!(f, "demo"),
            Self::Sample => write!(f, "sample"),
            Self::Kaggle => write!(f, "kaggle"),
        }
    }
}

impl FromStr for Method {
    type Err = Cord19Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "demo" => Ok(Self::Demo),
            "sample" => Ok(Self::Sample),
            "kaggle" => Ok(Self::Kaggle),
            _ => Err(Cord19Error::other(format!("unknown method `{s}`"))),
        }
    }
}

/// A data file found in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingFile {
    pub path: PathBuf,
    pub size: u64,
}

/// The result of an acquisition.
#[derive(Debug, Default)]
pub struct Outcome {
    /// The files that have been written.
    pub files: Vec<PathBuf>,
    /// The dataset that has been written, if it was loaded.
    pub dataset: Option<Dataset>,
}

/// Produces the dataset file of a workspace.
#[derive(Debug, Clone)]
pub struct Acquirer {
    workspace: Workspace,
    size: usize,
    seed: u64,
    sample_url: String,
    sample_size: usize,
    kaggle: String,
    quiet: bool,
}

impl Acquirer {
    /// Creates a new acquirer. The demo size, the seed and the sample
    /// options are taken from the workspace config.
    pub fn new(workspace: Workspace) -> Self {
        let config = workspace.config();

        Self {
            size: config.size(),
            seed: config.seed(),
            sample_url: config.sample_url().into(),
            sample_size: config.sample_size(),
            kaggle: "kaggle".into(),
            quiet: false,
            workspace,
        }
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sample_url<S: Into<String>>(mut self, url: S) -> Self {
        self.sample_url = url.into();
        self
    }

    /// Sets the name (or path) of the `kaggle` executable.
    pub fn kaggle<S: Into<String>>(mut self, program: S) -> Self {
        self.kaggle = program.into();
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    #[inline]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Lists the `*.csv` and `*.json` files directly under the data
    /// directory.
    pub fn existing_files(&self) -> Cord19Result<Vec<ExistingFile>> {
        let data_dir = self.workspace.data_dir();
        let base = glob::Pattern::escape(&data_dir.to_string_lossy());
        let mut files = vec![];

        for ext in ["csv", "json"] {
            let pattern = format!("{base}/*.{ext}");
            for entry in glob::glob(&pattern).map_err(Cord19Error::other)? {
                let path = entry.map_err(|e| Cord19Error::IO(e.into_error()))?;
                if path.is_file() {
                    let size = fs::metadata(&path)?.len();
                    files.push(ExistingFile { path, size });
                }
            }
        }

        Ok(files)
    }

    pub fn run(&self, method: Method) -> Cord19Result<Outcome> {
        log::info!("acquiring dataset (method = {method})");
        match method {
            Method::Demo => self.synthetic(),
            Method::Sample => self.remote_sample(),
            Method::Kaggle => self.kaggle_archive(),
        }
    }

    fn write_dataset(&self, dataset: &Dataset, paths: &[PathBuf]) -> Cord19Result<()> {
        for path in paths {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            dataset.to_path(path)?;
            log::debug!("wrote {} records to {}", dataset.len(), path.display());
        }

        Ok(())
    }

    /// Generates the demo dataset.
    pub fn synthetic(&self) -> Cord19Result<Outcome> {
        self.workspace.setup_directories()?;

        let dataset = generate(&SampleSpec::demo()?, self.size, self.seed)?;
        let files = vec![
            self.workspace.processed_dir().join(DEMO_FILE),
            self.workspace.data_path(),
        ];

        self.write_dataset(&dataset, &files)?;
        Ok(Outcome {
            files,
            dataset: Some(dataset),
        })
    }

    /// Downloads the remote metadata table and keeps a seeded random
    /// sample of it.
    pub fn remote_sample(&self) -> Cord19Result<Outcome> {
        self.workspace.setup_directories()?;

        let raw = self.workspace.raw_dir().join(RAW_SAMPLE_FILE);
        download(&self.sample_url, &raw, self.quiet)?;

        let dataset = Dataset::from_path(&raw)?;
        log::info!("downloaded {} records", dataset.len());

        let dataset = if dataset.len() > self.sample_size {
            dataset.sample(self.sample_size, self.seed)
        } else {
            dataset
        };

        let files = vec![
            self.workspace.processed_dir().join(Workspace::DATA_FILE),
            self.workspace.data_path(),
        ];

        self.write_dataset(&dataset, &files)?;
        Ok(Outcome {
            files: [vec![raw], files].concat(),
            dataset: Some(dataset),
        })
    }

    /// Downloads (and unpacks) the full archive into the raw data
    /// directory.
    pub fn kaggle_archive(&self) -> Cord19Result<Outcome> {
        self.workspace.setup_directories()?;
        let raw_dir = self.workspace.raw_dir();

        let status = Command::new(&self.kaggle)
            .args(["datasets", "download", "-d", KAGGLE_DATASET, "-p"])
            .arg(&raw_dir)
            .arg("--unzip")
            .stdin(Stdio::null())
            .status();

        match status {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Cord19Error::DependencyMissing(format!(
                    "`{}` not found; install the client with `pip install \
                     kaggle` and set up an API token \
                     (https://github.com/Kaggle/kaggle-api)",
                    self.kaggle
                )))
            }
            Err(e) => Err(e.into()),
            Ok(status) if !status.success() => Err(Cord19Error::Download(
                format!("`{}` failed ({status})", self.kaggle),
            )),
            Ok(_) => Ok(Outcome {
                files: vec![raw_dir],
                dataset: None,
            }),
        }
    }
}

/// Writes `path` through a temporary file in the same directory. The
/// file only replaces `path` once `write` has succeeded.
fn write_atomic<T, F>(path: &Path, write: F) -> Cord19Result<T>
where
    F: FnOnce(&mut dyn Write) -> Cord19Result<T>,
{
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    let value = {
        let mut out = BufWriter::new(tmp.as_file_mut());
        let value = write(&mut out)?;
        out.flush()?;
        value
    };

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(value)
}

/// Streams the body of `url` into `path`.
fn download(url: &str, path: &Path, quiet: bool) -> Cord19Result<u64> {
    let url = url::Url::parse(url)
        .map_err(|e| Cord19Error::Download(format!("invalid url `{url}`: {e}")))?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("cord19/", env!("CARGO_PKG_VERSION")))
        .timeout(Option::<Duration>::None)
        .build()?;

    let mut response = client.get(url.clone()).send()?.error_for_status()?;

    let pbar = match response.content_length() {
        Some(len) => ProgressBarBuilder::new(PBAR_DOWNLOAD, quiet).len(len),
        None => ProgressBarBuilder::new(PBAR_DOWNLOAD_UNKNOWN, quiet),
    }
    .build();

    if let Some(name) = path.file_name() {
        pbar.set_message(name.to_string_lossy().to_string());
    }

    let result = write_atomic(path, |out| {
        let mut out = pbar.wrap_write(out);
        Ok(response.copy_to(&mut out)?)
    });
    pbar.finish_and_clear();
    let bytes = result?;

    log::info!("downloaded {url} ({bytes} bytes)");
    Ok(bytes)
}
