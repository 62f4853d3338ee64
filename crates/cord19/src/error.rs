use std::path::PathBuf;

pub type Cord19Result<T> = Result<T, Cord19Error>;

macro_rules! bail {
    ($($arg:tt)*) => {{
        return Err($crate::error::Cord19Error::Other(format!($($arg)*)));
    }};
}

pub(crate) use bail;

#[derive(Debug, thiserror::Error)]
pub enum Cord19Error {
    #[error("data file not found (path = {})", .0.display())]
    MissingDataFile(PathBuf),

    #[error("download failed: {0}")]
    Download(String),

    #[error("missing dependency: {0}")]
    DependencyMissing(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),

    #[error("{0}")]
    Other(String),
}

impl Cord19Error {
    #[inline]
    pub fn other<T: ToString>(s: T) -> Self {
        Self::Other(s.to_string())
    }

    /// Returns `true` if the error is caused by a closed pipe (e.g.
    /// the output was piped into `head`).
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            Self::IO(e) => e.kind() == std::io::ErrorKind::BrokenPipe,
            Self::Csv(e) => matches!(
                e.kind(),
                csv::ErrorKind::Io(e)
                    if e.kind() == std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Cord19Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Download(e.to_string())
    }
}
