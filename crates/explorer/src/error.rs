use cord19::Cord19Error;

pub(crate) type ExplorerResult<T> = Result<T, ExplorerError>;

macro_rules! bail {
    ($($arg:tt)*) => {{
        return Err(ExplorerError::Other(format!($($arg)*)));
    }};
}

pub(crate) use bail;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ExplorerError {
    #[error(transparent)]
    Cord19(#[from] Cord19Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

impl ExplorerError {
    /// Returns `true` if the output stream was closed early (e.g. the
    /// output was piped into `head`).
    pub(crate) fn is_broken_pipe(&self) -> bool {
        match self {
            Self::IO(e) => e.kind() == std::io::ErrorKind::BrokenPipe,
            Self::Cord19(e) => e.is_broken_pipe(),
            _ => false,
        }
    }
}
