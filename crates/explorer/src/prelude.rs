pub(crate) use cord19::prelude::{Dataset, Summary, Workspace};

pub(crate) use crate::cli::GlobalArgs;
pub(crate) use crate::error::{bail, ExplorerError, ExplorerResult};
