pub use crate::config::Config;
pub use crate::dataset::Dataset;
pub use crate::error::{Cord19Error, Cord19Result};
pub use crate::filter::Filter;
pub use crate::paper::{Column, Paper};
pub use crate::progress::ProgressBarBuilder;
pub use crate::summary::{AppStats, Summary};
pub use crate::workspace::Workspace;
