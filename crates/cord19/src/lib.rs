//! # CORD-19
//!
//! This crate provides the building blocks of a small toolkit to explore
//! the [CORD-19] research-paper metadata set. A dataset is a table of
//! [Paper] records which is loaded from (and written to) CSV files using
//! the column names of the original `metadata.csv`.
//!
//! The toolkit consists of the following parts:
//!
//! ## Acquirer
//!
//! The [acquire] module produces a dataset file inside a [Workspace],
//! either by generating synthetic records, by downloading a remote sample
//! or by delegating to the `kaggle` command line client.
//!
//! ## Generator
//!
//! The [generate] module creates synthetic records from a table of field
//! generators. The output is a pure function of the seed, the number of
//! records and the [SampleSpec].
//!
//! ## Analysis
//!
//! Filtering ([Filter]), descriptive statistics ([Summary]), word
//! frequencies ([text]) and chart rendering ([chart]) are shared by the
//! `cord19` explorer and the `cord19-dashboard` server.
//!
//! [CORD-19]: https://github.com/allenai/cord19

pub mod acquire;
pub mod cache;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod frame;
pub mod generate;
pub mod paper;
pub mod prelude;
pub mod progress;
pub mod summary;
pub mod text;
pub mod workspace;

pub use config::Config;
pub use dataset::Dataset;
pub use error::{Cord19Error, Cord19Result};
pub use filter::Filter;
pub use generate::{generate, SampleSpec};
pub use paper::{Column, Paper};
pub use summary::{AppStats, Summary};
pub use workspace::Workspace;
