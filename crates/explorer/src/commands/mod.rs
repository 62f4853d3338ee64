pub(crate) use completions::Completions;
pub(crate) use config::Config;
pub(crate) use download::Download;
pub(crate) use export::Export;
pub(crate) use generate::Generate;
pub(crate) use interactive::Interactive;
pub(crate) use journal::Journal;
pub(crate) use plot::Plot;
pub(crate) use report::Report;
pub(crate) use search::Search;
pub(crate) use stats::Stats;
pub(crate) use titles::Titles;

mod completions;
mod config;
mod download;
mod export;
mod generate;
mod interactive;
mod journal;
mod plot;
mod report;
mod search;
mod stats;
mod titles;
