use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::dataset::Dataset;
use crate::error::Cord19Result;
use crate::summary::Summary;

pub const RECENT_PAPERS: &str = "recent_papers.csv";
pub const TOP_JOURNAL_PAPERS: &str = "top_journal_papers.csv";
pub const DATASET_SUMMARY: &str = "dataset_summary.json";

/// The number of publication years considered recent.
const RECENT_YEARS: u32 = 2;

/// A file written by [export], along with the number of records it
/// contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    pub path: PathBuf,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub recent: Exported,
    /// The name of the most frequent journal and its records. `None`
    /// if no record has a journal.
    pub top_journal: Option<(String, Exported)>,
    pub summary: PathBuf,
}

fn write_csv(dataset: &Dataset, path: PathBuf) -> Cord19Result<Exported> {
    dataset.to_path(&path)?;
    Ok(Exported {
        path,
        records: dataset.len(),
    })
}

/// Writes the recent papers, the papers of the most frequent journal
/// and the summary statistics into `output_dir`.
pub fn export(dataset: &Dataset, output_dir: &Path) -> Cord19Result<ExportReport> {
    fs::create_dir_all(output_dir)?;

    let summary = Summary::from_dataset(dataset)?;
    let recent = write_csv(
        &dataset.recent(RECENT_YEARS),
        output_dir.join(RECENT_PAPERS),
    )?;

    let top_journal = match summary.top_journal {
        Some(ref top) => Some((
            top.name.clone(),
            write_csv(
                &dataset.with_journal(&top.name),
                output_dir.join(TOP_JOURNAL_PAPERS),
            )?,
        )),
        None => None,
    };

    let path = output_dir.join(DATASET_SUMMARY);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, &summary)?;
    writer.flush()?;

    Ok(ExportReport {
        recent,
        top_journal,
        summary: path,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::paper::Paper;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn export_files() -> TestResult {
        let paper = |uid: &str, journal: &str, year: i32| Paper {
            journal: Some(journal.into()),
            publish_time: NaiveDate::from_ymd_opt(year, 2, 1),
            ..Paper::new(uid)
        };

        let ds = Dataset::new(vec![
            paper("a", "Cell", 2020),
            paper("b", "BMJ", 2021),
            paper("c", "BMJ", 2022),
            paper("d", "BMJ", 2023),
        ]);

        let dir = tempfile::tempdir()?;
        let report = export(&ds, dir.path())?;

        assert_eq!(report.recent.records, 2);
        assert_eq!(Dataset::from_path(&report.recent.path)?.len(), 2);

        let (name, exported) = report.top_journal.expect("top journal");
        assert_eq!(name, "BMJ");
        assert_eq!(exported.records, 3);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report.summary)?)?;
        assert_eq!(json["total_papers"], 4);
        assert_eq!(json["top_journal"]["name"], "BMJ");
        assert_eq!(json["top_journal"]["papers"], 3);
        assert_eq!(json["date_range"]["end"], "2023-02-01");
        Ok(())
    }

    #[test]
    fn export_empty() -> TestResult {
        let dir = tempfile::tempdir()?;
        let report = export(&Dataset::default(), &dir.path().join("out"))?;

        assert_eq!(report.recent.records, 0);
        assert!(report.recent.path.is_file());
        assert!(report.top_journal.is_none());
        assert!(report.summary.is_file());
        Ok(())
    }
}
