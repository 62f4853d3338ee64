use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::Cord19Result;
use crate::frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopJournal {
    pub name: String,
    pub papers: u64,
}

/// Descriptive statistics of a dataset.
///
/// A summary is a read-only snapshot, which is always reproducible from
/// the dataset it was computed from. The count tables are ordered by
/// decreasing count, except the yearly distribution, which is ordered
/// by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_papers: usize,
    pub date_range: Option<DateRange>,
    pub unique_journals: usize,
    pub top_journal: Option<TopJournal>,
    pub peak_year: Option<i32>,
    #[serde(with = "counts", default)]
    pub sources: Vec<(String, u64)>,
    #[serde(with = "counts", default)]
    pub yearly_distribution: Vec<(i32, u64)>,
    #[serde(skip)]
    pub journals: Vec<(String, u64)>,
}

impl Summary {
    /// Computes the summary statistics of a dataset.
    pub fn from_dataset(dataset: &Dataset) -> Cord19Result<Self> {
        if dataset.is_empty() {
            return Ok(Self::default());
        }

        let df = dataset.to_frame()?;
        let journals = frame::value_counts(&df, frame::JOURNAL)?;
        let sources = frame::value_counts(&df, frame::SOURCE)?;
        let yearly_distribution = frame::year_counts(&df)?;

        Ok(Self {
            total_papers: dataset.len(),
            date_range: dataset
                .date_range()
                .map(|(start, end)| DateRange { start, end }),
            unique_journals: journals.len(),
            top_journal: journals.first().map(|(name, papers)| TopJournal {
                name: name.clone(),
                papers: *papers,
            }),
            peak_year: peak(&yearly_distribution),
            sources,
            yearly_distribution,
            journals,
        })
    }

    /// Returns the share of `count` in the total number of papers (in
    /// percent).
    pub fn percentage(&self, count: u64) -> f64 {
        if self.total_papers == 0 {
            0.0
        } else {
            count as f64 / self.total_papers as f64 * 100.0
        }
    }
}

/// Returns the key with the highest count. Ties are resolved in favour
/// of the first key.
pub fn peak<K: Copy>(counts: &[(K, u64)]) -> Option<K> {
    counts
        .iter()
        .fold(None, |best: Option<(K, u64)>, &(key, count)| match best {
            Some((_, max)) if max >= count => best,
            _ => Some((key, count)),
        })
        .map(|(key, _)| key)
}

/// The statistics record written next to a generated dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStats {
    #[serde(flatten)]
    pub summary: Summary,
    pub generated_at: DateTime<Utc>,
    pub sample_data: bool,
}

impl AppStats {
    pub fn new(summary: Summary, sample_data: bool) -> Self {
        Self {
            summary,
            generated_at: Utc::now(),
            sample_data,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Cord19Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Cord19Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// (De-)serializes a count table as a JSON object, keeping the order
/// of the entries.
mod counts {
    use std::fmt::{self, Display};
    use std::marker::PhantomData;
    use std::str::FromStr;

    use serde::de::{self, MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    pub(super) fn serialize<S, K>(
        counts: &[(K, u64)],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        K: Display,
    {
        serializer.collect_map(
            counts.iter().map(|(key, count)| (key.to_string(), count)),
        )
    }

    pub(super) fn deserialize<'de, D, K>(
        deserializer: D,
    ) -> Result<Vec<(K, u64)>, D::Error>
    where
        D: Deserializer<'de>,
        K: FromStr,
    {
        deserializer.deserialize_map(CountsVisitor(PhantomData))
    }

    struct CountsVisitor<K>(PhantomData<K>);

    impl<'de, K: FromStr> Visitor<'de> for CountsVisitor<K> {
        type Value = Vec<(K, u64)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of counts")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut counts = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, count)) = map.next_entry::<String, u64>()? {
                let key = key.parse::<K>().map_err(|_| {
                    de::Error::custom(format!("invalid key '{key}'"))
                })?;
                counts.push((key, count));
            }

            Ok(counts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::Paper;

    type TestResult = anyhow::Result<()>;

    fn dataset() -> Dataset {
        let paper = |uid: &str, journal: &str, source: &str, ymd: (i32, u32, u32)| {
            Paper {
                journal: Some(journal.into()),
                source: Some(source.into()),
                publish_time: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2),
                ..Paper::new(uid)
            }
        };

        Dataset::new(vec![
            paper("a", "Nature", "PMC", (2020, 3, 1)),
            paper("b", "Nature", "arXiv", (2020, 5, 1)),
            paper("c", "Cell", "PMC", (2021, 1, 1)),
            paper("d", "BMJ", "PMC", (2021, 7, 1)),
            paper("e", "Nature", "medRxiv", (2022, 12, 24)),
        ])
    }

    #[test]
    fn empty_dataset() -> TestResult {
        let summary = Summary::from_dataset(&Dataset::default())?;
        assert_eq!(summary.total_papers, 0);
        assert_eq!(summary.unique_journals, 0);
        assert_eq!(summary.date_range, None);
        assert_eq!(summary.top_journal, None);
        assert_eq!(summary.peak_year, None);
        assert!(summary.sources.is_empty());
        assert_eq!(summary.percentage(10), 0.0);
        Ok(())
    }

    #[test]
    fn from_dataset() -> TestResult {
        let summary = Summary::from_dataset(&dataset())?;
        assert_eq!(summary.total_papers, 5);
        assert_eq!(summary.unique_journals, 3);
        assert_eq!(
            summary.top_journal,
            Some(TopJournal {
                name: "Nature".into(),
                papers: 3
            })
        );
        assert_eq!(summary.peak_year, Some(2020));
        assert_eq!(
            summary.date_range,
            Some(DateRange {
                start: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2022, 12, 24).unwrap(),
            })
        );
        assert_eq!(summary.sources[0], ("PMC".to_string(), 3));
        assert_eq!(
            summary.yearly_distribution,
            vec![(2020, 2), (2021, 2), (2022, 1)]
        );
        approx::assert_relative_eq!(summary.percentage(3), 60.0);
        Ok(())
    }

    #[test]
    fn peak_prefers_first() {
        assert_eq!(peak(&[(2020, 2), (2021, 5), (2022, 5)]), Some(2021));
        assert_eq!(peak::<i32>(&[]), None);
    }

    #[test]
    fn save_and_load_stats() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app_stats.json");

        let stats = AppStats::new(Summary::from_dataset(&dataset())?, true);
        stats.save(&path)?;

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(json["total_papers"], 5);
        assert_eq!(json["yearly_distribution"]["2021"], 2);
        assert_eq!(json["date_range"]["start"], "2020-03-01");
        assert_eq!(json["sample_data"], true);

        let loaded = AppStats::from_path(&path)?;
        assert_eq!(loaded.summary.yearly_distribution, stats.summary.yearly_distribution);
        assert_eq!(loaded.summary.sources, stats.summary.sources);
        assert_eq!(loaded.generated_at, stats.generated_at);
        Ok(())
    }
}
