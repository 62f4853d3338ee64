use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::error::{Cord19Error, Cord19Result};
use crate::filter::Filter;
use crate::paper::{Column, Paper};

/// An in-memory table of [Paper] records.
///
/// A dataset is never modified after it has been created; all
/// selections return a new dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    papers: Vec<Paper>,
}

impl Dataset {
    /// Creates a new dataset from a list of records. The derived fields
    /// of every record are recomputed.
    pub fn new(papers: Vec<Paper>) -> Self {
        Self {
            papers: papers.into_iter().map(Paper::derive).collect(),
        }
    }

    /// Loads a dataset from a CSV file.
    ///
    /// This function fails with [Cord19Error::MissingDataFile] if the
    /// file doesn't exist and with [Cord19Error::Parse] if the file is
    /// malformed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Cord19Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Cord19Error::MissingDataFile(path.into()));
        }

        Self::from_reader(File::open(path)?).map_err(|e| match e {
            Cord19Error::Parse(msg) => {
                Cord19Error::Parse(format!("{}: {msg}", path.display()))
            }
            e => e,
        })
    }

    /// Loads a dataset from a reader in CSV format.
    pub fn from_reader<R: Read>(reader: R) -> Cord19Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let papers = reader
            .deserialize::<Paper>()
            .map(|result| {
                result
                    .map(Paper::derive)
                    .map_err(|e| Cord19Error::Parse(e.to_string()))
            })
            .collect::<Cord19Result<Vec<_>>>()?;

        log::debug!("loaded {} records", papers.len());
        Ok(Self { papers })
    }

    /// Writes the dataset in CSV format into `path`.
    pub fn to_path<P: AsRef<Path>>(&self, path: P) -> Cord19Result<()> {
        self.to_writer(File::create(path)?)
    }

    /// Writes the dataset in CSV format.
    pub fn to_writer<W: Write>(&self, writer: W) -> Cord19Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);

        if self.papers.is_empty() {
            // serde only emits the header with the first record
            writer.write_record(HEADER)?;
        }

        for paper in self.papers.iter() {
            writer.serialize(paper)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes the selected columns of the dataset in CSV format.
    pub fn write_columns<W: Write>(
        &self,
        columns: &[Column],
        writer: W,
    ) -> Cord19Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(columns.iter().map(Column::name))?;

        for paper in self.papers.iter() {
            writer.write_record(
                columns
                    .iter()
                    .map(|column| column.value(paper).unwrap_or_default()),
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Paper> {
        self.papers.iter()
    }

    #[inline]
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    /// Returns a new dataset containing all records that satisfy the
    /// predicate.
    pub fn select<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Paper) -> bool,
    {
        Self {
            papers: self
                .papers
                .iter()
                .filter(|paper| predicate(paper))
                .cloned()
                .collect(),
        }
    }

    /// Returns a new dataset containing all records matching the filter.
    #[inline]
    pub fn filter(&self, filter: &Filter) -> Self {
        self.select(|paper| filter.matches(paper))
    }

    /// Returns all records whose title contains the keyword (case
    /// insensitive). An empty keyword matches every record with a title.
    pub fn search_titles(&self, keyword: &str) -> Self {
        let keyword = keyword.to_lowercase();
        self.select(|paper| {
            paper
                .title
                .as_ref()
                .is_some_and(|title| title.to_lowercase().contains(&keyword))
        })
    }

    /// Returns all records published in the given journal.
    pub fn with_journal(&self, journal: &str) -> Self {
        self.select(|paper| paper.journal.as_deref() == Some(journal))
    }

    /// Returns the records of the last `years` publication years,
    /// counted back from the most recent year in the dataset.
    pub fn recent(&self, years: u32) -> Self {
        let Some((_, max)) = self.year_bounds() else {
            return Self::default();
        };

        let min = max - years.saturating_sub(1) as i32;
        self.select(|paper| {
            paper.publication_year.is_some_and(|year| year >= min)
        })
    }

    /// Returns the smallest and the largest publication year.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years =
            self.papers.iter().filter_map(|paper| paper.publication_year);
        let first = years.next()?;

        Some(years.fold((first, first), |(min, max), year| {
            (min.min(year), max.max(year))
        }))
    }

    /// Returns the earliest and the latest publication date.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates =
            self.papers.iter().filter_map(|paper| paper.publish_time);
        let first = dates.next()?;

        Some(dates.fold((first, first), |(min, max), date| {
            (min.min(date), max.max(date))
        }))
    }

    /// Draws a random subset of `n` records. The relative order of the
    /// records is kept. If the dataset has at most `n` records, a copy
    /// of the dataset is returned.
    pub fn sample(&self, n: usize, seed: u64) -> Self {
        if self.papers.len() <= n {
            return self.clone();
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices = index::sample(&mut rng, self.papers.len(), n)
            .into_vec();
        indices.sort_unstable();

        Self {
            papers: indices
                .into_iter()
                .map(|idx| self.papers[idx].clone())
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Paper;
    type IntoIter = std::slice::Iter<'a, Paper>;

    fn into_iter(self) -> Self::IntoIter {
        self.papers.iter()
    }
}

impl FromIterator<Paper> for Dataset {
    fn from_iter<I: IntoIterator<Item = Paper>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The CSV header of a dataset file.
pub const HEADER: [&str; 28] = [
    "cord_uid",
    "sha",
    "source_x",
    "title",
    "doi",
    "pmcid",
    "pubmed_id",
    "license",
    "abstract",
    "publish_time",
    "authors",
    "journal",
    "mag_id",
    "who_covidence_id",
    "arxiv_id",
    "has_pdf_parse",
    "has_pmc_xml_parse",
    "full_text_file",
    "url",
    "pdf_json_files",
    "pmc_json_files",
    "s2_id",
    "publication_year",
    "publication_month",
    "publication_month_name",
    "title_length",
    "abstract_word_count",
    "has_full_text",
];

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    fn paper(
        uid: &str,
        title: &str,
        journal: &str,
        date: (i32, u32, u32),
    ) -> Paper {
        Paper {
            title: Some(title.into()),
            journal: Some(journal.into()),
            source: Some("PMC".into()),
            publish_time: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            ..Paper::new(uid)
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            paper("a", "COVID-19 vaccine trial", "BMJ", (2020, 1, 5)),
            paper("b", "Antiviral treatment", "Cell", (2021, 6, 1)),
            paper("c", "Vaccine hesitancy", "BMJ", (2022, 2, 2)),
            paper("d", "Transmission, in children", "JAMA", (2023, 9, 9)),
        ])
    }

    #[test]
    fn missing_data_file() {
        let result = Dataset::from_path("/nonexistent/cord19_sample.csv");
        assert!(matches!(result, Err(Cord19Error::MissingDataFile(_))));
    }

    #[test]
    fn malformed_file() {
        let data = "cord_uid,has_pdf_parse\ncord-000000,maybe\n";
        let result = Dataset::from_reader(data.as_bytes());
        assert!(matches!(result, Err(Cord19Error::Parse(_))));
    }

    #[test]
    fn read_foreign_columns() -> TestResult {
        let data = "cord_uid,title,publish_time,journal,unknown\n\
            ug7v899j,Clinical features,2001-07-04,BMC Infect Dis,x\n\
            02tnwd4m,Nitric oxide,2000,,y\n";

        let ds = Dataset::from_reader(data.as_bytes())?;
        assert_eq!(ds.len(), 2);

        let first = &ds.papers()[0];
        assert_eq!(first.publication_year, Some(2001));
        assert_eq!(first.journal.as_deref(), Some("BMC Infect Dis"));
        assert_eq!(first.title_length, Some(17));

        let second = &ds.papers()[1];
        assert_eq!(second.publication_year, Some(2000));
        assert_eq!(second.journal, None);
        Ok(())
    }

    #[test]
    fn export_and_reload() -> TestResult {
        let view = dataset().filter(&Filter::new().years(2021, 2023));

        let mut buf = Vec::new();
        view.to_writer(&mut buf)?;
        let reloaded = Dataset::from_reader(buf.as_slice())?;

        assert_eq!(reloaded, view);
        Ok(())
    }

    #[test]
    fn export_and_reload_empty() -> TestResult {
        let mut buf = Vec::new();
        Dataset::default().to_writer(&mut buf)?;

        let reloaded = Dataset::from_reader(buf.as_slice())?;
        assert!(reloaded.is_empty());
        Ok(())
    }

    #[test]
    fn write_columns() -> TestResult {
        let mut buf = Vec::new();
        dataset()
            .with_journal("JAMA")
            .write_columns(&[Column::Title, Column::PublicationYear], &mut buf)?;

        assert_eq!(
            String::from_utf8(buf)?,
            "title,publication_year\n\"Transmission, in children\",2023\n"
        );
        Ok(())
    }

    #[test]
    fn search_titles() {
        let ds = dataset();
        assert_eq!(ds.search_titles("VACCINE").len(), 2);
        assert!(ds.search_titles("ebola").is_empty());
        assert!(Dataset::default().search_titles("covid").is_empty());
    }

    #[test]
    fn recent_years() {
        let ds = dataset();
        let recent = ds.recent(2);
        assert_eq!(recent.len(), 2);
        assert!(recent
            .iter()
            .all(|p| p.publication_year.unwrap() >= 2022));
        assert!(Dataset::default().recent(2).is_empty());
    }

    #[test]
    fn bounds() {
        let ds = dataset();
        assert_eq!(ds.year_bounds(), Some((2020, 2023)));
        assert_eq!(
            ds.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2020, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2023, 9, 9).unwrap()
            ))
        );
        assert_eq!(Dataset::default().year_bounds(), None);
        assert_eq!(Dataset::default().date_range(), None);
    }

    #[test]
    fn sample() {
        let ds = dataset();
        let sample = ds.sample(2, 42);
        assert_eq!(sample.len(), 2);
        assert_eq!(sample, ds.sample(2, 42));
        assert_eq!(ds.sample(10, 42), ds);
    }
}
