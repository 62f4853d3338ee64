use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Cord19Error;

/// A single record of the CORD-19 metadata table.
///
/// The field names (and their serde renames) follow the column names
/// of the original `metadata.csv`. The fields after `s2_id` are derived
/// from the other fields and recomputed by [Paper::derive], which is
/// called whenever a record is loaded or generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub cord_uid: String,
    pub sha: Option<String>,
    #[serde(rename = "source_x")]
    pub source: Option<String>,
    pub title: Option<String>,
    pub doi: Option<String>,
    pub pmcid: Option<String>,
    pub pubmed_id: Option<String>,
    pub license: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default, with = "date_format")]
    pub publish_time: Option<NaiveDate>,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub mag_id: Option<String>,
    pub who_covidence_id: Option<String>,
    pub arxiv_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_pdf_parse: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_pmc_xml_parse: Option<bool>,
    pub full_text_file: Option<String>,
    pub url: Option<String>,
    pub pdf_json_files: Option<String>,
    pub pmc_json_files: Option<String>,
    pub s2_id: Option<String>,

    #[serde(default, deserialize_with = "ignore")]
    pub publication_year: Option<i32>,
    #[serde(default, deserialize_with = "ignore")]
    pub publication_month: Option<u32>,
    #[serde(default, deserialize_with = "ignore")]
    pub publication_month_name: Option<String>,
    #[serde(default, deserialize_with = "ignore")]
    pub title_length: Option<usize>,
    #[serde(default, deserialize_with = "ignore")]
    pub abstract_word_count: Option<usize>,
    #[serde(default, deserialize_with = "ignore")]
    pub has_full_text: bool,
}

impl Paper {
    /// Creates a new record with the given identifier; all other
    /// fields are empty.
    pub fn new<S: Into<String>>(cord_uid: S) -> Self {
        Self {
            cord_uid: cord_uid.into(),
            ..Default::default()
        }
    }

    /// Recomputes the derived fields (publication year and month, title
    /// length, abstract word count and the full-text flag).
    pub fn derive(mut self) -> Self {
        self.publication_year = self.publish_time.map(|d| d.year());
        self.publication_month = self.publish_time.map(|d| d.month());
        self.publication_month_name =
            self.publish_time.map(|d| d.format("%B").to_string());
        self.title_length =
            self.title.as_ref().map(|title| title.chars().count());
        self.abstract_word_count = self
            .abstract_text
            .as_ref()
            .map(|text| text.split_whitespace().count());
        self.has_full_text = self.has_pdf_parse.unwrap_or(false)
            || self.has_pmc_xml_parse.unwrap_or(false)
            || self.full_text_file.is_some()
            || self.pdf_json_files.is_some()
            || self.pmc_json_files.is_some();
        self
    }

    /// Sets a source column by its CSV name. Derived columns can't be
    /// set; call [Paper::derive] after all columns have been set.
    pub fn set(
        &mut self,
        column: &str,
        value: Option<String>,
    ) -> Result<(), Cord19Error> {
        let flag = |value: Option<String>| match value {
            Some(value) => parse_bool(&value).map_err(Cord19Error::Parse),
            None => Ok(None),
        };

        match column {
            "cord_uid" => self.cord_uid = value.unwrap_or_default(),
            "sha" => self.sha = value,
            "source_x" => self.source = value,
            "title" => self.title = value,
            "doi" => self.doi = value,
            "pmcid" => self.pmcid = value,
            "pubmed_id" => self.pubmed_id = value,
            "license" => self.license = value,
            "abstract" => self.abstract_text = value,
            "publish_time" => {
                self.publish_time = value.as_deref().and_then(parse_date)
            }
            "authors" => self.authors = value,
            "journal" => self.journal = value,
            "mag_id" => self.mag_id = value,
            "who_covidence_id" => self.who_covidence_id = value,
            "arxiv_id" => self.arxiv_id = value,
            "has_pdf_parse" => self.has_pdf_parse = flag(value)?,
            "has_pmc_xml_parse" => self.has_pmc_xml_parse = flag(value)?,
            "full_text_file" => self.full_text_file = value,
            "url" => self.url = value,
            "pdf_json_files" => self.pdf_json_files = value,
            "pmc_json_files" => self.pmc_json_files = value,
            "s2_id" => self.s2_id = value,
            other => {
                return Err(Cord19Error::other(format!(
                    "unknown column `{other}`"
                )))
            }
        }

        Ok(())
    }

    /// Returns the year and month of the publication date.
    #[inline]
    pub fn year_month(&self) -> Option<(i32, u32)> {
        self.publish_time.map(|d| (d.year(), d.month()))
    }
}

/// Parses a publication date.
///
/// Only the first ten characters are considered (`YYYY-MM-DD`), so
/// timestamps with a time part are accepted as well. A bare year is
/// mapped to January 1st of that year.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Some(prefix) = value.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }

    if value.len() == 4 {
        if let Ok(year) = value.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    log::debug!("unable to parse publication date '{value}'");
    None
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::parse_date;

    pub(super) fn serialize<S>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer
                .serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value.as_deref().and_then(parse_date))
    }
}

/// Parses a boolean flag. An empty value is `Ok(None)`.
pub fn parse_bool(value: &str) -> Result<Option<bool>, String> {
    match value.trim() {
        "" => Ok(None),
        "true" | "True" | "TRUE" | "1" => Ok(Some(true)),
        "false" | "False" | "FALSE" | "0" => Ok(Some(false)),
        other => Err(format!("invalid boolean '{other}'")),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(value) => parse_bool(&value).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Derived columns are recomputed after loading, whatever the file
/// contains.
fn ignore<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default,
{
    let _ = serde::de::IgnoredAny::deserialize(deserializer)?;
    Ok(T::default())
}

/// The columns that can be displayed (and exported) by the data
/// browser of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Journal,
    PublicationYear,
    Source,
    PublishTime,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Title,
        Column::Journal,
        Column::PublicationYear,
        Column::Source,
        Column::PublishTime,
    ];

    /// The columns shown if nothing else is selected.
    pub const DEFAULT: [Column; 3] =
        [Column::Title, Column::Journal, Column::PublicationYear];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Journal => "journal",
            Self::PublicationYear => "publication_year",
            Self::Source => "source_x",
            Self::PublishTime => "publish_time",
        }
    }

    /// Returns the value of the column, or `None` if the field is null.
    pub fn value(&self, paper: &Paper) -> Option<String> {
        match self {
            Self::Title => paper.title.clone(),
            Self::Journal => paper.journal.clone(),
            Self::PublicationYear => {
                paper.publication_year.map(|y| y.to_string())
            }
            Self::Source => paper.source.clone(),
            Self::PublishTime => paper
                .publish_time
                .map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = Cord19Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|column| column.name() == s.trim())
            .ok_or_else(|| {
                Cord19Error::other(format!("unknown column '{s}'"))
            })
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn derive_fields() {
        let paper = Paper {
            title: Some("COVID-19 vaccine trial".into()),
            abstract_text: Some("This  study\tinvestigates\nvaccines".into()),
            publish_time: NaiveDate::from_ymd_opt(2021, 3, 14),
            has_pmc_xml_parse: Some(true),
            ..Paper::new("cord-000001")
        }
        .derive();

        assert_eq!(paper.publication_year, Some(2021));
        assert_eq!(paper.publication_month, Some(3));
        assert_eq!(paper.publication_month_name.as_deref(), Some("March"));
        assert_eq!(paper.title_length, Some(22));
        assert_eq!(paper.abstract_word_count, Some(4));
        assert!(paper.has_full_text);
    }

    #[test]
    fn derive_without_sources() {
        let paper = Paper::new("cord-000002").derive();
        assert_eq!(paper.publication_year, None);
        assert_eq!(paper.title_length, None);
        assert_eq!(paper.abstract_word_count, None);
        assert!(!paper.has_full_text);
    }

    #[test]
    fn full_text_markers() {
        let markers: [fn(&mut Paper); 5] = [
            |p| p.has_pdf_parse = Some(true),
            |p| p.has_pmc_xml_parse = Some(true),
            |p| p.full_text_file = Some("pmc_json".into()),
            |p| p.pdf_json_files = Some("document_parses/pdf_json/a.json".into()),
            |p| p.pmc_json_files = Some("document_parses/pmc_json/a.json".into()),
        ];

        for set in markers {
            let mut paper = Paper::new("cord-000004");
            set(&mut paper);
            assert!(paper.derive().has_full_text);
        }

        let paper = Paper {
            has_pdf_parse: Some(false),
            has_pmc_xml_parse: Some(false),
            ..Paper::new("cord-000005")
        };
        assert!(!paper.derive().has_full_text);
    }

    #[test]
    fn parse_dates() {
        assert_eq!(parse_date("2020-03-15"), NaiveDate::from_ymd_opt(2020, 3, 15));
        assert_eq!(
            parse_date("2019-12-01 17:05:03.451"),
            NaiveDate::from_ymd_opt(2019, 12, 1)
        );
        assert_eq!(parse_date("2021"), NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(parse_date("March 2020"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn set_columns() -> TestResult {
        let mut paper = Paper::default();
        paper.set("cord_uid", Some("cord-000007".into()))?;
        paper.set("source_x", Some("PMC".into()))?;
        paper.set("publish_time", Some("2020-04-01".into()))?;
        paper.set("has_pdf_parse", Some("True".into()))?;
        paper.set("doi", None)?;

        let paper = paper.derive();
        assert_eq!(paper.cord_uid, "cord-000007");
        assert_eq!(paper.source.as_deref(), Some("PMC"));
        assert_eq!(paper.publication_year, Some(2020));
        assert!(paper.has_full_text);

        let mut paper = Paper::default();
        assert!(paper.set("has_pdf_parse", Some("maybe".into())).is_err());
        assert!(paper.set("publication_year", Some("2020".into())).is_err());
        Ok(())
    }

    #[test]
    fn column_from_str() -> TestResult {
        assert_eq!(Column::from_str("source_x")?, Column::Source);
        assert_eq!(Column::from_str(" title ")?, Column::Title);
        assert!(Column::from_str("sha").is_err());
        Ok(())
    }

    #[test]
    fn column_values() {
        let paper = Paper {
            journal: Some("BMJ".into()),
            publish_time: NaiveDate::from_ymd_opt(2022, 1, 2),
            ..Paper::new("cord-000003")
        }
        .derive();

        assert_eq!(Column::Journal.value(&paper).as_deref(), Some("BMJ"));
        assert_eq!(
            Column::PublicationYear.value(&paper).as_deref(),
            Some("2022")
        );
        assert_eq!(
            Column::PublishTime.value(&paper).as_deref(),
            Some("2022-01-02")
        );
        assert_eq!(Column::Title.value(&paper), None);
    }
}
