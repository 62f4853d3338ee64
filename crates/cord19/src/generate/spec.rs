use std::sync::Arc;

use chrono::NaiveDate;

use super::field::*;
use super::template::Lexicon;
use crate::error::{Cord19Error, Cord19Result};

const JOURNALS: [&str; 21] = [
    "Nature",
    "Science",
    "The Lancet",
    "New England Journal of Medicine",
    "Cell",
    "PLOS ONE",
    "Nature Medicine",
    "Journal of Virology",
    "Virology",
    "Nature Communications",
    "BMJ",
    "JAMA",
    "Proceedings of the National Academy of Sciences",
    "Nature Microbiology",
    "Clinical Infectious Diseases",
    "Emerging Infectious Diseases",
    "The Lancet Infectious Diseases",
    "Journal of Medical Virology",
    "Antiviral Research",
    "Vaccine",
    "International Journal of Infectious Diseases",
];

const TERMS: [&str; 20] = [
    "COVID-19",
    "SARS-CoV-2",
    "coronavirus",
    "pandemic",
    "vaccine",
    "antiviral",
    "treatment",
    "symptoms",
    "transmission",
    "respiratory",
    "infection",
    "immunity",
    "antibody",
    "outbreak",
    "diagnosis",
    "therapeutic",
    "prevention",
    "epidemiology",
    "public health",
    "clinical",
];

const STUDY_TYPES: [&str; 10] = [
    "systematic review",
    "clinical trial",
    "observational study",
    "meta-analysis",
    "case series",
    "cohort study",
    "cross-sectional study",
    "randomized controlled trial",
    "case-control study",
    "retrospective analysis",
];

const POPULATIONS: [&str; 12] = [
    "patients",
    "population",
    "healthcare workers",
    "elderly",
    "children",
    "adults",
    "pregnant women",
    "immunocompromised patients",
    "hospitalized patients",
    "outpatients",
    "intensive care patients",
    "community",
];

const SOURCES: [&str; 5] = ["PMC", "Elsevier", "arXiv", "bioRxiv", "medRxiv"];

const AUTHORS: [&str; 20] = [
    "Smith J",
    "Johnson A",
    "Williams B",
    "Brown C",
    "Jones D",
    "Garcia E",
    "Miller F",
    "Davis G",
    "Rodriguez H",
    "Martinez I",
    "Hernandez J",
    "Lopez K",
    "Zhang L",
    "Wang M",
    "Liu N",
    "Chen O",
    "Yang P",
    "Wu Q",
    "Kumar R",
    "Patel S",
];

const TITLES: [&str; 5] = [
    "{term} {focus} in {population}: {study}",
    "Impact of {term} on {population}: {study}",
    "{study|title} of {term} {aspect} in {population}",
    "{term} {condition}: {study} among {population}",
    "Effectiveness of {measures} against {term} in {population}",
];

const ABSTRACTS: [&str; 2] = [
    "Background: This study investigates {term|lower} in the context of \
     pandemic response. Methods: We analyzed data from {int:50:5000} \
     participants over {int:1:24} months. Results: Our findings show \
     significant associations with {association}. Conclusions: These \
     results have important implications for {implication}.",
    "Objective: To evaluate the {quality} of {measures} in {population}. \
     Design: {study|title} conducted between {int:2020:2023} and \
     {int:2021:2024}. Setting: {setting} setting. Participants: \
     {int:100:10000} individuals. Main outcome measures: {outcome}.",
];

const NO_ABSTRACT: &str = "Abstract not available";

fn date(year: i32, month: u32, day: u32) -> Cord19Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Cord19Error::other(format!("invalid date {year}-{month}-{day}"))
    })
}

fn lexicon() -> Lexicon {
    Lexicon::new()
        .with("term", &TERMS)
        .with("study", &STUDY_TYPES)
        .with("population", &POPULATIONS)
        .with("focus", &["treatment", "vaccine", "diagnosis", "prevention"])
        .with("aspect", &["symptoms", "transmission", "outcomes"])
        .with("condition", &["infection", "disease", "syndrome"])
        .with("measures", &["vaccines", "treatments", "interventions"])
        .with(
            "association",
            &["mortality", "morbidity", "transmission", "immunity"],
        )
        .with(
            "implication",
            &["public health", "clinical practice", "policy making"],
        )
        .with("quality", &["efficacy", "safety", "effectiveness"])
        .with(
            "setting",
            &["Hospital", "Community", "Multi-center", "Primary care"],
        )
        .with(
            "outcome",
            &[
                "Hospitalization",
                "Mortality",
                "Infection rates",
                "Symptom severity",
            ],
        )
}

/// The field-spec table of a synthetic dataset: an ordered list of
/// column names and their generators.
///
/// Each column is generated independently with its own random number
/// generator, which is derived from the seed and the position of the
/// column. Columns that aren't part of the table are left empty.
#[derive(Debug, Default)]
pub struct SampleSpec {
    columns: Vec<(String, BoxedGenerator)>,
}

impl SampleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column to the table.
    pub fn column<S, G>(mut self, name: S, generator: G) -> Self
    where
        S: Into<String>,
        G: FieldGenerator + 'static,
    {
        self.columns.push((name.into(), Box::new(generator)));
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &dyn FieldGenerator)> {
        self.columns
            .iter()
            .map(|(name, generator)| (name.as_str(), &**generator))
    }

    /// The table used by `cord19 generate`.
    pub fn sample() -> Cord19Result<Self> {
        let lexicon = Arc::new(lexicon());

        Ok(Self::new()
            .column("cord_uid", Text::formatted("cord-{index:06}")?)
            .column("sha", Text::formatted("sha{int:100000:999999}")?)
            .column("source_x", Choice::new(&SOURCES))
            .column("title", Text::new(&TITLES, lexicon.clone())?)
            .column(
                "doi",
                Nullable::new(
                    0.1,
                    Text::formatted("10.{int:1000:9999}/{int:100000:999999}")?,
                )?,
            )
            .column(
                "pmcid",
                Nullable::new(0.3, Text::formatted("PMC{int:1000000:9999999}")?)?,
            )
            .column(
                "pubmed_id",
                Nullable::new(0.2, IntRange::new(10_000_000, 99_999_999)?)?,
            )
            .column(
                "license",
                Weighted::new(&[
                    (Some("cc-by"), 0.25),
                    (Some("cc-by-nc"), 0.20),
                    (Some("cc-by-sa"), 0.15),
                    (Some("els-covid"), 0.15),
                    (Some("arxiv"), 0.15),
                    (Some("no-cc"), 0.10),
                ])?,
            )
            .column(
                "abstract",
                Either::new(
                    0.1,
                    Constant::new(NO_ABSTRACT),
                    Text::new(&ABSTRACTS, lexicon)?,
                )?,
            )
            .column(
                "publish_time",
                DateSpan::new(date(2019, 12, 1)?, date(2024, 1, 31)?)?,
            )
            .column(
                "authors",
                Names::new(
                    &AUTHORS,
                    &[(1, 0.1), (2, 0.2), (3, 0.3), (4, 0.2), (5, 0.1), (6, 0.1)],
                    "; ",
                )?,
            )
            .column("journal", Choice::new(&JOURNALS))
            .column(
                "mag_id",
                Nullable::new(0.4, IntRange::new(1_000_000_000, 9_999_999_999)?)?,
            )
            .column(
                "who_covidence_id",
                Nullable::new(0.8, Text::formatted("WHO-{int:10000:99999}")?)?,
            )
            .column(
                "arxiv_id",
                Nullable::new(
                    0.9,
                    Text::formatted("{int:2000:2024}.{int:10000:99999}")?,
                )?,
            )
            .column("has_pdf_parse", Bool::new(0.6)?)
            .column("has_pmc_xml_parse", Bool::new(0.4)?)
            .column(
                "full_text_file",
                Weighted::new(&[
                    (Some("pdf_json"), 0.3),
                    (Some("pmc_json"), 0.3),
                    (None, 0.4),
                ])?,
            )
            .column(
                "url",
                Nullable::new(
                    0.3,
                    Text::formatted("https://example.com/paper/{index}")?,
                )?,
            ))
    }

    /// The smaller table used by the acquirer's demo mode. It fills the
    /// full-text file columns and the S2 identifier, but has a single
    /// title and abstract pattern.
    pub fn demo() -> Cord19Result<Self> {
        let lexicon = Arc::new(lexicon().with("population", &POPULATIONS[..7]));

        Ok(Self::new()
            .column("cord_uid", Text::formatted("cord-{index:06}")?)
            .column("sha", Text::formatted("sha-{int:100000:999999}")?)
            .column("source_x", Choice::new(&SOURCES))
            .column(
                "title",
                Text::new(
                    &["{term} {study} in {population}: a comprehensive analysis"],
                    lexicon.clone(),
                )?,
            )
            .column("doi", Text::formatted("10.1000/{int:100000:999999}")?)
            .column(
                "pmcid",
                Nullable::new(0.3, Text::formatted("PMC{int:1000000:9999999}")?)?,
            )
            .column(
                "pubmed_id",
                Nullable::new(0.2, IntRange::new(10_000_000, 99_999_999)?)?,
            )
            .column(
                "license",
                Choice::new(&["cc-by", "cc-by-nc", "cc-by-sa", "els-covid", "arxiv"]),
            )
            .column(
                "abstract",
                Text::new(
                    &["This study investigates {term|lower} in the context of \
                       pandemic response. Methods included analysis of \
                       {int:50:5000} participants over {int:1:24} months. \
                       Results show significant findings related to \
                       {term|lower} management and treatment outcomes."],
                    lexicon,
                )?,
            )
            .column(
                "publish_time",
                DateSpan::new(date(2019, 12, 1)?, date(2023, 12, 31)?)?,
            )
            .column(
                "authors",
                Names::new(&AUTHORS, &[(3, 1.0)], "; ")?,
            )
            .column("journal", Choice::new(&JOURNALS[..16]))
            .column(
                "mag_id",
                Nullable::new(0.4, IntRange::new(1_000_000_000, 9_999_999_999)?)?,
            )
            .column(
                "who_covidence_id",
                Nullable::new(0.7, Text::formatted("WHO-{int:100000:999999}")?)?,
            )
            .column(
                "arxiv_id",
                Nullable::new(
                    0.8,
                    Text::formatted("arxiv:{int:1000:9999}.{int:1000:9999}")?,
                )?,
            )
            .column(
                "pdf_json_files",
                Nullable::new(0.6, Text::formatted("pdf_json/{int:1000:9999}.json")?)?,
            )
            .column(
                "pmc_json_files",
                Nullable::new(
                    0.5,
                    Text::formatted("pmc_json/PMC{int:1000000:9999999}.json")?,
                )?,
            )
            .column("url", Text::formatted("https://example.com/paper/{index}")?)
            .column("s2_id", Text::formatted("s2-{int:100000000:999999999}")?))
    }
}
