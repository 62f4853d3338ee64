use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::paper::Paper;

/// A conjunction of record predicates.
///
/// * `years`: keep records whose publication year lies in the range.
/// * `sources`: keep records whose source is in the set; an empty set
///   matches nothing.
/// * `journals`: keep records whose journal is in the set; an empty
///   set disables the predicate.
/// * `keyword`: keep records whose title contains the keyword (case
///   insensitive).
///
/// Records with a missing value never match an active predicate on that
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    years: Option<RangeInclusive<i32>>,
    sources: Option<BTreeSet<String>>,
    journals: BTreeSet<String>,
    keyword: Option<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the publication year to `from..=to`.
    pub fn years(mut self, from: i32, to: i32) -> Self {
        self.years = Some(from..=to);
        self
    }

    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    pub fn journals<I, S>(mut self, journals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.journals = journals.into_iter().map(Into::into).collect();
        self
    }

    pub fn keyword<S: Into<String>>(mut self, keyword: S) -> Self {
        let keyword = keyword.into().trim().to_lowercase();
        self.keyword = if keyword.is_empty() {
            None
        } else {
            Some(keyword)
        };
        self
    }

    /// Returns `true` if the record satisfies all predicates.
    pub fn matches(&self, paper: &Paper) -> bool {
        if let Some(ref years) = self.years {
            match paper.publication_year {
                Some(year) if years.contains(&year) => {}
                _ => return false,
            }
        }

        if let Some(ref sources) = self.sources {
            match paper.source {
                Some(ref source) if sources.contains(source) => {}
                _ => return false,
            }
        }

        if !self.journals.is_empty() {
            match paper.journal {
                Some(ref journal) if self.journals.contains(journal) => {}
                _ => return false,
            }
        }

        if let Some(ref keyword) = self.keyword {
            match paper.title {
                Some(ref title)
                    if title.to_lowercase().contains(keyword.as_str()) => {}
                _ => return false,
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Dataset;

    fn paper(uid: &str, year: Option<i32>, source: &str, journal: &str) -> Paper {
        Paper {
            title: Some(format!("Paper {uid} on SARS-CoV-2")),
            source: Some(source.into()),
            journal: Some(journal.into()),
            publish_time: year.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 1)),
            ..Paper::new(uid)
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            paper("a", Some(2019), "PMC", "Nature"),
            paper("b", Some(2020), "arXiv", "Science"),
            paper("c", Some(2021), "PMC", "Cell"),
            paper("d", Some(2022), "medRxiv", "Nature"),
            paper("e", None, "PMC", "Nature"),
        ])
    }

    #[test]
    fn year_range() {
        let view = dataset().filter(&Filter::new().years(2020, 2021));
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|p| {
            (2020..=2021).contains(&p.publication_year.unwrap())
        }));
    }

    #[test]
    fn year_range_idempotent() {
        let filter = Filter::new().years(2020, 2022);
        let once = dataset().filter(&filter);
        let twice = once.filter(&filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn sources() {
        let ds = dataset();
        assert_eq!(ds.filter(&Filter::new().sources(["PMC"])).len(), 3);
        assert!(ds
            .filter(&Filter::new().sources(Vec::<String>::new()))
            .is_empty());
    }

    #[test]
    fn journals() {
        let ds = dataset();
        assert_eq!(ds.filter(&Filter::new().journals(["Nature"])).len(), 3);
        assert_eq!(
            ds.filter(&Filter::new().journals(Vec::<String>::new())).len(),
            5
        );
    }

    #[test]
    fn keyword() {
        let ds = dataset();
        assert_eq!(ds.filter(&Filter::new().keyword("sars-cov")).len(), 5);
        assert_eq!(ds.filter(&Filter::new().keyword("  ")).len(), 5);
        assert!(ds.filter(&Filter::new().keyword("ebola")).is_empty());
    }

    #[test]
    fn combined() {
        let filter = Filter::new()
            .years(2019, 2022)
            .sources(["PMC", "medRxiv"])
            .journals(["Nature"]);

        let view = dataset().filter(&filter);
        let ids: Vec<_> = view.iter().map(|p| p.cord_uid.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }
}
