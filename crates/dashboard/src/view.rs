//! The dashboard view: a pure function of the base dataset and the
//! filter state.

use std::collections::BTreeSet;

use cord19::chart::Chart;
use cord19::frame;
use cord19::summary::TopJournal;
use cord19::text::{mean, word_frequencies};
use cord19::{Column, Cord19Result, Dataset, Filter, Summary};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

const JOURNAL_OPTIONS: usize = 10;
const DEFAULT_JOURNALS: usize = 5;
const TOP_JOURNALS: usize = 15;
const TREND_JOURNALS: usize = 5;
const TOP_WORDS: usize = 15;
const CLOUD_WORDS: usize = 100;
const PREVIEW_ROWS: usize = 100;

/// The names of the charts served by `/api/charts/{name}`.
pub(crate) const CHARTS: [&str; 8] = [
    "sources",
    "yearly",
    "cumulative",
    "monthly",
    "journals",
    "journal-trends",
    "words",
    "wordcloud",
];

/// Query parameters of the view endpoints. Sources and journals are
/// separated by `|`, columns by `,`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewQuery {
    pub(crate) year_from: Option<i32>,
    pub(crate) year_to: Option<i32>,
    pub(crate) sources: Option<String>,
    pub(crate) journals: Option<String>,
    pub(crate) search: Option<String>,
    pub(crate) columns: Option<String>,
}

fn split(value: &str, sep: char) -> Vec<String> {
    value
        .split(sep)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// The options of the filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Controls {
    pub(crate) year_bounds: Option<(i32, i32)>,
    pub(crate) sources: Vec<String>,
    pub(crate) journals: Vec<String>,
    pub(crate) default_journals: Vec<String>,
    pub(crate) columns: Vec<Column>,
    pub(crate) default_columns: Vec<Column>,
    pub(crate) charts: Vec<&'static str>,
}

impl Controls {
    pub(crate) fn from_dataset(base: &Dataset) -> Cord19Result<Self> {
        let summary = Summary::from_dataset(base)?;
        let journals: Vec<String> = summary
            .journals
            .into_iter()
            .take(JOURNAL_OPTIONS)
            .map(|(name, _)| name)
            .collect();

        Ok(Self {
            year_bounds: base.year_bounds(),
            sources: summary.sources.into_iter().map(|(name, _)| name).collect(),
            default_journals: journals
                .iter()
                .take(DEFAULT_JOURNALS)
                .cloned()
                .collect(),
            journals,
            columns: Column::ALL.to_vec(),
            default_columns: Column::DEFAULT.to_vec(),
            charts: CHARTS.to_vec(),
        })
    }
}

/// The state of the filter controls.
///
/// An absent year range or source selection selects everything; an
/// empty source selection selects nothing. An empty journal selection
/// disables the journal filter. The title search only applies to the
/// data browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FilterState {
    pub(crate) years: Option<(i32, i32)>,
    pub(crate) sources: Option<Vec<String>>,
    pub(crate) journals: Vec<String>,
    pub(crate) search: String,
    pub(crate) columns: Vec<Column>,
}

impl FilterState {
    /// Builds the filter state from query parameters. A missing journal
    /// selection falls back to the default journals of the controls.
    pub(crate) fn from_query(
        query: &ViewQuery,
        controls: &Controls,
    ) -> DashboardResult<Self> {
        let years = match (query.year_from, query.year_to) {
            (None, None) => None,
            (Some(from), Some(to)) if from > to => {
                return Err(DashboardError::BadRequest(format!(
                    "invalid year range {from}-{to}"
                )));
            }
            (from, to) => {
                Some((from.unwrap_or(i32::MIN), to.unwrap_or(i32::MAX)))
            }
        };

        let columns = match query.columns {
            Some(ref columns) => split(columns, ',')
                .iter()
                .map(|name| name.parse::<Column>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DashboardError::BadRequest(e.to_string()))?,
            None => controls.default_columns.clone(),
        };

        Ok(Self {
            years,
            sources: query.sources.as_deref().map(|s| split(s, '|')),
            journals: match query.journals {
                Some(ref journals) => split(journals, '|'),
                None => controls.default_journals.clone(),
            },
            search: query.search.clone().unwrap_or_default(),
            columns,
        })
    }

    pub(crate) fn filter(&self) -> Filter {
        let mut filter = Filter::new().journals(self.journals.iter().cloned());
        if let Some((from, to)) = self.years {
            filter = filter.years(from, to);
        }
        if let Some(ref sources) = self.sources {
            filter = filter.sources(sources.iter().cloned());
        }

        filter
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SourceShare {
    pub(crate) source: String,
    pub(crate) papers: u64,
    pub(crate) percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Overview {
    pub(crate) total_papers: usize,
    /// Difference to the number of papers in the base dataset.
    pub(crate) delta: i64,
    pub(crate) unique_journals: usize,
    pub(crate) sources: usize,
    pub(crate) year_range: Option<(i32, i32)>,
    pub(crate) source_counts: Vec<SourceShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Trends {
    pub(crate) yearly: Vec<(i32, u64)>,
    pub(crate) cumulative: Vec<(i32, u64)>,
    pub(crate) monthly: Vec<((i32, u32), u64)>,
    pub(crate) peak_year: Option<i32>,
    pub(crate) avg_per_year: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Journals {
    pub(crate) top: Vec<(String, u64)>,
    pub(crate) total_journals: usize,
    pub(crate) top_journal: Option<TopJournal>,
    /// Number of journals with exactly one paper.
    pub(crate) single_paper: usize,
    /// Number of journals with five or more papers.
    pub(crate) five_plus: usize,
    pub(crate) trends: Vec<(String, Vec<(i32, u64)>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TextPanel {
    pub(crate) top_words: Vec<(String, u64)>,
    #[serde(skip)]
    pub(crate) cloud: Vec<(String, u64)>,
    pub(crate) avg_title_length: Option<f64>,
    pub(crate) avg_abstract_words: Option<f64>,
    pub(crate) unique_words: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Browser {
    pub(crate) search: String,
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<Vec<Option<String>>>,
    pub(crate) records: usize,
    pub(crate) year_range: Option<(i32, i32)>,
    pub(crate) unique_journals: usize,
    /// Share of missing values per selected column (in percent).
    pub(crate) missing: Vec<(Column, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DashboardView {
    pub(crate) overview: Overview,
    pub(crate) trends: Trends,
    pub(crate) journals: Journals,
    pub(crate) text: TextPanel,
    pub(crate) browser: Browser,
}

/// Applies the title search of the data browser.
pub(crate) fn browse(filtered: &Dataset, state: &FilterState) -> Dataset {
    if state.search.trim().is_empty() {
        filtered.clone()
    } else {
        filtered.search_titles(&state.search)
    }
}

fn cumulative(yearly: &[(i32, u64)]) -> Vec<(i32, u64)> {
    yearly
        .iter()
        .scan(0, |total, (year, count)| {
            *total += count;
            Some((*year, *total))
        })
        .collect()
}

fn browser(browsed: &Dataset, state: &FilterState) -> Browser {
    let rows = browsed
        .iter()
        .take(PREVIEW_ROWS)
        .map(|paper| {
            state
                .columns
                .iter()
                .map(|column| column.value(paper))
                .collect()
        })
        .collect();

    let missing = state
        .columns
        .iter()
        .map(|column| {
            let n = browsed
                .iter()
                .filter(|paper| column.value(paper).is_none())
                .count();

            let pct = if browsed.is_empty() {
                0.0
            } else {
                n as f64 / browsed.len() as f64 * 100.0
            };

            (*column, pct)
        })
        .collect();

    let journals: BTreeSet<&str> = browsed
        .iter()
        .filter_map(|paper| paper.journal.as_deref())
        .collect();

    Browser {
        search: state.search.clone(),
        columns: state.columns.clone(),
        rows,
        records: browsed.len(),
        year_range: browsed.year_bounds(),
        unique_journals: journals.len(),
        missing,
    }
}

/// Computes all panels of the dashboard.
pub(crate) fn compute(
    base: &Dataset,
    state: &FilterState,
) -> Cord19Result<DashboardView> {
    let filtered = base.filter(&state.filter());
    let summary = Summary::from_dataset(&filtered)?;
    let df = filtered.to_frame()?;

    let overview = Overview {
        total_papers: summary.total_papers,
        delta: filtered.len() as i64 - base.len() as i64,
        unique_journals: summary.unique_journals,
        sources: summary.sources.len(),
        year_range: filtered.year_bounds(),
        source_counts: summary
            .sources
            .iter()
            .map(|(source, papers)| SourceShare {
                source: source.clone(),
                papers: *papers,
                percentage: summary.percentage(*papers),
            })
            .collect(),
    };

    let trends = Trends {
        cumulative: cumulative(&summary.yearly_distribution),
        monthly: frame::month_counts(&df)?,
        peak_year: summary.peak_year,
        avg_per_year: mean(
            summary.yearly_distribution.iter().map(|(_, n)| *n as f64),
        ),
        yearly: summary.yearly_distribution.clone(),
    };

    let names: Vec<String> = summary
        .journals
        .iter()
        .take(TREND_JOURNALS)
        .map(|(name, _)| name.clone())
        .collect();

    let journals = Journals {
        top: summary.journals.iter().take(TOP_JOURNALS).cloned().collect(),
        total_journals: summary.unique_journals,
        top_journal: summary.top_journal.clone(),
        single_paper: summary.journals.iter().filter(|(_, n)| *n == 1).count(),
        five_plus: summary.journals.iter().filter(|(_, n)| *n >= 5).count(),
        trends: frame::journal_year_counts(&df, &names)?,
    };

    let freqs = word_frequencies(&filtered);
    let text = TextPanel {
        top_words: freqs.most_common(TOP_WORDS),
        cloud: freqs.most_common(CLOUD_WORDS),
        avg_title_length: mean(
            filtered.iter().filter_map(|p| p.title_length).map(|n| n as f64),
        ),
        avg_abstract_words: mean(
            filtered
                .iter()
                .filter_map(|p| p.abstract_word_count)
                .map(|n| n as f64),
        ),
        unique_words: freqs.len(),
    };

    Ok(DashboardView {
        overview,
        trends,
        journals,
        text,
        browser: browser(&browse(&filtered, state), state),
    })
}

/// Returns the chart with the given name, or `None` if there is no
/// such chart.
pub(crate) fn chart(view: &DashboardView, name: &str) -> Option<Chart> {
    Some(match name {
        "sources" => Chart::source_distribution(
            view.overview
                .source_counts
                .iter()
                .map(|share| (share.source.clone(), share.papers))
                .collect(),
        ),
        "yearly" => Chart::publications_by_year(view.trends.yearly.clone()),
        "cumulative" => Chart::cumulative(&view.trends.yearly),
        "monthly" => Chart::monthly(view.trends.monthly.clone()),
        "journals" => Chart::top_journals(view.journals.top.clone()),
        "journal-trends" => {
            Chart::journal_trends(view.journals.trends.clone())
        }
        "words" => Chart::top_words(view.text.top_words.clone()),
        "wordcloud" => Chart::word_cloud(view.text.cloud.clone()),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cord19::paper::parse_date;
    use cord19::Paper;

    use super::*;

    type TestResult = anyhow::Result<()>;

    fn paper(uid: &str, date: &str, source: &str, journal: Option<&str>) -> Paper {
        Paper {
            title: Some(format!("Vaccine trial {uid} in hospital patients")),
            abstract_text: Some("one two three four".into()),
            publish_time: parse_date(date),
            source: Some(source.into()),
            journal: journal.map(String::from),
            ..Paper::new(uid)
        }
    }

    fn base() -> Dataset {
        Dataset::new(vec![
            paper("a", "2020-01-10", "PMC", Some("BMJ")),
            paper("b", "2020-03-02", "PMC", Some("BMJ")),
            paper("c", "2021-05-20", "arXiv", Some("Cell")),
            paper("d", "2022-07-01", "WHO", None),
            paper("e", "2022-07-15", "PMC", Some("BMJ")),
        ])
    }

    fn state() -> FilterState {
        FilterState {
            columns: Column::DEFAULT.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn unfiltered_view() -> TestResult {
        let view = compute(&base(), &state())?;

        assert_eq!(view.overview.total_papers, 5);
        assert_eq!(view.overview.delta, 0);
        assert_eq!(view.overview.unique_journals, 2);
        assert_eq!(view.overview.sources, 3);
        assert_eq!(view.overview.year_range, Some((2020, 2022)));
        assert_eq!(view.overview.source_counts[0].source, "PMC");
        assert_relative_eq!(view.overview.source_counts[0].percentage, 60.0);

        assert_eq!(view.trends.yearly, vec![(2020, 2), (2021, 1), (2022, 2)]);
        assert_eq!(view.trends.cumulative, vec![(2020, 2), (2021, 3), (2022, 5)]);
        assert_eq!(view.trends.monthly.len(), 4);
        assert_eq!(view.trends.peak_year, Some(2020));
        assert_relative_eq!(view.trends.avg_per_year.unwrap(), 5.0 / 3.0);

        assert_eq!(view.journals.total_journals, 2);
        assert_eq!(view.journals.single_paper, 1);
        assert_eq!(view.journals.five_plus, 0);
        assert_eq!(view.journals.top_journal.as_ref().unwrap().name, "BMJ");
        assert_eq!(view.journals.trends[0].0, "BMJ");

        assert_eq!(view.text.top_words[0].1, 5);
        assert_relative_eq!(view.text.avg_abstract_words.unwrap(), 4.0);

        assert_eq!(view.browser.records, 5);
        assert_eq!(view.browser.rows.len(), 5);
        assert_eq!(view.browser.rows[3][1], None);
        assert_eq!(view.browser.missing[1], (Column::Journal, 20.0));
        Ok(())
    }

    #[test]
    fn filtered_view() -> TestResult {
        let state = FilterState {
            years: Some((2020, 2021)),
            sources: Some(vec!["PMC".into(), "arXiv".into()]),
            journals: vec!["BMJ".into()],
            search: "trial b".into(),
            ..state()
        };

        let view = compute(&base(), &state)?;
        assert_eq!(view.overview.total_papers, 2);
        assert_eq!(view.overview.delta, -3);
        assert_eq!(view.browser.records, 1);
        assert_eq!(view.browser.rows[0][1].as_deref(), Some("BMJ"));
        Ok(())
    }

    #[test]
    fn empty_view() -> TestResult {
        let state = FilterState {
            sources: Some(vec![]),
            ..state()
        };

        let view = compute(&base(), &state)?;
        assert_eq!(view.overview.total_papers, 0);
        assert_eq!(view.overview.delta, -5);
        assert_eq!(view.overview.year_range, None);
        assert!(view.overview.source_counts.is_empty());
        assert!(view.trends.yearly.is_empty());
        assert!(view.trends.monthly.is_empty());
        assert_eq!(view.trends.peak_year, None);
        assert_eq!(view.trends.avg_per_year, None);
        assert!(view.journals.top.is_empty());
        assert!(view.journals.top_journal.is_none());
        assert!(view.text.top_words.is_empty());
        assert_eq!(view.text.avg_title_length, None);
        assert_eq!(view.browser.records, 0);
        assert_eq!(view.browser.missing[0], (Column::Title, 0.0));

        let view = compute(&Dataset::default(), &FilterState::default())?;
        assert_eq!(view.overview.total_papers, 0);
        Ok(())
    }

    #[test]
    fn query_parsing() -> TestResult {
        let controls = Controls::from_dataset(&base())?;
        assert_eq!(controls.year_bounds, Some((2020, 2022)));
        assert_eq!(controls.journals, vec!["BMJ", "Cell"]);
        assert_eq!(controls.default_journals, vec!["BMJ", "Cell"]);

        let state = FilterState::from_query(&ViewQuery::default(), &controls)?;
        assert_eq!(state.years, None);
        assert_eq!(state.sources, None);
        assert_eq!(state.journals, controls.default_journals);
        assert_eq!(state.columns, Column::DEFAULT.to_vec());

        let query = ViewQuery {
            year_from: Some(2021),
            sources: Some("PMC| WHO".into()),
            journals: Some(String::new()),
            columns: Some("title,source_x".into()),
            ..Default::default()
        };
        let state = FilterState::from_query(&query, &controls)?;
        assert_eq!(state.years, Some((2021, i32::MAX)));
        assert_eq!(state.sources, Some(vec!["PMC".into(), "WHO".into()]));
        assert!(state.journals.is_empty());
        assert_eq!(state.columns, vec![Column::Title, Column::Source]);
        assert_eq!(compute(&base(), &state)?.overview.total_papers, 2);

        let query = ViewQuery {
            columns: Some("title,nope".into()),
            ..Default::default()
        };
        assert!(FilterState::from_query(&query, &controls).is_err());

        let query = ViewQuery {
            year_from: Some(2022),
            year_to: Some(2020),
            ..Default::default()
        };
        assert!(FilterState::from_query(&query, &controls).is_err());
        Ok(())
    }

    #[test]
    fn charts() -> TestResult {
        let view = compute(&base(), &state())?;
        for name in CHARTS {
            assert!(chart(&view, name).is_some(), "{name}");
        }
        assert!(chart(&view, "pie").is_none());
        Ok(())
    }
}
