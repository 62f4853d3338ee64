use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use cord19::chart::Chart;
use cord19::frame;
use cord19::text::title_frequencies;

use crate::prelude::*;
use crate::utils::heading;

const SIZE: (u32, u32) = (1200, 600);
const TOP_JOURNALS: usize = 10;
const TREND_JOURNALS: usize = 5;

/// Render charts of the dataset as PNG files.
#[derive(Debug, Parser)]
pub(crate) struct Plot {
    /// Also render the cumulative, monthly, journal trend and word
    /// cloud charts.
    #[arg(short, long)]
    all: bool,

    /// Write the charts into `path`. By default, the charts are
    /// written to the `outputs` directory.
    #[arg(short, long, value_name = "path")]
    output: Option<PathBuf>,
}

fn charts(dataset: &Dataset, all: bool) -> ExplorerResult<Vec<(&'static str, Chart)>> {
    let summary = Summary::from_dataset(dataset)?;
    let journals: Vec<_> =
        summary.journals.iter().take(TOP_JOURNALS).cloned().collect();

    let mut charts = vec![
        (
            "publications_by_year.png",
            Chart::publications_by_year(summary.yearly_distribution.clone()),
        ),
        ("top_journals.png", Chart::top_journals(journals)),
        (
            "source_distribution.png",
            Chart::source_distribution(summary.sources.clone()),
        ),
    ];

    if all {
        let df = dataset.to_frame()?;
        let names: Vec<String> = summary
            .journals
            .iter()
            .take(TREND_JOURNALS)
            .map(|(name, _)| name.clone())
            .collect();

        charts.extend([
            (
                "cumulative_publications.png",
                Chart::cumulative(&summary.yearly_distribution),
            ),
            (
                "monthly_timeline.png",
                Chart::monthly(frame::month_counts(&df)?),
            ),
            (
                "journal_trends.png",
                Chart::journal_trends(frame::journal_year_counts(&df, &names)?),
            ),
            (
                "title_word_cloud.png",
                Chart::word_cloud(title_frequencies(dataset).most_common(100)),
            ),
        ]);
    }

    Ok(charts)
}

/// Renders the charts into `output_dir`. A chart that fails to render
/// is reported; the remaining charts are rendered nevertheless.
/// Returns the number of charts written.
pub(crate) fn create_plots(
    dataset: &Dataset,
    output_dir: &Path,
    all: bool,
) -> ExplorerResult<usize> {
    heading("CREATING VISUALIZATIONS");
    fs::create_dir_all(output_dir)?;

    let mut written = 0;
    for (filename, chart) in charts(dataset, all)? {
        let path = output_dir.join(filename);
        match chart.render_png(&path, SIZE) {
            Ok(()) => {
                println!("Saved: {}", path.display());
                written += 1;
            }
            Err(e) => eprintln!("error: unable to create {filename}: {e}"),
        }
    }

    println!("\nAll visualizations saved to: {}", output_dir.display());
    Ok(written)
}

impl Plot {
    pub(crate) fn execute(self, args: &GlobalArgs) -> ExplorerResult<()> {
        let (workspace, dataset) = args.load()?;
        let output_dir = self.output.unwrap_or_else(|| workspace.output_dir());

        create_plots(&dataset, &output_dir, self.all)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cord19::{generate, SampleSpec};

    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn chart_selection() -> TestResult {
        let dataset = generate(&SampleSpec::demo()?, 100, 7)?;

        let names: Vec<_> = charts(&dataset, false)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            [
                "publications_by_year.png",
                "top_journals.png",
                "source_distribution.png"
            ]
        );

        assert_eq!(charts(&dataset, true)?.len(), 7);
        Ok(())
    }
}
