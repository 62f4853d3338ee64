//! Chart rendering with plotters.
//!
//! A [Chart] describes what to draw; it is rendered either into a PNG
//! file ([Chart::render_png]) or into an SVG document
//! ([Chart::render_svg]). Rendering errors (e.g. missing system fonts)
//! are reported as [Cord19Error::Render].

use std::path::Path;

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;

use crate::error::{Cord19Error, Cord19Result};

type DrawResult<DB> =
    Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

const FONT: &str = "sans-serif";
const MAX_LABEL: usize = 40;

const SKY: RGBColor = RGBColor(135, 206, 235);
const CORAL: RGBColor = RGBColor(240, 128, 128);
const STEEL: RGBColor = RGBColor(31, 119, 180);

/// Qualitative palette (ColorBrewer Set3).
const PALETTE: [RGBColor; 12] = [
    RGBColor(141, 211, 199),
    RGBColor(255, 255, 179),
    RGBColor(190, 186, 218),
    RGBColor(251, 128, 114),
    RGBColor(128, 177, 211),
    RGBColor(253, 180, 98),
    RGBColor(179, 222, 105),
    RGBColor(252, 205, 229),
    RGBColor(217, 217, 217),
    RGBColor(188, 128, 189),
    RGBColor(204, 235, 197),
    RGBColor(255, 237, 111),
];

/// Line colors (ColorBrewer Dark2).
const LINES: [RGBColor; 5] = [
    RGBColor(27, 158, 119),
    RGBColor(217, 95, 2),
    RGBColor(117, 112, 179),
    RGBColor(231, 41, 138),
    RGBColor(102, 166, 30),
];

/// Shortens a label to 40 characters; longer labels end with `...`.
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL {
        let mut short: String = label.chars().take(MAX_LABEL).collect();
        short.push_str("...");
        short
    } else {
        label.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// Vertical bars per year, labeled with their value.
    YearBars {
        title: String,
        y_desc: String,
        data: Vec<(i32, u64)>,
    },
    /// Horizontal bars per category; the first category is drawn on
    /// top.
    CategoryBars {
        title: String,
        x_desc: String,
        data: Vec<(String, u64)>,
    },
    Pie {
        title: String,
        data: Vec<(String, u64)>,
    },
    /// A filled area per year.
    YearArea {
        title: String,
        y_desc: String,
        data: Vec<(i32, u64)>,
    },
    /// A line per month.
    MonthLine {
        title: String,
        data: Vec<((i32, u32), u64)>,
    },
    /// A line per series and year, with a legend.
    YearLines {
        title: String,
        series: Vec<(String, Vec<(i32, u64)>)>,
    },
    WordCloud {
        title: String,
        words: Vec<(String, u64)>,
    },
}

impl Chart {
    pub fn publications_by_year(data: Vec<(i32, u64)>) -> Self {
        Self::YearBars {
            title: "COVID-19 Research Papers by Publication Year".into(),
            y_desc: "Number of Papers".into(),
            data,
        }
    }

    pub fn top_journals(data: Vec<(String, u64)>) -> Self {
        Self::CategoryBars {
            title: format!("Top {} Journals", data.len()),
            x_desc: "Number of Papers".into(),
            data,
        }
    }

    pub fn source_distribution(data: Vec<(String, u64)>) -> Self {
        Self::Pie {
            title: "Distribution of Papers by Data Source".into(),
            data,
        }
    }

    /// Cumulative number of papers; `yearly` must be ordered by year.
    pub fn cumulative(yearly: &[(i32, u64)]) -> Self {
        let data = yearly
            .iter()
            .scan(0, |total, (year, count)| {
                *total += count;
                Some((*year, *total))
            })
            .collect();

        Self::YearArea {
            title: "Cumulative Publications Over Time".into(),
            y_desc: "Cumulative Papers".into(),
            data,
        }
    }

    pub fn monthly(data: Vec<((i32, u32), u64)>) -> Self {
        Self::MonthLine {
            title: "Monthly Publication Timeline".into(),
            data,
        }
    }

    pub fn journal_trends(series: Vec<(String, Vec<(i32, u64)>)>) -> Self {
        Self::YearLines {
            title: format!("Publication Trends for Top {} Journals", series.len()),
            series,
        }
    }

    pub fn top_words(data: Vec<(String, u64)>) -> Self {
        Self::CategoryBars {
            title: "Most Frequent Words".into(),
            x_desc: "Frequency".into(),
            data,
        }
    }

    pub fn word_cloud(words: Vec<(String, u64)>) -> Self {
        Self::WordCloud {
            title: "Word Cloud of Titles".into(),
            words,
        }
    }

    /// Renders the chart into a PNG file.
    pub fn render_png<P: AsRef<Path>>(
        &self,
        path: P,
        size: (u32, u32),
    ) -> Cord19Result<()> {
        let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
        self.draw(&root).map_err(render_error)?;
        root.present().map_err(render_error)?;
        Ok(())
    }

    /// Renders the chart into an SVG document.
    pub fn render_svg(&self, size: (u32, u32)) -> Cord19Result<String> {
        let mut buf = String::new();
        {
            let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
            self.draw(&root).map_err(render_error)?;
            root.present().map_err(render_error)?;
        }

        Ok(buf)
    }

    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        match self {
            Self::YearBars { title, y_desc, data } => {
                year_bars(root, title, y_desc, data)
            }
            Self::CategoryBars { title, x_desc, data } => {
                category_bars(root, title, x_desc, data)
            }
            Self::Pie { title, data } => pie(root, title, data),
            Self::YearArea { title, y_desc, data } => {
                year_area(root, title, y_desc, data)
            }
            Self::MonthLine { title, data } => month_line(root, title, data),
            Self::YearLines { title, series } => year_lines(root, title, series),
            Self::WordCloud { title, words } => word_cloud(root, title, words),
        }
    }
}

fn render_error<E>(e: DrawingAreaErrorKind<E>) -> Cord19Error
where
    E: std::error::Error + Send + Sync,
{
    Cord19Error::Render(e.to_string())
}

/// Upper bound of a value axis with some room for labels.
#[inline]
fn headroom(max: u64) -> u64 {
    max + max / 10 + 1
}

fn no_data<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
) -> DrawResult<DB> {
    let (width, height) = root.dim_in_pixel();
    root.draw(&Text::new(title.to_string(), (20, 20), (FONT, 24)))?;
    root.draw(&Text::new(
        "No data".to_string(),
        (width as i32 / 2 - 40, height as i32 / 2),
        (FONT, 20),
    ))?;
    Ok(())
}

fn year_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    y_desc: &str,
    data: &[(i32, u64)],
) -> DrawResult<DB> {
    let (Some((min, _)), Some((max, _))) = (data.first(), data.last()) else {
        return no_data(root, title);
    };

    let top = data.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((*min..*max + 1).into_segmented(), 0u64..headroom(top))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_label_formatter(&|value: &SegmentValue<i32>| match value {
            SegmentValue::CenterOf(year) | SegmentValue::Exact(year) => {
                year.to_string()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(SKY.filled())
            .margin(10)
            .data(data.iter().map(|(year, count)| (*year, *count))),
    )?;

    chart.draw_series(data.iter().map(|(year, count)| {
        Text::new(
            count.to_string(),
            (SegmentValue::CenterOf(*year), *count + top / 50),
            (FONT, 14),
        )
    }))?;

    Ok(())
}

fn category_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    data: &[(String, u64)],
) -> DrawResult<DB> {
    if data.is_empty() {
        return no_data(root, title);
    }

    let n = data.len() as i32;
    let labels: Vec<String> =
        data.iter().map(|(label, _)| truncate_label(label)).collect();
    let top = data.iter().map(|(_, count)| *count).max().unwrap_or(0);

    // The first entry is drawn at the top of the chart.
    let row = |idx: usize| n - 1 - idx as i32;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(300)
        .build_cartesian_2d(0u64..headroom(top), (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_labels(data.len())
        .y_label_formatter(&|value: &SegmentValue<i32>| match value {
            SegmentValue::CenterOf(row) | SegmentValue::Exact(row) => {
                let idx = (n - 1 - row) as usize;
                labels.get(idx).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(CORAL.filled())
            .margin(4)
            .data(
                data.iter()
                    .enumerate()
                    .map(|(idx, (_, count))| (row(idx), *count)),
            ),
    )?;

    chart.draw_series(data.iter().enumerate().map(|(idx, (_, count))| {
        Text::new(
            count.to_string(),
            (*count + top / 100, SegmentValue::CenterOf(row(idx))),
            (FONT, 14),
        )
    }))?;

    Ok(())
}

fn pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    data: &[(String, u64)],
) -> DrawResult<DB> {
    if data.iter().all(|(_, count)| *count == 0) {
        return no_data(root, title);
    }

    let area = root.titled(title, (FONT, 24))?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = width.min(height) as f64 * 0.35;

    let sizes: Vec<f64> = data.iter().map(|(_, count)| *count as f64).collect();
    let colors: Vec<RGBColor> = (0..data.len())
        .map(|idx| PALETTE[idx % PALETTE.len()])
        .collect();
    let labels: Vec<&str> = data.iter().map(|(label, _)| label.as_str()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style((FONT, 16).into_font().color(&BLACK));
    pie.percentages((FONT, 14).into_font().color(&BLACK));
    area.draw(&pie)?;

    Ok(())
}

fn year_range(years: impl Iterator<Item = i32>) -> Option<std::ops::Range<i32>> {
    let (min, max) = years.fold(None, |acc: Option<(i32, i32)>, year| match acc {
        Some((min, max)) => Some((min.min(year), max.max(year))),
        None => Some((year, year)),
    })?;

    Some(if min == max { min - 1..max + 1 } else { min..max })
}

fn year_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    y_desc: &str,
    data: &[(i32, u64)],
) -> DrawResult<DB> {
    let Some(range) = year_range(data.iter().map(|(year, _)| *year)) else {
        return no_data(root, title);
    };

    let top = data.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(range.clone(), 0u64..headroom(top))?;

    chart
        .configure_mesh()
        .x_labels((range.end - range.start + 1) as usize)
        .x_desc("Year")
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(
        AreaSeries::new(
            data.iter().map(|(year, count)| (*year, *count)),
            0u64,
            &STEEL.mix(0.3),
        )
        .border_style(&STEEL),
    )?;

    Ok(())
}

#[inline]
fn month_key(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

fn month_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    data: &[((i32, u32), u64)],
) -> DrawResult<DB> {
    let keys = data.iter().map(|((year, month), _)| month_key(*year, *month));
    let Some(range) = year_range(keys) else {
        return no_data(root, title);
    };

    let top = data.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(range, 0u64..headroom(top))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Papers Published")
        .x_label_formatter(&|key: &i32| {
            format!("{}-{:02}", key.div_euclid(12), key.rem_euclid(12) + 1)
        })
        .draw()?;

    chart.draw_series(LineSeries::new(
        data.iter()
            .map(|((year, month), count)| (month_key(*year, *month), *count)),
        STEEL.stroke_width(2),
    ))?;

    Ok(())
}

fn year_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    series: &[(String, Vec<(i32, u64)>)],
) -> DrawResult<DB> {
    let years = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(year, _)| *year));
    let Some(range) = year_range(years) else {
        return no_data(root, title);
    };

    let top = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, count)| *count))
        .max()
        .unwrap_or(0);

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(range.clone(), 0u64..headroom(top))?;

    chart
        .configure_mesh()
        .x_labels((range.end - range.start + 1) as usize)
        .x_desc("Year")
        .y_desc("Number of Papers")
        .draw()?;

    for (idx, (name, points)) in series.iter().enumerate() {
        let color = LINES[idx % LINES.len()];
        chart
            .draw_series(LineSeries::new(
                points.iter().map(|(year, count)| (*year, *count)),
                color.stroke_width(2),
            ))?
            .label(truncate_label(name))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn word_cloud<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    words: &[(String, u64)],
) -> DrawResult<DB> {
    if words.is_empty() {
        return no_data(root, title);
    }

    let area = root.titled(title, (FONT, 24))?;
    let placed = layout_words(words, area.dim_in_pixel(), MAX_CLOUD_WORDS);

    for (idx, word) in placed.iter().enumerate() {
        let color = LINES[idx % LINES.len()];
        area.draw(&Text::new(
            word.word.clone(),
            (word.x, word.y),
            (FONT, word.size).into_font().color(&color),
        ))?;
    }

    Ok(())
}

const MAX_CLOUD_WORDS: usize = 100;
const MIN_FONT: u32 = 12;
const MAX_FONT: u32 = 64;

/// A word positioned by [layout_words]; `(x, y)` is the top-left
/// corner of its bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWord {
    pub word: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub size: u32,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Places the words on an area of the given size along an archimedean
/// spiral starting in the center.
///
/// The font size of a word grows linearly with its count. Words are
/// placed in the given order (most frequent first); a word that doesn't
/// fit anywhere is dropped. Bounding boxes are estimated from the
/// number of characters.
pub fn layout_words(
    words: &[(String, u64)],
    (width, height): (u32, u32),
    limit: usize,
) -> Vec<PlacedWord> {
    let max = words.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let aspect = height as f64 / width.max(1) as f64;
    let mut placed: Vec<PlacedWord> = vec![];

    for (word, count) in words.iter().take(limit) {
        let size = MIN_FONT + ((MAX_FONT - MIN_FONT) as u64 * count / max) as u32;
        let w = (word.chars().count() as f64 * size as f64 * 0.6).ceil() as i32;
        let h = size as i32;

        for step in 0..2000 {
            let t = step as f64 * 0.1;
            let r = 2.0 * t;
            let x = (cx + r * t.cos()) as i32 - w / 2;
            let y = (cy + r * t.sin() * aspect) as i32 - h / 2;

            if x < 0 || y < 0 || x + w > width as i32 || y + h > height as i32 {
                continue;
            }

            let candidate = PlacedWord {
                word: word.clone(),
                x,
                y,
                width: w,
                height: h,
                size,
            };

            if placed.iter().all(|other| !candidate.overlaps(other)) {
                placed.push(candidate);
                break;
            }
        }
    }

    placed
}
