use std::fmt::Debug;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::Rng;

use super::template::{Lexicon, Template};
use crate::error::{bail, Cord19Error, Cord19Result};

/// The position of the record being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub index: usize,
    pub count: usize,
}

/// A generator for the values of a single column.
///
/// Generators are called once per record, in record order, with the
/// random number generator of the column. `None` represents a null
/// value.
pub trait FieldGenerator: Debug + Send + Sync {
    fn generate(&self, ctx: &Context, rng: &mut StdRng) -> Option<String>;
}

pub type BoxedGenerator = Box<dyn FieldGenerator>;

fn check_probability(p: f64) -> Cord19Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        bail!("probability {p} is not in [0, 1]");
    }

    Ok(p)
}

/// Always returns the same value.
#[derive(Debug, Clone)]
pub struct Constant(Option<String>);

impl Constant {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(Some(value.into()))
    }

    pub fn null() -> Self {
        Self(None)
    }
}

impl FieldGenerator for Constant {
    fn generate(&self, _ctx: &Context, _rng: &mut StdRng) -> Option<String> {
        self.0.clone()
    }
}

/// Picks one of the values with equal probability.
#[derive(Debug, Clone)]
pub struct Choice(Vec<String>);

impl Choice {
    pub fn new(values: &[&str]) -> Self {
        Self(values.iter().map(|value| value.to_string()).collect())
    }
}

impl FieldGenerator for Choice {
    fn generate(&self, _ctx: &Context, rng: &mut StdRng) -> Option<String> {
        self.0.choose(rng).cloned()
    }
}

/// Picks one of the values according to its weight. A value of `None`
/// produces a null.
#[derive(Debug, Clone)]
pub struct Weighted {
    values: Vec<Option<String>>,
    dist: WeightedIndex<f64>,
}

impl Weighted {
    pub fn new(values: &[(Option<&str>, f64)]) -> Cord19Result<Self> {
        let dist = WeightedIndex::new(values.iter().map(|(_, w)| *w))
            .map_err(|e| Cord19Error::other(format!("invalid weights: {e}")))?;

        Ok(Self {
            values: values
                .iter()
                .map(|(value, _)| value.map(String::from))
                .collect(),
            dist,
        })
    }
}

impl FieldGenerator for Weighted {
    fn generate(&self, _ctx: &Context, rng: &mut StdRng) -> Option<String> {
        self.values[self.dist.sample(rng)].clone()
    }
}

/// Returns `true` with probability `p`.
#[derive(Debug, Clone)]
pub struct Bool(f64);

impl Bool {
    pub fn new(p: f64) -> Cord19Result<Self> {
        Ok(Self(check_probability(p)?))
    }
}

impl FieldGenerator for Bool {
    fn generate(&self, _ctx: &Context, rng: &mut StdRng) -> Option<String> {
        Some(rng.gen_bool(self.0).to_string())
    }
}

/// An integer in `low..high`.
#[derive(Debug, Clone)]
pub struct IntRange {
    low: i64,
    high: i64,
}

impl IntRange {
    pub fn new(low: i64, high: i64) -> Cord19Result<Self> {
        if low >= high {
            bail!("empty integer range {low}..{high}");
        }

        Ok(Self { low, high })
    }
}

impl FieldGenerator for IntRange {
    fn generate(&self, _ctx: &Context, rng: &mut StdRng) -> Option<String> {
        Some(rng.gen_range(self.low..self.high).to_string())
    }
}

/// Renders one of the templates, chosen with equal probability.
#[derive(Debug, Clone)]
pub struct Text {
    templates: Vec<Template>,
    lexicon: Arc<Lexicon>,
}

impl Text {
    /// Creates a new text generator. Fails if a template can't be
    /// parsed or refers to a missing or empty lexicon entry.
    pub fn new(templates: &[&str], lexicon: Arc<Lexicon>) -> Cord19Result<Self> {
        if templates.is_empty() {
            bail!("text generator without templates");
        }

        let templates = templates
            .iter()
            .map(|template| template.parse::<Template>())
            .collect::<Cord19Result<Vec<_>>>()?;

        for slot in templates.iter().flat_map(Template::slots) {
            if lexicon.get(slot).map_or(true, <[String]>::is_empty) {
                bail!("unknown lexicon entry `{slot}`");
            }
        }

        Ok(Self { templates, lexicon })
    }

    /// Creates a text generator with a single template and without
    /// lexicon (e.g. `sha{int:100000:999999}`).
    pub fn formatted(template: &str) -> Cord19Result<Self> {
        Self::new(&[template], Arc::new(Lexicon::new()))
    }
}

impl FieldGenerator for Text {
    fn generate(&self, ctx: &Context, rng: &mut StdRng) -> Option<String> {
        let template = match self.templates.as_slice() {
            [template] => template,
            templates => templates.choose(rng)?,
        };

        Some(template.render(&self.lexicon, ctx, rng))
    }
}

/// Produces a null with probability `p`, otherwise delegates to the
/// inner generator.
#[derive(Debug)]
pub struct Nullable {
    p: f64,
    inner: BoxedGenerator,
}

impl Nullable {
    pub fn new<G>(p: f64, inner: G) -> Cord19Result<Self>
    where
        G: FieldGenerator + 'static,
    {
        Ok(Self {
            p: check_probability(p)?,
            inner: Box::new(inner),
        })
    }
}

impl FieldGenerator for Nullable {
    fn generate(&self, ctx: &Context, rng: &mut StdRng) -> Option<String> {
        if rng.gen_bool(self.p) {
            None
        } else {
            self.inner.generate(ctx, rng)
        }
    }
}

/// Delegates to `first` with probability `p`, otherwise to `second`.
#[derive(Debug)]
pub struct Either {
    p: f64,
    first: BoxedGenerator,
    second: BoxedGenerator,
}

impl Either {
    pub fn new<A, B>(p: f64, first: A, second: B) -> Cord19Result<Self>
    where
        A: FieldGenerator + 'static,
        B: FieldGenerator + 'static,
    {
        Ok(Self {
            p: check_probability(p)?,
            first: Box::new(first),
            second: Box::new(second),
        })
    }
}

impl FieldGenerator for Either {
    fn generate(&self, ctx: &Context, rng: &mut StdRng) -> Option<String> {
        if rng.gen_bool(self.p) {
            self.first.generate(ctx, rng)
        } else {
            self.second.generate(ctx, rng)
        }
    }
}

/// Dates evenly spaced between `start` and `end` (inclusive) over all
/// records of a dataset.
#[derive(Debug, Clone)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Cord19Result<Self> {
        if start > end {
            bail!("invalid date span {start}..{end}");
        }

        Ok(Self { start, end })
    }
}

impl FieldGenerator for DateSpan {
    fn generate(&self, ctx: &Context, _rng: &mut StdRng) -> Option<String> {
        let offset = if ctx.count > 1 {
            let days = (self.end - self.start).num_days() as u64;
            days * ctx.index as u64 / (ctx.count - 1) as u64
        } else {
            0
        };

        self.start
            .checked_add_days(Days::new(offset))
            .map(|date| date.format("%Y-%m-%d").to_string())
    }
}

/// A list of distinct names. The length of the list is drawn from a
/// weighted table of sizes; the names are drawn without replacement.
#[derive(Debug, Clone)]
pub struct Names {
    names: Vec<String>,
    sizes: Vec<usize>,
    dist: WeightedIndex<f64>,
    separator: String,
}

impl Names {
    pub fn new(
        names: &[&str],
        sizes: &[(usize, f64)],
        separator: &str,
    ) -> Cord19Result<Self> {
        if let Some((size, _)) = sizes.iter().find(|(n, _)| *n > names.len()) {
            bail!("can't draw {size} out of {} names", names.len());
        }

        let dist = WeightedIndex::new(sizes.iter().map(|(_, w)| *w))
            .map_err(|e| Cord19Error::other(format!("invalid weights: {e}")))?;

        Ok(Self {
            names: names.iter().map(|name| name.to_string()).collect(),
            sizes: sizes.iter().map(|(n, _)| *n).collect(),
            dist,
            separator: separator.into(),
        })
    }
}

impl FieldGenerator for Names {
    fn generate(&self, _ctx: &Context, rng: &mut StdRng) -> Option<String> {
        let size = self.sizes[self.dist.sample(rng)];
        let names: Vec<&str> = index::sample(rng, self.names.len(), size)
            .into_iter()
            .map(|idx| self.names[idx].as_str())
            .collect();

        Some(names.join(&self.separator))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    type TestResult = anyhow::Result<()>;

    fn run<G: FieldGenerator>(gen: &G, count: usize) -> Vec<Option<String>> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..count)
            .map(|index| gen.generate(&Context { index, count }, &mut rng))
            .collect()
    }

    #[test]
    fn weighted() -> TestResult {
        let gen = Weighted::new(&[
            (Some("pdf_json"), 0.3),
            (Some("pmc_json"), 0.3),
            (None, 0.4),
        ])?;

        let values = run(&gen, 10_000);
        let nulls = values.iter().filter(|v| v.is_none()).count();
        assert!((3_600..4_400).contains(&nulls));
        assert!(values
            .iter()
            .flatten()
            .all(|v| v == "pdf_json" || v == "pmc_json"));

        assert!(Weighted::new(&[(Some("a"), 0.0)]).is_err());
        assert!(Weighted::new(&[]).is_err());
        Ok(())
    }

    #[test]
    fn nullable() -> TestResult {
        let gen = Nullable::new(0.8, Constant::new("WHO"))?;
        let nulls = run(&gen, 10_000).iter().filter(|v| v.is_none()).count();
        assert!((7_600..8_400).contains(&nulls));

        assert!(Nullable::new(1.5, Constant::null()).is_err());
        Ok(())
    }

    #[test]
    fn date_span() -> TestResult {
        let gen = DateSpan::new(
            NaiveDate::from_ymd_opt(2019, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )?;

        let values = run(&gen, 2000);
        assert_eq!(values[0].as_deref(), Some("2019-12-01"));
        assert_eq!(values[1999].as_deref(), Some("2024-01-31"));
        assert!(values.windows(2).all(|w| w[0] <= w[1]));

        assert_eq!(run(&gen, 1)[0].as_deref(), Some("2019-12-01"));
        Ok(())
    }

    #[test]
    fn names() -> TestResult {
        let gen = Names::new(
            &["Smith J", "Wang M", "Patel S"],
            &[(1, 0.5), (3, 0.5)],
            "; ",
        )?;

        for value in run(&gen, 100).into_iter().flatten() {
            let names: Vec<&str> = value.split("; ").collect();
            assert!(names.len() == 1 || names.len() == 3);

            let mut distinct = names.clone();
            distinct.sort_unstable();
            distinct.dedup();
            assert_eq!(distinct.len(), names.len());
        }

        assert!(Names::new(&["Smith J"], &[(2, 1.0)], "; ").is_err());
        Ok(())
    }

    #[test]
    fn text() -> TestResult {
        let lexicon = Arc::new(Lexicon::new().with("term", &["vaccine"]));
        let gen = Text::new(&["{term} trial", "{term|title} study"], lexicon)?;

        for value in run(&gen, 20).into_iter().flatten() {
            assert!(value == "vaccine trial" || value == "Vaccine study");
        }

        let lexicon = Arc::new(Lexicon::new());
        assert!(Text::new(&["{term}"], lexicon).is_err());
        assert_eq!(
            run(&Text::formatted("cord-{index:06}")?, 3)[2].as_deref(),
            Some("cord-000002")
        );
        Ok(())
    }

    #[test]
    fn int_range() -> TestResult {
        let values = run(&IntRange::new(10, 12)?, 50);
        assert!(values.iter().flatten().all(|v| v == "10" || v == "11"));
        assert!(IntRange::new(5, 5).is_err());
        Ok(())
    }
}
