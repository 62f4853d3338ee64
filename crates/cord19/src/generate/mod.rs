//! Synthetic CORD-19 records.
//!
//! A dataset is generated column by column from a [SampleSpec], a table
//! of column names and [FieldGenerator]s. The result only depends on the
//! table, the number of records and the seed.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::dataset::Dataset;
use crate::error::Cord19Result;
use crate::paper::Paper;

mod field;
mod spec;
mod template;

pub use field::{
    BoxedGenerator, Bool, Choice, Constant, Context, DateSpan, Either,
    FieldGenerator, IntRange, Names, Nullable, Text, Weighted,
};
pub use spec::SampleSpec;
pub use template::{Lexicon, Template};

#[inline]
fn column_seed(seed: u64, position: usize) -> u64 {
    seed ^ (position as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// Generates `count` records from the field-spec table.
pub fn generate(
    spec: &SampleSpec,
    count: usize,
    seed: u64,
) -> Cord19Result<Dataset> {
    let mut papers = vec![Paper::default(); count];

    for (position, (name, generator)) in spec.columns().enumerate() {
        let mut rng = StdRng::seed_from_u64(column_seed(seed, position));

        for (index, paper) in papers.iter_mut().enumerate() {
            let ctx = Context { index, count };
            paper.set(name, generator.generate(&ctx, &mut rng))?;
        }
    }

    log::debug!("generated {count} records (seed = {seed})");
    Ok(Dataset::new(papers))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn exact_count_and_sequential_ids() -> TestResult {
        let ds = generate(&SampleSpec::sample()?, 250, 42)?;
        assert_eq!(ds.len(), 250);

        for (idx, paper) in ds.iter().enumerate() {
            assert_eq!(paper.cord_uid, format!("cord-{idx:06}"));
        }

        Ok(())
    }

    #[test]
    fn deterministic() -> TestResult {
        let spec = SampleSpec::sample()?;

        let mut first = Vec::new();
        generate(&spec, 300, 7)?.to_writer(&mut first)?;

        let mut second = Vec::new();
        generate(&spec, 300, 7)?.to_writer(&mut second)?;
        assert_eq!(first, second);

        let mut other = Vec::new();
        generate(&spec, 300, 8)?.to_writer(&mut other)?;
        assert_ne!(first, other);
        Ok(())
    }

    #[test]
    fn derived_fields_consistent() -> TestResult {
        let ds = generate(&SampleSpec::sample()?, 500, 42)?;

        for paper in ds.iter() {
            let date = paper.publish_time.expect("publish time");
            assert_eq!(paper.year_month().map(|(y, _)| y), paper.publication_year);
            assert_eq!(paper.publication_year, Some(chrono::Datelike::year(&date)));
            assert!(paper.license.is_some());
            assert!(paper.title_length.unwrap() > 0);
            assert!(paper.authors.as_ref().is_some_and(|a| {
                (1..=6).contains(&a.split("; ").count())
            }));
        }

        let abstracts = ds
            .iter()
            .filter(|p| p.abstract_text.as_deref() == Some("Abstract not available"))
            .count();
        assert!(abstracts > 20 && abstracts < 80);
        Ok(())
    }

    #[test]
    fn reload_generated() -> TestResult {
        let ds = generate(&SampleSpec::demo()?, 100, 42)?;

        let mut buf = Vec::new();
        ds.to_writer(&mut buf)?;
        assert_eq!(Dataset::from_reader(buf.as_slice())?, ds);
        Ok(())
    }

    #[test]
    fn empty() -> TestResult {
        let ds = generate(&SampleSpec::sample()?, 0, 42)?;
        assert!(ds.is_empty());
        Ok(())
    }

    #[test]
    fn single_record() -> TestResult {
        let ds = generate(&SampleSpec::demo()?, 1, 42)?;
        assert_eq!(ds.papers()[0].publication_year, Some(2019));
        Ok(())
    }
}
