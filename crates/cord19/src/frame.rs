//! Frequency tables computed with polars.
//!
//! A [Dataset] is converted into a narrow [DataFrame] holding only the
//! categorical columns that are aggregated by the reports. All functions
//! return plain vectors, ordered by decreasing count (ties broken by the
//! key) or, for temporal keys, by the key itself.

use polars::prelude::*;

use crate::dataset::Dataset;
use crate::error::Cord19Result;

pub const UID: &str = "cord_uid";
pub const SOURCE: &str = "source_x";
pub const JOURNAL: &str = "journal";
pub const LICENSE: &str = "license";
pub const YEAR: &str = "publication_year";
pub const MONTH: &str = "publication_month";

const COUNT: &str = "count";

impl Dataset {
    /// Converts the categorical columns of the dataset into a
    /// [DataFrame].
    pub fn to_frame(&self) -> Cord19Result<DataFrame> {
        let uid: Vec<&str> =
            self.iter().map(|p| p.cord_uid.as_str()).collect();
        let source: Vec<Option<&str>> =
            self.iter().map(|p| p.source.as_deref()).collect();
        let journal: Vec<Option<&str>> =
            self.iter().map(|p| p.journal.as_deref()).collect();
        let license: Vec<Option<&str>> =
            self.iter().map(|p| p.license.as_deref()).collect();
        let year: Vec<Option<i32>> =
            self.iter().map(|p| p.publication_year).collect();
        let month: Vec<Option<u32>> =
            self.iter().map(|p| p.publication_month).collect();

        Ok(DataFrame::new(vec![
            Series::new(UID, uid),
            Series::new(SOURCE, source),
            Series::new(JOURNAL, journal),
            Series::new(LICENSE, license),
            Series::new(YEAR, year),
            Series::new(MONTH, month),
        ])?)
    }
}

/// Counts the non-null values of a string column.
pub fn value_counts(
    df: &DataFrame,
    column: &str,
) -> Cord19Result<Vec<(String, u64)>> {
    if df.height() == 0 {
        return Ok(vec![]);
    }

    let counts = df
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .group_by([col(column)])
        .agg([col(UID).count().alias(COUNT)])
        .select([col(column), col(COUNT).cast(DataType::UInt64)])
        .sort(
            [COUNT, column],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false]),
        )
        .collect()?;

    let keys = counts.column(column)?.str()?;
    let values = counts.column(COUNT)?.u64()?;

    Ok(keys
        .into_iter()
        .zip(values)
        .filter_map(|(key, value)| Some((key?.to_string(), value?)))
        .collect())
}

/// Counts the records per publication year (ascending by year).
pub fn year_counts(df: &DataFrame) -> Cord19Result<Vec<(i32, u64)>> {
    if df.height() == 0 {
        return Ok(vec![]);
    }

    let counts = df
        .clone()
        .lazy()
        .filter(col(YEAR).is_not_null())
        .group_by([col(YEAR)])
        .agg([col(UID).count().alias(COUNT)])
        .select([
            col(YEAR).cast(DataType::Int32),
            col(COUNT).cast(DataType::UInt64),
        ])
        .sort([YEAR], SortMultipleOptions::default())
        .collect()?;

    let years = counts.column(YEAR)?.i32()?;
    let values = counts.column(COUNT)?.u64()?;

    Ok(years
        .into_iter()
        .zip(values)
        .filter_map(|(year, value)| Some((year?, value?)))
        .collect())
}

/// Counts the records per publication month (ascending by year and
/// month).
pub fn month_counts(
    df: &DataFrame,
) -> Cord19Result<Vec<((i32, u32), u64)>> {
    if df.height() == 0 {
        return Ok(vec![]);
    }

    let counts = df
        .clone()
        .lazy()
        .filter(col(YEAR).is_not_null().and(col(MONTH).is_not_null()))
        .group_by([col(YEAR), col(MONTH)])
        .agg([col(UID).count().alias(COUNT)])
        .select([
            col(YEAR).cast(DataType::Int32),
            col(MONTH).cast(DataType::UInt32),
            col(COUNT).cast(DataType::UInt64),
        ])
        .sort([YEAR, MONTH], SortMultipleOptions::default())
        .collect()?;

    let years = counts.column(YEAR)?.i32()?;
    let months = counts.column(MONTH)?.u32()?;
    let values = counts.column(COUNT)?.u64()?;

    Ok(years
        .into_iter()
        .zip(months)
        .zip(values)
        .filter_map(|((year, month), value)| {
            Some(((year?, month?), value?))
        })
        .collect())
}

/// Counts the records per journal and publication year, restricted to
/// the given journals. The result keeps the order of `journals`.
pub fn journal_year_counts(
    df: &DataFrame,
    journals: &[String],
) -> Cord19Result<Vec<(String, Vec<(i32, u64)>)>> {
    let mut result: Vec<(String, Vec<(i32, u64)>)> = journals
        .iter()
        .map(|journal| (journal.clone(), vec![]))
        .collect();

    if df.height() == 0 || journals.is_empty() {
        return Ok(result);
    }

    let counts = df
        .clone()
        .lazy()
        .filter(col(JOURNAL).is_not_null().and(col(YEAR).is_not_null()))
        .group_by([col(JOURNAL), col(YEAR)])
        .agg([col(UID).count().alias(COUNT)])
        .select([
            col(JOURNAL),
            col(YEAR).cast(DataType::Int32),
            col(COUNT).cast(DataType::UInt64),
        ])
        .sort([JOURNAL, YEAR], SortMultipleOptions::default())
        .collect()?;

    let names = counts.column(JOURNAL)?.str()?;
    let years = counts.column(YEAR)?.i32()?;
    let values = counts.column(COUNT)?.u64()?;

    for ((name, year), value) in names.into_iter().zip(years).zip(values) {
        let (Some(name), Some(year), Some(value)) = (name, year, value)
        else {
            continue;
        };

        if let Some((_, series)) =
            result.iter_mut().find(|(journal, _)| journal == name)
        {
            series.push((year, value));
        }
    }

    Ok(result)
}
