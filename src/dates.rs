//! Month ranges, "MM-YYYY" labels and time-axis offsets
//!
//! TerraClimate stores its time coordinate as days since 1900-01-01, one step
//! per month. A [`MonthRange`] converts a calendar span into those offsets and
//! produces the column labels used in the output tables.

use crate::errors::{Result, TerraGridError};
use chrono::NaiveDate;

/// Epoch of the time coordinate, as (year, month, day)
pub const TIME_EPOCH: (i32, u32, u32) = (1900, 1, 1);

/// Generates "MM-YYYY" labels for every month between the bounds, inclusive.
///
/// The first year starts at `month_start`, the last year ends at `month_end`,
/// and the years in between span January to December. When the start lies
/// after the end the result is empty.
pub fn month_year_labels(
    year_start: i32,
    year_end: i32,
    month_start: u32,
    month_end: u32,
) -> Vec<String> {
    let mut labels = Vec::new();
    for year in year_start..=year_end {
        let first = if year == year_start { month_start } else { 1 };
        let last = if year == year_end { month_end } else { 12 };
        for month in first..=last {
            labels.push(format!("{:02}-{}", month, year));
        }
    }
    labels
}

/// Days from the time epoch to the first day of the given month
pub fn days_since_epoch(year: i32, month: u32) -> Result<i64> {
    let date = first_of_month(year, month)?;
    Ok((date - epoch()).num_days())
}

fn epoch() -> NaiveDate {
    let (y, m, d) = TIME_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| TerraGridError::InvalidDateRange {
        message: format!("{:02}-{} is not a valid month", month, year),
    })
}

/// A validated, inclusive span of calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    year_start: i32,
    year_end: i32,
    month_start: u32,
    month_end: u32,
}

impl MonthRange {
    /// Create a month range, rejecting invalid months and reversed bounds
    pub fn new(year_start: i32, year_end: i32, month_start: u32, month_end: u32) -> Result<Self> {
        for month in [month_start, month_end] {
            if !(1..=12).contains(&month) {
                return Err(TerraGridError::InvalidDateRange {
                    message: format!("month {} is outside 1..=12", month),
                });
            }
        }

        if (year_start, month_start) > (year_end, month_end) {
            return Err(TerraGridError::InvalidDateRange {
                message: format!(
                    "{:02}-{} is after {:02}-{}",
                    month_start, year_start, month_end, year_end
                ),
            });
        }

        // Reject years chrono cannot represent up front
        first_of_month(year_start, month_start)?;
        first_of_month(year_end, month_end)?;

        Ok(Self {
            year_start,
            year_end,
            month_start,
            month_end,
        })
    }

    pub fn year_start(&self) -> i32 {
        self.year_start
    }

    pub fn year_end(&self) -> i32 {
        self.year_end
    }

    pub fn month_start(&self) -> u32 {
        self.month_start
    }

    pub fn month_end(&self) -> u32 {
        self.month_end
    }

    /// Number of (year, month) pairs covered
    pub fn len(&self) -> usize {
        let months = (self.year_end - self.year_start) as i64 * 12 + self.month_end as i64
            - self.month_start as i64
            + 1;
        months as usize
    }

    /// Chronologically ordered "MM-YYYY" labels
    pub fn labels(&self) -> Vec<String> {
        month_year_labels(
            self.year_start,
            self.year_end,
            self.month_start,
            self.month_end,
        )
    }

    /// Time-axis offset of the first day of the starting month
    pub fn start_offset_days(&self) -> Result<i64> {
        days_since_epoch(self.year_start, self.month_start)
    }

    /// Time-axis offset of the first day of the final month
    pub fn end_offset_days(&self) -> Result<i64> {
        days_since_epoch(self.year_end, self.month_end)
    }
}
