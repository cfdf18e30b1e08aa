use chrono::{NaiveDate, TimeDelta};
use obra_core::error::{ObraError, Result};
use obra_core::week_range::WeekRange;
use std::collections::BTreeSet;

/// Weeks of synthetic runway added on each side of the observed dates,
/// so projection lines have room to draw past the last report.
const RUNWAY_WEEKS: i64 = 4;

/// The shared weekly x-axis for one table of curves.
///
/// Built from the union of dated columns across the raw rows, padded
/// with [`RUNWAY_WEEKS`] synthetic dates before the earliest and after
/// the latest observed date at a 7-day stride. Strictly increasing;
/// real dates keep their relative order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
}

impl DateAxis {
    /// An axis with no positions; every lookup on it returns `None`.
    pub fn empty() -> DateAxis {
        DateAxis { dates: Vec::new() }
    }

    /// Build the padded axis from the observed dated columns.
    ///
    /// Duplicates collapse and ordering is by calendar date. Errors with
    /// [`ObraError::EmptyAxis`] when no dates exist at all; callers
    /// degrade to [`DateAxis::empty`] rather than aborting.
    pub fn try_from_dates<I>(dates: I) -> Result<DateAxis>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let real: BTreeSet<NaiveDate> = dates.into_iter().collect();
        let (min, max) = match (real.first(), real.last()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => return Err(ObraError::EmptyAxis),
        };

        let week = TimeDelta::try_days(7).unwrap();
        let mut axis = Vec::with_capacity(real.len() + 2 * RUNWAY_WEEKS as usize);
        axis.extend(WeekRange(min - week * RUNWAY_WEEKS as i32, min - week));
        axis.extend(real.iter().copied());
        axis.extend(WeekRange(max + week, max + week * RUNWAY_WEEKS as i32));
        Ok(DateAxis { dates: axis })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    /// Index of the last axis date at or before the cutoff; `None` when
    /// the cutoff precedes the whole axis.
    pub fn cutoff_index(&self, cutoff: NaiveDate) -> Option<usize> {
        let mut found = None;
        for (i, date) in self.dates.iter().enumerate() {
            if *date <= cutoff {
                found = Some(i);
            } else {
                break;
            }
        }
        found
    }

    /// First index whose date is at or after the target, falling back to
    /// the last index. `None` only for an empty axis.
    pub fn target_index(&self, target: NaiveDate) -> Option<usize> {
        if self.dates.is_empty() {
            return None;
        }
        Some(
            self.dates
                .iter()
                .position(|date| *date >= target)
                .unwrap_or(self.dates.len() - 1),
        )
    }
}
