use chrono::{NaiveDate, TimeDelta};
use std::mem::replace;

/// A date range iterator that yields dates at a 7-day stride from the
/// start date (inclusive) while they do not pass the end date.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct WeekRange(pub NaiveDate, pub NaiveDate);

impl Iterator for WeekRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::try_days(7).unwrap();
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}
