//! Accumulator walks over the date axis.
//!
//! Both walks turn sparse dated cells into dense cumulative series. The
//! interpretation of a cell depends on the table-wide encoding: weekly
//! deltas are summed, cumulative values replace the running total. A
//! missing cell always means "no new report" -- the level holds.

use crate::axis::DateAxis;
use chrono::NaiveDate;
use obra_core::record::ProgressRecord;

/// The planned series, populated at every axis position, plus the
/// markers the KPI derivation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSeries {
    pub values: Vec<f64>,
    /// Accumulated plan value at the cutoff index
    pub at_cutoff: f64,
    /// First date the plan reaches 99.9% of the total scope; kept at the
    /// first crossing even if later values dip
    pub scope_completion_date: Option<NaiveDate>,
}

/// Walk the axis accumulating the Baseline row.
pub fn build_baseline(
    row: &ProgressRecord,
    axis: &DateAxis,
    cumulative: bool,
    total_scope: f64,
    cutoff_index: Option<usize>,
) -> BaselineSeries {
    let mut values = Vec::with_capacity(axis.len());
    let mut acc = 0.0;
    let mut at_cutoff = 0.0;
    let mut completion = None;

    for (i, date) in axis.dates().iter().enumerate() {
        if cumulative {
            if let Some(reported) = row.value_at(date) {
                acc = reported;
            }
        } else {
            acc += row.value_at(date).unwrap_or(0.0);
        }
        values.push(acc);

        if completion.is_none() && acc >= total_scope * 0.999 {
            completion = Some(*date);
        }
        if Some(i) == cutoff_index {
            at_cutoff = acc;
        }
    }

    BaselineSeries {
        values,
        at_cutoff,
        scope_completion_date: completion,
    }
}

/// Recorded history and the file's own forward-looking entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualWalk {
    /// Accumulated actual values, present only at indices up to the cutoff
    pub actual: Vec<Option<f64>>,
    /// Source-file entries past the cutoff, sparse by nature
    pub file_projection: Vec<Option<f64>>,
    /// Accumulated value at the cutoff index
    pub pivot: f64,
}

/// Walk the axis accumulating the Actual row.
///
/// Cumulative refinement: a missing cell holds the running total, and an
/// explicit zero never knocks down a positive total -- a crew that
/// reports nothing did not undo last week's work. At the cutoff index a
/// positive file-supplied total overrides the per-week derivation.
pub fn build_actual(
    row: &ProgressRecord,
    axis: &DateAxis,
    cumulative: bool,
    actual_from_file: f64,
    cutoff_index: Option<usize>,
) -> ActualWalk {
    let len = axis.len();
    let mut actual = Vec::with_capacity(len);
    let mut file_projection = Vec::with_capacity(len);
    let mut acc = 0.0;
    let mut pivot = 0.0;

    for (i, date) in axis.dates().iter().enumerate() {
        let cell = row.value_at(date);
        if cumulative {
            if let Some(reported) = cell {
                if !(reported == 0.0 && acc > 0.0) {
                    acc = reported;
                }
            }
        } else {
            acc += cell.unwrap_or(0.0);
        }

        let within_cutoff = matches!(cutoff_index, Some(cutoff) if i <= cutoff);
        if within_cutoff {
            if Some(i) == cutoff_index && actual_from_file > 0.0 {
                acc = actual_from_file;
            }
            if Some(i) == cutoff_index {
                pivot = acc;
            }
            actual.push(Some(acc));
            file_projection.push(None);
        } else {
            actual.push(None);
            if cell.is_some() || (cumulative && acc > 0.0) {
                file_projection.push(Some(acc));
            } else {
                file_projection.push(None);
            }
        }
    }

    ActualWalk {
        actual,
        file_projection,
        pivot,
    }
}

/// Straight-line ramp from the pivot toward the total scope.
///
/// Fills every index after the cutoff, adding `weekly_rate` per step and
/// clamping at `total_scope`; the cutoff index itself carries the pivot
/// so the line visually connects to the actual series. With no cutoff on
/// the axis the ramp starts from the first position.
pub fn build_target_projection(
    axis_len: usize,
    cutoff_index: Option<usize>,
    pivot: f64,
    weekly_rate: f64,
    total_scope: f64,
) -> Vec<Option<f64>> {
    let mut series = vec![None; axis_len];
    if let Some(cutoff) = cutoff_index {
        if cutoff < axis_len {
            series[cutoff] = Some(pivot);
        }
    }

    let start = cutoff_index.map(|cutoff| cutoff + 1).unwrap_or(0);
    let mut current = pivot;
    for slot in series.iter_mut().skip(start) {
        if current < total_scope {
            current += weekly_rate;
            if current > total_scope {
                current = total_scope;
            }
        }
        *slot = Some(current);
    }
    series
}
