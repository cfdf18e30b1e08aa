//! Scope resolution and per-activity summary indicators.

use crate::axis::DateAxis;
use obra_core::record::ProgressRecord;
use serde::Serialize;

/// Summary indicators for one activity at the cutoff date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Total quantity to execute
    pub total_scope: f64,
    /// Accumulated actual value at the cutoff (the pivot)
    pub current_progress: f64,
    /// Accumulated planned value at the cutoff
    pub baseline_at_cutoff: f64,
    /// Actual minus planned, in quantity units
    pub deviation_absolute: f64,
    /// Actual minus planned, in percent points (one decimal)
    pub deviation_percent: f64,
    /// Progress over total scope, percent (one decimal)
    pub percent_complete: f64,
    /// Quantity still to execute
    pub remaining: f64,
    /// Remaining over total scope, percent (one decimal)
    pub remaining_percent: f64,
    /// Axis position of the cutoff, if the cutoff falls on the axis
    pub cutoff_index: Option<usize>,
    /// Quantity per week needed to close the gap by the target date
    pub weekly_required_rate: f64,
    pub unit: String,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Resolve the activity's total scope.
///
/// Order: file-supplied `Actual + Remanente` when either is positive;
/// otherwise derived from the Baseline row's dated cells (sum of deltas,
/// or the maximum for cumulative data); otherwise the declared `Alcance`
/// field, defaulting to 100 so percentages stay meaningful on a table
/// with no numbers at all.
pub fn resolve_total_scope(
    baseline: &ProgressRecord,
    actual_from_file: f64,
    remaining_from_file: f64,
    axis: &DateAxis,
    cumulative: bool,
) -> f64 {
    let mut scope = if actual_from_file > 0.0 || remaining_from_file > 0.0 {
        actual_from_file + remaining_from_file
    } else {
        let mut derived: f64 = 0.0;
        for date in axis.dates() {
            if let Some(value) = baseline.value_at(date) {
                if cumulative {
                    derived = derived.max(value);
                } else {
                    derived += value;
                }
            }
        }
        derived
    };
    if scope == 0.0 {
        scope = match baseline.scope {
            Some(declared) if declared != 0.0 => declared,
            _ => 100.0,
        };
    }
    scope
}

/// The quantity still to execute: the file-supplied remaining total when
/// positive, otherwise the distance from the pivot to the total scope.
pub fn resolve_gap(remaining_from_file: f64, total_scope: f64, pivot: f64) -> f64 {
    if remaining_from_file > 0.0 {
        remaining_from_file
    } else {
        total_scope - pivot
    }
}

/// Weekly rate needed to close `gap` in `weeks_to_go` weeks; zero when
/// there is nothing left to do or no time left to do it in.
pub fn weekly_rate(gap: f64, weeks_to_go: i64) -> f64 {
    if weeks_to_go > 0 && gap > 0.0 {
        gap / weeks_to_go as f64
    } else {
        0.0
    }
}

/// Assemble the KPI block once the series walks are done.
///
/// A zero (or negative) total scope resolves every percentage to 0
/// instead of dividing by zero.
#[allow(clippy::too_many_arguments)]
pub fn compute_kpis(
    total_scope: f64,
    pivot: f64,
    baseline_at_cutoff: f64,
    gap: f64,
    rate: f64,
    cutoff_index: Option<usize>,
    unit: String,
) -> KpiSummary {
    let (percent_complete, baseline_percent, remaining_percent) = if total_scope > 0.0 {
        (
            pivot / total_scope * 100.0,
            baseline_at_cutoff / total_scope * 100.0,
            gap / total_scope * 100.0,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    KpiSummary {
        total_scope,
        current_progress: pivot,
        baseline_at_cutoff,
        deviation_absolute: pivot - baseline_at_cutoff,
        deviation_percent: round1(percent_complete - baseline_percent),
        percent_complete: round1(percent_complete),
        remaining: gap,
        remaining_percent: round1(remaining_percent),
        cutoff_index,
        weekly_required_rate: rate,
        unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::DateAxis;
    use chrono::NaiveDate;
    use obra_core::record::ProgressRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn baseline_row(cells: &[(NaiveDate, f64)]) -> ProgressRecord {
        let mut row = ProgressRecord::new("Línea Base", "Piping", "Soldadura");
        for (d, v) in cells {
            row.values.insert(*d, *v);
        }
        row
    }

    #[test]
    fn test_scope_from_file_totals() {
        let row = baseline_row(&[]);
        let axis = DateAxis::empty();
        assert_eq!(resolve_total_scope(&row, 18.0, 22.0, &axis, false), 40.0);
        // either total alone is enough to trust the file
        assert_eq!(resolve_total_scope(&row, 18.0, 0.0, &axis, false), 18.0);
    }

    #[test]
    fn test_scope_derived_from_baseline() {
        let d1 = date(2025, 1, 6);
        let d2 = date(2025, 1, 13);
        let row = baseline_row(&[(d1, 10.0), (d2, 30.0)]);
        let axis = DateAxis::try_from_dates(vec![d1, d2]).unwrap();
        assert_eq!(resolve_total_scope(&row, 0.0, 0.0, &axis, false), 40.0);
        // cumulative data takes the highest level instead of the sum
        assert_eq!(resolve_total_scope(&row, 0.0, 0.0, &axis, true), 30.0);
    }

    #[test]
    fn test_scope_falls_back_to_declared_then_default() {
        let mut row = baseline_row(&[]);
        let axis = DateAxis::empty();
        row.scope = Some(250.0);
        assert_eq!(resolve_total_scope(&row, 0.0, 0.0, &axis, false), 250.0);
        row.scope = None;
        assert_eq!(resolve_total_scope(&row, 0.0, 0.0, &axis, false), 100.0);
    }

    #[test]
    fn test_weekly_rate() {
        assert_eq!(weekly_rate(50.0, 4), 12.5);
        assert_eq!(weekly_rate(50.0, 0), 0.0);
        assert_eq!(weekly_rate(0.0, 4), 0.0);
        assert_eq!(weekly_rate(-5.0, 4), 0.0);
    }

    #[test]
    fn test_kpis_percentages() {
        let kpi = compute_kpis(200.0, 80.0, 100.0, 120.0, 10.0, Some(6), "ml".into());
        assert_eq!(kpi.percent_complete, 40.0);
        assert_eq!(kpi.deviation_absolute, -20.0);
        assert_eq!(kpi.deviation_percent, -10.0);
        assert_eq!(kpi.remaining_percent, 60.0);
        // derived remaining keeps the two percentages complementary
        assert_eq!(kpi.percent_complete + kpi.remaining_percent, 100.0);
    }

    #[test]
    fn test_kpis_zero_scope_degrades() {
        let kpi = compute_kpis(0.0, 0.0, 0.0, 0.0, 0.0, None, String::new());
        assert_eq!(kpi.percent_complete, 0.0);
        assert_eq!(kpi.deviation_percent, 0.0);
        assert_eq!(kpi.remaining_percent, 0.0);
        assert!(kpi.percent_complete.is_finite());
    }
}
