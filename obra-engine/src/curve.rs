//! Per-activity curve assembly.

use crate::axis::DateAxis;
use crate::kpi::{self, KpiSummary};
use crate::series::{self, BaselineSeries};
use chrono::NaiveDate;
use obra_core::record::CurveKind;
use obra_core::table::QuantityTable;
use serde::Serialize;

/// Caller-supplied parameters for one full curve computation.
///
/// `cumulative` applies to the whole table: the source either exports
/// running totals or weekly deltas, never a mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    /// As-of date separating recorded history from projection
    pub cutoff: NaiveDate,
    /// Date by which the remaining quantity should be executed
    pub target: NaiveDate,
    /// Dated cells hold running totals instead of weekly deltas
    pub cumulative: bool,
}

/// Aligned weekly chart series and KPIs for one (discipline, activity).
///
/// Serializes to the JSON shape the rendering collaborator consumes:
/// dates as ISO strings, absent series positions as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityCurve {
    pub discipline: String,
    pub activity: String,
    /// Weekly x-axis shared by all four series
    pub date_axis: Vec<NaiveDate>,
    /// Planned progress, populated at every axis position
    pub baseline: Vec<f64>,
    /// Recorded progress, present only up to the cutoff
    pub actual: Vec<Option<f64>>,
    /// The source file's own forward-looking entries past the cutoff
    pub file_projection: Vec<Option<f64>>,
    /// Straight-line ramp from the pivot to the target date
    pub target_projection: Vec<Option<f64>>,
    /// First date the plan reaches the full scope
    pub scope_completion_date: Option<NaiveDate>,
    pub kpi: KpiSummary,
}

/// Build one curve per (discipline, activity) pair found in the table.
///
/// Pairs without a Baseline row are skipped: without a plan there is no
/// scope to measure against. A missing Actual row degrades to a
/// baseline-only curve with zero-progress KPIs.
pub fn build_curves(table: &QuantityTable, params: &CurveParams) -> Vec<ActivityCurve> {
    let axis = match DateAxis::try_from_dates(table.dates()) {
        Ok(axis) => axis,
        Err(_) => {
            log::warn!("table has no date columns; emitting empty series");
            DateAxis::empty()
        }
    };

    let mut curves = Vec::new();
    for (discipline, activity) in table.pairs() {
        match build_activity_curve(table, &axis, params, &discipline, &activity) {
            Some(curve) => curves.push(curve),
            None => log::debug!("{}/{}: no baseline row, skipped", discipline, activity),
        }
    }
    log::info!(
        "built {} activity curves from {} rows",
        curves.len(),
        table.rows.len()
    );
    curves
}

fn build_activity_curve(
    table: &QuantityTable,
    axis: &DateAxis,
    params: &CurveParams,
    discipline: &str,
    activity: &str,
) -> Option<ActivityCurve> {
    let baseline_row = table.find_row(CurveKind::Baseline, discipline, activity)?;
    let actual_row = table.find_row(CurveKind::Actual, discipline, activity);

    let actual_from_file = actual_row.and_then(|r| r.actual_to_date).unwrap_or(0.0);
    let remaining_from_file = actual_row.and_then(|r| r.remaining).unwrap_or(0.0);

    let cutoff_index = axis.cutoff_index(params.cutoff);
    let target_index = axis.target_index(params.target);

    let total_scope = kpi::resolve_total_scope(
        baseline_row,
        actual_from_file,
        remaining_from_file,
        axis,
        params.cumulative,
    );

    let BaselineSeries {
        values: baseline,
        at_cutoff: baseline_at_cutoff,
        scope_completion_date,
    } = series::build_baseline(baseline_row, axis, params.cumulative, total_scope, cutoff_index);

    let (actual, mut file_projection, pivot) = match actual_row {
        Some(row) => {
            let walk =
                series::build_actual(row, axis, params.cumulative, actual_from_file, cutoff_index);
            (walk.actual, walk.file_projection, walk.pivot)
        }
        None => (vec![None; axis.len()], vec![None; axis.len()], 0.0),
    };

    let gap = kpi::resolve_gap(remaining_from_file, total_scope, pivot);
    let weeks_to_go = match target_index {
        Some(target) => target as i64 - cutoff_index.map(|c| c as i64).unwrap_or(-1),
        None => 0,
    };
    let rate = kpi::weekly_rate(gap, weeks_to_go);

    let target_projection = if actual_row.is_some() {
        // pivot stitch: all three lines share the cutoff point
        if let Some(cutoff) = cutoff_index {
            file_projection[cutoff] = Some(pivot);
        }
        series::build_target_projection(axis.len(), cutoff_index, pivot, rate, total_scope)
    } else {
        vec![None; axis.len()]
    };

    let unit = actual_row
        .map(|r| r.unit.clone())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| baseline_row.unit.clone());

    let kpi = kpi::compute_kpis(
        total_scope,
        pivot,
        baseline_at_cutoff,
        gap,
        rate,
        cutoff_index,
        unit,
    );

    Some(ActivityCurve {
        discipline: discipline.to_string(),
        activity: activity.to_string(),
        date_axis: axis.dates().to_vec(),
        baseline,
        actual,
        file_projection,
        target_projection,
        scope_completion_date,
        kpi,
    })
}
