//! Write-path helpers: manual corrections and export normalization.
//!
//! Both functions are copy-on-write -- callers get a new row collection
//! to persist and the input table is never touched, matching how the
//! read path treats its inputs.

use chrono::NaiveDate;
use obra_core::record::{CurveKind, ProgressRecord};
use obra_core::table::QuantityTable;
use std::collections::BTreeMap;

/// Apply a user-supplied (date, value) correction to the Actual row of
/// one activity and recompute its running total.
///
/// A pair with no Actual row gets one created from whatever other row
/// the pair already has (scope, unit and remaining carry over), so a
/// correction can seed progress tracking for an activity that so far
/// only had a plan. The recomputed total covers every dated cell up to
/// and including the cutoff, keeping the displayed KPI consistent with
/// the just-edited raw data.
pub fn apply_manual_entry(
    table: &QuantityTable,
    discipline: &str,
    activity: &str,
    date: NaiveDate,
    value: f64,
    cutoff: NaiveDate,
    cumulative: bool,
) -> QuantityTable {
    let mut updated = table.clone();

    let index = updated
        .rows
        .iter()
        .position(|row| row.kind == CurveKind::Actual && row.matches(discipline, activity));
    let index = match index {
        Some(i) => i,
        None => {
            let mut row = ProgressRecord::new("Avance Real", discipline, activity);
            if let Some(template) = updated.rows.iter().find(|r| r.matches(discipline, activity)) {
                row.scope = template.scope;
                row.remaining = template.remaining;
                row.unit = template.unit.clone();
            }
            updated.rows.push(row);
            updated.rows.len() - 1
        }
    };

    let row = &mut updated.rows[index];
    row.values.insert(date, value);
    let total = recompute_total(row, cutoff, cumulative);
    row.actual_to_date = Some(total);
    log::info!(
        "manual entry {}/{}: {} = {}, total to cutoff now {}",
        discipline,
        activity,
        date,
        value,
        total
    );
    updated
}

/// Running total over the row's dated cells up to and including the
/// cutoff: the last positive value for cumulative data, the sum of the
/// deltas otherwise.
fn recompute_total(row: &ProgressRecord, cutoff: NaiveDate, cumulative: bool) -> f64 {
    let mut total = 0.0;
    for (date, value) in &row.values {
        if *date > cutoff {
            break;
        }
        if cumulative {
            if *value > 0.0 {
                total = *value;
            }
        } else {
            total += *value;
        }
    }
    total
}

/// Fold off-grid dated cells of Actual rows into the standard weekly
/// grid, so hand-entered mid-week corrections land in the planning
/// tool's own columns on export.
///
/// A cell at date `d` folds into the grid week `w` with `w <= d <
/// next(w)`; the last grid week absorbs everything at or beyond it.
/// Dates earlier than the first grid week have no bucket and are
/// dropped. Rows other than Actual pass through untouched.
pub fn fold_to_week_grid(table: &QuantityTable) -> QuantityTable {
    let grid = table.week_grid();
    if grid.is_empty() {
        return table.clone();
    }

    let mut updated = table.clone();
    for row in &mut updated.rows {
        if row.kind != CurveKind::Actual {
            continue;
        }
        let mut folded: BTreeMap<NaiveDate, f64> = row
            .values
            .iter()
            .filter(|(date, _)| grid.binary_search(date).is_ok())
            .map(|(date, value)| (*date, *value))
            .collect();
        let mut dropped = 0usize;
        for (date, value) in &row.values {
            if grid.binary_search(date).is_ok() || *value == 0.0 {
                continue;
            }
            match bucket_for(&grid, *date) {
                Some(week) => *folded.entry(week).or_insert(0.0) += *value,
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            log::warn!(
                "{}/{}: {} entries before the first standard week were dropped on export",
                row.discipline,
                row.activity,
                dropped
            );
        }
        row.values = folded;
    }
    updated
}

/// The grid week a date belongs to, if any.
fn bucket_for(grid: &[NaiveDate], date: NaiveDate) -> Option<NaiveDate> {
    for (i, week) in grid.iter().enumerate() {
        match grid.get(i + 1) {
            Some(next) => {
                if date >= *week && date < *next {
                    return Some(*week);
                }
            }
            None => {
                if date >= *week {
                    return Some(*week);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table_with_actual() -> QuantityTable {
        let mut baseline = ProgressRecord::new("Línea Base", "Piping", "Soldadura");
        baseline.scope = Some(40.0);
        baseline.unit = "ml".to_string();
        for (d, v) in [
            (date(2025, 1, 6), 10.0),
            (date(2025, 1, 13), 10.0),
            (date(2025, 1, 20), 10.0),
            (date(2025, 1, 27), 10.0),
        ] {
            baseline.values.insert(d, v);
        }

        let mut actual = ProgressRecord::new("Avance Real", "Piping", "Soldadura");
        actual.values.insert(date(2025, 1, 6), 12.0);
        actual.values.insert(date(2025, 1, 13), 10.0);
        actual.values.insert(date(2025, 1, 20), 8.0);

        QuantityTable {
            rows: vec![baseline, actual],
        }
    }

    #[test]
    fn test_manual_entry_recomputes_total() {
        let table = table_with_actual();
        // dated cells sum to 30 up through the cutoff; add 5 more
        let updated = apply_manual_entry(
            &table,
            "Piping",
            "Soldadura",
            date(2025, 1, 10),
            5.0,
            date(2025, 1, 20),
            false,
        );
        let row = updated
            .find_row(CurveKind::Actual, "Piping", "Soldadura")
            .unwrap();
        assert_eq!(row.actual_to_date, Some(35.0));
        assert_eq!(row.value_at(&date(2025, 1, 10)), Some(5.0));
    }

    #[test]
    fn test_manual_entry_ignores_cells_past_cutoff() {
        let table = table_with_actual();
        let updated = apply_manual_entry(
            &table,
            "Piping",
            "Soldadura",
            date(2025, 1, 27),
            99.0,
            date(2025, 1, 13),
            false,
        );
        let row = updated
            .find_row(CurveKind::Actual, "Piping", "Soldadura")
            .unwrap();
        // only the first two weeks fall within the cutoff
        assert_eq!(row.actual_to_date, Some(22.0));
    }

    #[test]
    fn test_manual_entry_cumulative_takes_last_positive() {
        let mut table = table_with_actual();
        table.rows[1].values.insert(date(2025, 1, 13), 0.0);
        let updated = apply_manual_entry(
            &table,
            "Piping",
            "Soldadura",
            date(2025, 1, 20),
            18.0,
            date(2025, 1, 20),
            true,
        );
        let row = updated
            .find_row(CurveKind::Actual, "Piping", "Soldadura")
            .unwrap();
        // 12, then an explicit 0, then 18: the last positive wins
        assert_eq!(row.actual_to_date, Some(18.0));
    }

    #[test]
    fn test_manual_entry_creates_missing_row() {
        let table = QuantityTable {
            rows: vec![{
                let mut baseline = ProgressRecord::new("Línea Base", "Civil", "Hormigón");
                baseline.scope = Some(200.0);
                baseline.unit = "m3".to_string();
                baseline
            }],
        };
        let updated = apply_manual_entry(
            &table,
            "Civil",
            "Hormigón",
            date(2025, 2, 3),
            25.0,
            date(2025, 2, 3),
            false,
        );
        assert_eq!(updated.rows.len(), 2);
        let row = updated
            .find_row(CurveKind::Actual, "Civil", "Hormigón")
            .unwrap();
        assert_eq!(row.scope, Some(200.0));
        assert_eq!(row.unit, "m3");
        assert_eq!(row.actual_to_date, Some(25.0));
    }

    #[test]
    fn test_manual_entry_is_copy_on_write() {
        let table = table_with_actual();
        let _updated = apply_manual_entry(
            &table,
            "Piping",
            "Soldadura",
            date(2025, 1, 10),
            5.0,
            date(2025, 1, 20),
            false,
        );
        // the input table still has no cell at the corrected date
        assert!(!table.rows[1].has_value_at(&date(2025, 1, 10)));
        assert_eq!(table.rows[1].actual_to_date, None);
    }

    #[test]
    fn test_fold_moves_offgrid_cells_into_weeks() {
        let mut table = table_with_actual();
        // a Thursday correction between the Jan 6 and Jan 13 weeks
        table.rows[1].values.insert(date(2025, 1, 9), 3.0);
        let folded = fold_to_week_grid(&table);
        let row = folded
            .find_row(CurveKind::Actual, "Piping", "Soldadura")
            .unwrap();
        assert_eq!(row.value_at(&date(2025, 1, 6)), Some(15.0));
        assert!(!row.has_value_at(&date(2025, 1, 9)));
    }

    #[test]
    fn test_fold_last_week_absorbs_tail() {
        let mut table = table_with_actual();
        table.rows[1].values.insert(date(2025, 2, 14), 4.0);
        let folded = fold_to_week_grid(&table);
        let row = folded
            .find_row(CurveKind::Actual, "Piping", "Soldadura")
            .unwrap();
        assert_eq!(row.value_at(&date(2025, 1, 27)), Some(4.0));
    }

    #[test]
    fn test_fold_drops_entries_before_grid() {
        let mut table = table_with_actual();
        table.rows[1].values.insert(date(2024, 12, 1), 7.0);
        let folded = fold_to_week_grid(&table);
        let row = folded
            .find_row(CurveKind::Actual, "Piping", "Soldadura")
            .unwrap();
        assert!(!row.has_value_at(&date(2024, 12, 1)));
        // nothing else moved
        assert_eq!(row.value_at(&date(2025, 1, 6)), Some(12.0));
    }

    #[test]
    fn test_fold_leaves_baseline_rows_alone() {
        let mut table = table_with_actual();
        table.rows[0].values.insert(date(2025, 1, 9), 3.0);
        let folded = fold_to_week_grid(&table);
        // the off-grid baseline cell is untouched by the fold itself
        assert_eq!(folded.rows[0].value_at(&date(2025, 1, 9)), Some(3.0));
    }
}
