//! KPI summary command: per-activity indicators as a CSV table.

use chrono::NaiveDate;
use log::info;
use obra_core::parse::format_quantity;
use obra_engine::curve::build_curves;

/// Compute the curves and write one KPI row per activity.
///
/// Column names follow the vocabulary of the source table so the
/// summary can sit next to the raw export in the same spreadsheet.
pub fn run_kpi(
    input: &str,
    output: &str,
    cutoff: Option<NaiveDate>,
    target: Option<NaiveDate>,
    cumulative: bool,
    delimiter: char,
) -> anyhow::Result<()> {
    let table = crate::load_table(input, delimiter)?;
    let params = crate::resolve_params(&table, cutoff, target, cumulative);
    let curves = build_curves(&table, &params);

    let mut wtr = csv::Writer::from_path(output)?;
    wtr.write_record([
        "Disciplina",
        "Actividad",
        "Alcance",
        "Avance",
        "PctAvance",
        "Desviacion",
        "PctDesviacion",
        "Remanente",
        "PctRemanente",
        "TasaSemanal",
        "Unidad",
    ])?;
    for curve in &curves {
        let kpi = &curve.kpi;
        wtr.write_record(&[
            curve.discipline.clone(),
            curve.activity.clone(),
            format_quantity(kpi.total_scope),
            format_quantity(kpi.current_progress),
            format_quantity(kpi.percent_complete),
            format_quantity(kpi.deviation_absolute),
            format_quantity(kpi.deviation_percent),
            format_quantity(kpi.remaining),
            format_quantity(kpi.remaining_percent),
            format_quantity(kpi.weekly_required_rate),
            kpi.unit.clone(),
        ])?;
    }
    wtr.flush()?;

    info!(
        "KPI summary for {} activities written to {} (cutoff {})",
        curves.len(),
        output,
        params.cutoff
    );
    Ok(())
}
