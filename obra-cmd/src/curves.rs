//! Curve computation command: quantities CSV in, chart-ready JSON out.

use chrono::NaiveDate;
use log::info;
use obra_engine::curve::build_curves;

/// Compute every activity curve in the table and write the result as a
/// JSON document for the rendering collaborator.
pub fn run_curves(
    input: &str,
    output: &str,
    cutoff: Option<NaiveDate>,
    target: Option<NaiveDate>,
    cumulative: bool,
    delimiter: char,
) -> anyhow::Result<()> {
    let table = crate::load_table(input, delimiter)?;
    let params = crate::resolve_params(&table, cutoff, target, cumulative);

    info!(
        "computing curves for {} activities (cutoff {}, target {}, {})",
        table.pairs().len(),
        params.cutoff,
        params.target,
        if params.cumulative {
            "cumulative data"
        } else {
            "weekly deltas"
        }
    );

    let curves = build_curves(&table, &params);
    let json = serde_json::to_string_pretty(&curves)?;
    std::fs::write(output, json)?;

    info!("{} curves written to {}", curves.len(), output);
    Ok(())
}
