//! Manual entry command: apply one correction and write the table back.

use chrono::NaiveDate;
use log::info;
use obra_engine::entry::apply_manual_entry;

/// Apply a (discipline, activity, date, value) correction to the table
/// and persist the updated row collection.
///
/// The computation is copy-on-write, so writing to a different output
/// path leaves the input file as an untouched backup of the pre-edit
/// state.
#[allow(clippy::too_many_arguments)]
pub fn run_record(
    input: &str,
    output: &str,
    discipline: &str,
    activity: &str,
    date: NaiveDate,
    value: f64,
    cutoff: Option<NaiveDate>,
    cumulative: bool,
    delimiter: char,
) -> anyhow::Result<()> {
    let table = crate::load_table(input, delimiter)?;
    let cutoff = crate::resolve_params(&table, cutoff, None, cumulative).cutoff;

    let updated = apply_manual_entry(&table, discipline, activity, date, value, cutoff, cumulative);
    std::fs::write(output, updated.to_csv_string()?)?;

    info!("updated quantities table written to {}", output);
    Ok(())
}
