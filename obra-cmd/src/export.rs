//! Export command: normalize manual entries onto the weekly grid.

use log::info;
use obra_engine::entry::fold_to_week_grid;

/// Fold off-grid manual entries into the standard weekly columns and
/// write a CSV restricted to that grid, ready to re-import into the
/// planning tool the table originally came from.
pub fn run_export(input: &str, output: &str, delimiter: char) -> anyhow::Result<()> {
    let table = crate::load_table(input, delimiter)?;
    let folded = fold_to_week_grid(&table);
    let grid = folded.week_grid();

    std::fs::write(output, folded.to_csv_string_for_dates(&grid)?)?;

    info!(
        "normalized table written to {} ({} weekly columns)",
        output,
        grid.len()
    );
    Ok(())
}
