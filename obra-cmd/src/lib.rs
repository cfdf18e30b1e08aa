//! Command implementations for the obra CLI.
//!
//! Provides subcommands for computing progress curves and KPI summaries
//! from planning-tool CSV exports, and for the write path: manual
//! corrections and weekly-grid export normalization.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use obra_core::table::QuantityTable;
use obra_engine::curve::CurveParams;

pub mod curves;
pub mod export;
pub mod kpi;
pub mod record;

#[derive(Subcommand)]
pub enum Command {
    /// Compute per-activity progress curves and write them as JSON
    Curves {
        /// Path to the quantities CSV
        #[arg(short = 'i', long)]
        input: String,

        /// Output path for the curves JSON
        #[arg(short = 'o', long)]
        output: String,

        /// Cutoff date (YYYY-MM-DD); defaults to the latest table date not after today
        #[arg(long)]
        cutoff: Option<NaiveDate>,

        /// Target completion date (YYYY-MM-DD); defaults to the last table date
        #[arg(long)]
        target: Option<NaiveDate>,

        /// Dated cells hold running totals instead of weekly deltas
        #[arg(long)]
        cumulative: bool,

        /// CSV field delimiter of the input file
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },

    /// Compute per-activity KPI summaries and write them as a CSV table
    Kpi {
        /// Path to the quantities CSV
        #[arg(short = 'i', long)]
        input: String,

        /// Output path for the KPI summary CSV
        #[arg(short = 'o', long)]
        output: String,

        /// Cutoff date (YYYY-MM-DD); defaults to the latest table date not after today
        #[arg(long)]
        cutoff: Option<NaiveDate>,

        /// Target completion date (YYYY-MM-DD); defaults to the last table date
        #[arg(long)]
        target: Option<NaiveDate>,

        /// Dated cells hold running totals instead of weekly deltas
        #[arg(long)]
        cumulative: bool,

        /// CSV field delimiter of the input file
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },

    /// Apply one manual progress entry and write the updated quantities CSV
    Record {
        /// Path to the quantities CSV
        #[arg(short = 'i', long)]
        input: String,

        /// Output path for the updated CSV (may equal the input path)
        #[arg(short = 'o', long)]
        output: String,

        /// Discipline of the activity to correct
        #[arg(long)]
        discipline: String,

        /// Activity to correct
        #[arg(long)]
        activity: String,

        /// Date of the entry (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Reported value for that date
        #[arg(long)]
        value: f64,

        /// Cutoff date for the recomputed total; defaults to the latest table date not after today
        #[arg(long)]
        cutoff: Option<NaiveDate>,

        /// Dated cells hold running totals instead of weekly deltas
        #[arg(long)]
        cumulative: bool,

        /// CSV field delimiter of the input file
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },

    /// Fold off-grid manual entries into the standard weekly columns and write the normalized CSV
    Export {
        /// Path to the quantities CSV
        #[arg(short = 'i', long)]
        input: String,

        /// Output path for the normalized CSV
        #[arg(short = 'o', long)]
        output: String,

        /// CSV field delimiter of the input file
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Curves {
            input,
            output,
            cutoff,
            target,
            cumulative,
            delimiter,
        } => curves::run_curves(&input, &output, cutoff, target, cumulative, delimiter),
        Command::Kpi {
            input,
            output,
            cutoff,
            target,
            cumulative,
            delimiter,
        } => kpi::run_kpi(&input, &output, cutoff, target, cumulative, delimiter),
        Command::Record {
            input,
            output,
            discipline,
            activity,
            date,
            value,
            cutoff,
            cumulative,
            delimiter,
        } => record::run_record(
            &input,
            &output,
            &discipline,
            &activity,
            date,
            value,
            cutoff,
            cumulative,
            delimiter,
        ),
        Command::Export {
            input,
            output,
            delimiter,
        } => export::run_export(&input, &output, delimiter),
    }
}

/// Read and parse a quantities CSV from disk.
pub(crate) fn load_table(path: &str, delimiter: char) -> anyhow::Result<QuantityTable> {
    anyhow::ensure!(delimiter.is_ascii(), "delimiter must be an ASCII character");
    let data = std::fs::read_to_string(path)?;
    Ok(QuantityTable::from_csv_str(&data, delimiter as u8)?)
}

/// Fill unspecified engine parameters from the table contents.
///
/// The default cutoff is the latest table date not after today (the
/// as-of week a site manager would report against), falling back to the
/// first table date for a plan that has not started; the default target
/// is the last table date.
pub(crate) fn resolve_params(
    table: &QuantityTable,
    cutoff: Option<NaiveDate>,
    target: Option<NaiveDate>,
    cumulative: bool,
) -> CurveParams {
    let dates = table.dates();
    let today = Local::now().naive_local().date();
    let cutoff = cutoff.unwrap_or_else(|| {
        dates
            .iter()
            .rev()
            .find(|date| **date <= today)
            .copied()
            .or_else(|| dates.first().copied())
            .unwrap_or(today)
    });
    let target = target.unwrap_or_else(|| dates.last().copied().unwrap_or(today));
    CurveParams {
        cutoff,
        target,
        cumulative,
    }
}
