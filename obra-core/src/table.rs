//! Quantities-table loading and serialization.
//!
//! The table is a flat CSV export from an external planning tool. The
//! header row mixes a fixed set of static columns with one column per
//! reporting week:
//!
//! ```text
//! Curva;Disciplina;Actividad;Alcance;Actual;Remanente;unidad;2025-01-06;2025-01-13;...
//! Línea Base;Piping;Soldadura;400;;;ml;10;10;...
//! Avance Real;Piping;Soldadura;400;35;365;ml;12;8;...
//! ```
//!
//! Static columns are matched case- and accent-insensitively; any other
//! header must be an ISO `YYYY-MM-DD` date or it is skipped. The
//! delimiter is explicit configuration -- no sniffing happens here.

use crate::error::{ObraError, Result};
use crate::parse::{format_date, format_quantity, normalize_label, parse_iso_date, parse_quantity};
use crate::record::{CurveKind, ProgressRecord};
use chrono::NaiveDate;
use itertools::Itertools;
use std::collections::BTreeSet;

/// Static column order used for serialization, mirroring the source format.
const STATIC_HEADERS: [&str; 7] = [
    "Curva",
    "Disciplina",
    "Actividad",
    "Alcance",
    "Actual",
    "Remanente",
    "unidad",
];

/// Role of one header cell.
enum Column {
    Curve,
    Discipline,
    Activity,
    Scope,
    ActualToDate,
    Remaining,
    Unit,
    Date(NaiveDate),
    Skip,
}

fn classify_header(header: &str) -> Column {
    match normalize_label(header).as_str() {
        "curva" => Column::Curve,
        "disciplina" => Column::Discipline,
        "actividad" => Column::Activity,
        "alcance" => Column::Scope,
        "actual" => Column::ActualToDate,
        "remanente" => Column::Remaining,
        "unidad" => Column::Unit,
        other => match parse_iso_date(other) {
            Some(date) => Column::Date(date),
            None => Column::Skip,
        },
    }
}

/// The full quantities table: one [`ProgressRecord`] per CSV row.
#[derive(Debug, Clone, Default)]
pub struct QuantityTable {
    pub rows: Vec<ProgressRecord>,
}

impl QuantityTable {
    /// Parse a quantities CSV from a string.
    ///
    /// Unrecognized header columns (non-static, non-ISO-date) are skipped
    /// rather than failing the whole load; empty cells stay absent.
    pub fn from_csv_str(data: &str, delimiter: u8) -> Result<QuantityTable> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(data.as_bytes());

        let headers = rdr.headers()?.clone();
        let columns: Vec<Column> = headers.iter().map(classify_header).collect();
        let date_columns = columns
            .iter()
            .filter(|c| matches!(c, Column::Date(_)))
            .count();
        let skipped_columns = columns.iter().filter(|c| matches!(c, Column::Skip)).count();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let mut row = ProgressRecord::new("", "", "");
            for (i, column) in columns.iter().enumerate() {
                let cell = record.get(i).unwrap_or("").trim();
                match column {
                    Column::Curve => {
                        row.label = cell.to_string();
                        row.kind = CurveKind::classify(cell);
                    }
                    Column::Discipline => row.discipline = cell.to_string(),
                    Column::Activity => row.activity = cell.to_string(),
                    Column::Scope => {
                        if !cell.is_empty() {
                            row.scope = Some(parse_quantity(cell));
                        }
                    }
                    Column::ActualToDate => {
                        if !cell.is_empty() {
                            row.actual_to_date = Some(parse_quantity(cell));
                        }
                    }
                    Column::Remaining => {
                        if !cell.is_empty() {
                            row.remaining = Some(parse_quantity(cell));
                        }
                    }
                    Column::Unit => row.unit = cell.to_string(),
                    Column::Date(date) => {
                        if !cell.is_empty() {
                            row.values.insert(*date, parse_quantity(cell));
                        }
                    }
                    Column::Skip => {}
                }
            }
            rows.push(row);
        }

        log::info!(
            "loader: {} rows, {} date columns ({} unrecognized headers skipped)",
            rows.len(),
            date_columns,
            skipped_columns
        );
        Ok(QuantityTable { rows })
    }

    /// Sorted union of every dated column reported by any row.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows
            .iter()
            .flat_map(|row| row.values.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The standard weekly grid: the dates reported by Baseline rows,
    /// falling back to all rows when the table has no Baseline row.
    pub fn week_grid(&self) -> Vec<NaiveDate> {
        let grid: BTreeSet<NaiveDate> = self
            .rows
            .iter()
            .filter(|row| row.kind == CurveKind::Baseline)
            .flat_map(|row| row.values.keys().copied())
            .collect();
        if grid.is_empty() {
            return self.dates();
        }
        grid.into_iter().collect()
    }

    /// Distinct (discipline, activity) pairs in first-appearance order,
    /// skipping rows with a blank grouping key.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.rows
            .iter()
            .filter(|row| !row.discipline.is_empty() && !row.activity.is_empty())
            .map(|row| (row.discipline.clone(), row.activity.clone()))
            .unique()
            .collect()
    }

    /// First row of the given kind for a (discipline, activity) pair.
    pub fn find_row(&self, kind: CurveKind, discipline: &str, activity: &str) -> Option<&ProgressRecord> {
        self.rows
            .iter()
            .find(|row| row.kind == kind && row.matches(discipline, activity))
    }

    /// Serialize the table back to CSV, static columns first and every
    /// known dated column after them in chronological order.
    pub fn to_csv_string(&self) -> Result<String> {
        let dates = self.dates();
        self.to_csv_string_for_dates(&dates)
    }

    /// Serialize the table restricted to the given dated columns.
    ///
    /// Used by the export path, which writes only the standard weekly
    /// grid; cells outside `dates` are simply not written.
    pub fn to_csv_string_for_dates(&self, dates: &[NaiveDate]) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());

        let mut header: Vec<String> = STATIC_HEADERS.iter().map(|h| h.to_string()).collect();
        header.extend(dates.iter().map(format_date));
        wtr.write_record(&header)?;

        let format_opt = |value: Option<f64>| value.map(format_quantity).unwrap_or_default();
        for row in &self.rows {
            let mut fields = vec![
                row.label.clone(),
                row.discipline.clone(),
                row.activity.clone(),
                format_opt(row.scope),
                format_opt(row.actual_to_date),
                format_opt(row.remaining),
                row.unit.clone(),
            ];
            fields.extend(dates.iter().map(|date| format_opt(row.value_at(date))));
            wtr.write_record(&fields)?;
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| ObraError::InvalidFormat(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ObraError::InvalidFormat(e.to_string()))
    }
}
