use crate::parse::normalize_label;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Classification of a quantities row, fixed once at ingestion.
///
/// Source files tag each row with a free-text curve name; classifying
/// that text once when the row is loaded means the rest of the code
/// never has to re-match strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CurveKind {
    /// Planned/scheduled progress ("línea base")
    Baseline,
    /// Recorded real-world progress ("avance real" / "curva real")
    Actual,
    /// Any other curve; never grouped into an activity curve
    Other,
}

impl CurveKind {
    /// Classify a free-text curve label, case- and accent-insensitively.
    pub fn classify(label: &str) -> CurveKind {
        let text = normalize_label(label);
        if text.contains("linea base") {
            CurveKind::Baseline
        } else if text.contains("avance real") || text.contains("curva real") {
            CurveKind::Actual
        } else {
            CurveKind::Other
        }
    }
}

/// One row of the quantities table.
///
/// Static columns are parsed into typed fields; every ISO-dated column
/// becomes an entry in `values`. An empty cell is absent from the map,
/// while a non-empty but unparseable cell is present with value 0.0 --
/// the distinction drives the hold-previous rule for cumulative series.
#[derive(Debug, Clone)]
pub struct ProgressRecord {
    pub kind: CurveKind,
    /// Original curve label, preserved for write-back
    pub label: String,
    pub discipline: String,
    pub activity: String,
    /// Declared total quantity ("Alcance")
    pub scope: Option<f64>,
    /// File-supplied progress total ("Actual")
    pub actual_to_date: Option<f64>,
    /// File-supplied remaining total ("Remanente")
    pub remaining: Option<f64>,
    pub unit: String,
    pub values: BTreeMap<NaiveDate, f64>,
}

impl ProgressRecord {
    /// Create an empty record with the given identity; the curve kind is
    /// derived from the label.
    pub fn new(label: &str, discipline: &str, activity: &str) -> Self {
        ProgressRecord {
            kind: CurveKind::classify(label),
            label: label.to_string(),
            discipline: discipline.to_string(),
            activity: activity.to_string(),
            scope: None,
            actual_to_date: None,
            remaining: None,
            unit: String::new(),
            values: BTreeMap::new(),
        }
    }

    /// True when the row belongs to the given (discipline, activity) pair.
    pub fn matches(&self, discipline: &str, activity: &str) -> bool {
        self.discipline == discipline && self.activity == activity
    }

    /// The cell value at a date, if the row reported one.
    pub fn value_at(&self, date: &NaiveDate) -> Option<f64> {
        self.values.get(date).copied()
    }

    /// True when the row has an explicit (possibly zero) cell at the date.
    pub fn has_value_at(&self, date: &NaiveDate) -> bool {
        self.values.contains_key(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_baseline() {
        assert_eq!(CurveKind::classify("Línea Base"), CurveKind::Baseline);
        assert_eq!(CurveKind::classify("LINEA BASE REV2"), CurveKind::Baseline);
    }

    #[test]
    fn test_classify_actual() {
        assert_eq!(CurveKind::classify("Avance Real"), CurveKind::Actual);
        assert_eq!(CurveKind::classify("curva real"), CurveKind::Actual);
        assert_eq!(CurveKind::classify("CURVA REAL ACUM."), CurveKind::Actual);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(CurveKind::classify("Proyección"), CurveKind::Other);
        assert_eq!(CurveKind::classify(""), CurveKind::Other);
    }

    #[test]
    fn test_record_matching() {
        let record = ProgressRecord::new("Avance Real", "Piping", "Soldadura");
        assert_eq!(record.kind, CurveKind::Actual);
        assert!(record.matches("Piping", "Soldadura"));
        assert!(!record.matches("Piping", "Montaje"));
    }
}
