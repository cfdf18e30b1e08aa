//! Progress-curve computation for construction quantity tracking.
//!
//! This crate turns the flat quantities table into per-activity chart
//! series (baseline, actual, projections) plus summary KPIs. The whole
//! engine is a pure function of the table and the caller's parameters:
//! nothing is cached between invocations and the input collection is
//! never mutated, so every change to the cutoff date, target date or
//! encoding flag simply recomputes in full.

pub mod axis;
pub mod curve;
pub mod entry;
pub mod kpi;
pub mod series;
