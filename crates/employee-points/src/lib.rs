//! Bug-fix point ledger: employees earn points per fixed bug, points are grouped
//! into named periods, and each period is evaluated to a single winner.

pub mod config;
pub mod error;
pub mod points;
pub mod telemetry;
