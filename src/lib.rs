//! Payroll Calculation Engine
//!
//! This crate derives an employee's monthly payroll from a salary structure,
//! the period's attendance and a versioned payroll policy: prorated
//! allowances, loss of pay, overtime, and the statutory PF, ESI, PT and TDS
//! deductions. Every calculation is deterministic and carries an audit trace.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod data_source;
pub mod engine;
pub mod error;
pub mod models;
