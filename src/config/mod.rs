//! Configuration loading and management for the Payroll Calculation Engine.
//!
//! This module provides functionality to load versioned payroll policies from
//! YAML files: statutory rates and ceilings, overtime rules, attendance
//! handling, and the work week.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Loaded {} policies", config.policies().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendancePolicy, IncomeTaxPolicy, OvertimePolicy, PayrollPolicy, ProfessionalTaxPolicy,
    ProvidentFundPolicy, StateInsurancePolicy, UnknownStatusPolicy, WorkWeekPolicy,
};
