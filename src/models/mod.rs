//! Core data models for the Payroll Calculation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod calculation_result;
mod pay_component;
mod salary_assignment;

pub use attendance::{AttendanceMetrics, AttendanceRecord, AttendanceStatus};
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, ComponentCalculationResult, PayrollCalculationResult,
    StatutoryBreakdown,
};
pub use pay_component::{
    BaseComponent, CalculationType, ComponentCategory, ComponentType, PayComponent,
    SalaryStructure, SalaryStructureComponent,
};
pub use salary_assignment::{ComponentOverride, EmployeeSalaryAssignment};
