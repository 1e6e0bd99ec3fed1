//! Property tests for the payroll invariants that must hold for any input.

use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use payroll_engine::calculation::aggregate_attendance;
use payroll_engine::config::{ConfigLoader, PayrollPolicy};
use payroll_engine::data_source::InMemoryDataSource;
use payroll_engine::engine::PayrollEngine;
use payroll_engine::models::{AttendanceRecord, AttendanceStatus, EmployeeSalaryAssignment};

fn status_from_index(index: u8) -> AttendanceStatus {
    match index {
        0 => AttendanceStatus::Present,
        1 => AttendanceStatus::Absent,
        2 => AttendanceStatus::HalfDay,
        3 => AttendanceStatus::OnLeave,
        4 => AttendanceStatus::WorkFromHome,
        _ => AttendanceStatus::Other("COMP_OFF".to_string()),
    }
}

fn component(id: &str, code: &str, component_type: &str, category: &str, rule: Value) -> Value {
    let mut entry = json!({
        "component": {
            "id": id,
            "code": code,
            "name": code,
            "type": component_type,
            "category": category,
            "calculation_type": rule["calculation_type"],
            "is_statutory": category == "STATUTORY_DEDUCTION"
        }
    });
    for (key, value) in rule.as_object().unwrap() {
        if key != "calculation_type" {
            entry[key] = value.clone();
        }
    }
    entry
}

fn create_assignment(employee_id: &str, ctc: u32, hra_override: Option<u32>) -> EmployeeSalaryAssignment {
    let overrides: Vec<Value> = hra_override
        .map(|value| json!({ "component_id": "comp_hra", "value": value.to_string() }))
        .into_iter()
        .collect();

    serde_json::from_value(json!({
        "id": format!("asg_{}", employee_id),
        "employee_id": employee_id,
        "ctc": ctc.to_string(),
        "effective_from": "2025-01-01",
        "overrides": overrides,
        "structure": {
            "id": "std_structure",
            "name": "Standard Structure",
            "components": [
                component("comp_basic", "BASIC", "EARNING", "BASIC", json!({
                    "calculation_type": "PERCENTAGE", "order": 1, "percentage": "45", "base_component": "CTC"
                })),
                component("comp_hra", "HRA", "EARNING", "ALLOWANCE", json!({
                    "calculation_type": "PERCENTAGE", "order": 2, "percentage": "40", "base_component": "BASIC"
                })),
                component("comp_ta", "TA", "EARNING", "ALLOWANCE", json!({
                    "calculation_type": "FIXED", "order": 3, "value": "2000"
                })),
                component("comp_pf", "PF", "DEDUCTION", "STATUTORY_DEDUCTION", json!({
                    "calculation_type": "PERCENTAGE", "order": 4, "percentage": "12",
                    "base_component": "BASIC", "max_value": "1800"
                })),
                component("comp_esi", "ESI", "DEDUCTION", "STATUTORY_DEDUCTION", json!({
                    "calculation_type": "FIXED", "order": 5, "value": "0"
                })),
                component("comp_pt", "PT", "DEDUCTION", "STATUTORY_DEDUCTION", json!({
                    "calculation_type": "FIXED", "order": 6, "value": "200"
                }))
            ]
        }
    }))
    .unwrap()
}

fn april_attendance(employee_id: &str, present: usize) -> Vec<AttendanceRecord> {
    let first = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
    first
        .iter_days()
        .take_while(|d| d.month() == 4)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .map(|(i, date)| AttendanceRecord {
            employee_id: employee_id.to_string(),
            date,
            status: if i < present {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            },
            overtime: None,
        })
        .collect()
}

fn create_engine(
    assignments: Vec<EmployeeSalaryAssignment>,
    attendance: Vec<AttendanceRecord>,
) -> PayrollEngine<InMemoryDataSource> {
    let mut source = InMemoryDataSource::new();
    source.add_assignments(assignments);
    source.add_attendance(attendance);
    PayrollEngine::new(source, ConfigLoader::from_policies(vec![PayrollPolicy::default()]))
}

fn april(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
}

proptest! {
    #[test]
    fn attendance_metrics_stay_within_working_days(
        statuses in prop::collection::vec(0u8..6, 0..=31),
        working_days in 1u32..=31,
        overtime in prop::option::of(-4.0f64..20.0),
    ) {
        let first = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let records: Vec<AttendanceRecord> = statuses
            .iter()
            .zip(first.iter_days())
            .map(|(index, date)| AttendanceRecord {
                employee_id: "emp_001".to_string(),
                date,
                status: status_from_index(*index),
                overtime,
            })
            .collect();

        let aggregation =
            aggregate_attendance("emp_001", &records, working_days, &PayrollPolicy::default(), 1)
                .unwrap();
        let metrics = aggregation.metrics;
        let working = Decimal::from(working_days);

        prop_assert!(metrics.present_days >= Decimal::ZERO);
        prop_assert!(metrics.present_days <= working);
        prop_assert_eq!(metrics.lop_days, (working - metrics.present_days).max(Decimal::ZERO));
        prop_assert!(metrics.absent_days >= Decimal::ZERO);
        prop_assert!(metrics.overtime_hours >= Decimal::ZERO);
    }

    #[test]
    fn net_salary_reconciles_with_components(
        ctc in 1_000u32..=500_000,
        present in 0usize..=22,
        hra_override in prop::option::of(0u32..=20_000),
    ) {
        let engine = create_engine(
            vec![create_assignment("emp_001", ctc, hra_override)],
            april_attendance("emp_001", present),
        );
        let result = engine
            .calculate_employee_payroll("emp_001", "2025-04", april(1), april(30), 22)
            .unwrap();

        let earnings: Decimal = result
            .components
            .iter()
            .filter(|c| c.is_earning())
            .map(|c| c.calculated_value)
            .sum();
        let deductions: Decimal = result
            .components
            .iter()
            .filter(|c| !c.is_earning())
            .map(|c| c.calculated_value)
            .sum();

        prop_assert_eq!(result.total_earnings, earnings);
        prop_assert_eq!(result.total_deductions, deductions);
        prop_assert_eq!(result.net_salary, result.total_earnings - result.total_deductions);
        prop_assert_eq!(result.gross_salary, result.total_earnings);
    }

    #[test]
    fn statutory_limits_hold(
        ctc in 1_000u32..=500_000,
        present in 0usize..=22,
    ) {
        let engine = create_engine(
            vec![create_assignment("emp_001", ctc, None)],
            april_attendance("emp_001", present),
        );
        let result = engine
            .calculate_employee_payroll("emp_001", "2025-04", april(1), april(30), 22)
            .unwrap();

        prop_assert!(result.statutory.pf <= Decimal::from(1800));
        prop_assert!(result.statutory.pf >= Decimal::ZERO);
        if result.gross_salary > Decimal::from(25000) {
            prop_assert_eq!(result.statutory.esi, Decimal::ZERO);
        }
        prop_assert_eq!(result.statutory.pt, Decimal::from(200));
    }

    #[test]
    fn override_is_used_verbatim(
        ctc in 1_000u32..=500_000,
        present in 0usize..=22,
        hra_override in 0u32..=20_000,
    ) {
        let engine = create_engine(
            vec![create_assignment("emp_001", ctc, Some(hra_override))],
            april_attendance("emp_001", present),
        );
        let result = engine
            .calculate_employee_payroll("emp_001", "2025-04", april(1), april(30), 22)
            .unwrap();

        let hra = result.components.iter().find(|c| c.code == "HRA").unwrap();
        prop_assert_eq!(hra.calculated_value, Decimal::from(hra_override));
        prop_assert!(hra.is_overridden);
        prop_assert!(!hra.is_prorated);
    }

    #[test]
    fn identical_inputs_serialize_identically(
        ctc in 1_000u32..=500_000,
        present in 0usize..=22,
    ) {
        let engine = create_engine(
            vec![create_assignment("emp_001", ctc, None)],
            april_attendance("emp_001", present),
        );
        let calculate = || {
            let result = engine
                .calculate_employee_payroll("emp_001", "2025-04", april(1), april(30), 22)
                .unwrap();
            serde_json::to_string(&result).unwrap()
        };

        prop_assert_eq!(calculate(), calculate());
    }

    #[test]
    fn bulk_returns_every_other_employee(
        employee_count in 1usize..=8,
        failing_seed in any::<usize>(),
    ) {
        let failing = failing_seed % employee_count;
        let employee_ids: Vec<String> =
            (0..employee_count).map(|i| format!("emp_{:03}", i)).collect();
        let assignments = employee_ids
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != failing)
            .map(|(_, id)| create_assignment(id, 60_000, None))
            .collect();

        let engine = create_engine(assignments, vec![]);
        let bulk = engine.calculate_bulk_payroll(
            employee_ids.as_slice(),
            "2025-04",
            april(1),
            april(30),
        );

        prop_assert_eq!(bulk.success_count(), employee_count - 1);
        prop_assert_eq!(bulk.failure_count(), 1);

        let expected: Vec<&String> = employee_ids
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != failing)
            .map(|(_, id)| id)
            .collect();
        let results = bulk.into_results();
        let actual: Vec<&String> = results.iter().map(|r| &r.employee_id).collect();
        prop_assert_eq!(actual, expected);
    }
}
