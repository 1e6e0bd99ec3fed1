//! HTTP request handlers for the Payroll Calculation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::PayrollEngine;

use super::request::{BulkCalculationRequest, CalculationRequest};
use super::response::{ApiError, ApiErrorResponse, BulkCalculationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/calculate", post(calculate_handler))
        .route("/payroll/bulk", post(bulk_handler))
        .with_state(state)
}

/// Handler for POST /payroll/calculate.
///
/// Calculates one employee's payroll from the records in the request.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll calculation request");

    let mut request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let engine = PayrollEngine::new(request.data_source(), state.policies());

    let start_time = Instant::now();
    match engine.calculate_employee_payroll(
        &request.employee_id,
        &request.period,
        request.start_date,
        request.end_date,
        request.working_days,
    ) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.employee_id,
                period = %result.period,
                net_salary = %result.net_salary,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                error = %err,
                "Payroll calculation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

/// Handler for POST /payroll/bulk.
///
/// Calculates every employee in the request and returns one outcome per
/// employee. Individual failures do not fail the request.
async fn bulk_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing bulk payroll request");

    let mut request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let employee_ids = request.employee_ids();
    let engine = PayrollEngine::new(request.data_source(), state.policies());

    let start_time = Instant::now();
    let bulk = engine.calculate_bulk_payroll(
        employee_ids.as_slice(),
        &request.period,
        request.start_date,
        request.end_date,
    );
    let response = BulkCalculationResponse::from(bulk);

    info!(
        correlation_id = %correlation_id,
        period = %response.period,
        succeeded = response.succeeded,
        failed = response.failed,
        duration_us = start_time.elapsed().as_micros(),
        "Bulk payroll request completed"
    );
    json_response(StatusCode::OK, response)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, PayrollPolicy};
    use crate::models::{
        BaseComponent, CalculationType, ComponentCategory, ComponentType,
        EmployeeSalaryAssignment, PayComponent, PayrollCalculationResult, SalaryStructure,
        SalaryStructureComponent,
    };
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::new(ConfigLoader::from_policies(vec![PayrollPolicy::default()]))
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_test_assignment() -> EmployeeSalaryAssignment {
        EmployeeSalaryAssignment {
            id: "asg_001".to_string(),
            employee_id: "emp_001".to_string(),
            structure: SalaryStructure {
                id: "basic_only".to_string(),
                name: "Basic Only".to_string(),
                components: vec![SalaryStructureComponent {
                    component: PayComponent {
                        id: "comp_basic".to_string(),
                        code: "BASIC".to_string(),
                        name: "Basic Salary".to_string(),
                        component_type: ComponentType::Earning,
                        category: ComponentCategory::Basic,
                        calculation_type: CalculationType::Percentage,
                        is_statutory: false,
                        is_taxable: true,
                    },
                    order: 1,
                    value: None,
                    percentage: Some(Decimal::from(50)),
                    base_component: Some(BaseComponent::Ctc),
                    min_value: None,
                    max_value: None,
                }],
            },
            ctc: Decimal::from(30000),
            effective_from: make_date("2025-01-01"),
            effective_to: None,
            overrides: vec![],
        }
    }

    fn create_valid_request() -> CalculationRequest {
        CalculationRequest {
            employee_id: "emp_001".to_string(),
            period: "2025-04".to_string(),
            start_date: make_date("2025-04-01"),
            end_date: make_date("2025-04-30"),
            working_days: 22,
            salary_assignments: vec![create_test_assignment()],
            attendance: vec![],
        }
    }

    async fn post(uri: &str, body: String) -> Response {
        create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_001_valid_request_returns_200() {
        let body = serde_json::to_string(&create_valid_request()).unwrap();
        let response = post("/payroll/calculate", body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: PayrollCalculationResult =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.employee_id, "emp_001");
        assert_eq!(result.basic_salary, Decimal::from(15000));
    }

    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let response = post("/payroll/calculate", "{invalid json".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_003_missing_field_returns_validation_error() {
        let body = r#"{
            "period": "2025-04",
            "start_date": "2025-04-01",
            "end_date": "2025-04-30",
            "working_days": 22,
            "salary_assignments": []
        }"#;
        let response = post("/payroll/calculate", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("employee_id"));
    }

    #[tokio::test]
    async fn test_api_004_no_assignment_returns_400() {
        let mut request = create_valid_request();
        request.salary_assignments.clear();
        let response = post("/payroll/calculate", serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "SALARY_STRUCTURE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_api_005_working_days_out_of_range_returns_400() {
        let mut request = create_valid_request();
        request.working_days = 32;
        let response = post("/payroll/calculate", serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "INVALID_WORKING_DAYS");
    }

    #[tokio::test]
    async fn test_api_006_bulk_returns_outcome_per_employee() {
        let body = serde_json::json!({
            "period": "2025-04",
            "start_date": "2025-04-01",
            "end_date": "2025-04-30",
            "employees": [
                { "employee_id": "emp_001", "salary_assignments": [create_test_assignment()] },
                { "employee_id": "emp_002" }
            ]
        });
        let response = post("/payroll/bulk", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bulk: BulkCalculationResponse =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(bulk.working_days, Some(22));
        assert_eq!(bulk.succeeded, 1);
        assert_eq!(bulk.failed, 1);

        let json = serde_json::to_value(&bulk).unwrap();
        assert_eq!(json["results"][0]["status"], "ok");
        assert_eq!(json["results"][1]["status"], "error");
        assert_eq!(
            json["results"][1]["error"]["code"],
            "SALARY_STRUCTURE_NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn test_api_007_missing_content_type_returns_400() {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payroll/calculate")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }
}
