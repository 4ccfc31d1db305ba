//! Employee workflows beyond plain CRUD: spreadsheet import, evaluation
//! hand-off, and manager views.

use std::path::Path;

use reqwest::Method;
use serde::Serialize;

use super::types::{Employee, Evaluation, JobRole, Manager, Scorecard, UploadReport};
use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest, FilePart, path_segment};

pub const UPLOAD_FIELD: &str = "file";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Serialize)]
struct EvaluationStatusRequest<'a> {
    employee_numbers: &'a [String],
}

/// Upload an employee spreadsheet (`.xlsx`) already read into memory.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn upload(client: &ApiClient, file_name: &str, bytes: Vec<u8>) -> Result<UploadReport, ApiError> {
    let file = FilePart {
        field: UPLOAD_FIELD.to_owned(),
        file_name: file_name.to_owned(),
        mime: XLSX_MIME.to_owned(),
        bytes,
    };
    let request = ApiRequest::post("/employees/upload-employee-data/").multipart(file);
    client.send(request).await?.json()
}

/// Read `path` and upload it.
///
/// # Errors
///
/// Returns [`ApiError::Encode`] when the file cannot be read.
pub async fn upload_file(client: &ApiClient, path: &Path) -> Result<UploadReport, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::Encode(format!("{}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "employees.xlsx".to_owned(), |n| n.to_string_lossy().into_owned());
    upload(client, &file_name, bytes).await
}

/// Send employees to their managers for evaluation; returns the notified
/// manager numbers.
///
/// # Errors
///
/// See [`ApiClient::send`]; a 404 means none of the numbers exist.
pub async fn send_for_evaluation(client: &ApiClient, employee_numbers: &[String]) -> Result<Vec<String>, ApiError> {
    client
        .send_json(
            Method::PATCH,
            "/employees/evaluation-status",
            &EvaluationStatusRequest { employee_numbers },
        )
        .await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn managers(client: &ApiClient) -> Result<Vec<Manager>, ApiError> {
    client.get_json("/managers/").await
}

/// Direct reports of the signed-in manager.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn my_team(client: &ApiClient) -> Result<Vec<Employee>, ApiError> {
    client.get_json("/manager/employees").await
}

/// Profile and competency scores of one employee, as shown before an
/// evaluation is submitted.
///
/// # Errors
///
/// See [`ApiClient::send`]; an unknown employee is a 404.
pub async fn details(client: &ApiClient, employee_number: &str) -> Result<Scorecard, ApiError> {
    client
        .get_json(&format!("/employee-details/{}", path_segment(employee_number)))
        .await
}

/// Roles offered by a department, for placing an employee.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn department_roles(client: &ApiClient, department_id: i64) -> Result<Vec<JobRole>, ApiError> {
    client
        .get_json(&format!("/withname/departments/{department_id}/roles"))
        .await
}

/// Record actual scores for one employee.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn submit_evaluation(
    client: &ApiClient,
    employee_number: &str,
    evaluation: &Evaluation,
) -> Result<serde_json::Value, ApiError> {
    client
        .send_json(Method::POST, &format!("/evaluations/{}", path_segment(employee_number)), evaluation)
        .await
}

#[cfg(test)]
#[path = "employees_test.rs"]
mod tests;
