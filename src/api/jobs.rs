//! Job codes and role-competency assignment.

use reqwest::Method;

use super::types::{
    CreateJobs, DeleteJobs, JobCode, JobStatusChange, JobSummary, JobsSummaryEnvelope, Message, RoleCompetencyScore,
    RoleJob,
};
use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest, path_segment};

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn create(client: &ApiClient, jobs: &CreateJobs) -> Result<Message, ApiError> {
    client.send_json(Method::POST, "/jobs", jobs).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn delete(client: &ApiClient, jobs: &DeleteJobs) -> Result<Message, ApiError> {
    client.send(ApiRequest::delete("/jobs").json(jobs)?).await?.json()
}

/// Job counts grouped by department, role and job name.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn summary(client: &ApiClient) -> Result<Vec<JobSummary>, ApiError> {
    let envelope: JobsSummaryEnvelope = client.get_json("/jobs-summary").await?;
    Ok(envelope.jobs_by_name)
}

/// # Errors
///
/// See [`ApiClient::send`]; an unknown role/job pair is a 404.
pub async fn by_role(client: &ApiClient, role_code: &str, job_name: &str) -> Result<Vec<RoleJob>, ApiError> {
    let path = format!("/jobs/by-role/{}/{}", path_segment(role_code), path_segment(job_name));
    client.get_json(&path).await
}

/// Job codes of `role_code` still free for `employee_number`.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn available_codes(
    client: &ApiClient,
    role_code: &str,
    employee_number: &str,
) -> Result<Vec<JobCode>, ApiError> {
    let request = ApiRequest::get(format!("/available-job-codes/{}", path_segment(role_code)))
        .query("employee_number", employee_number);
    client.send(request).await?.json()
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn activate(client: &ApiClient, job_codes: &[String]) -> Result<JobStatusChange, ApiError> {
    client.send_json(Method::PUT, "/jobs/activate", job_codes).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn deactivate(client: &ApiClient, job_codes: &[String]) -> Result<JobStatusChange, ApiError> {
    client.send_json(Method::PUT, "/jobs/deactivate", job_codes).await
}

/// Assign competencies to a role; returns the codes newly assigned.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn assign_competencies(
    client: &ApiClient,
    role_id: i64,
    competency_codes: &[String],
) -> Result<Vec<String>, ApiError> {
    client
        .send_json(Method::POST, &format!("/roles/{role_id}/competencies"), competency_codes)
        .await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn remove_competencies(
    client: &ApiClient,
    role_id: i64,
    competency_codes: &[String],
) -> Result<Vec<String>, ApiError> {
    client
        .send_json(Method::DELETE, &format!("/roles/{role_id}/competencies"), competency_codes)
        .await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn competency_scores(client: &ApiClient, role_id: i64) -> Result<Vec<RoleCompetencyScore>, ApiError> {
    client.get_json(&format!("/roles/{role_id}/competencies/detailed")).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn update_competency_scores(
    client: &ApiClient,
    role_id: i64,
    scores: &[RoleCompetencyScore],
) -> Result<Message, ApiError> {
    client
        .send_json(Method::PUT, &format!("/roles/{role_id}/competencies/scores"), scores)
        .await
}

#[cfg(test)]
#[path = "jobs_test.rs"]
mod tests;
