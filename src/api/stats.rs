//! Read-only competency reports.

use super::types::{
    CompetencyGapCounts, EmployeeCompetencyRow, EmployeeGap, GroupPerformanceByKey, OverallCompetencyPerformance,
    ScoreTotals, Scorecard,
};
use crate::error::ApiError;
use crate::http::{ApiClient, path_segment};

/// Competencies ranked by organization-wide average score.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn overall(client: &ApiClient) -> Result<Vec<OverallCompetencyPerformance>, ApiError> {
    client.get_json("/stats/overall-competency-performance").await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn by_department(client: &ApiClient, department_id: i64) -> Result<GroupPerformanceByKey, ApiError> {
    client.get_json(&format!("/stats/department-performance/{department_id}")).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn by_manager(client: &ApiClient, manager_number: &str) -> Result<GroupPerformanceByKey, ApiError> {
    client
        .get_json(&format!("/stats/manager-wise-performance/{}", path_segment(manager_number)))
        .await
}

/// The signed-in employee's scorecard.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn my_scores(client: &ApiClient) -> Result<Scorecard, ApiError> {
    client.get_json("/myscores/employee-details/").await
}

/// Gap counts per competency, most under-met first.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn competency_gaps(client: &ApiClient) -> Result<Vec<CompetencyGapCounts>, ApiError> {
    client.get_json("/fetch-all-competency-score-data").await
}

/// Employees holding `competency_code`: evaluated ones by ascending gap,
/// then the rest.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn gaps_for_competency(client: &ApiClient, competency_code: &str) -> Result<Vec<EmployeeGap>, ApiError> {
    client
        .get_json(&format!("/score-emp-details/by-competency/{}", path_segment(competency_code)))
        .await
}

/// Every evaluated employee's score on every assigned competency.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn employee_competencies(client: &ApiClient) -> Result<Vec<EmployeeCompetencyRow>, ApiError> {
    client.get_json("/employee-competencies/details").await
}

/// # Errors
///
/// See [`ApiClient::send`]; an employee without assigned competencies is a
/// 404.
pub async fn score_totals(client: &ApiClient, employee_number: &str) -> Result<ScoreTotals, ApiError> {
    client
        .get_json(&format!("/stats-bar/employee/{}/competency-stats", path_segment(employee_number)))
        .await
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
