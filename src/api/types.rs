//! Wire schemas exchanged with the competency backend.
//!
//! Read models carry `#[serde(default)]` on fields the backend only fills on
//! some endpoints, so one struct serves list and detail responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::session::Role;

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub employee_number: &'a str,
    pub password: &'a str,
}

/// Successful `/login/` response.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Employee number of the signed-in user.
    pub user: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CredentialChange {
    pub employee_number: String,
    pub old_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_email: Option<String>,
}

/// `{"message": ...}` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

// =============================================================================
// ORGANIZATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDivision {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDivisionDraft {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub business_division_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentDraft {
    pub name: String,
    pub business_division_id: i64,
}

/// An organizational job role (not to be confused with the console [`Role`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRole {
    pub id: i64,
    pub role_code: String,
    pub role_name: String,
    pub role_category: String,
    #[serde(default)]
    pub assigned_comp_count: Option<i64>,
    #[serde(default)]
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRoleDraft {
    pub role_code: String,
    pub role_name: String,
    pub role_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competency {
    pub competency_code: String,
    pub competency_name: String,
    #[serde(default)]
    pub competency_description: Option<String>,
}

// =============================================================================
// JOBS
// =============================================================================

/// Bulk job creation: `count` codes `prefix{start}..` under one job name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateJobs {
    pub role_code: String,
    pub job_name: String,
    pub prefix: String,
    pub start: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub department_name: String,
    pub role_name: String,
    pub role_code: String,
    pub role_category: String,
    pub job_name: String,
    pub count: u32,
    #[serde(rename = "LastCode")]
    pub last_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct JobsSummaryEnvelope {
    pub jobs_by_name: Vec<JobSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCode {
    pub job_code: String,
    pub job_name: String,
}

/// One job code under a role, with its active flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleJob {
    pub job_code: String,
    pub job_name: String,
    pub job_status: bool,
}

/// Removes the last `count` unassigned codes of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteJobs {
    pub job_name: String,
    pub role_code: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusChange {
    pub updated: u32,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCompetencyScore {
    pub competency_code: String,
    pub role_competency_required_score: i32,
}

// =============================================================================
// EMPLOYEES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_number: String,
    pub employee_name: String,
    pub job_code: String,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub reporting_to: Option<String>,
    pub role_id: i64,
    pub department_id: i64,
    #[serde(default)]
    pub sent_to_evaluation_by: Option<String>,
    #[serde(default)]
    pub evaluation_status: Option<String>,
    #[serde(default)]
    pub evaluation_by: Option<String>,
    #[serde(default)]
    pub last_evaluated_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub employee_number: String,
    pub employee_name: String,
    pub job_code: String,
    #[serde(default)]
    pub reporting_to: Option<String>,
    pub role_id: i64,
    pub department_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub employee_number: String,
    pub employee_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub total: u32,
    pub processed: u32,
    pub failed: u32,
}

/// Result of a spreadsheet upload; per-row outcomes are passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReport {
    pub status: String,
    pub summary: UploadSummary,
    #[serde(default)]
    pub processed_employees: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub competency_code: String,
    pub actual_score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub scores: Vec<CompetencyScore>,
}

// =============================================================================
// STATS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallCompetencyPerformance {
    pub rank: u32,
    pub competency_code: String,
    pub competency_name: String,
    pub description: String,
    pub average_required_score: f64,
    pub average_score: f64,
    pub fulfillment_rate: f64,
    pub total_evaluations: u32,
    pub employees_meeting_required: u32,
    pub performance_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyPerformance {
    pub rank: u32,
    pub competency_code: String,
    pub competency_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub average_required_score: f64,
    pub average_score: f64,
    pub fulfillment_rate: f64,
    pub employees_evaluated: u32,
    pub employees_meeting_required: u32,
}

/// Aggregated scores for one department or one manager's team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPerformance {
    #[serde(alias = "department_name", alias = "manager_name")]
    pub name: String,
    pub overall_average_score: f64,
    pub overall_fulfillment_rate: f64,
    pub competencies: Vec<CompetencyPerformance>,
}

/// Stats responses are keyed by department id or manager number.
pub type GroupPerformanceByKey = BTreeMap<String, GroupPerformance>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub employee_number: String,
    pub employee_name: String,
    pub job_code: String,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub reporting_employee_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub role_code: Option<String>,
    #[serde(default)]
    pub role_category: Option<String>,
    #[serde(default)]
    pub evaluation_status: Option<String>,
    #[serde(default)]
    pub sent_to_evaluation_by: Option<String>,
    #[serde(default)]
    pub evaluation_by: Option<String>,
    #[serde(default)]
    pub last_evaluated_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyGap {
    pub competency_code: String,
    pub competency_name: String,
    #[serde(default)]
    pub competency_description: Option<String>,
    pub required_score: Option<i32>,
    pub actual_score: Option<i32>,
    pub gap: Option<i32>,
}

/// An employee's profile with required/actual scores split by competency
/// kind. Served both for the signed-in employee and for any employee by
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub employee: EmployeeProfile,
    pub functional_competencies: Vec<CompetencyGap>,
    pub behavioral_competencies: Vec<CompetencyGap>,
}

/// Score totals behind one employee's stats bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTotals {
    pub employee_number: String,
    pub total_competencies: u32,
    pub average_fulfillment_rate_percentage: f64,
    pub total_required_score: i64,
    pub total_actual_score: i64,
}

/// How many evaluated employees fall short of a competency, bucketed by the
/// size of the gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyGapCounts {
    pub competency_code: String,
    pub competency_name: String,
    #[serde(default)]
    pub classification: Option<String>,
    pub gap1: u32,
    pub gap2: u32,
    pub gap3: u32,
    pub gap4: u32,
    pub total_gap_employees: u32,
}

/// One employee's standing on one competency. `actual_score` and `gap` are
/// `None` until the employee has been evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeGap {
    pub employee_number: String,
    pub employee_name: String,
    #[serde(default)]
    pub required_score: Option<i32>,
    #[serde(default, deserialize_with = "pending_score")]
    pub actual_score: Option<i32>,
    #[serde(default, deserialize_with = "pending_score")]
    pub gap: Option<i32>,
}

/// Row of the employee/competency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCompetencyRow {
    pub employee_number: String,
    pub employee_name: String,
    pub competency_code: String,
    pub competency_name: String,
    #[serde(default)]
    pub competency_description: Option<String>,
    #[serde(default)]
    pub required_score: Option<i32>,
    #[serde(default, deserialize_with = "pending_score")]
    pub actual_score: Option<i32>,
    #[serde(default, deserialize_with = "pending_score")]
    pub gap: Option<i32>,
}

/// Report scores arrive as a number, or `"-"` while evaluation is pending.
fn pending_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_i64)
        .and_then(|score| i32::try_from(score).ok()))
}
