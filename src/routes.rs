//! Console screens and the role-based route guard.
//!
//! Each screen is a `Route` variant with a fixed set of roles allowed to see
//! it. The guard decision is pure and synchronous; `RouteGuard` adds the one
//! side effect (forcing logout when no session is present).

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

use std::fmt;
use std::sync::Arc;

use crate::session::{Role, Session, SessionStore};

const HR_ADMIN: &[Role] = &[Role::Hr, Role::Admin];
const MANAGER_ADMIN: &[Role] = &[Role::Manager, Role::Admin];
const EVERYONE: &[Role] = &Role::ALL;

// =============================================================================
// ROUTE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    BusinessDivisions,
    Departments,
    Roles,
    Jobs,
    JobManage { role_code: String, job_name: String },
    Competencies,
    RoleCompetencies { role_code: String },
    EmployeeCompetencies { employee_number: String },
    Employees,
    EmployeeUpload,
    EmployeeEvaluation,
    EmployeeDetails { employee_number: String },
    AssignCompetencies { employee_number: String },
    DepartmentStats,
    ManagerStats,
    OverallStats,
    CompetencyGapTable,
    EmployeeCompetencyTable,
    TeamEvaluation,
    TeamEvaluationDetail { employee_number: String },
    MyCompetencyStats,
}

impl Route {
    /// Resolve a navigation path. Query strings and fragments are ignored;
    /// unknown paths resolve to [`Route::Home`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let owned = |s: &str| s.to_owned();

        match segments.as_slice() {
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["businessDivision-crud"] => Self::BusinessDivisions,
            ["department-crud"] => Self::Departments,
            ["role-crud"] => Self::Roles,
            ["job-crud"] => Self::Jobs,
            ["job-manage", role, job] => Self::JobManage { role_code: owned(role), job_name: owned(job) },
            ["competency-crud"] => Self::Competencies,
            ["role-competencies", role] => Self::RoleCompetencies { role_code: owned(role) },
            ["employee-competencies", number] => Self::EmployeeCompetencies { employee_number: owned(number) },
            ["employee-crud"] => Self::Employees,
            ["employee-excel"] => Self::EmployeeUpload,
            ["employee-eval"] => Self::EmployeeEvaluation,
            ["employee-details", number] => Self::EmployeeDetails { employee_number: owned(number) },
            ["employee-assign-comp", number] => Self::AssignCompetencies { employee_number: owned(number) },
            ["employee-stats-departmentwise"] => Self::DepartmentStats,
            ["employee-stats-Tlwise"] => Self::ManagerStats,
            ["employee-stats-overall"] => Self::OverallStats,
            ["competency-gap-table"] => Self::CompetencyGapTable,
            ["employee-competencies-table"] => Self::EmployeeCompetencyTable,
            ["employee-eval-hod"] => Self::TeamEvaluation,
            ["employee-eval-hod", number] => Self::TeamEvaluationDetail { employee_number: owned(number) },
            ["my-competency-stats"] => Self::MyCompetencyStats,
            _ => Self::Home,
        }
    }

    /// Canonical navigation path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::BusinessDivisions => "/businessDivision-crud".into(),
            Self::Departments => "/department-crud".into(),
            Self::Roles => "/role-crud".into(),
            Self::Jobs => "/job-crud".into(),
            Self::JobManage { role_code, job_name } => format!("/job-manage/{role_code}/{job_name}"),
            Self::Competencies => "/competency-crud".into(),
            Self::RoleCompetencies { role_code } => format!("/role-competencies/{role_code}"),
            Self::EmployeeCompetencies { employee_number } => format!("/employee-competencies/{employee_number}"),
            Self::Employees => "/employee-crud".into(),
            Self::EmployeeUpload => "/employee-excel".into(),
            Self::EmployeeEvaluation => "/employee-eval".into(),
            Self::EmployeeDetails { employee_number } => format!("/employee-details/{employee_number}"),
            Self::AssignCompetencies { employee_number } => format!("/employee-assign-comp/{employee_number}"),
            Self::DepartmentStats => "/employee-stats-departmentwise".into(),
            Self::ManagerStats => "/employee-stats-Tlwise".into(),
            Self::OverallStats => "/employee-stats-overall".into(),
            Self::CompetencyGapTable => "/competency-gap-table".into(),
            Self::EmployeeCompetencyTable => "/employee-competencies-table".into(),
            Self::TeamEvaluation => "/employee-eval-hod".into(),
            Self::TeamEvaluationDetail { employee_number } => format!("/employee-eval-hod/{employee_number}"),
            Self::MyCompetencyStats => "/my-competency-stats".into(),
        }
    }

    /// Roles admitted to this screen; `None` for public screens.
    #[must_use]
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Home | Self::Login | Self::Register => None,
            Self::BusinessDivisions
            | Self::Departments
            | Self::Roles
            | Self::Jobs
            | Self::JobManage { .. }
            | Self::Competencies
            | Self::RoleCompetencies { .. }
            | Self::EmployeeCompetencies { .. }
            | Self::Employees
            | Self::EmployeeUpload
            | Self::EmployeeEvaluation
            | Self::EmployeeDetails { .. }
            | Self::AssignCompetencies { .. }
            | Self::DepartmentStats
            | Self::ManagerStats
            | Self::OverallStats
            | Self::CompetencyGapTable
            | Self::EmployeeCompetencyTable => Some(HR_ADMIN),
            Self::TeamEvaluation | Self::TeamEvaluationDetail { .. } => Some(MANAGER_ADMIN),
            Self::MyCompetencyStats => Some(EVERYONE),
        }
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.allowed_roles().is_none()
    }

    #[must_use]
    pub fn admits(&self, role: Role) -> bool {
        self.allowed_roles().is_none_or(|roles| roles.contains(&role))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// GUARD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    RedirectToLogin,
    RedirectToHome,
}

impl GuardDecision {
    /// Where the navigation ends up.
    #[must_use]
    pub fn target(self, requested: &Route) -> Route {
        match self {
            Self::Render => requested.clone(),
            Self::RedirectToLogin => Route::Login,
            Self::RedirectToHome => Route::Home,
        }
    }
}

/// Pure guard decision for navigating to `route`.
#[must_use]
pub fn decide(session: Option<&Session>, route: &Route) -> GuardDecision {
    let Some(allowed) = route.allowed_roles() else {
        return GuardDecision::Render;
    };
    match session {
        None => GuardDecision::RedirectToLogin,
        Some(session) if allowed.contains(&session.role) => GuardDecision::Render,
        Some(_) => GuardDecision::RedirectToHome,
    }
}

pub struct RouteGuard {
    store: Arc<SessionStore>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Evaluate navigation to `route`. A redirect to login also clears any
    /// stale persisted client state.
    pub fn check(&self, route: &Route) -> GuardDecision {
        let session = self.store.current();
        let decision = decide(session.as_ref(), route);
        match decision {
            GuardDecision::RedirectToLogin => {
                tracing::debug!(route = %route, "no session; redirecting to login");
                self.store.logout();
            }
            GuardDecision::RedirectToHome => {
                tracing::debug!(route = %route, role = ?session.map(|s| s.role), "role not admitted; redirecting home");
            }
            GuardDecision::Render => {}
        }
        decision
    }
}
