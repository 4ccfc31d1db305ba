use super::*;
use crate::session::storage::{MemoryStorage, SessionStorage};
use crate::session::store::SESSION_KEY;

fn session(role: Role) -> Session {
    Session::new("access-1", "refresh-1", "E1001", role)
}

// =============================================================================
// parse / path
// =============================================================================

#[test]
fn parse_static_screens() {
    assert_eq!(Route::parse("/"), Route::Home);
    assert_eq!(Route::parse("/login"), Route::Login);
    assert_eq!(Route::parse("/department-crud"), Route::Departments);
    assert_eq!(Route::parse("/employee-stats-Tlwise"), Route::ManagerStats);
    assert_eq!(Route::parse("/my-competency-stats/"), Route::MyCompetencyStats);
}

#[test]
fn parse_captures_path_parameters() {
    assert_eq!(
        Route::parse("/job-manage/R12/Analyst"),
        Route::JobManage { role_code: "R12".into(), job_name: "Analyst".into() }
    );
    assert_eq!(
        Route::parse("/employee-eval-hod/E2002"),
        Route::TeamEvaluationDetail { employee_number: "E2002".into() }
    );
}

#[test]
fn parse_ignores_query_and_fragment() {
    assert_eq!(Route::parse("/role-crud?page=2#top"), Route::Roles);
}

#[test]
fn unknown_paths_resolve_home() {
    assert_eq!(Route::parse("/nope"), Route::Home);
    assert_eq!(Route::parse("/job-manage/R12"), Route::Home);
    assert_eq!(Route::parse("/department-crud/extra"), Route::Home);
}

#[test]
fn path_round_trips_through_parse() {
    let routes = [
        Route::BusinessDivisions,
        Route::EmployeeUpload,
        Route::RoleCompetencies { role_code: "R7".into() },
        Route::AssignCompetencies { employee_number: "E9".into() },
        Route::CompetencyGapTable,
    ];
    for route in routes {
        assert_eq!(Route::parse(&route.path()), route);
    }
}

// =============================================================================
// decide
// =============================================================================

#[test]
fn manager_on_hr_screen_is_sent_home_not_to_login() {
    let decision = decide(Some(&session(Role::Manager)), &Route::Departments);
    assert_eq!(decision, GuardDecision::RedirectToHome);
    assert_eq!(decision.target(&Route::Departments), Route::Home);
}

#[test]
fn admitted_roles_render() {
    assert_eq!(decide(Some(&session(Role::Hr)), &Route::Employees), GuardDecision::Render);
    assert_eq!(decide(Some(&session(Role::Admin)), &Route::TeamEvaluation), GuardDecision::Render);
    assert_eq!(decide(Some(&session(Role::Manager)), &Route::TeamEvaluation), GuardDecision::Render);
    assert_eq!(decide(Some(&session(Role::Employee)), &Route::MyCompetencyStats), GuardDecision::Render);
}

#[test]
fn hr_cannot_open_team_evaluation() {
    assert_eq!(decide(Some(&session(Role::Hr)), &Route::TeamEvaluation), GuardDecision::RedirectToHome);
}

#[test]
fn employee_only_sees_own_stats() {
    let employee = session(Role::Employee);
    assert_eq!(decide(Some(&employee), &Route::OverallStats), GuardDecision::RedirectToHome);
    assert_eq!(decide(Some(&employee), &Route::MyCompetencyStats), GuardDecision::Render);
}

#[test]
fn absent_session_is_sent_to_login() {
    assert_eq!(decide(None, &Route::Jobs), GuardDecision::RedirectToLogin);
    assert_eq!(decide(None, &Route::MyCompetencyStats), GuardDecision::RedirectToLogin);
}

#[test]
fn public_screens_always_render() {
    for route in [Route::Home, Route::Login, Route::Register] {
        assert_eq!(decide(None, &route), GuardDecision::Render);
        assert_eq!(decide(Some(&session(Role::Employee)), &route), GuardDecision::Render);
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

#[test]
fn guard_without_session_applies_logout_side_effects() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(SESSION_KEY, "{\"token\":").unwrap();
    storage.set("token", "stale").unwrap();
    let store = Arc::new(SessionStore::open(storage.clone()));
    storage.set("token", "stale-again").unwrap();
    let guard = RouteGuard::new(store.clone());

    assert_eq!(guard.check(&Route::Departments), GuardDecision::RedirectToLogin);
    assert!(store.current().is_none());
    assert_eq!(storage.get("token").unwrap(), None);
}

#[test]
fn guard_role_mismatch_keeps_session() {
    let store = Arc::new(SessionStore::open(Arc::new(MemoryStorage::new())));
    store.login(session(Role::Manager)).unwrap();
    let guard = RouteGuard::new(store.clone());

    assert_eq!(guard.check(&Route::Competencies), GuardDecision::RedirectToHome);
    assert!(store.is_authenticated());
}
