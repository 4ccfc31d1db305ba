//! Role-based navigation menu.

#[cfg(test)]
#[path = "nav_test.rs"]
mod tests;

use crate::routes::Route;
use crate::session::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
}

impl MenuItem {
    fn new(label: &'static str, route: Route) -> Self {
        Self { label, route }
    }
}

/// Menu entries shown to `role`, in display order.
#[must_use]
pub fn menu_for(role: Role) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::new("Home", Route::Home)];
    match role {
        Role::Admin => {
            items.extend([
                MenuItem::new("Department Management", Route::Departments),
                MenuItem::new("Role Management", Route::Roles),
                MenuItem::new("Job Management", Route::Jobs),
                MenuItem::new("Competency Management (library)", Route::Competencies),
            ]);
            items.extend(people_items());
            items.push(MenuItem::new("Evaluate Employees", Route::TeamEvaluation));
        }
        Role::Hr => {
            items.extend([
                MenuItem::new("Competency Management (library)", Route::Competencies),
                MenuItem::new("Department Management", Route::Departments),
                MenuItem::new("Role Management", Route::Roles),
                MenuItem::new("Job Management", Route::Jobs),
            ]);
            items.extend(people_items());
        }
        Role::Manager => items.push(MenuItem::new("Evaluate Employees", Route::TeamEvaluation)),
        Role::Employee => {}
    }
    items.push(MenuItem::new("My Scores", Route::MyCompetencyStats));
    items
}

fn people_items() -> [MenuItem; 5] {
    [
        MenuItem::new("Employee Management", Route::Employees),
        MenuItem::new("Employee Excel Upload", Route::EmployeeUpload),
        MenuItem::new("Employee Evaluation List", Route::EmployeeEvaluation),
        MenuItem::new("Employee Competency Report", Route::EmployeeCompetencyTable),
        MenuItem::new("Competency Gap Analysis", Route::CompetencyGapTable),
    ]
}
