use super::*;
use crate::api::testing::signed_in_client;
use crate::session::Role;
use reqwest::Method;

const COMPETENCY: &str = r#"{"rank":1,"competency_code":"C01","competency_name":"Rust","description":"Functional",
    "average_required_score":3,"average_score":2.5,"fulfillment_rate":50.0,"employees_evaluated":4,"employees_meeting_required":2}"#;

#[tokio::test]
async fn department_stats_are_keyed_by_id() {
    let (client, transport) = signed_in_client(Role::Hr);
    let body = format!(
        r#"{{"7":{{"department_name":"IT","overall_average_score":2.5,"overall_fulfillment_rate":50.0,"competencies":[{COMPETENCY}]}}}}"#
    );
    transport.reply(Method::GET, "/stats/department-performance/7", 200, &body);

    let stats = by_department(&client, 7).await.unwrap();

    let it = &stats["7"];
    assert_eq!(it.name, "IT");
    assert_eq!(it.competencies[0].employees_evaluated, 4);
}

#[tokio::test]
async fn manager_stats_use_manager_name() {
    let (client, transport) = signed_in_client(Role::Admin);
    let body = format!(
        r#"{{"M1":{{"manager_name":"Bo","overall_average_score":2.5,"overall_fulfillment_rate":50.0,"competencies":[{COMPETENCY}]}}}}"#
    );
    transport.reply(Method::GET, "/stats/manager-wise-performance/M1", 200, &body);

    let stats = by_manager(&client, "M1").await.unwrap();

    assert_eq!(stats["M1"].name, "Bo");
}

#[tokio::test]
async fn my_scores_split_competency_kinds() {
    let (client, transport) = signed_in_client(Role::Employee);
    transport.reply(
        Method::GET,
        "/myscores/employee-details/",
        200,
        r#"{"employee":{"employee_number":"E1001","employee_name":"Ann","job_code":"J1","department":"IT"},
            "functional_competencies":[{"competency_code":"C01","competency_name":"Rust","required_score":3,"actual_score":2,"gap":1}],
            "behavioral_competencies":[]}"#,
    );

    let scores = my_scores(&client).await.unwrap();

    assert_eq!(scores.employee.department.as_deref(), Some("IT"));
    assert_eq!(scores.functional_competencies[0].gap, Some(1));
    assert!(scores.behavioral_competencies.is_empty());
}

#[tokio::test]
async fn overall_requires_complete_rows() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(Method::GET, "/stats/overall-competency-performance", 200, r#"[{"rank":1}]"#);

    let err = overall(&client).await.unwrap_err();

    assert!(matches!(err, crate::error::ApiError::Decode(_)));
}

#[tokio::test]
async fn competency_gaps_decode_bucket_counts() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(
        Method::GET,
        "/fetch-all-competency-score-data",
        200,
        r#"[{"competencyCode":"C01","competencyName":"Rust","classification":"Functional",
            "gap1":2,"gap2":1,"gap3":0,"gap4":0,"totalGapEmployees":3}]"#,
    );

    let gaps = competency_gaps(&client).await.unwrap();

    assert_eq!(gaps[0].competency_code, "C01");
    assert_eq!(gaps[0].classification.as_deref(), Some("Functional"));
    assert_eq!(gaps[0].total_gap_employees, 3);
}

#[tokio::test]
async fn unevaluated_employees_have_no_actual_score() {
    let (client, transport) = signed_in_client(Role::Admin);
    transport.reply(
        Method::GET,
        "/score-emp-details/by-competency/C%2001",
        200,
        r#"[{"employeeNumber":"E1","employeeName":"Ann","requiredScore":3,"actualScore":2,"gap":1},
            {"employeeNumber":"E2","employeeName":"Bo","requiredScore":3,"actualScore":"-","gap":"-"}]"#,
    );

    let employees = gaps_for_competency(&client, "C 01").await.unwrap();

    assert_eq!(employees[0].gap, Some(1));
    assert_eq!(employees[1].required_score, Some(3));
    assert_eq!(employees[1].actual_score, None);
    assert_eq!(employees[1].gap, None);
}

#[tokio::test]
async fn employee_competency_table_rows_decode() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(
        Method::GET,
        "/employee-competencies/details",
        200,
        r#"[{"employeeNumber":"E1","employeeName":"Ann","competencyCode":"C01","competencyName":"Rust",
            "competencyDescription":"Functional","requiredScore":3,"actualScore":4,"gap":-1}]"#,
    );

    let rows = employee_competencies(&client).await.unwrap();

    assert_eq!(rows[0].employee_number, "E1");
    assert_eq!(rows[0].actual_score, Some(4));
    assert_eq!(rows[0].gap, Some(-1));
}

#[tokio::test]
async fn score_totals_without_records_is_not_found() {
    let (client, transport) = signed_in_client(Role::Employee);
    transport.reply(
        Method::GET,
        "/stats-bar/employee/E1001/competency-stats",
        200,
        r#"{"employee_number":"E1001","total_competencies":4,"average_fulfillment_rate_percentage":75.0,
            "total_required_score":12,"total_actual_score":10}"#,
    );

    let totals = score_totals(&client, "E1001").await.unwrap();
    let missing = score_totals(&client, "E404").await.unwrap_err();

    assert_eq!(totals.total_competencies, 4);
    assert!((totals.average_fulfillment_rate_percentage - 75.0).abs() < f64::EPSILON);
    assert!(missing.is_not_found());
}
