use super::*;
use crate::api::testing::signed_in_client;
use crate::http::RequestBody;
use crate::session::Role;
use serde_json::json;

#[tokio::test]
async fn summary_unwraps_envelope() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(
        Method::GET,
        "/jobs-summary",
        200,
        r#"{"jobs_by_name":[{"department_name":"IT","role_name":"Analyst","role_code":"R3","role_category":"Tech","job_name":"Data Analyst","count":5,"LastCode":"DA005"}]}"#,
    );

    let jobs = summary(&client).await.unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].count, 5);
    assert_eq!(jobs[0].last_code.as_deref(), Some("DA005"));
}

#[tokio::test]
async fn create_sends_bulk_request() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(Method::POST, "/jobs", 200, r#"{"message":"3 jobs created for Data Analyst"}"#);

    let jobs = CreateJobs {
        role_code: "R3".into(),
        job_name: "Data Analyst".into(),
        prefix: "DA".into(),
        start: 1,
        count: 3,
    };
    let reply = create(&client, &jobs).await.unwrap();

    assert_eq!(reply.message, "3 jobs created for Data Analyst");
    assert_eq!(
        transport.last().body,
        RequestBody::Json(json!({ "role_code": "R3", "job_name": "Data Analyst", "prefix": "DA", "start": 1, "count": 3 }))
    );
}

#[tokio::test]
async fn delete_carries_a_json_body() {
    let (client, transport) = signed_in_client(Role::Admin);
    transport.reply(Method::DELETE, "/jobs", 200, r#"{"message":"Successfully deleted 2 jobs"}"#);

    let request = DeleteJobs { job_name: "Data Analyst".into(), role_code: "R3".into(), count: 2 };
    delete(&client, &request).await.unwrap();

    let sent = transport.last();
    assert_eq!(sent.method, Method::DELETE);
    assert_eq!(sent.body, RequestBody::Json(json!({ "job_name": "Data Analyst", "role_code": "R3", "count": 2 })));
}

#[tokio::test]
async fn activate_sends_code_list() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(Method::PUT, "/jobs/activate", 200, r#"{"updated":2,"status":"activated"}"#);

    let change = activate(&client, &["DA001".into(), "DA002".into()]).await.unwrap();

    assert_eq!(change.updated, 2);
    assert_eq!(transport.last().body, RequestBody::Json(json!(["DA001", "DA002"])));
}

#[tokio::test]
async fn available_codes_pass_employee_number() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(
        Method::GET,
        "/available-job-codes/R3?employee_number=E9",
        200,
        r#"[{"job_code":"DA004","job_name":"Data Analyst"}]"#,
    );

    let codes = available_codes(&client, "R3", "E9").await.unwrap();

    assert_eq!(codes[0].job_code, "DA004");
}

#[tokio::test]
async fn unknown_role_job_pair_is_not_found() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(Method::GET, "/jobs/by-role/R3/Nope", 404, r#"{"detail":"No jobs found for this role code"}"#);

    let err = by_role(&client, "R3", "Nope").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn role_competency_scores_round_trip_paths() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(
        Method::GET,
        "/roles/3/competencies/detailed",
        200,
        r#"[{"competency_code":"C01","role_competency_required_score":3}]"#,
    );
    transport.reply(Method::POST, "/roles/3/competencies", 200, r#"["C02"]"#);

    let scores = competency_scores(&client, 3).await.unwrap();
    let added = assign_competencies(&client, 3, &["C01".into(), "C02".into()]).await.unwrap();

    assert_eq!(scores[0].role_competency_required_score, 3);
    assert_eq!(added, vec!["C02".to_owned()]);
}

#[tokio::test]
async fn role_competency_removal_and_score_update() {
    let (client, transport) = signed_in_client(Role::Admin);
    transport.reply(Method::DELETE, "/roles/3/competencies", 200, r#"["C02"]"#);
    transport.reply(Method::PUT, "/roles/3/competencies/scores", 200, r#"{"message":"Updated scores for 1 competencies"}"#);

    let removed = remove_competencies(&client, 3, &["C02".into()]).await.unwrap();
    let scores = [RoleCompetencyScore { competency_code: "C01".into(), role_competency_required_score: 4 }];
    let reply = update_competency_scores(&client, 3, &scores).await.unwrap();

    assert_eq!(removed, vec!["C02".to_owned()]);
    assert_eq!(reply.message, "Updated scores for 1 competencies");
    assert_eq!(
        transport.last().body,
        RequestBody::Json(json!([{ "competency_code": "C01", "role_competency_required_score": 4 }]))
    );
}

#[tokio::test]
async fn available_codes_encode_the_employee_number() {
    let (client, transport) = signed_in_client(Role::Hr);

    let _ = available_codes(&client, "R 1", "E1&admin=1").await;

    let url = reqwest::Url::parse(&transport.last().url).unwrap();
    assert_eq!(url.path(), "/available-job-codes/R%201");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs, vec![("employee_number".to_owned(), "E1&admin=1".to_owned())]);
}

#[tokio::test]
async fn by_role_escapes_job_names() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(
        Method::GET,
        "/jobs/by-role/R3/Data%20Analyst%2FLead",
        200,
        r#"[{"job_code":"DA001","job_name":"Data Analyst/Lead","job_status":true}]"#,
    );

    let jobs = by_role(&client, "R3", "Data Analyst/Lead").await.unwrap();

    assert_eq!(jobs[0].job_code, "DA001");
}
