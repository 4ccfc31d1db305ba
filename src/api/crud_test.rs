use super::*;
use crate::api::testing::signed_in_client;
use crate::http::RequestBody;
use crate::session::Role;
use serde_json::json;

#[test]
fn item_paths_follow_collection_spelling() {
    assert_eq!(Department::item_path(&4), "/departments/4");
    assert_eq!(JobRole::item_path(&7), "/roles/7");
    assert_eq!(JobRole::read_path(&7).as_deref(), Some("/getrole/7"));
    assert_eq!(Competency::item_path(&"C01".to_owned()), "/competency/C01");
    assert_eq!(Employee::item_path(&"E9".to_owned()), "/employees/E9");
    assert_eq!(BusinessDivision::item_path(&2), "/business-divisions/2");
}

#[tokio::test]
async fn list_decodes_collection() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(
        Method::GET,
        "/departments/",
        200,
        r#"[{"id":1,"name":"Finance","business_division_id":2},{"id":2,"name":"IT","business_division_id":2}]"#,
    );

    let departments = list::<Department>(&client).await.unwrap();

    assert_eq!(departments.len(), 2);
    assert_eq!(departments[1].name, "IT");
    assert_eq!(transport.last().bearer_token(), Some("access-1"));
}

#[tokio::test]
async fn roles_tolerate_list_only_fields() {
    let (client, transport) = signed_in_client(Role::Admin);
    transport.reply(
        Method::GET,
        "/roles",
        200,
        r#"[{"id":3,"role_code":"R3","role_name":"Analyst","role_category":"Tech","assigned_comp_count":4,"department_name":"IT"}]"#,
    );
    transport.reply(
        Method::GET,
        "/getrole/3",
        200,
        r#"{"id":3,"role_code":"R3","role_name":"Analyst","role_category":"Tech"}"#,
    );

    let roles = list::<JobRole>(&client).await.unwrap();
    let role = get::<JobRole>(&client, &3).await.unwrap();

    assert_eq!(roles[0].department_name.as_deref(), Some("IT"));
    assert_eq!(role.assigned_comp_count, None);
}

#[tokio::test]
async fn competency_read_searches_the_list() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(
        Method::GET,
        "/competency",
        200,
        r#"[{"competency_code":"C01","competency_name":"Rust","competency_description":"Functional"}]"#,
    );

    let found = get::<Competency>(&client, &"C01".to_owned()).await.unwrap();
    let missing = get::<Competency>(&client, &"C99".to_owned()).await.unwrap_err();

    assert_eq!(found.competency_name, "Rust");
    assert!(missing.is_not_found());
    assert_eq!(missing.detail().as_deref(), Some("Competency not found"));
}

#[tokio::test]
async fn create_posts_draft_to_collection() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(Method::POST, "/departments/", 200, r#"{"id":9,"name":"Legal","business_division_id":1}"#);

    let created = create::<Department>(&client, &DepartmentDraft { name: "Legal".into(), business_division_id: 1 })
        .await
        .unwrap();

    assert_eq!(created.key(), 9);
    assert_eq!(transport.last().body, RequestBody::Json(json!({ "name": "Legal", "business_division_id": 1 })));
}

#[tokio::test]
async fn duplicate_create_is_a_validation_error() {
    let (client, transport) = signed_in_client(Role::Hr);
    transport.reply(Method::POST, "/business-divisions/", 400, r#"{"detail":"Business Division already exists"}"#);

    let err = create::<BusinessDivision>(&client, &BusinessDivisionDraft { name: "Retail".into() })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.detail().as_deref(), Some("Business Division already exists"));
}

#[tokio::test]
async fn update_and_delete_target_item_path() {
    let (client, transport) = signed_in_client(Role::Hr);
    let employee = r#"{"employee_number":"E9","employee_name":"Ann","job_code":"J1","role_id":1,"department_id":2}"#;
    transport.reply(Method::PUT, "/employees/E9", 200, employee);
    transport.reply(Method::DELETE, "/employees/E9", 200, r#"{"message":"deleted"}"#);

    let draft = EmployeeDraft {
        employee_number: "E9".into(),
        employee_name: "Ann".into(),
        job_code: "J1".into(),
        reporting_to: None,
        role_id: 1,
        department_id: 2,
    };
    let updated = update::<Employee>(&client, &"E9".to_owned(), &draft).await.unwrap();
    delete::<Employee>(&client, &"E9".to_owned()).await.unwrap();

    assert_eq!(updated.employee_name, "Ann");
    let methods: Vec<Method> = transport.seen().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::PUT, Method::DELETE]);
}
