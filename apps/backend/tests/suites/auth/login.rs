// Registration, login and the caller's profile.

use actix_web::test;
use gradebook::auth::jwt::decode_claims;
use gradebook::auth::{AccessGate, Role};
use serde_json::{json, Value};

use crate::common::assert_problem_details_structure;
use crate::support::create_test_app;
use crate::support::factory::{create_teacher, db, test_state, TEST_PASSWORD};

fn registration(username: &str) -> Value {
    json!({
        "username": username,
        "password": "s3cret-pass",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@school.test",
    })
}

#[actix_web::test]
async fn register_creates_student_without_hash_in_response() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("ada"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "ada");
    assert_eq!(body["role"], "student");
    assert_eq!(body["class_id"], Value::Null);
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn duplicate_username_is_conflict() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    for expected in [201u16, 409] {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(registration("ada"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        if expected == 201 {
            assert_eq!(resp.status().as_u16(), 201);
        } else {
            assert_problem_details_structure(resp, 409, "USERNAME_TAKEN").await;
        }
    }
}

#[actix_web::test]
async fn weak_password_is_rejected() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let mut body = registration("ada");
    body["password"] = json!("short");
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "VALIDATION_ERROR").await;
}

#[actix_web::test]
async fn invalid_username_is_rejected() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("a b"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "VALIDATION_ERROR").await;
}

#[actix_web::test]
async fn login_returns_token_that_passes_the_gate() {
    let state = test_state().await;
    let sec = state.security.clone();
    let teacher = create_teacher(db(&state), "t.smith").await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "t.smith", "password": TEST_PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], teacher.id);
    assert_eq!(body["user"]["role"], "teacher");

    let token = body["token"].as_str().expect("token should be a string");
    let claims = decode_claims(token, &sec).expect("token should verify");
    assert_eq!(claims.get("unique_name"), Some("t.smith"));
    let gate = AccessGate::new(&sec);
    assert_eq!(gate.is_teacher(&claims), Some(teacher.id));
    assert_eq!(gate.is_student(&claims), None);

    // The same token authenticates /me
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["username"], "t.smith");
}

#[actix_web::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let state = test_state().await;
    create_teacher(db(&state), "t.smith").await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "t.smith", "password": "wrong-password-1"}))
        .to_request();
    let wrong = assert_problem_details_structure(
        test::call_service(&app, req).await,
        401,
        "INVALID_CREDENTIALS",
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "nobody", "password": "wrong-password-1"}))
        .to_request();
    let unknown = assert_problem_details_structure(
        test::call_service(&app, req).await,
        401,
        "INVALID_CREDENTIALS",
    )
    .await;

    assert_eq!(wrong["detail"], unknown["detail"]);
}

#[actix_web::test]
async fn registered_student_can_log_in() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("ada"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "ada", "password": "s3cret-pass"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["role"], Role::Student.as_db());
}
