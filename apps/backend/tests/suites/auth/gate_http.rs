// The access gate as seen over HTTP: every rejection reason surfaces as the
// same 401 UNAUTHORIZED, while transport problems keep their own codes.

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use gradebook::auth::{MissingExpiry, Role};
use serde_json::json;

use crate::common::assert_problem_details_structure;
use crate::support::auth::{
    bearer, bearer_with_claims, expired_bearer, future_exp, test_security, TEST_AUDIENCE,
    TEST_ISSUER,
};
use crate::support::create_test_app;
use crate::support::factory::{create_student, create_teacher, db, test_state, test_state_with};

#[actix_web::test]
async fn missing_header_is_missing_bearer() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "UNAUTHORIZED_MISSING_BEARER",
        StatusCode::UNAUTHORIZED,
        Some("Bearer"),
    )
    .await;
}

#[actix_web::test]
async fn non_bearer_scheme_is_missing_bearer() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/classes")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;
}

#[actix_web::test]
async fn garbage_token_is_invalid_jwt() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/classes")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED_INVALID_JWT").await;
}

#[actix_web::test]
async fn token_signed_with_other_secret_is_invalid_jwt() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let mut other = test_security();
    other.jwt_secret = b"some-other-secret".to_vec();

    let req = test::TestRequest::get()
        .uri("/api/classes")
        .insert_header(("Authorization", bearer(1, Role::Teacher, &other)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED_INVALID_JWT").await;
}

#[actix_web::test]
async fn expired_token_is_unauthorized() {
    let state = test_state().await;
    let sec = state.security.clone();
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/classes")
        .insert_header(("Authorization", expired_bearer(1, Role::Teacher, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED").await;
}

#[actix_web::test]
async fn foreign_issuer_is_unauthorized() {
    let state = test_state().await;
    let sec = state.security.clone();
    let app = create_test_app(state).with_prod_routes().build().await;

    let claims = json!({
        "nameid": "1",
        "role": "Teacher",
        "iss": "someone-else",
        "aud": TEST_AUDIENCE,
        "exp": future_exp(),
    });
    let req = test::TestRequest::get()
        .uri("/api/classes")
        .insert_header(("Authorization", bearer_with_claims(claims, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED").await;
}

#[actix_web::test]
async fn foreign_audience_is_unauthorized() {
    let state = test_state().await;
    let sec = state.security.clone();
    let app = create_test_app(state).with_prod_routes().build().await;

    let claims = json!({
        "nameid": "1",
        "role": "Teacher",
        "iss": TEST_ISSUER,
        "aud": "another-app",
        "exp": future_exp(),
    });
    let req = test::TestRequest::get()
        .uri("/api/classes")
        .insert_header(("Authorization", bearer_with_claims(claims, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED").await;
}

#[actix_web::test]
async fn non_numeric_user_id_is_unauthorized() {
    let state = test_state().await;
    let sec = state.security.clone();
    let app = create_test_app(state).with_prod_routes().build().await;

    let claims = json!({
        "nameid": "abc",
        "role": "Teacher",
        "iss": TEST_ISSUER,
        "aud": TEST_AUDIENCE,
        "exp": future_exp(),
    });
    let req = test::TestRequest::get()
        .uri("/api/classes")
        .insert_header(("Authorization", bearer_with_claims(claims, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED").await;
}

#[actix_web::test]
async fn student_on_teacher_route_is_unauthorized() {
    let state = test_state().await;
    let sec = state.security.clone();
    let student = create_student(db(&state), "s.lee", None).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/classes")
        .insert_header(("Authorization", bearer(student.id, Role::Student, &sec)))
        .set_json(json!({"name": "8A", "school_year": "2025/26"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED").await;
}

#[actix_web::test]
async fn teacher_on_student_route_is_unauthorized() {
    let state = test_state().await;
    let sec = state.security.clone();
    let teacher = create_teacher(db(&state), "t.ng").await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/grades/me")
        .insert_header(("Authorization", bearer(teacher.id, Role::Teacher, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED").await;
}

#[actix_web::test]
async fn lowercase_role_claim_passes_teacher_gate() {
    let state = test_state().await;
    let sec = state.security.clone();
    let teacher = create_teacher(db(&state), "t.ng").await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let claims = json!({
        "nameid": teacher.id.to_string(),
        "role": "teacher",
        "iss": TEST_ISSUER,
        "aud": TEST_AUDIENCE,
        "exp": future_exp(),
    });
    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(("Authorization", bearer_with_claims(claims, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn missing_exp_follows_policy() {
    let claims = |id: i64| {
        json!({
            "nameid": id.to_string(),
            "role": "Teacher",
            "iss": TEST_ISSUER,
            "aud": TEST_AUDIENCE,
        })
    };

    // Fail open: accepted
    let state = test_state().await;
    let sec = state.security.clone();
    let teacher = create_teacher(db(&state), "t.open").await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", bearer_with_claims(claims(teacher.id), &sec)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    // Fail closed: rejected
    let state =
        test_state_with(test_security().with_missing_expiry(MissingExpiry::FailClosed)).await;
    let sec = state.security.clone();
    let teacher = create_teacher(db(&state), "t.closed").await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", bearer_with_claims(claims(teacher.id), &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 401, "UNAUTHORIZED").await;
}

#[actix_web::test]
async fn public_routes_need_no_token() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    // Reaches the handler (and fails validation) rather than the bearer check
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_payload("{")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "INVALID_JSON").await;
}
