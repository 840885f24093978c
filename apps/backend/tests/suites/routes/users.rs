use actix_web::test;
use gradebook::auth::Role;
use serde_json::{json, Value};

use crate::common::assert_problem_details_structure;
use crate::support::auth::bearer;
use crate::support::create_test_app;
use crate::support::factory::{create_class, create_student, create_teacher, db, test_state};

#[actix_web::test]
async fn teacher_creates_users_of_any_role() {
    let state = test_state().await;
    let sec = state.security.clone();
    let teacher = create_teacher(db(&state), "t.smith").await;
    let class = create_class(db(&state), "7B").await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(teacher.id, Role::Teacher, &sec);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({
            "username": "t.second",
            "password": "another-pass-9",
            "first_name": "Grace",
            "last_name": "Hopper",
            "role": "Teacher",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["role"], "teacher");

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({
            "username": "s.new",
            "password": "another-pass-9",
            "first_name": "Alan",
            "last_name": "Turing",
            "role": "student",
            "class_id": class.id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["class_id"], class.id);

    let req = test::TestRequest::get()
        .uri("/api/users?role=teacher")
        .insert_header(("Authorization", auth))
        .to_request();
    let list: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn unknown_role_filter_is_validation_error() {
    let state = test_state().await;
    let sec = state.security.clone();
    let teacher = create_teacher(db(&state), "t.smith").await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/users?role=admin")
        .insert_header(("Authorization", bearer(teacher.id, Role::Teacher, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "VALIDATION_ERROR").await;
}

#[actix_web::test]
async fn students_read_only_themselves() {
    let state = test_state().await;
    let sec = state.security.clone();
    let me = create_student(db(&state), "s.me", None).await;
    let other = create_student(db(&state), "s.other", None).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(me.id, Role::Student, &sec);

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", me.id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", other.id))
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 403, "FORBIDDEN").await;
}

#[actix_web::test]
async fn teacher_cannot_delete_self() {
    let state = test_state().await;
    let sec = state.security.clone();
    let teacher = create_teacher(db(&state), "t.smith").await;
    let student = create_student(db(&state), "s.gone", None).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(teacher.id, Role::Teacher, &sec);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", teacher.id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "VALIDATION_ERROR").await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", student.id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", student.id))
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 404, "USER_NOT_FOUND").await;
}
