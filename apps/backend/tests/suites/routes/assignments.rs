use actix_web::test;
use gradebook::auth::Role;
use gradebook::services::grades;
use serde_json::{json, Value};

use crate::common::assert_problem_details_structure;
use crate::support::auth::bearer;
use crate::support::create_test_app;
use crate::support::factory::{classroom, create_assignment, db, test_state};

#[actix_web::test]
async fn owner_creates_assignment_with_due_date() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/assignments", room.course.id))
        .insert_header(("Authorization", bearer(room.teacher.id, Role::Teacher, &sec)))
        .set_json(json!({
            "title": "Fractions quiz",
            "due_date": "2025-10-01T12:00:00Z",
            "max_points": 20.0,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["course_id"], room.course.id);
    assert_eq!(body["max_points"], 20.0);
    assert_eq!(body["due_date"], "2025-10-01T12:00:00Z");

    // Students of the class can read it
    let id = body["id"].as_i64().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/assignments/{id}"))
        .insert_header(("Authorization", bearer(room.student.id, Role::Student, &sec)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
}

#[actix_web::test]
async fn rejects_non_positive_max_points_and_bad_dates() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(room.teacher.id, Role::Teacher, &sec);

    for payload in [
        json!({"title": "Quiz", "max_points": 0.0}),
        json!({"title": "Quiz", "max_points": -5.0}),
        json!({"title": "Quiz", "max_points": 10.0, "due_date": "next friday"}),
        json!({"title": " ", "max_points": 10.0}),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/courses/{}/assignments", room.course.id))
            .insert_header(("Authorization", auth.clone()))
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_structure(resp, 400, "VALIDATION_ERROR").await;
    }
}

#[actix_web::test]
async fn max_points_cannot_drop_below_existing_grade() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let assignment =
        create_assignment(db(&state), room.teacher.id, room.course.id, "Essay", 50.0).await;
    grades::upsert(db(&state), room.teacher.id, assignment.id, room.student.id, 40.0, None)
        .await
        .unwrap();
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(room.teacher.id, Role::Teacher, &sec);

    let req = test::TestRequest::put()
        .uri(&format!("/api/assignments/{}", assignment.id))
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({"max_points": 30.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "VALIDATION_ERROR").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/assignments/{}", assignment.id))
        .insert_header(("Authorization", auth))
        .set_json(json!({"max_points": 40.0, "title": "Long essay"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Long essay");
    assert_eq!(body["max_points"], 40.0);
}

#[actix_web::test]
async fn unknown_assignment_is_not_found() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::delete()
        .uri("/api/assignments/4242")
        .insert_header(("Authorization", bearer(room.teacher.id, Role::Teacher, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 404, "ASSIGNMENT_NOT_FOUND").await;
}
