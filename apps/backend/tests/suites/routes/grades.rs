use actix_web::test;
use gradebook::auth::Role;
use serde_json::{json, Value};

use crate::common::assert_problem_details_structure;
use crate::support::auth::bearer;
use crate::support::create_test_app;
use crate::support::factory::{classroom, create_assignment, create_student, db, test_state};

#[actix_web::test]
async fn grade_upsert_replaces_previous_value() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let quiz = create_assignment(db(&state), room.teacher.id, room.course.id, "Quiz", 10.0).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(room.teacher.id, Role::Teacher, &sec);
    let uri = format!("/api/assignments/{}/grades/{}", quiz.id, room.student.id);

    for points in [6.0, 8.5] {
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({"points": points, "comment": "ok"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/assignments/{}/grades", quiz.id))
        .insert_header(("Authorization", auth))
        .to_request();
    let list: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["points"], 8.5);
}

#[actix_web::test]
async fn points_outside_range_are_rejected() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let quiz = create_assignment(db(&state), room.teacher.id, room.course.id, "Quiz", 10.0).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(room.teacher.id, Role::Teacher, &sec);

    for points in [-1.0, 10.5] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/assignments/{}/grades/{}", quiz.id, room.student.id))
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({"points": points}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_structure(resp, 400, "VALIDATION_ERROR").await;
    }
}

#[actix_web::test]
async fn grading_outside_the_class_is_rejected() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let outsider = create_student(db(&state), "s.out", None).await;
    let quiz = create_assignment(db(&state), room.teacher.id, room.course.id, "Quiz", 10.0).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(room.teacher.id, Role::Teacher, &sec);

    let req = test::TestRequest::put()
        .uri(&format!("/api/assignments/{}/grades/{}", quiz.id, outsider.id))
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({"points": 5.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "VALIDATION_ERROR").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/assignments/{}/grades/9999", quiz.id))
        .insert_header(("Authorization", auth))
        .set_json(json!({"points": 5.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 404, "USER_NOT_FOUND").await;
}

#[actix_web::test]
async fn deleting_missing_grade_is_not_found() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let quiz = create_assignment(db(&state), room.teacher.id, room.course.id, "Quiz", 10.0).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/assignments/{}/grades/{}", quiz.id, room.student.id))
        .insert_header(("Authorization", bearer(room.teacher.id, Role::Teacher, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 404, "GRADE_NOT_FOUND").await;
}

#[actix_web::test]
async fn student_sees_own_grades_with_percentage() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    let quiz = create_assignment(db(&state), room.teacher.id, room.course.id, "Quiz", 10.0).await;
    let essay = create_assignment(db(&state), room.teacher.id, room.course.id, "Essay", 20.0).await;
    create_assignment(db(&state), room.teacher.id, room.course.id, "Ungraded", 30.0).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let teacher_auth = bearer(room.teacher.id, Role::Teacher, &sec);

    for (assignment_id, points) in [(quiz.id, 7.0), (essay.id, 13.0)] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/assignments/{assignment_id}/grades/{}", room.student.id))
            .insert_header(("Authorization", teacher_auth.clone()))
            .set_json(json!({"points": points}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
    }

    let req = test::TestRequest::get()
        .uri("/api/grades/me")
        .insert_header(("Authorization", bearer(room.student.id, Role::Student, &sec)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    let courses = body.as_array().unwrap();
    assert_eq!(courses.len(), 1);

    let course = &courses[0];
    assert_eq!(course["course"]["id"], room.course.id);
    assert_eq!(course["entries"].as_array().unwrap().len(), 3);
    // 20 of 30 graded points; the ungraded assignment does not count
    assert_eq!(course["totals"]["points"], 20.0);
    assert_eq!(course["totals"]["max_points"], 30.0);
    assert_eq!(course["totals"]["graded"], 2);
    assert_eq!(course["totals"]["percentage"], 66.67);
}

#[actix_web::test]
async fn gradebook_lists_every_student_of_the_class() {
    let state = test_state().await;
    let sec = state.security.clone();
    let room = classroom(db(&state)).await;
    create_student(db(&state), "s.quiet", Some(room.class.id)).await;
    let quiz = create_assignment(db(&state), room.teacher.id, room.course.id, "Quiz", 8.0).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = bearer(room.teacher.id, Role::Teacher, &sec);

    let req = test::TestRequest::put()
        .uri(&format!("/api/assignments/{}/grades/{}", quiz.id, room.student.id))
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({"points": 6.0}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/courses/{}/gradebook", room.course.id))
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let book: Value = test::read_body_json(resp).await;
    let rows = book["students"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let graded = rows
        .iter()
        .find(|r| r["student"]["id"] == room.student.id)
        .unwrap();
    assert_eq!(graded["totals"]["percentage"], 75.0);
    let quiet = rows
        .iter()
        .find(|r| r["student"]["username"] == "s.quiet")
        .unwrap();
    assert_eq!(quiet["totals"]["percentage"], Value::Null);
}
