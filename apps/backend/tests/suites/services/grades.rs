use gradebook::services::{classes, grades};

use crate::support::factory::{classroom, create_assignment, create_class, db, test_state};

#[tokio::test]
async fn my_grades_keeps_courses_from_a_previous_class() {
    let state = test_state().await;
    let conn = db(&state);
    let room = classroom(conn).await;
    let quiz = create_assignment(conn, room.teacher.id, room.course.id, "Quiz", 10.0).await;
    grades::upsert(conn, room.teacher.id, quiz.id, room.student.id, 9.0, Some(" well done ".into()))
        .await
        .unwrap();

    // Move to a class without courses
    let new_class = create_class(conn, "8A").await;
    classes::enrol(conn, new_class.id, room.student.id).await.unwrap();

    let mine = grades::my_grades(conn, room.student.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].course.id, room.course.id);
    let entry = &mine[0].entries[0];
    assert_eq!(entry.grade.as_ref().unwrap().comment.as_deref(), Some("well done"));
    assert_eq!(mine[0].totals.percentage(), Some(90.0));

    // Still part of the old course's gradebook
    let book = grades::gradebook(conn, room.teacher.id, room.course.id).await.unwrap();
    assert!(book.students.iter().any(|row| row.student.id == room.student.id));
}

#[tokio::test]
async fn no_grades_means_no_percentage() {
    let state = test_state().await;
    let conn = db(&state);
    let room = classroom(conn).await;
    create_assignment(conn, room.teacher.id, room.course.id, "Quiz", 10.0).await;

    let mine = grades::my_grades(conn, room.student.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].totals.graded, 0);
    assert_eq!(mine[0].totals.percentage(), None);
}

#[tokio::test]
async fn deleting_assignment_removes_its_grades() {
    let state = test_state().await;
    let conn = db(&state);
    let room = classroom(conn).await;
    let quiz = create_assignment(conn, room.teacher.id, room.course.id, "Quiz", 10.0).await;
    grades::upsert(conn, room.teacher.id, quiz.id, room.student.id, 5.0, None)
        .await
        .unwrap();

    gradebook::services::assignments::delete(conn, room.teacher.id, quiz.id)
        .await
        .unwrap();

    let mine = grades::my_grades(conn, room.student.id).await.unwrap();
    assert!(mine[0].entries.is_empty());
    assert_eq!(mine[0].totals.points, 0.0);
}
