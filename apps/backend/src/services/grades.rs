use std::collections::{BTreeMap, HashMap};

use sea_orm::ConnectionTrait;
use tracing::info;

use super::access::course_for_owner;
use super::assignments::for_owner;
use super::optional_text;
use crate::auth::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::assignments::{self, Assignment};
use crate::repos::courses::{self, Course};
use crate::repos::grades::{self, Grade, GradeUpsert};
use crate::repos::users::{self, User};

/// `points / max_points` as a percentage rounded to two decimals; `None`
/// when nothing counts towards the total.
pub fn percentage(points: f64, max_points: f64) -> Option<f64> {
    if max_points <= 0.0 || !max_points.is_finite() || !points.is_finite() {
        return None;
    }
    Some((points / max_points * 10_000.0).round() / 100.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub points: f64,
    /// Sum of `max_points` over graded assignments only
    pub max_points: f64,
    pub graded: usize,
}

impl Totals {
    fn add(&mut self, grade: &Grade, assignment: &Assignment) {
        self.points += grade.points;
        self.max_points += assignment.max_points;
        self.graded += 1;
    }

    pub fn percentage(&self) -> Option<f64> {
        if self.graded == 0 {
            return None;
        }
        percentage(self.points, self.max_points)
    }
}

#[derive(Debug, Clone)]
pub struct GradeEntry {
    pub assignment: Assignment,
    pub grade: Option<Grade>,
}

#[derive(Debug, Clone)]
pub struct CourseGrades {
    pub course: Course,
    pub entries: Vec<GradeEntry>,
    pub totals: Totals,
}

#[derive(Debug, Clone)]
pub struct StudentRow {
    pub student: User,
    pub grades: Vec<Grade>,
    pub totals: Totals,
}

#[derive(Debug, Clone)]
pub struct Gradebook {
    pub course: Course,
    pub assignments: Vec<Assignment>,
    pub students: Vec<StudentRow>,
}

pub async fn list_for_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    assignment_id: i64,
) -> Result<Vec<Grade>, AppError> {
    for_owner(conn, teacher_id, assignment_id).await?;
    Ok(grades::list_for_assignment(conn, assignment_id).await?)
}

/// Create or replace the grade of `student_id` on the assignment.
pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    assignment_id: i64,
    student_id: i64,
    points: f64,
    comment: Option<String>,
) -> Result<Grade, AppError> {
    let assignment = for_owner(conn, teacher_id, assignment_id).await?;

    if !points.is_finite() || points < 0.0 || points > assignment.max_points {
        return Err(AppError::validation(format!(
            "points must be between 0 and {}",
            assignment.max_points
        )));
    }

    let student = users::find_user_by_id(conn, student_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(ErrorCode::UserNotFound, format!("User {student_id} not found"))
        })?;
    if student.role != Role::Student {
        return Err(AppError::validation("Grades can only be given to students"));
    }
    let course = courses::require_course(conn, assignment.course_id).await?;
    if student.class_id != Some(course.class_id) {
        return Err(AppError::validation(
            "Student is not enrolled in the class of this course",
        ));
    }

    let grade = grades::upsert_grade(
        conn,
        GradeUpsert {
            assignment_id,
            student_id,
            points,
            comment: optional_text(comment),
        },
    )
    .await?;
    info!(assignment_id, student_id, "Grade recorded");
    Ok(grade)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    assignment_id: i64,
    student_id: i64,
) -> Result<(), AppError> {
    for_owner(conn, teacher_id, assignment_id).await?;
    grades::delete_grade(conn, assignment_id, student_id).await?;
    info!(assignment_id, student_id, "Grade removed");
    Ok(())
}

/// The student's grades grouped per course. Covers the courses of the
/// student's current class plus any course they hold a grade in.
pub async fn my_grades<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    student_id: i64,
) -> Result<Vec<CourseGrades>, AppError> {
    let student = users::require_user(conn, student_id).await?;
    let own = grades::list_for_student(conn, student_id).await?;

    let mut by_assignment: HashMap<i64, Grade> =
        own.into_iter().map(|g| (g.assignment_id, g)).collect();

    let mut course_map: BTreeMap<i64, Course> = BTreeMap::new();
    if let Some(class_id) = student.class_id {
        for course in courses::list_for_class(conn, class_id).await? {
            course_map.insert(course.id, course);
        }
    }
    for assignment_id in by_assignment.keys().copied().collect::<Vec<_>>() {
        let assignment = assignments::require_assignment(conn, assignment_id).await?;
        if !course_map.contains_key(&assignment.course_id) {
            let course = courses::require_course(conn, assignment.course_id).await?;
            course_map.insert(course.id, course);
        }
    }

    let course_ids: Vec<i64> = course_map.keys().copied().collect();
    let mut per_course: HashMap<i64, Vec<Assignment>> = HashMap::new();
    for assignment in assignments::list_for_courses(conn, &course_ids).await? {
        per_course.entry(assignment.course_id).or_default().push(assignment);
    }

    let result = course_map
        .into_values()
        .map(|course| {
            let mut totals = Totals::default();
            let entries = per_course
                .remove(&course.id)
                .unwrap_or_default()
                .into_iter()
                .map(|assignment| {
                    let grade = by_assignment.remove(&assignment.id);
                    if let Some(g) = &grade {
                        totals.add(g, &assignment);
                    }
                    GradeEntry { assignment, grade }
                })
                .collect();
            CourseGrades {
                course,
                entries,
                totals,
            }
        })
        .collect();
    Ok(result)
}

/// Per-student totals for one course: the class roster plus anyone who
/// still holds a grade there after changing class.
pub async fn gradebook<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    course_id: i64,
) -> Result<Gradebook, AppError> {
    let course = course_for_owner(conn, teacher_id, course_id).await?;
    let course_assignments = assignments::list_for_courses(conn, &[course_id]).await?;
    let assignment_ids: Vec<i64> = course_assignments.iter().map(|a| a.id).collect();
    let by_id: HashMap<i64, &Assignment> =
        course_assignments.iter().map(|a| (a.id, a)).collect();

    let mut per_student: BTreeMap<i64, Vec<Grade>> = BTreeMap::new();
    for grade in grades::list_for_assignments(conn, &assignment_ids).await? {
        per_student.entry(grade.student_id).or_default().push(grade);
    }

    let mut students = users::list_students_in_class(conn, course.class_id).await?;
    for student_id in per_student.keys() {
        if !students.iter().any(|s| s.id == *student_id) {
            if let Some(user) = users::find_user_by_id(conn, *student_id).await? {
                students.push(user);
            }
        }
    }

    let rows = students
        .into_iter()
        .map(|student| {
            let grades = per_student.remove(&student.id).unwrap_or_default();
            let mut totals = Totals::default();
            for grade in &grades {
                if let Some(assignment) = by_id.get(&grade.assignment_id) {
                    totals.add(grade, assignment);
                }
            }
            StudentRow {
                student,
                grades,
                totals,
            }
        })
        .collect();

    Ok(Gradebook {
        course,
        assignments: course_assignments,
        students: rows,
    })
}
