use gradebook::auth::Role;
use gradebook::config::SeedTeacher;
use gradebook::repos::users;
use gradebook::services::seed::ensure_seed_teacher;
use gradebook::services::users::login;

use crate::support::factory::{db, test_state};

fn seed() -> SeedTeacher {
    SeedTeacher {
        username: "admin.teacher".to_string(),
        password: "bootstrap-pass-1".to_string(),
    }
}

#[tokio::test]
async fn seeds_once() {
    let state = test_state().await;
    let conn = db(&state);

    assert!(ensure_seed_teacher(conn, &seed()).await.unwrap());
    assert!(!ensure_seed_teacher(conn, &seed()).await.unwrap());

    let teachers = users::list_users(conn, Some(Role::Teacher)).await.unwrap();
    assert_eq!(teachers.len(), 1);

    let user = login(conn, "admin.teacher", "bootstrap-pass-1").await.unwrap();
    assert_eq!(user.role, Role::Teacher);
}
