pub mod assignments;
pub mod classes;
pub mod courses;
pub mod grades;
pub mod users;

pub use assignments::Entity as Assignments;
pub use classes::Entity as Classes;
pub use courses::Entity as Courses;
pub use grades::Entity as Grades;
pub use users::Entity as Users;
