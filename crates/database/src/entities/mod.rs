pub mod courses;
pub mod enrollment_completions;
pub mod enrollments;
pub mod users;
