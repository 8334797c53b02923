pub mod completion;
pub mod course_content;
pub mod progress;
pub mod publication;
