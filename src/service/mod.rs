pub mod login;
pub mod student_loader;
