pub mod add_student;
pub mod all_students;
pub mod dashboard;
pub mod import_export;
pub mod index;
pub mod sse;
pub mod student_in_detail;
