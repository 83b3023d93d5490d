//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_years;
pub mod assignment_submissions;
pub mod assignments;
pub mod course_offerings;
pub mod course_prerequisites;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod semesters;
pub mod student_attendance;
pub mod students;
pub mod teacher_attendance;
pub mod teachers;
pub mod users;
