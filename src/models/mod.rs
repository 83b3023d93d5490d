//! 业务模型定义
//!
//! 按业务域拆分，每个域包含 entities / requests / responses 三类。

pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod enrollments;
pub mod offerings;
pub mod students;
pub mod teachers;
pub mod terms;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo};
