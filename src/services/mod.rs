pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod enrollments;
pub mod offerings;
pub mod students;
pub mod teachers;
pub mod terms;
pub mod users;

pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use dashboard::DashboardService;
pub use departments::DepartmentService;
pub use enrollments::EnrollmentService;
pub use offerings::OfferingService;
pub use students::StudentService;
pub use teachers::TeacherService;
pub use terms::TermService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 确定选课、提交作业等学生操作针对的学籍档案。
///
/// 学生只能操作自己的档案，请求体里的 student_id 被忽略；
/// 管理员必须显式指定 student_id；教师不允许代学生操作。
pub(crate) async fn resolve_student_id(
    storage: &Arc<dyn Storage>,
    explicit_student_id: Option<i64>,
    request: &HttpRequest,
) -> Result<i64, HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Err(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
    };

    match user.role {
        UserRole::Student => match storage.get_student_by_user_id(user.id).await {
            Ok(Some(student)) => Ok(student.id),
            Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "No student profile found for the current user",
            ))),
            Err(e) => Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to resolve student profile: {e}"),
                )),
            ),
        },
        UserRole::Admin => match explicit_student_id {
            Some(student_id) => Ok(student_id),
            None => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "student_id is required when acting on behalf of a student",
            ))),
        },
        UserRole::Teacher => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Teachers cannot perform student operations",
        ))),
    }
}
