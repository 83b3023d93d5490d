use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 按登录身份返回对应的仪表盘。
///
/// 身份在认证中间件里已经确定，这里只按角色分发，
/// 角色有学生或教师档案缺失时按 404 处理。
pub async fn get_overview(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
    };

    let storage = service.get_storage(request);

    let result = match user.role {
        UserRole::Admin => storage.admin_dashboard().await,
        UserRole::Student => {
            let student = match storage.get_student_by_user_id(user.id).await {
                Ok(Some(student)) => student,
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::StudentNotFound,
                        "No student profile found for the current user",
                    )));
                }
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("Failed to resolve student profile: {e}"),
                        ),
                    ));
                }
            };
            storage.student_dashboard(student.id).await
        }
        UserRole::Teacher => {
            let teacher = match storage.get_teacher_by_user_id(user.id).await {
                Ok(Some(teacher)) => teacher,
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::TeacherNotFound,
                        "No teacher profile found for the current user",
                    )));
                }
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("Failed to resolve teacher profile: {e}"),
                        ),
                    ));
                }
            };
            storage.teacher_dashboard(teacher.id).await
        }
    };

    match result {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            dashboard,
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve dashboard: {e}"),
            )),
        ),
    }
}
