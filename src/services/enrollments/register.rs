use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::errors::SchoolSystemError;
use crate::models::enrollments::entities::RegistrationOutcome;
use crate::models::enrollments::requests::RegisterRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::resolve_student_id;

pub async fn register(
    service: &EnrollmentService,
    offering_id: i64,
    register_data: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student_id = match resolve_student_id(&storage, register_data.student_id, request).await {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match storage.register_enrollment(student_id, offering_id).await {
        Ok(RegistrationOutcome::Registered(enrollment)) => {
            info!("学生 {} 选课成功: 开课 {}", student_id, offering_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "选课成功")))
        }
        Ok(RegistrationOutcome::Reactivated(enrollment)) => {
            info!("学生 {} 恢复选课: 开课 {}", student_id, offering_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(enrollment, "已恢复选课")))
        }
        Ok(RegistrationOutcome::AlreadyRegistered(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AlreadyEnrolled, "Already enrolled in this offering"),
        )),
        Ok(RegistrationOutcome::OfferingFull) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::OfferingFull, "Offering has reached its capacity"),
        )),
        // 并发下唯一约束兜住的重复选课和 AlreadyRegistered 同样处理
        Err(SchoolSystemError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AlreadyEnrolled, "Already enrolled in this offering"),
        )),
        Err(SchoolSystemError::NotFound(msg)) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg)))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to register enrollment: {e}"),
            )),
        ),
    }
}
