use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::errors::SchoolSystemError;
use crate::models::enrollments::entities::WithdrawalOutcome;
use crate::models::enrollments::requests::RegisterRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::resolve_student_id;

pub async fn withdraw(
    service: &EnrollmentService,
    offering_id: i64,
    withdraw_data: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student_id = match resolve_student_id(&storage, withdraw_data.student_id, request).await {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match storage.withdraw_enrollment(student_id, offering_id).await {
        Ok(WithdrawalOutcome::Withdrawn(enrollment)) => {
            info!("学生 {} 退课: 开课 {}", student_id, offering_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(enrollment, "退课成功")))
        }
        Ok(WithdrawalOutcome::NotRegistered) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::NotEnrolled, "No active enrollment in this offering"),
        )),
        Err(SchoolSystemError::NotFound(msg)) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg)))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to withdraw enrollment: {e}"),
            )),
        ),
    }
}
