use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::errors::SchoolSystemError;
use crate::models::enrollments::requests::UpdateGradesRequest;
use crate::models::enrollments::responses::GradesUpdateResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_score_components;

/// 批量成绩录入。
///
/// 所有行先整体校验，任何一行分数越界就拒绝整个请求，
/// 不会出现部分写入。
pub async fn update_grades(
    service: &EnrollmentService,
    offering_id: i64,
    update_data: UpdateGradesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if update_data.rows.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "At least one grade row is required",
        )));
    }

    for row in &update_data.rows {
        if let Err(msg) = validate_score_components(
            row.assignment_score,
            row.midterm_score,
            row.final_score,
        ) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ScoreInvalid,
                format!("Enrollment {}: {msg}", row.enrollment_id),
            )));
        }
    }

    let storage = service.get_storage(request);

    match storage.update_grades(offering_id, update_data).await {
        Ok(updated) => {
            info!("开课 {} 更新 {} 行成绩", offering_id, updated);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                GradesUpdateResponse {
                    updated: updated as i64,
                },
                "成绩更新成功",
            )))
        }
        Err(SchoolSystemError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ScoreInvalid, msg))),
        Err(SchoolSystemError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::OfferingNotFound, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update grades: {e}"),
            )),
        ),
    }
}
