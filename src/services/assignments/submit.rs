use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::errors::SchoolSystemError;
use crate::models::assignments::requests::SubmitAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::resolve_student_id;

pub async fn submit_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    submit_data: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student_id = match resolve_student_id(&storage, submit_data.student_id, request).await {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match storage.submit_assignment(assignment_id, student_id).await {
        Ok(submission) => {
            info!("学生 {} 提交作业 {}", student_id, assignment_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "作业提交成功")))
        }
        Err(SchoolSystemError::Conflict(msg)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg)))
        }
        Err(SchoolSystemError::NotFound(msg)) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg)))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to submit assignment: {e}"),
            )),
        ),
    }
}
