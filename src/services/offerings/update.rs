use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OfferingService;
use crate::errors::SchoolSystemError;
use crate::models::offerings::requests::UpdateOfferingRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_offering(
    service: &OfferingService,
    offering_id: i64,
    update_data: UpdateOfferingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(max_students) = update_data.max_students
        && max_students <= 0
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "max_students must be a positive integer",
        )));
    }

    let storage = service.get_storage(request);

    match storage.update_offering(offering_id, update_data).await {
        Ok(Some(offering)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(offering, "开课信息更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::OfferingNotFound,
            "Offering not found",
        ))),
        Err(SchoolSystemError::NotFound(msg)) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg)))
        }
        Err(SchoolSystemError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::OfferingAlreadyExists, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update offering: {e}"),
            )),
        ),
    }
}
