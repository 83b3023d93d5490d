use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::OfferingService;
use crate::errors::SchoolSystemError;
use crate::models::offerings::requests::CreateOfferingRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_offering(
    service: &OfferingService,
    offering_data: CreateOfferingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if offering_data.max_students <= 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "max_students must be a positive integer",
        )));
    }

    let storage = service.get_storage(request);

    match storage.create_offering(offering_data).await {
        Ok(offering) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(offering, "开课创建成功")))
        }
        Err(SchoolSystemError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::OfferingAlreadyExists, msg))),
        Err(SchoolSystemError::NotFound(msg)) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg)))
        }
        Err(e) => {
            let msg = format!("Offering creation failed: {e}");
            error!("{}", msg);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
        }
    }
}
