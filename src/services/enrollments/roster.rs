use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_roster(
    service: &EnrollmentService,
    offering_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_offering_roster(offering_id).await {
        Ok(roster) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            roster,
            "Roster retrieved successfully",
        ))),
        Err(SchoolSystemError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::OfferingNotFound, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve roster: {e}"),
            )),
        ),
    }
}
