use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OfferingService;
use crate::models::{
    ApiResponse, ErrorCode,
    offerings::requests::{OfferingListParams, OfferingListQuery},
};

pub async fn list_offerings(
    service: &OfferingService,
    query: OfferingListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = OfferingListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        semester_id: query.semester_id,
        department_id: query.department_id,
        credits: query.credits,
        search: query.search,
    };

    match storage.list_offerings_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Offering list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve offering list: {e}"),
            )),
        ),
    }
}
