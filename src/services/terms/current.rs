use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TermService;
use crate::models::{ApiResponse, ErrorCode};

/// 当前学年 + 当前学期，两者都可能为空
pub async fn get_current_term(
    service: &TermService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_current_term().await {
        Ok(term) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            term,
            "Current term retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve current term: {e}"),
            )),
        ),
    }
}
