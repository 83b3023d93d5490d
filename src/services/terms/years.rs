use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TermService;
use crate::errors::SchoolSystemError;
use crate::models::terms::requests::CreateAcademicYearRequest;
use crate::models::terms::responses::AcademicYearListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_academic_year_name;

pub async fn list_academic_years(
    service: &TermService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_academic_years().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AcademicYearListResponse { items },
            "Academic year list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve academic year list: {e}"),
            )),
        ),
    }
}

pub async fn create_academic_year(
    service: &TermService,
    year_data: CreateAcademicYearRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 学年名称形如 2024-2025，且后一年必须紧跟前一年
    if let Err(msg) = validate_academic_year_name(&year_data.name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    if year_data.end_date <= year_data.start_date {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "End date must be after start date",
        )));
    }

    let storage = service.get_storage(request);

    match storage.create_academic_year(year_data).await {
        Ok(year) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(year, "学年创建成功")))
        }
        Err(SchoolSystemError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::TermAlreadyExists, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create academic year: {e}"),
            )),
        ),
    }
}

pub async fn set_current_academic_year(
    service: &TermService,
    year_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.set_current_academic_year(year_id).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::<()>::success_empty("当前学年已切换"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to set current academic year: {e}"),
            )),
        ),
    }
}
