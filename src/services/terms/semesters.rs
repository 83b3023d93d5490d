use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TermService;
use crate::errors::SchoolSystemError;
use crate::models::terms::requests::CreateSemesterRequest;
use crate::models::terms::responses::SemesterListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_semesters(
    service: &TermService,
    academic_year_id: Option<i64>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_semesters(academic_year_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SemesterListResponse { items },
            "Semester list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve semester list: {e}"),
            )),
        ),
    }
}

pub async fn create_semester(
    service: &TermService,
    semester_data: CreateSemesterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if semester_data.end_date <= semester_data.start_date {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "End date must be after start date",
        )));
    }

    let storage = service.get_storage(request);

    match storage.create_semester(semester_data).await {
        Ok(semester) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(semester, "学期创建成功")))
        }
        Err(SchoolSystemError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::TermAlreadyExists, msg))),
        Err(SchoolSystemError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::AcademicYearNotFound, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create semester: {e}"),
            )),
        ),
    }
}

pub async fn set_current_semester(
    service: &TermService,
    semester_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.set_current_semester(semester_id).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::<()>::success_empty("当前学期已切换"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SemesterNotFound,
            "Semester not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to set current semester: {e}"),
            )),
        ),
    }
}
