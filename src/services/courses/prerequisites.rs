use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::SchoolSystemError;
use crate::models::courses::requests::AddPrerequisiteRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_prerequisites(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 课程不存在和没有先修课程都要区分开
    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get course: {e}"),
                )),
            );
        }
    }

    match storage.list_course_prerequisites(course_id).await {
        Ok(prerequisites) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            prerequisites,
            "Prerequisite list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve prerequisite list: {e}"),
            )),
        ),
    }
}

pub async fn add_prerequisite(
    service: &CourseService,
    course_id: i64,
    prerequisite: AddPrerequisiteRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .add_course_prerequisite(course_id, prerequisite.prerequisite_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Created()
            .json(ApiResponse::<()>::success_empty("先修课程添加成功"))),
        Err(SchoolSystemError::Validation(msg)) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)))
        }
        Err(SchoolSystemError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, msg))),
        Err(SchoolSystemError::Conflict(msg)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg)))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to add prerequisite: {e}"),
            )),
        ),
    }
}

pub async fn remove_prerequisite(
    service: &CourseService,
    course_id: i64,
    prerequisite_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .remove_course_prerequisite(course_id, prerequisite_id)
        .await
    {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::<()>::success_empty("先修课程已移除"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Prerequisite relation not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to remove prerequisite: {e}"),
            )),
        ),
    }
}
