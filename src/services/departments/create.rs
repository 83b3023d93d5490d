use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DepartmentService;
use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, ErrorCode, departments::requests::CreateDepartmentRequest};

pub async fn create_department(
    service: &DepartmentService,
    department_data: CreateDepartmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if department_data.name.trim().is_empty() || department_data.code.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Department name and code are required",
        )));
    }

    let storage = service.get_storage(request);

    match storage.create_department(department_data).await {
        Ok(department) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(department, "部门创建成功"))),
        Err(SchoolSystemError::Conflict(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::DepartmentCodeAlreadyExists, msg),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create department: {e}"),
            )),
        ),
    }
}
