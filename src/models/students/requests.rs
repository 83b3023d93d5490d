use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department_id: Option<i64>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

// 创建学生档案请求（同时创建登录账号）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub student_code: String,
    pub department_id: Option<i64>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub admission_year_id: Option<i64>,
}

// 更新学生档案请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub department_id: Option<i64>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub admission_year_id: Option<i64>,
    pub graduation_year_id: Option<i64>,
    pub is_active: Option<bool>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub department_id: Option<i64>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}
