use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 教师查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department_id: Option<i64>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

// 创建教师档案请求（同时创建登录账号）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct CreateTeacherRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub teacher_code: String,
    pub department_id: Option<i64>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub joining_date: Option<chrono::NaiveDate>,
}

// 更新教师档案请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub department_id: Option<i64>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub joining_date: Option<chrono::NaiveDate>,
    pub is_active: Option<bool>,
}

// 教师列表查询参数（用于存储层）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub department_id: Option<i64>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}
