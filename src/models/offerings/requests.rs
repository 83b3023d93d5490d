use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 开课查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offering.ts")]
pub struct OfferingListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub semester_id: Option<i64>,
    pub department_id: Option<i64>,
    pub credits: Option<i32>,
    pub search: Option<String>,
}

// 创建开课请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offering.ts")]
pub struct CreateOfferingRequest {
    pub course_id: i64,
    pub semester_id: i64,
    pub teacher_id: Option<i64>,
    pub max_students: i32,
    pub schedule: Option<String>,
}

// 更新开课请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offering.ts")]
pub struct UpdateOfferingRequest {
    pub teacher_id: Option<i64>,
    pub max_students: Option<i32>,
    pub schedule: Option<String>,
    pub is_active: Option<bool>,
}

// 开课列表查询参数（用于存储层）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offering.ts")]
pub struct OfferingListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub semester_id: Option<i64>,
    pub department_id: Option<i64>,
    pub credits: Option<i32>,
    pub search: Option<String>,
}
