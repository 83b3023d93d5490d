use super::entities::CourseOffering;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 开课摘要（选课列表用，带实时容量）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offering.ts")]
pub struct OfferingSummary {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub department_id: i64,
    pub teacher_name: Option<String>,
    pub schedule: Option<String>,
    pub max_students: i32,
    pub current_enrollment: i64,
    pub effective_capacity: i32,
    pub available_slots: i64,
    pub is_full: bool,
}

// 开课详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offering.ts")]
pub struct OfferingDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub offering: CourseOffering,
    pub current_enrollment: i64,
    pub effective_capacity: i32,
    pub available_slots: i64,
    pub is_full: bool,
}

// 开课摘要列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offering.ts")]
pub struct OfferingListResponse {
    pub items: Vec<OfferingSummary>,
    pub pagination: PaginationInfo,
}
