use super::entities::Teacher;
use crate::models::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 教师详情（档案 + 账号信息）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub teacher: Teacher,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListResponse {
    pub items: Vec<TeacherDetail>,
    pub pagination: PaginationInfo,
}

// 教师主页（档案 + 所授开课）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherProfileResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub detail: TeacherDetail,
    pub offerings: Vec<crate::models::offerings::responses::OfferingSummary>,
}
