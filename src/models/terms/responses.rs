use super::entities::{AcademicYear, Semester};
use serde::Serialize;
use ts_rs::TS;

// 学年列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct AcademicYearListResponse {
    pub items: Vec<AcademicYear>,
}

// 学期列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct SemesterListResponse {
    pub items: Vec<Semester>,
}

// 当前学期响应（学年 + 学期）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct CurrentTermResponse {
    pub academic_year: Option<AcademicYear>,
    pub semester: Option<Semester>,
}
