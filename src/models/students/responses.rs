use super::entities::Student;
use crate::models::attendance::entities::AttendanceSummary;
use crate::models::common::PaginationInfo;
use crate::models::enrollments::responses::StudentEnrollmentEntry;
use serde::Serialize;
use ts_rs::TS;

// 学生档案 + 账号信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
}

// 学生列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<StudentDetail>,
    pub pagination: PaginationInfo,
}

// 学期绩点，label 形如 "FALL - 2024-2025"
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct SemesterGpa {
    pub semester_id: i64,
    pub label: String,
    pub gpa: f64,
}

// 学生主页完整档案
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentProfileResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub detail: StudentDetail,
    // 全部选课记录（含已退课）
    pub enrollments: Vec<StudentEnrollmentEntry>,
    pub semester_gpas: Vec<SemesterGpa>,
    pub overall_gpa: f64,
    pub attendance: AttendanceSummary,
}
