use super::entities::Enrollment;
use serde::Serialize;
use ts_rs::TS;

// 花名册条目（教师成绩录入页）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RosterEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub enrollment: Enrollment,
    pub student_code: String,
    pub student_name: String,
    pub total_score: f64,
}

// 开课花名册响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RosterResponse {
    pub items: Vec<RosterEntry>,
}

// 学生个人课表条目
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct StudentEnrollmentEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub enrollment: Enrollment,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub total_score: f64,
}

// 学生课表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct StudentEnrollmentListResponse {
    pub items: Vec<StudentEnrollmentEntry>,
}

// 批量成绩更新响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct GradesUpdateResponse {
    pub updated: i64,
}
