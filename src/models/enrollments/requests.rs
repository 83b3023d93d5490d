use super::entities::Grade;
use serde::Deserialize;
use ts_rs::TS;

// 选课请求（管理员代选时指定 student_id，学生自选时留空）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RegisterRequest {
    pub student_id: Option<i64>,
}

// 单行成绩更新
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct GradeRowUpdate {
    pub enrollment_id: i64,
    pub grade: Option<Grade>,
    pub assignment_score: Option<f64>,
    pub midterm_score: Option<f64>,
    pub final_score: Option<f64>,
}

// 批量成绩更新请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct UpdateGradesRequest {
    pub rows: Vec<GradeRowUpdate>,
}
