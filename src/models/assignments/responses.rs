use super::entities::{Assignment, AssignmentSubmission};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
    pub total: i64,
}

// 提交记录（附带学生信息，供教师批改视图）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmissionEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: AssignmentSubmission,
    pub student_code: String,
    pub student_name: Option<String>,
    pub is_late: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionEntry>,
    pub total: i64,
}
