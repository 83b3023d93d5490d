use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 关联的开课 ID
    pub course_offering_id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 截止日期
    pub due_date: chrono::NaiveDate,
    // 满分
    pub total_marks: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentSubmission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub submission_date: chrono::DateTime<chrono::Utc>,
    // 未批改时为空
    pub marks_obtained: Option<f64>,
    pub feedback: Option<String>,
}

impl AssignmentSubmission {
    // 提交日期晚于截止日期视为迟交
    pub fn is_late(&self, assignment: &Assignment) -> bool {
        self.submission_date.date_naive() > assignment.due_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_assignment(due: NaiveDate) -> Assignment {
        Assignment {
            id: 1,
            course_offering_id: 1,
            title: "期中报告".to_string(),
            description: None,
            due_date: due,
            total_marks: 100.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_submission_on_due_date_is_not_late() {
        let due = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let assignment = sample_assignment(due);
        let submission = AssignmentSubmission {
            id: 1,
            assignment_id: 1,
            student_id: 1,
            submission_date: Utc.with_ymd_and_hms(2025, 3, 15, 23, 59, 0).unwrap(),
            marks_obtained: None,
            feedback: None,
        };
        assert!(!submission.is_late(&assignment));
    }

    #[test]
    fn test_submission_after_due_date_is_late() {
        let due = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let assignment = sample_assignment(due);
        let submission = AssignmentSubmission {
            id: 1,
            assignment_id: 1,
            student_id: 1,
            submission_date: Utc.with_ymd_and_hms(2025, 3, 16, 0, 5, 0).unwrap(),
            marks_obtained: None,
            feedback: None,
        };
        assert!(submission.is_late(&assignment));
    }
}
