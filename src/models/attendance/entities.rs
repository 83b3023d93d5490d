//! 考勤模型
//!
//! 学生与教师共用同一套记录结构，按 person_id 区分归属。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 单条考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    // 学生或教师的档案ID
    pub person_id: i64,
    pub date: chrono::NaiveDate,
    pub is_present: bool,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 考勤统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    pub attendance_rate: f64,
}

impl AttendanceSummary {
    // 无记录时出勤率为 0，不做除零
    pub fn from_counts(total_days: i64, present_days: i64) -> Self {
        let attendance_rate = if total_days > 0 {
            present_days as f64 / total_days as f64 * 100.0
        } else {
            0.0
        };
        AttendanceSummary {
            total_days,
            present_days,
            absent_days: total_days - present_days,
            attendance_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_rate() {
        let summary = AttendanceSummary::from_counts(20, 18);
        assert_eq!(summary.absent_days, 2);
        assert!((summary.attendance_rate - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_attendance_rate_no_records() {
        let summary = AttendanceSummary::from_counts(0, 0);
        assert_eq!(summary.total_days, 0);
        assert_eq!(summary.attendance_rate, 0.0);
    }

    #[test]
    fn test_attendance_rate_all_absent() {
        let summary = AttendanceSummary::from_counts(5, 0);
        assert_eq!(summary.absent_days, 5);
        assert_eq!(summary.attendance_rate, 0.0);
    }
}
