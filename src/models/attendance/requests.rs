use serde::Deserialize;
use ts_rs::TS;

// 登记考勤请求，date 缺省为当天
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub person_id: i64,
    pub date: Option<chrono::NaiveDate>,
    pub is_present: bool,
    pub note: Option<String>,
}

// 考勤查询窗口
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListQuery {
    pub person_id: Option<i64>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}
