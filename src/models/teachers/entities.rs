use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师档案实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub id: i64,
    pub user_id: i64,
    pub teacher_code: String,
    pub department_id: Option<i64>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub joining_date: Option<chrono::NaiveDate>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
