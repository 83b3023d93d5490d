//! 仪表盘模型
//!
//! 登录身份在认证阶段一次性确定，载荷按角色打成带标签的联合类型，
//! 前端依据 role 字段分发渲染，不再探测可选字段。

use crate::models::assignments::entities::AssignmentSubmission;
use crate::models::offerings::responses::OfferingSummary;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[serde(tag = "role", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum DashboardResponse {
    // 管理员看系统总览
    Admin {
        total_students: i64,
        total_teachers: i64,
        active_courses: i64,
        total_departments: i64,
    },
    // 学生看自己的学业概况
    Student {
        gpa: f64,
        attendance_percentage: f64,
        current_course_count: i64,
        recent_submissions: Vec<AssignmentSubmission>,
    },
    // 教师看自己负责的开课
    Teacher {
        offering_count: i64,
        total_enrollment: i64,
        offerings: Vec<OfferingSummary>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_role_tag() {
        let payload = DashboardResponse::Admin {
            total_students: 120,
            total_teachers: 15,
            active_courses: 30,
            total_departments: 4,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["total_students"], 120);
    }

    #[test]
    fn test_student_dashboard_tag() {
        let payload = DashboardResponse::Student {
            gpa: 3.43,
            attendance_percentage: 90.0,
            current_course_count: 4,
            recent_submissions: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["role"], "student");
        assert!(json.get("total_students").is_none());
    }
}
