use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 开课实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offering.ts")]
pub struct CourseOffering {
    pub id: i64,
    pub course_id: i64,
    pub semester_id: i64,
    pub teacher_id: Option<i64>,
    pub max_students: i32,
    pub schedule: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 计算弹性容量
///
/// 当前人数达到 max_students 的 90% 时，容量一次性扩到
/// floor(max_students × 1.2)，否则就是 max_students。
/// 扩容只有这一档，不会在 120% 的基础上再扩，也不会低于 max_students。
pub fn effective_capacity(max_students: i32, current_enrollment: i64) -> i32 {
    if current_enrollment as f64 >= 0.9 * max_students as f64 {
        (max_students as f64 * 1.2) as i32
    } else {
        max_students
    }
}

/// 剩余名额，可能为负（扩容前已超员的历史数据）
pub fn available_slots(max_students: i32, current_enrollment: i64) -> i64 {
    effective_capacity(max_students, current_enrollment) as i64 - current_enrollment
}

/// 是否已满
pub fn is_full(max_students: i32, current_enrollment: i64) -> bool {
    current_enrollment >= effective_capacity(max_students, current_enrollment) as i64
}

impl CourseOffering {
    pub fn effective_capacity(&self, current_enrollment: i64) -> i32 {
        effective_capacity(self.max_students, current_enrollment)
    }

    pub fn available_slots(&self, current_enrollment: i64) -> i64 {
        available_slots(self.max_students, current_enrollment)
    }

    pub fn is_full(&self, current_enrollment: i64) -> bool {
        is_full(self.max_students, current_enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_below_ninety_percent() {
        // 10 人上限，8 人未触发扩容
        assert_eq!(effective_capacity(10, 8), 10);
        assert_eq!(available_slots(10, 8), 2);
        assert!(!is_full(10, 8));
    }

    #[test]
    fn test_capacity_expands_at_ninety_percent() {
        // 9/10 正好 90%，扩到 floor(10 * 1.2) = 12
        assert_eq!(effective_capacity(10, 9), 12);
        assert_eq!(available_slots(10, 9), 3);
        assert!(!is_full(10, 9));
    }

    #[test]
    fn test_capacity_expansion_is_one_step() {
        // 已到 12 人也只停留在 12，不会按 12 再扩
        assert_eq!(effective_capacity(10, 12), 12);
        assert!(is_full(10, 12));
        assert_eq!(available_slots(10, 12), 0);
        // 超员历史数据，名额为负但容量不再增长
        assert_eq!(effective_capacity(10, 13), 12);
        assert_eq!(available_slots(10, 13), -1);
    }

    #[test]
    fn test_capacity_never_below_max_students() {
        for current in 0..30 {
            assert!(effective_capacity(25, current) >= 25);
        }
        // 未达 90% 时容量精确等于 max_students
        assert_eq!(effective_capacity(25, 22), 25);
        // 90% of 25 = 22.5，23 人触发扩容 floor(25 * 1.2) = 30
        assert_eq!(effective_capacity(25, 23), 30);
    }

    #[test]
    fn test_capacity_floor_rounding() {
        // floor(7 * 1.2) = floor(8.4) = 8
        assert_eq!(effective_capacity(7, 7), 8);
        // floor(13 * 1.2) = floor(15.6) = 15
        assert_eq!(effective_capacity(13, 12), 15);
    }

    #[test]
    fn test_zero_capacity_offering() {
        assert_eq!(effective_capacity(0, 0), 0);
        assert!(is_full(0, 0));
    }
}
