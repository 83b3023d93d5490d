use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 等第
//
// A-F 由总分导出，W（退课）和 I（未完成）只能人工指定，
// 不参与 GPA 计算。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    W,
    I,
}

impl Grade {
    /// 绩点，W 和 I 不计入
    pub fn points(&self) -> Option<f64> {
        match self {
            Grade::A => Some(4.0),
            Grade::B => Some(3.0),
            Grade::C => Some(2.0),
            Grade::D => Some(1.0),
            Grade::F => Some(0.0),
            Grade::W | Grade::I => None,
        }
    }

    /// 按总分导出等第：90 及以上 A，80 B，70 C，60 D，其余 F
    pub fn from_total_score(total: f64) -> Grade {
        if total >= 90.0 {
            Grade::A
        } else if total >= 80.0 {
            Grade::B
        } else if total >= 70.0 {
            Grade::C
        } else if total >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Grade>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的等第: '{s}'. 支持的等第: A, B, C, D, F, W, I"
            ))
        })
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
            Grade::W => "W",
            Grade::I => "I",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            "W" => Ok(Grade::W),
            "I" => Ok(Grade::I),
            _ => Err(format!("Invalid grade: {s}")),
        }
    }
}

// 选课记录实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_offering_id: i64,
    pub enrollment_date: chrono::NaiveDate,
    pub assignment_score: Option<f64>,
    pub midterm_score: Option<f64>,
    pub final_score: Option<f64>,
    pub grade: Option<Grade>,
    pub withdrawn: bool,
    pub withdrawal_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Enrollment {
    /// 三项成绩的普通求和，未录入的记 0
    ///
    /// 各项满分约定为 30/30/40，录入时已按各自权重折算，
    /// 这里不再加权。
    pub fn total_score(&self) -> f64 {
        self.assignment_score.unwrap_or(0.0)
            + self.midterm_score.unwrap_or(0.0)
            + self.final_score.unwrap_or(0.0)
    }
}

/// 计算 GPA：Σ(绩点 × 学分) / Σ(学分)
///
/// 只统计有等第且非 W/I 的记录，没有可计项时返回 0。
pub fn gpa_from_grades(graded: &[(Grade, i32)]) -> f64 {
    let mut total_points = 0.0;
    let mut total_credits = 0i64;

    for (grade, credits) in graded {
        if let Some(points) = grade.points() {
            total_points += points * *credits as f64;
            total_credits += *credits as i64;
        }
    }

    if total_credits == 0 {
        return 0.0;
    }
    total_points / total_credits as f64
}

/// 选课操作结果
#[derive(Debug)]
pub enum RegistrationOutcome {
    /// 新建选课记录
    Registered(Enrollment),
    /// 复用已退课的记录并重新激活
    Reactivated(Enrollment),
    /// 已有活跃记录，不做任何修改
    AlreadyRegistered(Enrollment),
    /// 容量已满
    OfferingFull,
}

/// 退课操作结果
#[derive(Debug)]
pub enum WithdrawalOutcome {
    Withdrawn(Enrollment),
    NotRegistered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grade_thresholds() {
        assert_eq!(Grade::from_total_score(95.0), Grade::A);
        assert_eq!(Grade::from_total_score(90.0), Grade::A);
        assert_eq!(Grade::from_total_score(89.9), Grade::B);
        assert_eq!(Grade::from_total_score(80.0), Grade::B);
        assert_eq!(Grade::from_total_score(70.0), Grade::C);
        assert_eq!(Grade::from_total_score(60.0), Grade::D);
        assert_eq!(Grade::from_total_score(59.9), Grade::F);
        assert_eq!(Grade::from_total_score(0.0), Grade::F);
    }

    #[test]
    fn test_grade_points() {
        assert_eq!(Grade::A.points(), Some(4.0));
        assert_eq!(Grade::F.points(), Some(0.0));
        assert_eq!(Grade::W.points(), None);
        assert_eq!(Grade::I.points(), None);
    }

    #[test]
    fn test_gpa_weighted_by_credits() {
        // A (3 学分) + B (4 学分) = (4*3 + 3*4) / 7 ≈ 3.43
        let gpa = gpa_from_grades(&[(Grade::A, 3), (Grade::B, 4)]);
        assert!((gpa - 24.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_gpa_excludes_withdrawn_and_incomplete() {
        let gpa = gpa_from_grades(&[(Grade::A, 3), (Grade::W, 4), (Grade::I, 2)]);
        assert!((gpa - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_gpa_zero_when_nothing_gradable() {
        assert_eq!(gpa_from_grades(&[]), 0.0);
        assert_eq!(gpa_from_grades(&[(Grade::W, 3), (Grade::I, 4)]), 0.0);
    }

    #[test]
    fn test_total_score_plain_sum() {
        let mut e = Enrollment {
            id: 1,
            student_id: 1,
            course_offering_id: 1,
            enrollment_date: chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            assignment_score: Some(25.0),
            midterm_score: Some(28.0),
            final_score: Some(35.5),
            grade: None,
            withdrawn: false,
            withdrawal_date: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!((e.total_score() - 88.5).abs() < 1e-9);

        e.final_score = None;
        assert!((e.total_score() - 53.0).abs() < 1e-9);
    }
}
