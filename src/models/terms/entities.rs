use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学期名称
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub enum SemesterName {
    Fall,   // 秋季学期
    Spring, // 春季学期
    Summer, // 夏季学期
}

impl SemesterName {
    pub const FALL: &'static str = "FALL";
    pub const SPRING: &'static str = "SPRING";
    pub const SUMMER: &'static str = "SUMMER";
}

impl<'de> Deserialize<'de> for SemesterName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            SemesterName::FALL => Ok(SemesterName::Fall),
            SemesterName::SPRING => Ok(SemesterName::Spring),
            SemesterName::SUMMER => Ok(SemesterName::Summer),
            _ => Err(serde::de::Error::custom(format!(
                "无效的学期名称: '{s}'. 支持的学期: FALL, SPRING, SUMMER"
            ))),
        }
    }
}

impl std::fmt::Display for SemesterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemesterName::Fall => write!(f, "{}", SemesterName::FALL),
            SemesterName::Spring => write!(f, "{}", SemesterName::SPRING),
            SemesterName::Summer => write!(f, "{}", SemesterName::SUMMER),
        }
    }
}

impl std::str::FromStr for SemesterName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FALL" => Ok(SemesterName::Fall),
            "SPRING" => Ok(SemesterName::Spring),
            "SUMMER" => Ok(SemesterName::Summer),
            _ => Err(format!("Invalid semester name: {s}")),
        }
    }
}

// 学年实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct AcademicYear {
    pub id: i64,
    pub name: String, // 格式: 2024-2025
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学期实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct Semester {
    pub id: i64,
    pub academic_year_id: i64,
    pub name: SemesterName,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semester_name_roundtrip() {
        assert_eq!("FALL".parse::<SemesterName>(), Ok(SemesterName::Fall));
        assert_eq!(SemesterName::Spring.to_string(), "SPRING");
        assert!("WINTER".parse::<SemesterName>().is_err());
    }
}
