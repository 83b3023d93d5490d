//! 考勤存储操作
//!
//! 学生和教师各一张表，结构相同。同一人同一天只有一条记录，
//! 重复登记由唯一约束拦下转为冲突错误。

use super::SeaOrmStorage;
use crate::entity::prelude::{Students, Teachers};
use crate::entity::student_attendance::{
    ActiveModel as StudentAttendanceActiveModel, Column as StudentAttendanceColumn,
    Entity as StudentAttendance,
};
use crate::entity::teacher_attendance::{
    ActiveModel as TeacherAttendanceActiveModel, Column as TeacherAttendanceColumn,
    Entity as TeacherAttendance,
};
use crate::errors::{Result, SchoolSystemError};
use crate::models::attendance::{
    entities::AttendanceSummary,
    requests::{AttendanceListQuery, MarkAttendanceRequest},
    responses::AttendanceListResponse,
};
use crate::models::attendance::entities::AttendanceRecord;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 登记学生考勤，日期缺省为当天
    pub async fn mark_student_attendance_impl(
        &self,
        mark: MarkAttendanceRequest,
    ) -> Result<AttendanceRecord> {
        let student = Students::find_by_id(mark.person_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(SchoolSystemError::not_found("学生不存在"));
        }

        let date = mark.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let model = StudentAttendanceActiveModel {
            student_id: Set(mark.person_id),
            date: Set(date),
            is_present: Set(mark.is_present),
            note: Set(mark.note),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| super::map_unique_violation(e, "当日考勤已登记", "写入考勤记录失败"))?;

        Ok(result.into_record())
    }

    /// 查询学生考勤，按日期倒序，附统计
    pub async fn list_student_attendance_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        let mut select = StudentAttendance::find();
        if let Some(person_id) = query.person_id {
            select = select.filter(StudentAttendanceColumn::StudentId.eq(person_id));
        }
        if let Some(start) = query.start_date {
            select = select.filter(StudentAttendanceColumn::Date.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(StudentAttendanceColumn::Date.lte(end));
        }

        let records: Vec<AttendanceRecord> = select
            .order_by_desc(StudentAttendanceColumn::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询考勤记录失败: {e}")))?
            .into_iter()
            .map(|m| m.into_record())
            .collect();

        let summary = summarize(&records);
        Ok(AttendanceListResponse { records, summary })
    }

    /// 登记教师考勤，日期缺省为当天
    pub async fn mark_teacher_attendance_impl(
        &self,
        mark: MarkAttendanceRequest,
    ) -> Result<AttendanceRecord> {
        let teacher = Teachers::find_by_id(mark.person_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;
        if teacher.is_none() {
            return Err(SchoolSystemError::not_found("教师不存在"));
        }

        let date = mark.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let model = TeacherAttendanceActiveModel {
            teacher_id: Set(mark.person_id),
            date: Set(date),
            is_present: Set(mark.is_present),
            note: Set(mark.note),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| super::map_unique_violation(e, "当日考勤已登记", "写入考勤记录失败"))?;

        Ok(result.into_record())
    }

    /// 查询教师考勤，按日期倒序，附统计
    pub async fn list_teacher_attendance_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        let mut select = TeacherAttendance::find();
        if let Some(person_id) = query.person_id {
            select = select.filter(TeacherAttendanceColumn::TeacherId.eq(person_id));
        }
        if let Some(start) = query.start_date {
            select = select.filter(TeacherAttendanceColumn::Date.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(TeacherAttendanceColumn::Date.lte(end));
        }

        let records: Vec<AttendanceRecord> = select
            .order_by_desc(TeacherAttendanceColumn::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询考勤记录失败: {e}")))?
            .into_iter()
            .map(|m| m.into_record())
            .collect();

        let summary = summarize(&records);
        Ok(AttendanceListResponse { records, summary })
    }
}

// 在查出的记录上就地统计，避免再跑一轮计数查询
fn summarize(records: &[AttendanceRecord]) -> AttendanceSummary {
    let total = records.len() as i64;
    let present = records.iter().filter(|r| r.is_present).count() as i64;
    AttendanceSummary::from_counts(total, present)
}

#[cfg(test)]
mod tests {
    use crate::errors::SchoolSystemError;
    use crate::models::attendance::requests::{AttendanceListQuery, MarkAttendanceRequest};
    use crate::storage::sea_orm_storage::test_seed::{seed_student, seed_teacher};

    fn mark(person_id: i64, date: chrono::NaiveDate, is_present: bool) -> MarkAttendanceRequest {
        MarkAttendanceRequest {
            person_id,
            date: Some(date),
            is_present,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_mark_same_day_twice_conflicts() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let student_id = seed_student(&storage, "S2024001").await;
        let day = chrono::NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();

        storage
            .mark_student_attendance_impl(mark(student_id, day, true))
            .await
            .unwrap();
        let err = storage
            .mark_student_attendance_impl(mark(student_id, day, false))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_mark_unknown_student_not_found() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let err = storage
            .mark_student_attendance_impl(MarkAttendanceRequest {
                person_id: 404,
                date: None,
                is_present: true,
                note: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_with_date_window() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let student_id = seed_student(&storage, "S2024002").await;

        for (day, present) in [(1, true), (2, true), (3, false), (10, true)] {
            storage
                .mark_student_attendance_impl(mark(
                    student_id,
                    chrono::NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
                    present,
                ))
                .await
                .unwrap();
        }

        let result = storage
            .list_student_attendance_impl(AttendanceListQuery {
                person_id: Some(student_id),
                start_date: Some(chrono::NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()),
                end_date: Some(chrono::NaiveDate::from_ymd_opt(2024, 10, 5).unwrap()),
            })
            .await
            .unwrap();

        assert_eq!(result.records.len(), 3);
        assert_eq!(result.summary.total_days, 3);
        assert_eq!(result.summary.present_days, 2);
        assert_eq!(result.summary.absent_days, 1);
        // 倒序，最近的在前
        assert_eq!(
            result.records[0].date,
            chrono::NaiveDate::from_ymd_opt(2024, 10, 3).unwrap()
        );
    }

    #[tokio::test]
    async fn test_teacher_attendance_separate_table() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let teacher_id = seed_teacher(&storage, "T2001").await;
        let day = chrono::NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();

        storage
            .mark_teacher_attendance_impl(mark(teacher_id, day, true))
            .await
            .unwrap();

        let teachers = storage
            .list_teacher_attendance_impl(AttendanceListQuery {
                person_id: Some(teacher_id),
                start_date: None,
                end_date: None,
            })
            .await
            .unwrap();
        assert_eq!(teachers.records.len(), 1);

        // 学生表不受影响
        let students = storage
            .list_student_attendance_impl(AttendanceListQuery {
                person_id: None,
                start_date: None,
                end_date: None,
            })
            .await
            .unwrap();
        assert!(students.records.is_empty());
        assert_eq!(students.summary.attendance_rate, 0.0);
    }
}
