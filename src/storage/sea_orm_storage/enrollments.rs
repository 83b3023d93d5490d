//! 选课存储操作
//!
//! 同一 (学生, 开课) 只保留一行记录：退课置 withdrawn 标记并记 W，
//! 重新选课复用该行。读人数、判容量、写记录在同一个事务内完成。

use super::SeaOrmStorage;
use crate::entity::courses::Column as CourseColumn;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::prelude::{CourseOfferings, Courses, Students, Users};
use crate::entity::students::Column as StudentColumn;
use crate::entity::users::Column as UserColumn;
use crate::errors::{Result, SchoolSystemError};
use crate::models::enrollments::{
    entities::{Grade, RegistrationOutcome, WithdrawalOutcome},
    requests::UpdateGradesRequest,
    responses::{
        RosterEntry, RosterResponse, StudentEnrollmentEntry, StudentEnrollmentListResponse,
    },
};
use crate::models::offerings::entities::is_full;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 学生选课
    ///
    /// 判定顺序：已有活跃记录原样返回；有退课记录则复用该行重新
    /// 激活，该路径按既有策略不做容量检查；否则按活跃人数判容量，
    /// 未满时新建记录。判定和写入共用一个事务。
    pub async fn register_enrollment_impl(
        &self,
        student_id: i64,
        offering_id: i64,
    ) -> Result<RegistrationOutcome> {
        let student = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(SchoolSystemError::not_found("学生不存在"));
        }

        let offering = CourseOfferings::find_by_id(offering_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课失败: {e}")))?
            .ok_or_else(|| SchoolSystemError::not_found("开课不存在"))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseOfferingId.eq(offering_id))
            .one(&txn)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("查询选课记录失败: {e}"))
            })?;

        let now = chrono::Utc::now().timestamp();
        let today = chrono::Utc::now().date_naive();

        if let Some(row) = existing {
            if !row.withdrawn {
                // 活跃记录已存在，不做任何修改
                return Ok(RegistrationOutcome::AlreadyRegistered(row.into_enrollment()));
            }

            // 复用退课记录：清除退课标记和 W 等第，选课日期更新为今天
            let mut active: ActiveModel = row.into();
            active.withdrawn = Set(false);
            active.withdrawal_date = Set(None);
            active.enrollment_date = Set(today);
            active.grade = Set(None);
            active.updated_at = Set(now);

            let updated = active.update(&txn).await.map_err(|e| {
                SchoolSystemError::database_operation(format!("恢复选课记录失败: {e}"))
            })?;

            txn.commit().await.map_err(|e| {
                SchoolSystemError::database_operation(format!("提交事务失败: {e}"))
            })?;

            return Ok(RegistrationOutcome::Reactivated(updated.into_enrollment()));
        }

        let current = Enrollments::find()
            .filter(Column::CourseOfferingId.eq(offering_id))
            .filter(Column::Withdrawn.eq(false))
            .count(&txn)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("统计选课人数失败: {e}"))
            })? as i64;

        if is_full(offering.max_students, current) {
            // 事务随返回丢弃，不产生任何写入
            return Ok(RegistrationOutcome::OfferingFull);
        }

        let model = ActiveModel {
            student_id: Set(student_id),
            course_offering_id: Set(offering_id),
            enrollment_date: Set(today),
            withdrawn: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // 并发下两次首选可能同时通过判定，唯一约束兜底转为冲突
        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "请勿重复选课", "写入选课记录失败"))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(RegistrationOutcome::Registered(inserted.into_enrollment()))
    }

    /// 学生退课
    ///
    /// 只有活跃记录可退：置退课标记、记退课日期并记 W 等第。
    /// 未选或已退返回 NotRegistered。
    pub async fn withdraw_enrollment_impl(
        &self,
        student_id: i64,
        offering_id: i64,
    ) -> Result<WithdrawalOutcome> {
        let existing = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseOfferingId.eq(offering_id))
            .filter(Column::Withdrawn.eq(false))
            .one(&self.db)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("查询选课记录失败: {e}"))
            })?;

        let Some(row) = existing else {
            return Ok(WithdrawalOutcome::NotRegistered);
        };

        let mut active: ActiveModel = row.into();
        active.withdrawn = Set(true);
        active.withdrawal_date = Set(Some(chrono::Utc::now().date_naive()));
        active.grade = Set(Some(Grade::W.to_string()));
        active.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("退课失败: {e}")))?;

        Ok(WithdrawalOutcome::Withdrawn(updated.into_enrollment()))
    }

    /// 开课花名册
    ///
    /// 活跃选课记录加学生学号和姓名，按学号排序，供成绩录入页使用。
    pub async fn get_offering_roster_impl(&self, offering_id: i64) -> Result<RosterResponse> {
        let offering = CourseOfferings::find_by_id(offering_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课失败: {e}")))?;
        if offering.is_none() {
            return Err(SchoolSystemError::not_found("开课不存在"));
        }

        let enrollments = Enrollments::find()
            .filter(Column::CourseOfferingId.eq(offering_id))
            .filter(Column::Withdrawn.eq(false))
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("查询选课记录失败: {e}"))
            })?;

        if enrollments.is_empty() {
            return Ok(RosterResponse { items: vec![] });
        }

        let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let students = Students::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        let user_ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
        let users = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询用户失败: {e}")))?;

        let user_names: HashMap<i64, String> = users
            .into_iter()
            .map(|u| {
                let name = u.display_name.clone().unwrap_or_else(|| u.username.clone());
                (u.id, name)
            })
            .collect();
        let student_info: HashMap<i64, (String, String)> = students
            .into_iter()
            .map(|s| {
                let name = user_names.get(&s.user_id).cloned().unwrap_or_default();
                (s.id, (s.student_code, name))
            })
            .collect();

        let mut items: Vec<RosterEntry> = enrollments
            .into_iter()
            .map(|e| {
                let (student_code, student_name) = student_info
                    .get(&e.student_id)
                    .cloned()
                    .unwrap_or_default();
                let enrollment = e.into_enrollment();
                let total_score = enrollment.total_score();
                RosterEntry {
                    enrollment,
                    student_code,
                    student_name,
                    total_score,
                }
            })
            .collect();
        items.sort_by(|a, b| a.student_code.cmp(&b.student_code));

        Ok(RosterResponse { items })
    }

    /// 批量更新成绩，返回更新的行数
    ///
    /// 每行只写请求里出现的字段。所有行必须属于指定开课，越界的
    /// 行号整批拒绝，写入在一个事务内全部成功或全部放弃。
    pub async fn update_grades_impl(
        &self,
        offering_id: i64,
        update: UpdateGradesRequest,
    ) -> Result<u64> {
        if update.rows.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = update.rows.iter().map(|r| r.enrollment_id).collect();
        let existing = Enrollments::find()
            .filter(Column::Id.is_in(ids))
            .filter(Column::CourseOfferingId.eq(offering_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("查询选课记录失败: {e}"))
            })?;

        let by_id: HashMap<i64, crate::entity::enrollments::Model> =
            existing.into_iter().map(|e| (e.id, e)).collect();

        for row in &update.rows {
            if !by_id.contains_key(&row.enrollment_id) {
                return Err(SchoolSystemError::validation(format!(
                    "选课记录 {} 不存在或不属于该开课",
                    row.enrollment_id
                )));
            }
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let mut updated = 0u64;

        for row in update.rows {
            // 前面已确认每行都在 by_id 里
            let Some(model) = by_id.get(&row.enrollment_id) else {
                continue;
            };

            let mut active: ActiveModel = model.clone().into();
            if let Some(grade) = row.grade {
                active.grade = Set(Some(grade.to_string()));
            }
            if let Some(score) = row.assignment_score {
                active.assignment_score = Set(Some(score));
            }
            if let Some(score) = row.midterm_score {
                active.midterm_score = Set(Some(score));
            }
            if let Some(score) = row.final_score {
                active.final_score = Set(Some(score));
            }
            active.updated_at = Set(now);

            active.update(&txn).await.map_err(|e| {
                SchoolSystemError::database_operation(format!("更新成绩失败: {e}"))
            })?;
            updated += 1;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated)
    }

    /// 学生的全部选课记录（含已退课），按选课日期倒序
    pub async fn list_student_enrollments_impl(
        &self,
        student_id: i64,
    ) -> Result<StudentEnrollmentListResponse> {
        let student = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(SchoolSystemError::not_found("学生不存在"));
        }

        let enrollments = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::EnrollmentDate)
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("查询选课记录失败: {e}"))
            })?;

        if enrollments.is_empty() {
            return Ok(StudentEnrollmentListResponse { items: vec![] });
        }

        let offering_ids: Vec<i64> = enrollments.iter().map(|e| e.course_offering_id).collect();
        let offerings = CourseOfferings::find()
            .filter(crate::entity::course_offerings::Column::Id.is_in(offering_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课失败: {e}")))?;
        let course_by_offering: HashMap<i64, i64> =
            offerings.iter().map(|o| (o.id, o.course_id)).collect();

        let course_ids: Vec<i64> = offerings.iter().map(|o| o.course_id).collect();
        let courses = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课程失败: {e}")))?;
        let course_info: HashMap<i64, (String, String, i32)> = courses
            .into_iter()
            .map(|c| (c.id, (c.code, c.name, c.credits)))
            .collect();

        let items = enrollments
            .into_iter()
            .filter_map(|e| {
                let course_id = course_by_offering.get(&e.course_offering_id)?;
                let (course_code, course_name, credits) = course_info.get(course_id)?.clone();
                let enrollment = e.into_enrollment();
                let total_score = enrollment.total_score();
                Some(StudentEnrollmentEntry {
                    enrollment,
                    course_code,
                    course_name,
                    credits,
                    total_score,
                })
            })
            .collect();

        Ok(StudentEnrollmentListResponse { items })
    }
}

#[cfg(test)]
mod tests {
    use crate::models::enrollments::entities::{Grade, RegistrationOutcome, WithdrawalOutcome};
    use crate::models::enrollments::requests::{GradeRowUpdate, UpdateGradesRequest};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_seed::{seed_offering, seed_student};
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

    async fn enrollment_row_count(storage: &SeaOrmStorage, offering_id: i64) -> u64 {
        crate::entity::prelude::Enrollments::find()
            .filter(crate::entity::enrollments::Column::CourseOfferingId.eq(offering_id))
            .count(&storage.db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_then_withdraw_then_register_reuses_row() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let offering_id = seed_offering(&storage, 30).await;
        let student_id = seed_student(&storage, "S2024001").await;

        let first = storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();
        let first_id = match first {
            RegistrationOutcome::Registered(e) => e.id,
            other => panic!("unexpected outcome: {other:?}"),
        };

        let withdrawn = storage
            .withdraw_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();
        match withdrawn {
            WithdrawalOutcome::Withdrawn(e) => {
                assert!(e.withdrawn);
                assert!(e.withdrawal_date.is_some());
                assert_eq!(e.grade, Some(Grade::W));
            }
            WithdrawalOutcome::NotRegistered => panic!("expected withdrawal"),
        }

        // 重新选课复用同一行，等第和退课标记被清除
        let second = storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();
        match second {
            RegistrationOutcome::Reactivated(e) => {
                assert_eq!(e.id, first_id);
                assert!(!e.withdrawn);
                assert!(e.withdrawal_date.is_none());
                assert_eq!(e.grade, None);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(enrollment_row_count(&storage, offering_id).await, 1);
    }

    #[tokio::test]
    async fn test_register_twice_is_noop() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let offering_id = seed_offering(&storage, 30).await;
        let student_id = seed_student(&storage, "S2024002").await;

        storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();
        let again = storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();

        assert!(matches!(again, RegistrationOutcome::AlreadyRegistered(_)));
        assert_eq!(enrollment_row_count(&storage, offering_id).await, 1);
    }

    #[tokio::test]
    async fn test_capacity_stretches_then_closes() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        // 名额 10：第 10、11、12 人触发弹性扩容后仍可选，第 13 人拒绝
        let offering_id = seed_offering(&storage, 10).await;

        for i in 0..12 {
            let student_id = seed_student(&storage, &format!("S20240{i:02}")).await;
            let outcome = storage
                .register_enrollment_impl(student_id, offering_id)
                .await
                .unwrap();
            assert!(
                matches!(outcome, RegistrationOutcome::Registered(_)),
                "student {i} should fit"
            );
        }

        let overflow = seed_student(&storage, "S2024099").await;
        let outcome = storage
            .register_enrollment_impl(overflow, offering_id)
            .await
            .unwrap();
        assert!(matches!(outcome, RegistrationOutcome::OfferingFull));
        assert_eq!(enrollment_row_count(&storage, offering_id).await, 12);
    }

    #[tokio::test]
    async fn test_withdraw_without_enrollment() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let offering_id = seed_offering(&storage, 30).await;
        let student_id = seed_student(&storage, "S2024003").await;

        let outcome = storage
            .withdraw_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();
        assert!(matches!(outcome, WithdrawalOutcome::NotRegistered));
    }

    #[tokio::test]
    async fn test_update_grades_rejects_foreign_rows() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let offering_id = seed_offering(&storage, 30).await;
        let student_id = seed_student(&storage, "S2024004").await;

        let enrollment = match storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap()
        {
            RegistrationOutcome::Registered(e) => e,
            other => panic!("unexpected outcome: {other:?}"),
        };

        let updated = storage
            .update_grades_impl(
                offering_id,
                UpdateGradesRequest {
                    rows: vec![GradeRowUpdate {
                        enrollment_id: enrollment.id,
                        grade: Some(Grade::A),
                        assignment_score: Some(28.0),
                        midterm_score: Some(27.5),
                        final_score: Some(36.0),
                    }],
                },
            )
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let roster = storage.get_offering_roster_impl(offering_id).await.unwrap();
        assert_eq!(roster.items.len(), 1);
        assert_eq!(roster.items[0].enrollment.grade, Some(Grade::A));
        assert!((roster.items[0].total_score - 91.5).abs() < 1e-9);

        // 不属于该开课的行整批拒绝
        let err = storage
            .update_grades_impl(
                offering_id,
                UpdateGradesRequest {
                    rows: vec![GradeRowUpdate {
                        enrollment_id: enrollment.id + 999,
                        grade: Some(Grade::B),
                        assignment_score: None,
                        midterm_score: None,
                        final_score: None,
                    }],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::errors::SchoolSystemError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_student_enrollment_list_includes_withdrawn() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let offering_id = seed_offering(&storage, 30).await;
        let student_id = seed_student(&storage, "S2024005").await;

        storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();
        storage
            .withdraw_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();

        let list = storage
            .list_student_enrollments_impl(student_id)
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert!(list.items[0].enrollment.withdrawn);
        assert_eq!(list.items[0].course_code, "CS101");
        assert_eq!(list.items[0].credits, 3);
    }
}
