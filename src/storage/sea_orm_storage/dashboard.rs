//! 仪表盘聚合查询
//!
//! 三种角色各自一个载荷，服务层在认证阶段确定身份后调对应方法，
//! 这里不做角色判断。

use super::SeaOrmStorage;
use crate::entity::course_offerings::{Column as OfferingColumn, Entity as CourseOfferings};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::prelude::{Semesters, Students, Teachers};
use crate::entity::semesters::Column as SemesterColumn;
use crate::errors::{Result, SchoolSystemError};
use crate::models::dashboard::responses::DashboardResponse;
use crate::models::enrollments::entities::gpa_from_grades;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

impl SeaOrmStorage {
    /// 管理员总览
    pub async fn admin_dashboard_impl(&self) -> Result<DashboardResponse> {
        let total_students = self.count_students_impl().await?;
        let total_teachers = self.count_teachers_impl().await?;
        let total_departments = self.count_departments_impl().await? as i64;

        // 有开放开课的课程数，同一课程多个班只算一次
        let active_courses = CourseOfferings::find()
            .select_only()
            .column(OfferingColumn::CourseId)
            .filter(OfferingColumn::IsActive.eq(true))
            .distinct()
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计开课课程失败: {e}")))?
            as i64;

        Ok(DashboardResponse::Admin {
            total_students,
            total_teachers,
            active_courses,
            total_departments,
        })
    }

    /// 学生学业概况
    pub async fn student_dashboard_impl(&self, student_id: i64) -> Result<DashboardResponse> {
        let student = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(SchoolSystemError::not_found("学生不存在"));
        }

        let graded = self.graded_history(student_id).await?;
        let rows: Vec<_> = graded.iter().map(|(_, g, c)| (*g, *c)).collect();
        let gpa = (gpa_from_grades(&rows) * 100.0).round() / 100.0;

        let attendance = self
            .student_attendance_summary(student_id, None, None)
            .await?;
        let attendance_percentage = (attendance.attendance_rate * 10.0).round() / 10.0;

        let current_course_count = self.current_course_count(student_id).await?;
        let recent_submissions = self.recent_student_submissions(student_id, 5).await?;

        Ok(DashboardResponse::Student {
            gpa,
            attendance_percentage,
            current_course_count,
            recent_submissions,
        })
    }

    /// 教师开课概况
    pub async fn teacher_dashboard_impl(&self, teacher_id: i64) -> Result<DashboardResponse> {
        let teacher = Teachers::find_by_id(teacher_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;
        if teacher.is_none() {
            return Err(SchoolSystemError::not_found("教师不存在"));
        }

        let offerings = self.offerings_taught_by(teacher_id).await?;
        let offering_count = offerings.len() as i64;
        let total_enrollment = offerings.iter().map(|o| o.current_enrollment).sum();

        Ok(DashboardResponse::Teacher {
            offering_count,
            total_enrollment,
            offerings,
        })
    }

    // 当前学期内的活跃选课数，没有当前学期时为 0
    async fn current_course_count(&self, student_id: i64) -> Result<i64> {
        let current = Semesters::find()
            .filter(SemesterColumn::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询当前学期失败: {e}")))?;

        let Some(semester) = current else {
            return Ok(0);
        };

        let offering_ids: Vec<i64> = CourseOfferings::find()
            .select_only()
            .column(OfferingColumn::Id)
            .filter(OfferingColumn::SemesterId.eq(semester.id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课失败: {e}")))?;

        if offering_ids.is_empty() {
            return Ok(0);
        }

        let count = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::CourseOfferingId.is_in(offering_ids))
            .filter(EnrollmentColumn::Withdrawn.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计选课失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::attendance::requests::MarkAttendanceRequest;
    use crate::models::dashboard::responses::DashboardResponse;
    use crate::models::enrollments::entities::{Grade, RegistrationOutcome};
    use crate::models::enrollments::requests::{GradeRowUpdate, UpdateGradesRequest};
    use crate::models::offerings::requests::UpdateOfferingRequest;
    use crate::storage::sea_orm_storage::test_seed::{seed_offering, seed_student, seed_teacher};

    #[tokio::test]
    async fn test_admin_dashboard_counts() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let offering_id = seed_offering(&storage, 30).await;
        let student_id = seed_student(&storage, "S2024001").await;
        seed_teacher(&storage, "T2001").await;
        storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();

        let dashboard = storage.admin_dashboard_impl().await.unwrap();
        match dashboard {
            DashboardResponse::Admin {
                total_students,
                total_teachers,
                active_courses,
                total_departments,
            } => {
                assert_eq!(total_students, 1);
                assert_eq!(total_teachers, 1);
                assert_eq!(active_courses, 1);
                assert_eq!(total_departments, 1);
            }
            other => panic!("unexpected dashboard: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_student_dashboard_gpa_and_counts() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let offering_id = seed_offering(&storage, 30).await;
        let student_id = seed_student(&storage, "S2024002").await;

        let enrollment = match storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap()
        {
            RegistrationOutcome::Registered(e) => e,
            other => panic!("unexpected outcome: {other:?}"),
        };

        // 录入 B 等第，3 学分课程，GPA = 3.0
        storage
            .update_grades_impl(
                offering_id,
                UpdateGradesRequest {
                    rows: vec![GradeRowUpdate {
                        enrollment_id: enrollment.id,
                        grade: Some(Grade::B),
                        assignment_score: Some(25.0),
                        midterm_score: Some(24.0),
                        final_score: Some(33.0),
                    }],
                },
            )
            .await
            .unwrap();

        // 出勤 2/3
        for (day, present) in [(1, true), (2, true), (3, false)] {
            storage
                .mark_student_attendance_impl(MarkAttendanceRequest {
                    person_id: student_id,
                    date: chrono::NaiveDate::from_ymd_opt(2024, 10, day),
                    is_present: present,
                    note: None,
                })
                .await
                .unwrap();
        }

        let assignment = storage
            .create_assignment_impl(CreateAssignmentRequest {
                course_offering_id: offering_id,
                title: "第一次作业".to_string(),
                description: None,
                due_date: chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                total_marks: 100.0,
            })
            .await
            .unwrap();
        storage
            .submit_assignment_impl(assignment.id, student_id)
            .await
            .unwrap();

        let dashboard = storage.student_dashboard_impl(student_id).await.unwrap();
        match dashboard {
            DashboardResponse::Student {
                gpa,
                attendance_percentage,
                current_course_count,
                recent_submissions,
            } => {
                assert!((gpa - 3.0).abs() < 1e-9);
                assert!((attendance_percentage - 66.7).abs() < 1e-9);
                assert_eq!(current_course_count, 1);
                assert_eq!(recent_submissions.len(), 1);
            }
            other => panic!("unexpected dashboard: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_student_dashboard_empty_history() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let student_id = seed_student(&storage, "S2024003").await;

        let dashboard = storage.student_dashboard_impl(student_id).await.unwrap();
        match dashboard {
            DashboardResponse::Student {
                gpa,
                attendance_percentage,
                current_course_count,
                recent_submissions,
            } => {
                assert_eq!(gpa, 0.0);
                assert_eq!(attendance_percentage, 0.0);
                assert_eq!(current_course_count, 0);
                assert!(recent_submissions.is_empty());
            }
            other => panic!("unexpected dashboard: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_teacher_dashboard_offerings() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let offering_id = seed_offering(&storage, 30).await;
        let teacher_id = seed_teacher(&storage, "T2002").await;
        let student_id = seed_student(&storage, "S2024004").await;

        storage
            .update_offering_impl(
                offering_id,
                UpdateOfferingRequest {
                    teacher_id: Some(teacher_id),
                    max_students: None,
                    schedule: None,
                    is_active: None,
                },
            )
            .await
            .unwrap();
        storage
            .register_enrollment_impl(student_id, offering_id)
            .await
            .unwrap();

        let dashboard = storage.teacher_dashboard_impl(teacher_id).await.unwrap();
        match dashboard {
            DashboardResponse::Teacher {
                offering_count,
                total_enrollment,
                offerings,
            } => {
                assert_eq!(offering_count, 1);
                assert_eq!(total_enrollment, 1);
                assert_eq!(offerings[0].course_code, "CS101");
            }
            other => panic!("unexpected dashboard: {other:?}"),
        }
    }
}
