//! 作业与提交存储操作
//!
//! 同一学生对同一作业只允许提交一次，重复提交由唯一约束拦下
//! 转为冲突错误。迟交在查询时按截止日期推算，不落库。

use super::SeaOrmStorage;
use crate::entity::assignment_submissions::{
    ActiveModel as SubmissionActiveModel, Column as SubmissionColumn,
    Entity as AssignmentSubmissions,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::prelude::{CourseOfferings, Students, Users};
use crate::entity::students::Column as StudentColumn;
use crate::entity::users::Column as UserColumn;
use crate::errors::{Result, SchoolSystemError};
use crate::models::assignments::{
    entities::{Assignment, AssignmentSubmission},
    requests::{AssignmentListQuery, CreateAssignmentRequest, GradeSubmissionRequest,
        UpdateAssignmentRequest},
    responses::{AssignmentListResponse, SubmissionEntry, SubmissionListResponse},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let offering = CourseOfferings::find_by_id(req.course_offering_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课失败: {e}")))?;
        if offering.is_none() {
            return Err(SchoolSystemError::not_found("开课不存在"));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            course_offering_id: Set(req.course_offering_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date),
            total_marks: Set(req.total_marks),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出作业，可按开课过滤，按截止日期排序
    pub async fn list_assignments_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let mut select = Assignments::find();
        if let Some(offering_id) = query.course_offering_id {
            select = select.filter(Column::CourseOfferingId.eq(offering_id));
        }

        let assignments = select
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业列表失败: {e}")))?;

        let total = assignments.len() as i64;
        Ok(AssignmentListResponse {
            items: assignments.into_iter().map(|m| m.into_assignment()).collect(),
            total,
        })
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date);
        }
        if let Some(total_marks) = update.total_marks {
            model.total_marks = Set(total_marks);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(updated.into_assignment()))
    }

    /// 删除作业，提交记录级联清除
    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生提交作业
    ///
    /// 提交时间取当前时刻，重复提交返回冲突错误。
    pub async fn submit_assignment_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<AssignmentSubmission> {
        let assignment = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业失败: {e}")))?;
        if assignment.is_none() {
            return Err(SchoolSystemError::not_found("作业不存在"));
        }

        let student = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(SchoolSystemError::not_found("学生不存在"));
        }

        let model = SubmissionActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            submission_date: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| super::map_unique_violation(e, "该作业已提交过", "写入提交记录失败"))?;

        Ok(result.into_submission())
    }

    /// 列出作业的全部提交，带学生信息和迟交标记，按提交时间排序
    pub async fn list_submissions_impl(&self, assignment_id: i64) -> Result<SubmissionListResponse> {
        let assignment = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业失败: {e}")))?
            .ok_or_else(|| SchoolSystemError::not_found("作业不存在"))?
            .into_assignment();

        let submissions = AssignmentSubmissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(SubmissionColumn::SubmissionDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询提交记录失败: {e}")))?;

        if submissions.is_empty() {
            return Ok(SubmissionListResponse {
                items: vec![],
                total: 0,
            });
        }

        let student_ids: Vec<i64> = submissions.iter().map(|s| s.student_id).collect();
        let students = Students::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        let user_ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
        let user_names: HashMap<i64, Option<String>> = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询用户失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.display_name))
            .collect();

        let student_info: HashMap<i64, (String, Option<String>)> = students
            .into_iter()
            .map(|s| {
                let name = user_names.get(&s.user_id).cloned().flatten();
                (s.id, (s.student_code, name))
            })
            .collect();

        let items: Vec<SubmissionEntry> = submissions
            .into_iter()
            .map(|s| {
                let (student_code, student_name) = student_info
                    .get(&s.student_id)
                    .cloned()
                    .unwrap_or_default();
                let submission = s.into_submission();
                let is_late = submission.is_late(&assignment);
                SubmissionEntry {
                    submission,
                    student_code,
                    student_name,
                    is_late,
                }
            })
            .collect();

        let total = items.len() as i64;
        Ok(SubmissionListResponse { items, total })
    }

    /// 批改提交
    ///
    /// 分数不能为负也不能超过作业满分。
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>> {
        let Some(existing) = AssignmentSubmissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询提交记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let assignment = Assignments::find_by_id(existing.assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询作业失败: {e}")))?
            .ok_or_else(|| SchoolSystemError::not_found("作业不存在"))?;

        if req.marks_obtained < 0.0 || req.marks_obtained > assignment.total_marks {
            return Err(SchoolSystemError::validation(format!(
                "分数必须在 0 到 {} 之间",
                assignment.total_marks
            )));
        }

        let mut model: SubmissionActiveModel = existing.into();
        model.marks_obtained = Set(Some(req.marks_obtained));
        if let Some(feedback) = req.feedback {
            model.feedback = Set(Some(feedback));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新提交记录失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }

    /// 学生最近的几次提交，学生主页用
    pub(crate) async fn recent_student_submissions(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<AssignmentSubmission>> {
        let submissions = AssignmentSubmissions::find()
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .order_by_desc(SubmissionColumn::SubmissionDate)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询提交记录失败: {e}")))?;

        Ok(submissions.into_iter().map(|m| m.into_submission()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SeaOrmStorage;
    use crate::errors::SchoolSystemError;
    use crate::models::assignments::requests::{
        AssignmentListQuery, CreateAssignmentRequest, GradeSubmissionRequest,
    };
    use crate::storage::sea_orm_storage::test_seed::{seed_offering, seed_student};

    async fn seed(storage: &SeaOrmStorage) -> (i64, i64) {
        let offering_id = seed_offering(storage, 30).await;
        let student_id = seed_student(storage, "S2024001").await;
        (offering_id, student_id)
    }

    fn assignment_request(offering_id: i64, title: &str) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            course_offering_id: offering_id,
            title: title.to_string(),
            description: None,
            due_date: chrono::NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
            total_marks: 100.0,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_assignments() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let (offering_id, _) = seed(&storage).await;

        storage
            .create_assignment_impl(assignment_request(offering_id, "第一次作业"))
            .await
            .unwrap();
        storage
            .create_assignment_impl(assignment_request(offering_id, "第二次作业"))
            .await
            .unwrap();

        let list = storage
            .list_assignments_impl(AssignmentListQuery {
                course_offering_id: Some(offering_id),
            })
            .await
            .unwrap();
        assert_eq!(list.total, 2);
    }

    #[tokio::test]
    async fn test_duplicate_submission_conflicts() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let (offering_id, student_id) = seed(&storage).await;

        let assignment = storage
            .create_assignment_impl(assignment_request(offering_id, "实验报告"))
            .await
            .unwrap();

        storage
            .submit_assignment_impl(assignment.id, student_id)
            .await
            .unwrap();
        let err = storage
            .submit_assignment_impl(assignment.id, student_id)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_grade_submission_bounds() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let (offering_id, student_id) = seed(&storage).await;

        let assignment = storage
            .create_assignment_impl(assignment_request(offering_id, "期末项目"))
            .await
            .unwrap();
        let submission = storage
            .submit_assignment_impl(assignment.id, student_id)
            .await
            .unwrap();

        let err = storage
            .grade_submission_impl(
                submission.id,
                GradeSubmissionRequest {
                    marks_obtained: 120.0,
                    feedback: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Validation(_)));

        let graded = storage
            .grade_submission_impl(
                submission.id,
                GradeSubmissionRequest {
                    marks_obtained: 88.5,
                    feedback: Some("结构清晰".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.marks_obtained, Some(88.5));
        assert_eq!(graded.feedback.as_deref(), Some("结构清晰"));
    }

    #[tokio::test]
    async fn test_submissions_marked_late() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let (offering_id, student_id) = seed(&storage).await;

        // 截止日期在过去，现在提交必然迟交
        let assignment = storage
            .create_assignment_impl(CreateAssignmentRequest {
                course_offering_id: offering_id,
                title: "补交作业".to_string(),
                description: None,
                due_date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                total_marks: 50.0,
            })
            .await
            .unwrap();
        storage
            .submit_assignment_impl(assignment.id, student_id)
            .await
            .unwrap();

        let list = storage.list_submissions_impl(assignment.id).await.unwrap();
        assert_eq!(list.total, 1);
        assert!(list.items[0].is_late);
        assert_eq!(list.items[0].student_code, "S2024001");
    }
}
