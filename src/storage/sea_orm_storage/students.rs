//! 学生档案存储操作
//!
//! 学生账号和学籍档案一一对应，创建和删除都在账号一侧保持一致：
//! 创建在一个事务内写两张表，删除从 users 级联到档案和选课记录。

use super::SeaOrmStorage;
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::prelude::{
    AcademicYears, CourseOfferings, Courses, Semesters, StudentActiveModel, Students,
    UserActiveModel, Users,
};
use crate::entity::semesters::Column as SemesterColumn;
use crate::entity::student_attendance::{
    Column as AttendanceColumn, Entity as StudentAttendance,
};
use crate::entity::students::Column;
use crate::entity::users::Column as UserColumn;
use crate::errors::{Result, SchoolSystemError};
use crate::models::attendance::entities::AttendanceSummary;
use crate::models::auth::requests::RegisterRequest;
use crate::models::common::PaginationInfo;
use crate::models::enrollments::entities::{Grade, gpa_from_grades};
use crate::models::students::{
    entities::Student,
    requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    responses::{SemesterGpa, StudentDetail, StudentListResponse, StudentProfileResponse},
};
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 创建学生（账号 + 档案在一个事务内）
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<StudentDetail> {
        if let Some(dept_id) = req.department_id {
            self.ensure_department_exists(dept_id).await?;
        }
        if let Some(year_id) = req.admission_year_id {
            let year = AcademicYears::find_by_id(year_id)
                .one(&self.db)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("查询学年失败: {e}")))?;
            if year.is_none() {
                return Err(SchoolSystemError::not_found("学年不存在"));
            }
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let user = UserActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(UserRole::Student.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let user = user
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "用户名或邮箱已存在", "创建用户失败"))?;

        let student = StudentActiveModel {
            user_id: Set(user.id),
            student_code: Set(req.student_code),
            department_id: Set(req.department_id),
            date_of_birth: Set(req.date_of_birth),
            address: Set(req.address),
            phone: Set(req.phone),
            admission_year_id: Set(req.admission_year_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let student = student
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "学号已存在", "创建学生档案失败"))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(StudentDetail {
            student: student.into_student(),
            username: user.username,
            email: user.email,
            display_name: user.display_name,
        })
    }

    /// 学生自助注册
    ///
    /// 账号和学籍档案在一个事务内创建，密码在服务层已经哈希。
    pub async fn register_student_account_impl(&self, req: RegisterRequest) -> Result<User> {
        if let Some(dept_id) = req.department_id {
            self.ensure_department_exists(dept_id).await?;
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let user = UserActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(UserRole::Student.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let user = user
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "用户名或邮箱已存在", "创建用户失败"))?;

        let student = StudentActiveModel {
            user_id: Set(user.id),
            student_code: Set(req.student_code),
            department_id: Set(req.department_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        student
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "学号已存在", "创建学生档案失败"))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(user.into_user())
    }

    /// 通过 ID 获取学生档案
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过账号 ID 获取学生档案
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过学号获取学生档案
    pub async fn get_student_by_code_impl(&self, student_code: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::StudentCode.eq(student_code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 学生主页
    ///
    /// 档案加全部成绩历史、按学期的绩点、总绩点和考勤统计。
    /// 绩点只算未退课且有等第的记录，W 和 I 不计入。
    pub async fn get_student_profile_impl(
        &self,
        id: i64,
    ) -> Result<Option<StudentProfileResponse>> {
        let Some(student) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?
        else {
            return Ok(None);
        };

        let Some(user) = Users::find_by_id(student.user_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };

        let enrollments = self.list_student_enrollments_impl(id).await?.items;
        let graded = self.graded_history(id).await?;

        let semester_ids: Vec<i64> = graded.iter().map(|(id, _, _)| *id).collect();
        let semesters = if semester_ids.is_empty() {
            vec![]
        } else {
            Semesters::find()
                .filter(SemesterColumn::Id.is_in(semester_ids))
                .order_by_asc(SemesterColumn::StartDate)
                .all(&self.db)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("查询学期失败: {e}")))?
        };

        let year_ids: Vec<i64> = semesters.iter().map(|s| s.academic_year_id).collect();
        let year_names: HashMap<i64, String> = if year_ids.is_empty() {
            HashMap::new()
        } else {
            AcademicYears::find()
                .filter(crate::entity::academic_years::Column::Id.is_in(year_ids))
                .all(&self.db)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("查询学年失败: {e}")))?
                .into_iter()
                .map(|y| (y.id, y.name))
                .collect()
        };

        let mut semester_gpas = Vec::with_capacity(semesters.len());
        for semester in &semesters {
            let rows: Vec<(Grade, i32)> = graded
                .iter()
                .filter(|(sid, _, _)| *sid == semester.id)
                .map(|(_, g, c)| (*g, *c))
                .collect();
            let year_name = year_names
                .get(&semester.academic_year_id)
                .cloned()
                .unwrap_or_default();
            semester_gpas.push(SemesterGpa {
                semester_id: semester.id,
                label: format!("{} - {}", semester.name, year_name),
                gpa: gpa_from_grades(&rows),
            });
        }

        let all_rows: Vec<(Grade, i32)> = graded.iter().map(|(_, g, c)| (*g, *c)).collect();
        let overall_gpa = gpa_from_grades(&all_rows);

        let attendance = self.student_attendance_summary(id, None, None).await?;

        Ok(Some(StudentProfileResponse {
            detail: StudentDetail {
                student: student.into_student(),
                username: user.username,
                email: user.email,
                display_name: user.display_name,
            },
            enrollments,
            semester_gpas,
            overall_gpa,
            attendance,
        }))
    }

    /// 计入绩点的修读记录，元素为 (学期, 等第, 学分)
    ///
    /// 退课和尚未给出等第的记录不参与，W/I 在绩点计算里自行跳过。
    pub(crate) async fn graded_history(&self, student_id: i64) -> Result<Vec<(i64, Grade, i32)>> {
        let rows = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::Withdrawn.eq(false))
            .filter(EnrollmentColumn::Grade.is_not_null())
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("查询选课记录失败: {e}"))
            })?;
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let offering_ids: Vec<i64> = rows.iter().map(|r| r.course_offering_id).collect();
        let offerings: HashMap<i64, (i64, i64)> = CourseOfferings::find()
            .filter(crate::entity::course_offerings::Column::Id.is_in(offering_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课失败: {e}")))?
            .into_iter()
            .map(|o| (o.id, (o.course_id, o.semester_id)))
            .collect();

        let course_ids: Vec<i64> = offerings.values().map(|(cid, _)| *cid).collect();
        let credits_by_course: HashMap<i64, i32> = Courses::find()
            .filter(crate::entity::courses::Column::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.credits))
            .collect();

        let mut graded = Vec::with_capacity(rows.len());
        for row in rows {
            let Some((course_id, semester_id)) = offerings.get(&row.course_offering_id) else {
                continue;
            };
            let Some(credits) = credits_by_course.get(course_id) else {
                continue;
            };
            let Some(grade) = row.grade.as_deref().and_then(|g| g.parse::<Grade>().ok()) else {
                continue;
            };
            graded.push((*semester_id, grade, *credits));
        }
        Ok(graded)
    }

    /// 学生考勤统计，可选日期窗口
    pub(crate) async fn student_attendance_summary(
        &self,
        student_id: i64,
        start_date: Option<chrono::NaiveDate>,
        end_date: Option<chrono::NaiveDate>,
    ) -> Result<AttendanceSummary> {
        let mut base = StudentAttendance::find().filter(AttendanceColumn::StudentId.eq(student_id));
        if let Some(start) = start_date {
            base = base.filter(AttendanceColumn::Date.gte(start));
        }
        if let Some(end) = end_date {
            base = base.filter(AttendanceColumn::Date.lte(end));
        }

        let total = base
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计考勤失败: {e}")))?
            as i64;
        let present = base
            .filter(AttendanceColumn::IsPresent.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计考勤失败: {e}")))?
            as i64;

        Ok(AttendanceSummary::from_counts(total, present))
    }

    /// 列出学生，搜索覆盖学号和账号的用户名、邮箱、显示名
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Students::find();

        if let Some(dept_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(dept_id));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        // 搜索条件跨两张表，先查出命中的账号再并进档案过滤
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            let user_ids: Vec<i64> = Users::find()
                .select_only()
                .column(UserColumn::Id)
                .filter(
                    Condition::any()
                        .add(UserColumn::Username.contains(&escaped))
                        .add(UserColumn::Email.contains(&escaped))
                        .add(UserColumn::DisplayName.contains(&escaped)),
                )
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("查询用户失败: {e}")))?;

            select = select.filter(
                Condition::any()
                    .add(Column::StudentCode.contains(&escaped))
                    .add(Column::UserId.is_in(user_ids)),
            );
        }

        select = select.order_by_asc(Column::StudentCode);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生页数失败: {e}")))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生列表失败: {e}")))?;

        let items = self.attach_student_accounts(students).await?;

        Ok(StudentListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新学生档案
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let Some(existing) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?
        else {
            return Ok(None);
        };

        if let Some(dept_id) = update.department_id {
            self.ensure_department_exists(dept_id).await?;
        }

        let mut model: StudentActiveModel = existing.into();

        if let Some(dept_id) = update.department_id {
            model.department_id = Set(Some(dept_id));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(admission_year_id) = update.admission_year_id {
            model.admission_year_id = Set(Some(admission_year_id));
        }
        if let Some(graduation_year_id) = update.graduation_year_id {
            model.graduation_year_id = Set(Some(graduation_year_id));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新学生失败: {e}")))?;

        Ok(Some(updated.into_student()))
    }

    /// 删除学生
    ///
    /// 从账号一侧删除，学籍档案、选课记录和考勤记录级联清除。
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let Some(student) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?
        else {
            return Ok(false);
        };

        let result = Users::delete_by_id(student.user_id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生总数
    pub(crate) async fn count_students_impl(&self) -> Result<i64> {
        let count = Students::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计学生失败: {e}")))?;
        Ok(count as i64)
    }

    // 批量带出账号信息，保持与档案相同的顺序
    pub(crate) async fn attach_student_accounts(
        &self,
        students: Vec<crate::entity::students::Model>,
    ) -> Result<Vec<StudentDetail>> {
        if students.is_empty() {
            return Ok(vec![]);
        }

        let user_ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
        let users: HashMap<i64, crate::entity::users::Model> = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询用户失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut items = Vec::with_capacity(students.len());
        for student in students {
            let Some(user) = users.get(&student.user_id) else {
                continue;
            };
            items.push(StudentDetail {
                student: student.into_student(),
                username: user.username.clone(),
                email: user.email.clone(),
                display_name: user.display_name.clone(),
            });
        }
        Ok(items)
    }

    // 部门存在性检查，学生和教师档案共用
    pub(crate) async fn ensure_department_exists(&self, dept_id: i64) -> Result<()> {
        let dept = crate::entity::prelude::Departments::find_by_id(dept_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询部门失败: {e}")))?;
        if dept.is_none() {
            return Err(SchoolSystemError::not_found("部门不存在"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::SchoolSystemError;
    use crate::models::students::requests::{
        CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
    };

    fn create_request(username: &str, code: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed-password".to_string(),
            display_name: Some(format!("学生{code}")),
            student_code: code.to_string(),
            department_id: None,
            date_of_birth: None,
            address: None,
            phone: None,
            admission_year_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_student_creates_account() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        let detail = storage
            .create_student_impl(create_request("alice", "S2024001"))
            .await
            .unwrap();
        assert_eq!(detail.username, "alice");
        assert_eq!(detail.student.student_code, "S2024001");

        let user = storage
            .get_user_by_username_impl("alice")
            .await
            .unwrap()
            .unwrap();
        let student = storage
            .get_student_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(student.id, detail.student.id);
    }

    #[tokio::test]
    async fn test_duplicate_student_code_conflicts() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        storage
            .create_student_impl(create_request("bob", "S2024001"))
            .await
            .unwrap();
        let err = storage
            .create_student_impl(create_request("carol", "S2024001"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Conflict(_)));

        // 冲突的事务整体回滚，不留下孤儿账号
        assert!(
            storage
                .get_user_by_username_impl("carol")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_student_removes_account() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        let detail = storage
            .create_student_impl(create_request("dave", "S2024002"))
            .await
            .unwrap();
        assert!(storage.delete_student_impl(detail.student.id).await.unwrap());

        assert!(
            storage
                .get_student_by_id_impl(detail.student.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .get_user_by_username_impl("dave")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_students_search_by_code() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        storage
            .create_student_impl(create_request("erin", "S2024101"))
            .await
            .unwrap();
        storage
            .create_student_impl(create_request("frank", "S2025201"))
            .await
            .unwrap();

        let result = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: None,
                size: None,
                department_id: None,
                is_active: None,
                search: Some("S2024".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.items[0].student.student_code, "S2024101");

        // 按用户名也能搜到
        let result = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: None,
                size: None,
                department_id: None,
                is_active: None,
                search: Some("frank".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.items[0].username, "frank");
    }

    #[tokio::test]
    async fn test_update_student_partial_fields() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        let detail = storage
            .create_student_impl(create_request("grace", "S2024003"))
            .await
            .unwrap();

        let updated = storage
            .update_student_impl(
                detail.student.id,
                UpdateStudentRequest {
                    department_id: None,
                    date_of_birth: None,
                    address: Some("望江路 1 号".to_string()),
                    phone: Some("13800000000".to_string()),
                    admission_year_id: None,
                    graduation_year_id: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.address.as_deref(), Some("望江路 1 号"));
        assert!(!updated.is_active);
        assert_eq!(updated.student_code, "S2024003");
    }
}
