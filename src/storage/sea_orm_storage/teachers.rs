//! 教师档案存储操作
//!
//! 结构与学生档案一致：账号和档案在一个事务内创建，删除从
//! users 级联。教师主页附带其所授开课的容量概览。

use super::SeaOrmStorage;
use crate::entity::course_offerings::{
    Column as OfferingColumn, Entity as CourseOfferings,
};
use crate::entity::prelude::{TeacherActiveModel, Teachers, UserActiveModel, Users};
use crate::entity::teachers::Column;
use crate::entity::users::Column as UserColumn;
use crate::errors::{Result, SchoolSystemError};
use crate::models::common::PaginationInfo;
use crate::models::teachers::{
    entities::Teacher,
    requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
    responses::{TeacherDetail, TeacherListResponse, TeacherProfileResponse},
};
use crate::models::users::entities::{UserRole, UserStatus};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 创建教师（账号 + 档案在一个事务内）
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<TeacherDetail> {
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
            role: Set(UserRole::Teacher.to_string()),
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

        let teacher = TeacherActiveModel {
            user_id: Set(user.id),
            teacher_code: Set(req.teacher_code),
            department_id: Set(req.department_id),
            date_of_birth: Set(req.date_of_birth),
            address: Set(req.address),
            phone: Set(req.phone),
            qualification: Set(req.qualification),
            joining_date: Set(req.joining_date),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let teacher = teacher
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "教师工号已存在", "创建教师档案失败"))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(TeacherDetail {
            teacher: teacher.into_teacher(),
            username: user.username,
            email: user.email,
            display_name: user.display_name,
        })
    }

    /// 通过 ID 获取教师档案
    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 通过账号 ID 获取教师档案
    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 通过工号获取教师档案
    pub async fn get_teacher_by_code_impl(&self, teacher_code: &str) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::TeacherCode.eq(teacher_code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 教师主页（档案 + 所授开课）
    pub async fn get_teacher_profile_impl(
        &self,
        id: i64,
    ) -> Result<Option<TeacherProfileResponse>> {
        let Some(teacher) = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?
        else {
            return Ok(None);
        };

        let Some(user) = Users::find_by_id(teacher.user_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };

        let offerings = self.offerings_taught_by(id).await?;

        Ok(Some(TeacherProfileResponse {
            detail: TeacherDetail {
                teacher: teacher.into_teacher(),
                username: user.username,
                email: user.email,
                display_name: user.display_name,
            },
            offerings,
        }))
    }

    /// 列出教师，搜索覆盖工号和账号的用户名、邮箱、显示名
    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Teachers::find();

        if let Some(dept_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(dept_id));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

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
                    .add(Column::TeacherCode.contains(&escaped))
                    .add(Column::UserId.is_in(user_ids)),
            );
        }

        select = select.order_by_asc(Column::TeacherCode);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师页数失败: {e}")))?;
        let teachers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师列表失败: {e}")))?;

        let items = self.attach_teacher_accounts(teachers).await?;

        Ok(TeacherListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新教师档案
    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        let Some(existing) = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?
        else {
            return Ok(None);
        };

        if let Some(dept_id) = update.department_id {
            self.ensure_department_exists(dept_id).await?;
        }

        let mut model: TeacherActiveModel = existing.into();

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
        if let Some(qualification) = update.qualification {
            model.qualification = Set(Some(qualification));
        }
        if let Some(joining_date) = update.joining_date {
            model.joining_date = Set(Some(joining_date));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新教师失败: {e}")))?;

        Ok(Some(updated.into_teacher()))
    }

    /// 删除教师
    ///
    /// 从账号一侧删除，档案级联清除；其名下开课的 teacher_id 置空。
    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let Some(teacher) = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?
        else {
            return Ok(false);
        };

        let result = Users::delete_by_id(teacher.user_id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除教师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // 教师名下的全部开课（不限是否开放），主页和仪表盘共用
    pub(crate) async fn offerings_taught_by(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<crate::models::offerings::responses::OfferingSummary>> {
        let offerings = CourseOfferings::find()
            .filter(OfferingColumn::TeacherId.eq(teacher_id))
            .order_by_asc(OfferingColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课失败: {e}")))?;
        self.build_offering_summaries(offerings).await
    }

    /// 教师总数
    pub(crate) async fn count_teachers_impl(&self) -> Result<i64> {
        let count = Teachers::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计教师失败: {e}")))?;
        Ok(count as i64)
    }

    // 批量带出账号信息
    pub(crate) async fn attach_teacher_accounts(
        &self,
        teachers: Vec<crate::entity::teachers::Model>,
    ) -> Result<Vec<TeacherDetail>> {
        if teachers.is_empty() {
            return Ok(vec![]);
        }

        let user_ids: Vec<i64> = teachers.iter().map(|t| t.user_id).collect();
        let users: HashMap<i64, crate::entity::users::Model> = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询用户失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut items = Vec::with_capacity(teachers.len());
        for teacher in teachers {
            let Some(user) = users.get(&teacher.user_id) else {
                continue;
            };
            items.push(TeacherDetail {
                teacher: teacher.into_teacher(),
                username: user.username.clone(),
                email: user.email.clone(),
                display_name: user.display_name.clone(),
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::SchoolSystemError;
    use crate::models::teachers::requests::{CreateTeacherRequest, TeacherListQuery};

    fn create_request(username: &str, code: &str) -> CreateTeacherRequest {
        CreateTeacherRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed-password".to_string(),
            display_name: Some(format!("教师{code}")),
            teacher_code: code.to_string(),
            department_id: None,
            date_of_birth: None,
            address: None,
            phone: None,
            qualification: Some("副教授".to_string()),
            joining_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_teacher_creates_account() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        let detail = storage
            .create_teacher_impl(create_request("prof_wang", "T2001"))
            .await
            .unwrap();
        assert_eq!(detail.username, "prof_wang");
        assert_eq!(detail.teacher.teacher_code, "T2001");
        assert_eq!(detail.teacher.qualification.as_deref(), Some("副教授"));

        let user = storage
            .get_user_by_username_impl("prof_wang")
            .await
            .unwrap()
            .unwrap();
        let teacher = storage
            .get_teacher_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(teacher.id, detail.teacher.id);
    }

    #[tokio::test]
    async fn test_duplicate_teacher_code_conflicts() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        storage
            .create_teacher_impl(create_request("prof_li", "T2002"))
            .await
            .unwrap();
        let err = storage
            .create_teacher_impl(create_request("prof_zhao", "T2002"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_teacher_profile_missing() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        assert!(storage.get_teacher_profile_impl(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_teachers_filters_inactive() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        storage
            .create_teacher_impl(create_request("prof_sun", "T2003"))
            .await
            .unwrap();

        let result = storage
            .list_teachers_with_pagination_impl(TeacherListQuery {
                page: None,
                size: None,
                department_id: None,
                is_active: Some(false),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 0);
    }
}
