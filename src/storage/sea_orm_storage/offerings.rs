//! 开课存储操作
//!
//! 容量口径：活跃选课数（withdrawn = false）对照弹性容量，
//! 计算逻辑见 models::offerings::entities。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::course_offerings::{ActiveModel, Column, Entity as CourseOfferings};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::teachers::{Column as TeacherColumn, Entity as Teachers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    PaginationInfo,
    offerings::{
        entities::{self, CourseOffering},
        requests::{CreateOfferingRequest, OfferingListQuery, UpdateOfferingRequest},
        responses::{OfferingDetail, OfferingListResponse, OfferingSummary},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建开课
    pub async fn create_offering_impl(&self, req: CreateOfferingRequest) -> Result<CourseOffering> {
        if self.get_course_by_id_impl(req.course_id).await?.is_none() {
            return Err(SchoolSystemError::not_found("课程不存在"));
        }

        if self.get_semester_by_id_impl(req.semester_id).await?.is_none() {
            return Err(SchoolSystemError::not_found("学期不存在"));
        }

        if let Some(teacher_id) = req.teacher_id
            && self.get_teacher_by_id_impl(teacher_id).await?.is_none()
        {
            return Err(SchoolSystemError::not_found("教师不存在"));
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            semester_id: Set(req.semester_id),
            teacher_id: Set(req.teacher_id),
            max_students: Set(req.max_students),
            schedule: Set(req.schedule),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            super::map_unique_violation(e, "该课程在该学期已由同一教师开课", "创建开课失败")
        })?;

        Ok(result.into_course_offering())
    }

    /// 通过 ID 获取开课
    pub async fn get_offering_by_id_impl(&self, id: i64) -> Result<Option<CourseOffering>> {
        let result = CourseOfferings::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课失败: {e}")))?;

        Ok(result.map(|m| m.into_course_offering()))
    }

    /// 开课详情，容量信息按当前活跃选课数实时计算
    pub async fn get_offering_detail_impl(&self, id: i64) -> Result<Option<OfferingDetail>> {
        let offering = match self.get_offering_by_id_impl(id).await? {
            Some(offering) => offering,
            None => return Ok(None),
        };

        let current = self.count_active_enrollment_impl(id).await?;

        Ok(Some(OfferingDetail {
            current_enrollment: current,
            effective_capacity: entities::effective_capacity(offering.max_students, current),
            available_slots: entities::available_slots(offering.max_students, current),
            is_full: entities::is_full(offering.max_students, current),
            offering,
        }))
    }

    /// 分页列出开课摘要
    pub async fn list_offerings_with_pagination_impl(
        &self,
        query: OfferingListQuery,
    ) -> Result<OfferingListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = CourseOfferings::find().filter(Column::IsActive.eq(true));

        if let Some(semester_id) = query.semester_id {
            select = select.filter(Column::SemesterId.eq(semester_id));
        }

        // 课程侧条件先收集课程 ID 再过滤开课
        let has_course_filter = query.department_id.is_some()
            || query.credits.is_some()
            || query
                .search
                .as_ref()
                .is_some_and(|s| !s.trim().is_empty());

        if has_course_filter {
            let mut course_select = Courses::find();

            if let Some(department_id) = query.department_id {
                course_select = course_select.filter(CourseColumn::DepartmentId.eq(department_id));
            }

            if let Some(credits) = query.credits {
                course_select = course_select.filter(CourseColumn::Credits.eq(credits));
            }

            if let Some(ref search) = query.search
                && !search.trim().is_empty()
            {
                let escaped = escape_like_pattern(search.trim());
                course_select = course_select.filter(
                    Condition::any()
                        .add(CourseColumn::Code.contains(&escaped))
                        .add(CourseColumn::Name.contains(&escaped)),
                );
            }

            let course_ids: Vec<i64> = course_select
                .all(&self.db)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("查询课程失败: {e}")))?
                .into_iter()
                .map(|c| c.id)
                .collect();

            if course_ids.is_empty() {
                return Ok(OfferingListResponse {
                    items: vec![],
                    pagination: PaginationInfo {
                        page: page as i64,
                        page_size: size as i64,
                        total: 0,
                        total_pages: 0,
                    },
                });
            }

            select = select.filter(Column::CourseId.is_in(course_ids));
        }

        select = select.order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课页数失败: {e}")))?;

        let offerings = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询开课列表失败: {e}")))?;

        let items = self.build_offering_summaries(offerings).await?;

        Ok(OfferingListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新开课信息
    pub async fn update_offering_impl(
        &self,
        id: i64,
        update: UpdateOfferingRequest,
    ) -> Result<Option<CourseOffering>> {
        let existing = self.get_offering_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        if let Some(teacher_id) = update.teacher_id
            && self.get_teacher_by_id_impl(teacher_id).await?.is_none()
        {
            return Err(SchoolSystemError::not_found("教师不存在"));
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }

        if let Some(max_students) = update.max_students {
            model.max_students = Set(max_students);
        }

        if let Some(schedule) = update.schedule {
            model.schedule = Set(Some(schedule));
        }

        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let result = model.update(&self.db).await.map_err(|e| {
            super::map_unique_violation(e, "该课程在该学期已由同一教师开课", "更新开课失败")
        })?;

        Ok(Some(result.into_course_offering()))
    }

    /// 删除开课
    pub async fn delete_offering_impl(&self, id: i64) -> Result<bool> {
        let result = CourseOfferings::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除开课失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 活跃选课数（不含已退课）
    pub async fn count_active_enrollment_impl(&self, offering_id: i64) -> Result<i64> {
        let count = Enrollments::find()
            .filter(
                Condition::all()
                    .add(EnrollmentColumn::CourseOfferingId.eq(offering_id))
                    .add(EnrollmentColumn::Withdrawn.eq(false)),
            )
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计选课人数失败: {e}")))?;

        Ok(count as i64)
    }

    /// 把开课记录批量组装成摘要（课程、教师、实时容量）
    pub(crate) async fn build_offering_summaries(
        &self,
        offerings: Vec<crate::entity::course_offerings::Model>,
    ) -> Result<Vec<OfferingSummary>> {
        if offerings.is_empty() {
            return Ok(vec![]);
        }

        let offering_ids: Vec<i64> = offerings.iter().map(|o| o.id).collect();
        let course_ids: Vec<i64> = offerings.iter().map(|o| o.course_id).collect();
        let teacher_ids: Vec<i64> = offerings.iter().filter_map(|o| o.teacher_id).collect();

        // 课程信息
        let courses: HashMap<i64, crate::entity::courses::Model> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        // 教师显示名（档案 -> 账号）
        let mut teacher_names: HashMap<i64, String> = HashMap::new();
        if !teacher_ids.is_empty() {
            let teachers = Teachers::find()
                .filter(TeacherColumn::Id.is_in(teacher_ids))
                .all(&self.db)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;

            let user_ids: Vec<i64> = teachers.iter().map(|t| t.user_id).collect();
            let users: HashMap<i64, crate::entity::users::Model> = Users::find()
                .filter(UserColumn::Id.is_in(user_ids))
                .all(&self.db)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("查询用户失败: {e}")))?
                .into_iter()
                .map(|u| (u.id, u))
                .collect();

            for teacher in teachers {
                if let Some(user) = users.get(&teacher.user_id) {
                    let name = user
                        .display_name
                        .clone()
                        .unwrap_or_else(|| user.username.clone());
                    teacher_names.insert(teacher.id, name);
                }
            }
        }

        // 每个开课的活跃选课数，一次分组查询取回
        let counts: Vec<(i64, i64)> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::CourseOfferingId)
            .column_as(EnrollmentColumn::Id.count(), "count")
            .filter(EnrollmentColumn::CourseOfferingId.is_in(offering_ids))
            .filter(EnrollmentColumn::Withdrawn.eq(false))
            .group_by(EnrollmentColumn::CourseOfferingId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计选课人数失败: {e}")))?;

        let count_map: HashMap<i64, i64> = counts.into_iter().collect();

        let mut items = Vec::with_capacity(offerings.len());
        for offering in offerings {
            let course = match courses.get(&offering.course_id) {
                Some(course) => course,
                None => continue,
            };

            let current = count_map.get(&offering.id).copied().unwrap_or(0);

            items.push(OfferingSummary {
                id: offering.id,
                course_code: course.code.clone(),
                course_name: course.name.clone(),
                credits: course.credits,
                department_id: course.department_id,
                teacher_name: offering
                    .teacher_id
                    .and_then(|id| teacher_names.get(&id).cloned()),
                schedule: offering.schedule.clone(),
                max_students: offering.max_students,
                current_enrollment: current,
                effective_capacity: entities::effective_capacity(offering.max_students, current),
                available_slots: entities::available_slots(offering.max_students, current),
                is_full: entities::is_full(offering.max_students, current),
            });
        }

        Ok(items)
    }
}
