use super::SeaOrmStorage;
use crate::entity::course_prerequisites::{
    ActiveModel as PrerequisiteActiveModel, Column as PrerequisiteColumn,
    Entity as CoursePrerequisites,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::{CourseDetail, CourseListResponse},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程，先修课程关系在同一事务内写入
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        self.ensure_prerequisites_exist(&req.prerequisite_ids, None)
            .await?;

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            department_id: Set(req.department_id),
            credits: Set(req.credits),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let course = model
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "课程编码已存在", "创建课程失败"))?;

        Self::insert_prerequisites(&txn, course.id, &req.prerequisite_ids).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(course.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 通过编码获取课程
    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 课程详情（含先修课程）
    pub async fn get_course_detail_impl(&self, id: i64) -> Result<Option<CourseDetail>> {
        let course = match self.get_course_by_id_impl(id).await? {
            Some(course) => course,
            None => return Ok(None),
        };

        let prerequisites = self.list_course_prerequisites_impl(id).await?;

        Ok(Some(CourseDetail {
            course,
            prerequisites,
        }))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Courses::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Name.contains(&escaped)),
            );
        }

        // 部门筛选
        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }

        // 学分筛选
        if let Some(credits) = query.credits {
            select = select.filter(Column::Credits.eq(credits));
        }

        // 排序
        select = select.order_by_asc(Column::Code);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课程总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课程页数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新课程信息
    ///
    /// prerequisite_ids 为 Some 时整组替换先修课程关系。
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let existing = self.get_course_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        if let Some(ref prerequisite_ids) = update.prerequisite_ids {
            self.ensure_prerequisites_exist(prerequisite_ids, Some(id))
                .await?;
        }

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(department_id) = update.department_id {
            model.department_id = Set(department_id);
        }

        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let course = model
            .update(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新课程失败: {e}")))?;

        if let Some(ref prerequisite_ids) = update.prerequisite_ids {
            CoursePrerequisites::delete_many()
                .filter(PrerequisiteColumn::CourseId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    SchoolSystemError::database_operation(format!("清除先修课程失败: {e}"))
                })?;

            Self::insert_prerequisites(&txn, id, prerequisite_ids).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(course.into_course()))
    }

    /// 删除课程
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 添加先修课程关系
    pub async fn add_course_prerequisite_impl(
        &self,
        course_id: i64,
        prerequisite_id: i64,
    ) -> Result<()> {
        if course_id == prerequisite_id {
            return Err(SchoolSystemError::validation("课程不能作为自身的先修课程"));
        }

        let course = self.get_course_by_id_impl(course_id).await?;
        if course.is_none() {
            return Err(SchoolSystemError::not_found("课程不存在"));
        }

        let prerequisite = self.get_course_by_id_impl(prerequisite_id).await?;
        if prerequisite.is_none() {
            return Err(SchoolSystemError::not_found("先修课程不存在"));
        }

        let model = PrerequisiteActiveModel {
            course_id: Set(course_id),
            prerequisite_id: Set(prerequisite_id),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| super::map_unique_violation(e, "先修课程关系已存在", "添加先修课程失败"))?;

        Ok(())
    }

    /// 移除先修课程关系
    pub async fn remove_course_prerequisite_impl(
        &self,
        course_id: i64,
        prerequisite_id: i64,
    ) -> Result<bool> {
        let result = CoursePrerequisites::delete_many()
            .filter(
                Condition::all()
                    .add(PrerequisiteColumn::CourseId.eq(course_id))
                    .add(PrerequisiteColumn::PrerequisiteId.eq(prerequisite_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("移除先修课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出课程的先修课程
    pub async fn list_course_prerequisites_impl(&self, course_id: i64) -> Result<Vec<Course>> {
        let links = CoursePrerequisites::find()
            .filter(PrerequisiteColumn::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询先修课程失败: {e}")))?;

        let prerequisite_ids: Vec<i64> = links.iter().map(|link| link.prerequisite_id).collect();

        if prerequisite_ids.is_empty() {
            return Ok(vec![]);
        }

        let courses = Courses::find()
            .filter(Column::Id.is_in(prerequisite_ids))
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询先修课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    /// 校验先修课程都存在且不含自身
    async fn ensure_prerequisites_exist(
        &self,
        prerequisite_ids: &[i64],
        course_id: Option<i64>,
    ) -> Result<()> {
        if prerequisite_ids.is_empty() {
            return Ok(());
        }

        if let Some(id) = course_id
            && prerequisite_ids.contains(&id)
        {
            return Err(SchoolSystemError::validation("课程不能作为自身的先修课程"));
        }

        let found = Courses::find()
            .filter(Column::Id.is_in(prerequisite_ids.to_vec()))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询先修课程失败: {e}")))?;

        if found as usize != prerequisite_ids.len() {
            return Err(SchoolSystemError::validation("部分先修课程不存在"));
        }

        Ok(())
    }

    async fn insert_prerequisites<C: ConnectionTrait>(
        conn: &C,
        course_id: i64,
        prerequisite_ids: &[i64],
    ) -> Result<()> {
        for prerequisite_id in prerequisite_ids {
            let model = PrerequisiteActiveModel {
                course_id: Set(course_id),
                prerequisite_id: Set(*prerequisite_id),
                ..Default::default()
            };
            model.insert(conn).await.map_err(|e| {
                super::map_unique_violation(e, "先修课程关系已存在", "写入先修课程失败")
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::SchoolSystemError;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::departments::requests::CreateDepartmentRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn seed_department(storage: &SeaOrmStorage) -> i64 {
        storage
            .create_department_impl(CreateDepartmentRequest {
                name: "计算机学院".to_string(),
                code: "CS".to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    fn course_request(
        code: &str,
        name: &str,
        department_id: i64,
        prerequisite_ids: Vec<i64>,
    ) -> CreateCourseRequest {
        CreateCourseRequest {
            code: code.to_string(),
            name: name.to_string(),
            department_id,
            credits: 3,
            description: None,
            prerequisite_ids,
        }
    }

    #[tokio::test]
    async fn test_create_course_with_prerequisites() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let department_id = seed_department(&storage).await;

        let intro = storage
            .create_course_impl(course_request("CS101", "程序设计基础", department_id, vec![]))
            .await
            .unwrap();
        let math = storage
            .create_course_impl(course_request("MA101", "离散数学", department_id, vec![]))
            .await
            .unwrap();

        let advanced = storage
            .create_course_impl(course_request(
                "CS201",
                "数据结构",
                department_id,
                vec![math.id, intro.id],
            ))
            .await
            .unwrap();

        let detail = storage
            .get_course_detail_impl(advanced.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.prerequisites.len(), 2);
        // 先修课程按编码排序
        assert_eq!(detail.prerequisites[0].code, "CS101");
        assert_eq!(detail.prerequisites[1].code, "MA101");
    }

    #[tokio::test]
    async fn test_create_course_with_missing_prerequisite() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let department_id = seed_department(&storage).await;

        let err = storage
            .create_course_impl(course_request("CS201", "数据结构", department_id, vec![999]))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Validation(_)));

        // 预检失败时不得写入课程
        assert!(
            storage
                .get_course_by_code_impl("CS201")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_course_code_conflicts() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let department_id = seed_department(&storage).await;

        storage
            .create_course_impl(course_request("CS101", "程序设计基础", department_id, vec![]))
            .await
            .unwrap();

        let err = storage
            .create_course_impl(course_request("CS101", "程序设计导论", department_id, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_add_and_remove_prerequisite() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let department_id = seed_department(&storage).await;

        let intro = storage
            .create_course_impl(course_request("CS101", "程序设计基础", department_id, vec![]))
            .await
            .unwrap();
        let advanced = storage
            .create_course_impl(course_request("CS201", "数据结构", department_id, vec![]))
            .await
            .unwrap();

        storage
            .add_course_prerequisite_impl(advanced.id, intro.id)
            .await
            .unwrap();

        // 重复添加同一条关系
        let err = storage
            .add_course_prerequisite_impl(advanced.id, intro.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Conflict(_)));

        assert!(
            storage
                .remove_course_prerequisite_impl(advanced.id, intro.id)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .remove_course_prerequisite_impl(advanced.id, intro.id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_prerequisite_rejects_self_reference() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let department_id = seed_department(&storage).await;

        let course = storage
            .create_course_impl(course_request("CS101", "程序设计基础", department_id, vec![]))
            .await
            .unwrap();

        let err = storage
            .add_course_prerequisite_impl(course.id, course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_course_replaces_prerequisites() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;
        let department_id = seed_department(&storage).await;

        let intro = storage
            .create_course_impl(course_request("CS101", "程序设计基础", department_id, vec![]))
            .await
            .unwrap();
        let math = storage
            .create_course_impl(course_request("MA101", "离散数学", department_id, vec![]))
            .await
            .unwrap();
        let advanced = storage
            .create_course_impl(course_request(
                "CS201",
                "数据结构",
                department_id,
                vec![intro.id],
            ))
            .await
            .unwrap();

        let updated = storage
            .update_course_impl(
                advanced.id,
                crate::models::courses::requests::UpdateCourseRequest {
                    name: None,
                    department_id: None,
                    credits: Some(4),
                    description: None,
                    prerequisite_ids: Some(vec![math.id]),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.credits, 4);

        let prerequisites = storage
            .list_course_prerequisites_impl(advanced.id)
            .await
            .unwrap();
        assert_eq!(prerequisites.len(), 1);
        assert_eq!(prerequisites[0].code, "MA101");
    }
}
