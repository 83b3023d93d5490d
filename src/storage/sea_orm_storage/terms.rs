//! 学年与学期存储操作
//!
//! 当前学年/学期全局唯一：切换在一个事务内先清除旧标记再设置新标记。

use super::SeaOrmStorage;
use crate::entity::academic_years::{
    ActiveModel as YearActiveModel, Column as YearColumn, Entity as AcademicYears,
};
use crate::entity::semesters::{
    ActiveModel as SemesterActiveModel, Column as SemesterColumn, Entity as Semesters,
};
use crate::errors::{Result, SchoolSystemError};
use crate::models::terms::{
    entities::{AcademicYear, Semester},
    requests::{CreateAcademicYearRequest, CreateSemesterRequest},
    responses::CurrentTermResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建学年
    ///
    /// is_current 为 true 时在同一事务内清除其他学年的当前标记。
    pub async fn create_academic_year_impl(
        &self,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        let now = chrono::Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(|e| {
            SchoolSystemError::database_operation(format!("开启事务失败: {e}"))
        })?;

        if req.is_current {
            AcademicYears::update_many()
                .col_expr(YearColumn::IsCurrent, Expr::value(false))
                .col_expr(YearColumn::UpdatedAt, Expr::value(now))
                .filter(YearColumn::IsCurrent.eq(true))
                .exec(&txn)
                .await
                .map_err(|e| {
                    SchoolSystemError::database_operation(format!("清除当前学年标记失败: {e}"))
                })?;
        }

        let model = YearActiveModel {
            name: Set(req.name),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(req.is_current),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "学年已存在", "创建学年失败"))?;

        txn.commit().await.map_err(|e| {
            SchoolSystemError::database_operation(format!("提交事务失败: {e}"))
        })?;

        Ok(result.into_academic_year())
    }

    /// 通过 ID 获取学年
    pub async fn get_academic_year_by_id_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    /// 列出全部学年，按名称倒序（最近的学年在前）
    pub async fn list_academic_years_impl(&self) -> Result<Vec<AcademicYear>> {
        let years = AcademicYears::find()
            .order_by_desc(YearColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(years.into_iter().map(|m| m.into_academic_year()).collect())
    }

    /// 设置当前学年
    ///
    /// 清除旧标记和设置新标记在同一事务内完成，保证任意时刻
    /// 最多只有一个当前学年。目标不存在时返回 false。
    pub async fn set_current_academic_year_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(|e| {
            SchoolSystemError::database_operation(format!("开启事务失败: {e}"))
        })?;

        let existing = AcademicYears::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学年失败: {e}")))?;

        if existing.is_none() {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        AcademicYears::update_many()
            .col_expr(YearColumn::IsCurrent, Expr::value(false))
            .col_expr(YearColumn::UpdatedAt, Expr::value(now))
            .filter(YearColumn::IsCurrent.eq(true))
            .filter(YearColumn::Id.ne(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("清除当前学年标记失败: {e}"))
            })?;

        AcademicYears::update_many()
            .col_expr(YearColumn::IsCurrent, Expr::value(true))
            .col_expr(YearColumn::UpdatedAt, Expr::value(now))
            .filter(YearColumn::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("设置当前学年失败: {e}"))
            })?;

        txn.commit().await.map_err(|e| {
            SchoolSystemError::database_operation(format!("提交事务失败: {e}"))
        })?;

        Ok(true)
    }

    /// 创建学期
    ///
    /// 同一学年内学期名唯一；is_current 语义与学年一致。
    pub async fn create_semester_impl(&self, req: CreateSemesterRequest) -> Result<Semester> {
        // 学年必须存在
        let year = self.get_academic_year_by_id_impl(req.academic_year_id).await?;
        if year.is_none() {
            return Err(SchoolSystemError::not_found("学年不存在"));
        }

        let now = chrono::Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(|e| {
            SchoolSystemError::database_operation(format!("开启事务失败: {e}"))
        })?;

        if req.is_current {
            Semesters::update_many()
                .col_expr(SemesterColumn::IsCurrent, Expr::value(false))
                .col_expr(SemesterColumn::UpdatedAt, Expr::value(now))
                .filter(SemesterColumn::IsCurrent.eq(true))
                .exec(&txn)
                .await
                .map_err(|e| {
                    SchoolSystemError::database_operation(format!("清除当前学期标记失败: {e}"))
                })?;
        }

        let model = SemesterActiveModel {
            academic_year_id: Set(req.academic_year_id),
            name: Set(req.name.to_string()),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(req.is_current),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| super::map_unique_violation(e, "该学年已有同名学期", "创建学期失败"))?;

        txn.commit().await.map_err(|e| {
            SchoolSystemError::database_operation(format!("提交事务失败: {e}"))
        })?;

        Ok(result.into_semester())
    }

    /// 通过 ID 获取学期
    pub async fn get_semester_by_id_impl(&self, id: i64) -> Result<Option<Semester>> {
        let result = Semesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_semester()))
    }

    /// 列出学期，可按学年过滤
    pub async fn list_semesters_impl(&self, academic_year_id: Option<i64>) -> Result<Vec<Semester>> {
        let mut select = Semesters::find();

        if let Some(year_id) = academic_year_id {
            select = select.filter(SemesterColumn::AcademicYearId.eq(year_id));
        }

        let semesters = select
            .order_by_asc(SemesterColumn::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学期列表失败: {e}")))?;

        Ok(semesters.into_iter().map(|m| m.into_semester()).collect())
    }

    /// 设置当前学期，语义与 set_current_academic_year 一致
    pub async fn set_current_semester_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(|e| {
            SchoolSystemError::database_operation(format!("开启事务失败: {e}"))
        })?;

        let existing = Semesters::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学期失败: {e}")))?;

        if existing.is_none() {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        Semesters::update_many()
            .col_expr(SemesterColumn::IsCurrent, Expr::value(false))
            .col_expr(SemesterColumn::UpdatedAt, Expr::value(now))
            .filter(SemesterColumn::IsCurrent.eq(true))
            .filter(SemesterColumn::Id.ne(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("清除当前学期标记失败: {e}"))
            })?;

        Semesters::update_many()
            .col_expr(SemesterColumn::IsCurrent, Expr::value(true))
            .col_expr(SemesterColumn::UpdatedAt, Expr::value(now))
            .filter(SemesterColumn::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                SchoolSystemError::database_operation(format!("设置当前学期失败: {e}"))
            })?;

        txn.commit().await.map_err(|e| {
            SchoolSystemError::database_operation(format!("提交事务失败: {e}"))
        })?;

        Ok(true)
    }

    /// 获取当前学期（不存在则为 None）
    pub async fn get_current_semester_impl(&self) -> Result<Option<Semester>> {
        let result = Semesters::find()
            .filter(SemesterColumn::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询当前学期失败: {e}")))?;

        Ok(result.map(|m| m.into_semester()))
    }

    /// 获取当前学年与学期
    pub async fn get_current_term_impl(&self) -> Result<CurrentTermResponse> {
        let academic_year = AcademicYears::find()
            .filter(YearColumn::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询当前学年失败: {e}")))?
            .map(|m| m.into_academic_year());

        let semester = self.get_current_semester_impl().await?;

        Ok(CurrentTermResponse {
            academic_year,
            semester,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::models::terms::entities::SemesterName;
    use crate::models::terms::requests::{CreateAcademicYearRequest, CreateSemesterRequest};
    use chrono::NaiveDate;

    fn year_request(name: &str, is_current: bool) -> CreateAcademicYearRequest {
        let start_year: i32 = name[..4].parse().unwrap();
        CreateAcademicYearRequest {
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(start_year, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(start_year + 1, 6, 30).unwrap(),
            is_current,
        }
    }

    #[tokio::test]
    async fn test_set_current_academic_year_clears_previous() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        let y1 = storage
            .create_academic_year_impl(year_request("2023-2024", true))
            .await
            .unwrap();
        let y2 = storage
            .create_academic_year_impl(year_request("2024-2025", false))
            .await
            .unwrap();

        assert!(storage.set_current_academic_year_impl(y2.id).await.unwrap());

        let years = storage.list_academic_years_impl().await.unwrap();
        let current: Vec<_> = years.iter().filter(|y| y.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, y2.id);

        let old = storage.get_academic_year_by_id_impl(y1.id).await.unwrap().unwrap();
        assert!(!old.is_current);
    }

    #[tokio::test]
    async fn test_set_current_academic_year_missing_target() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        storage
            .create_academic_year_impl(year_request("2024-2025", true))
            .await
            .unwrap();

        // 目标不存在时不得动旧标记
        assert!(!storage.set_current_academic_year_impl(999).await.unwrap());
        let years = storage.list_academic_years_impl().await.unwrap();
        assert!(years.iter().any(|y| y.is_current));
    }

    #[tokio::test]
    async fn test_duplicate_year_name_conflict() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        storage
            .create_academic_year_impl(year_request("2024-2025", false))
            .await
            .unwrap();
        let err = storage
            .create_academic_year_impl(year_request("2024-2025", false))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::errors::SchoolSystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_semester_unique_within_year() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        let year = storage
            .create_academic_year_impl(year_request("2024-2025", true))
            .await
            .unwrap();

        let fall = CreateSemesterRequest {
            academic_year_id: year.id,
            name: SemesterName::Fall,
            start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            is_current: true,
        };
        storage.create_semester_impl(fall).await.unwrap();

        let duplicate = CreateSemesterRequest {
            academic_year_id: year.id,
            name: SemesterName::Fall,
            start_date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
            is_current: false,
        };
        let err = storage.create_semester_impl(duplicate).await.unwrap_err();
        assert!(matches!(err, crate::errors::SchoolSystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_current_term_resolution() {
        let storage = crate::storage::sea_orm_storage::test_storage().await;

        // 空库：学年和学期都是 None
        let term = storage.get_current_term_impl().await.unwrap();
        assert!(term.academic_year.is_none());
        assert!(term.semester.is_none());

        let year = storage
            .create_academic_year_impl(year_request("2024-2025", true))
            .await
            .unwrap();
        let spring = storage
            .create_semester_impl(CreateSemesterRequest {
                academic_year_id: year.id,
                name: SemesterName::Spring,
                start_date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
                is_current: true,
            })
            .await
            .unwrap();

        let term = storage.get_current_term_impl().await.unwrap();
        assert_eq!(term.academic_year.unwrap().id, year.id);
        assert_eq!(term.semester.unwrap().id, spring.id);
    }
}
