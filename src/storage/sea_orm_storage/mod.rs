//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod attendance;
mod courses;
mod dashboard;
mod departments;
mod enrollments;
mod offerings;
mod students;
mod teachers;
mod terms;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolSystemError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突翻译为业务冲突错误，其余数据库错误原样包装
pub(crate) fn map_unique_violation(
    e: sea_orm::DbErr,
    conflict_msg: &str,
    context: &str,
) -> SchoolSystemError {
    match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            SchoolSystemError::conflict(conflict_msg)
        }
        _ => SchoolSystemError::database_operation(format!("{context}: {e}")),
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentSubmission},
        requests::{
            AssignmentListQuery, CreateAssignmentRequest, GradeSubmissionRequest,
            UpdateAssignmentRequest,
        },
        responses::{AssignmentListResponse, SubmissionListResponse},
    },
    attendance::{
        entities::AttendanceRecord,
        requests::{AttendanceListQuery, MarkAttendanceRequest},
        responses::AttendanceListResponse,
    },
    auth::requests::RegisterRequest,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::{CourseDetail, CourseListResponse},
    },
    dashboard::responses::DashboardResponse,
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest},
        responses::DepartmentListResponse,
    },
    enrollments::{
        entities::{RegistrationOutcome, WithdrawalOutcome},
        requests::UpdateGradesRequest,
        responses::{RosterResponse, StudentEnrollmentListResponse},
    },
    offerings::{
        entities::CourseOffering,
        requests::{CreateOfferingRequest, OfferingListQuery, UpdateOfferingRequest},
        responses::{OfferingDetail, OfferingListResponse},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::{StudentDetail, StudentListResponse, StudentProfileResponse},
    },
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::{TeacherDetail, TeacherListResponse, TeacherProfileResponse},
    },
    terms::{
        entities::{AcademicYear, Semester},
        requests::{CreateAcademicYearRequest, CreateSemesterRequest},
        responses::CurrentTermResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 部门模块
    async fn create_department(&self, department: CreateDepartmentRequest) -> Result<Department> {
        self.create_department_impl(department).await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn get_department_by_code(&self, code: &str) -> Result<Option<Department>> {
        self.get_department_by_code_impl(code).await
    }

    async fn list_departments_with_pagination(
        &self,
        query: DepartmentListQuery,
    ) -> Result<DepartmentListResponse> {
        self.list_departments_with_pagination_impl(query).await
    }

    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        self.update_department_impl(id, update).await
    }

    async fn delete_department(&self, id: i64) -> Result<bool> {
        self.delete_department_impl(id).await
    }

    // 学年与学期模块
    async fn create_academic_year(&self, year: CreateAcademicYearRequest) -> Result<AcademicYear> {
        self.create_academic_year_impl(year).await
    }

    async fn get_academic_year_by_id(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_by_id_impl(id).await
    }

    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl().await
    }

    async fn set_current_academic_year(&self, id: i64) -> Result<bool> {
        self.set_current_academic_year_impl(id).await
    }

    async fn create_semester(&self, semester: CreateSemesterRequest) -> Result<Semester> {
        self.create_semester_impl(semester).await
    }

    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>> {
        self.get_semester_by_id_impl(id).await
    }

    async fn list_semesters(&self, academic_year_id: Option<i64>) -> Result<Vec<Semester>> {
        self.list_semesters_impl(academic_year_id).await
    }

    async fn set_current_semester(&self, id: i64) -> Result<bool> {
        self.set_current_semester_impl(id).await
    }

    async fn get_current_term(&self) -> Result<CurrentTermResponse> {
        self.get_current_term_impl().await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn get_course_detail(&self, id: i64) -> Result<Option<CourseDetail>> {
        self.get_course_detail_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn add_course_prerequisite(&self, course_id: i64, prerequisite_id: i64) -> Result<()> {
        self.add_course_prerequisite_impl(course_id, prerequisite_id)
            .await
    }

    async fn remove_course_prerequisite(
        &self,
        course_id: i64,
        prerequisite_id: i64,
    ) -> Result<bool> {
        self.remove_course_prerequisite_impl(course_id, prerequisite_id)
            .await
    }

    async fn list_course_prerequisites(&self, course_id: i64) -> Result<Vec<Course>> {
        self.list_course_prerequisites_impl(course_id).await
    }

    // 开课模块
    async fn create_offering(&self, offering: CreateOfferingRequest) -> Result<CourseOffering> {
        self.create_offering_impl(offering).await
    }

    async fn get_offering_by_id(&self, id: i64) -> Result<Option<CourseOffering>> {
        self.get_offering_by_id_impl(id).await
    }

    async fn get_offering_detail(&self, id: i64) -> Result<Option<OfferingDetail>> {
        self.get_offering_detail_impl(id).await
    }

    async fn list_offerings_with_pagination(
        &self,
        query: OfferingListQuery,
    ) -> Result<OfferingListResponse> {
        self.list_offerings_with_pagination_impl(query).await
    }

    async fn update_offering(
        &self,
        id: i64,
        update: UpdateOfferingRequest,
    ) -> Result<Option<CourseOffering>> {
        self.update_offering_impl(id, update).await
    }

    async fn delete_offering(&self, id: i64) -> Result<bool> {
        self.delete_offering_impl(id).await
    }

    // 选课模块
    async fn register_enrollment(
        &self,
        student_id: i64,
        offering_id: i64,
    ) -> Result<RegistrationOutcome> {
        self.register_enrollment_impl(student_id, offering_id).await
    }

    async fn withdraw_enrollment(
        &self,
        student_id: i64,
        offering_id: i64,
    ) -> Result<WithdrawalOutcome> {
        self.withdraw_enrollment_impl(student_id, offering_id).await
    }

    async fn get_offering_roster(&self, offering_id: i64) -> Result<RosterResponse> {
        self.get_offering_roster_impl(offering_id).await
    }

    async fn update_grades(&self, offering_id: i64, update: UpdateGradesRequest) -> Result<u64> {
        self.update_grades_impl(offering_id, update).await
    }

    async fn list_student_enrollments(
        &self,
        student_id: i64,
    ) -> Result<StudentEnrollmentListResponse> {
        self.list_student_enrollments_impl(student_id).await
    }

    // 学生档案模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<StudentDetail> {
        self.create_student_impl(student).await
    }

    async fn register_student_account(&self, register: RegisterRequest) -> Result<User> {
        self.register_student_account_impl(register).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_student_by_code(&self, student_code: &str) -> Result<Option<Student>> {
        self.get_student_by_code_impl(student_code).await
    }

    async fn get_student_profile(&self, id: i64) -> Result<Option<StudentProfileResponse>> {
        self.get_student_profile_impl(id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    // 教师档案模块
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<TeacherDetail> {
        self.create_teacher_impl(teacher).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn get_teacher_by_code(&self, teacher_code: &str) -> Result<Option<Teacher>> {
        self.get_teacher_by_code_impl(teacher_code).await
    }

    async fn get_teacher_profile(&self, id: i64) -> Result<Option<TeacherProfileResponse>> {
        self.get_teacher_profile_impl(id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, update).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments(&self, query: AssignmentListQuery) -> Result<AssignmentListResponse> {
        self.list_assignments_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn submit_assignment(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<AssignmentSubmission> {
        self.submit_assignment_impl(assignment_id, student_id).await
    }

    async fn list_submissions(&self, assignment_id: i64) -> Result<SubmissionListResponse> {
        self.list_submissions_impl(assignment_id).await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>> {
        self.grade_submission_impl(submission_id, grade).await
    }

    // 考勤模块
    async fn mark_student_attendance(
        &self,
        mark: MarkAttendanceRequest,
    ) -> Result<AttendanceRecord> {
        self.mark_student_attendance_impl(mark).await
    }

    async fn list_student_attendance(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        self.list_student_attendance_impl(query).await
    }

    async fn mark_teacher_attendance(
        &self,
        mark: MarkAttendanceRequest,
    ) -> Result<AttendanceRecord> {
        self.mark_teacher_attendance_impl(mark).await
    }

    async fn list_teacher_attendance(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        self.list_teacher_attendance_impl(query).await
    }

    // 仪表盘模块
    async fn admin_dashboard(&self) -> Result<DashboardResponse> {
        self.admin_dashboard_impl().await
    }

    async fn student_dashboard(&self, student_id: i64) -> Result<DashboardResponse> {
        self.student_dashboard_impl(student_id).await
    }

    async fn teacher_dashboard(&self, teacher_id: i64) -> Result<DashboardResponse> {
        self.teacher_dashboard_impl(teacher_id).await
    }
}

#[cfg(test)]
pub(crate) async fn test_storage() -> SeaOrmStorage {
    // 内存库必须限制为单连接，否则每个连接各自一份空库
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    SeaOrmStorage { db }
}

/// 各存储测试共用的种子数据
#[cfg(test)]
pub(crate) mod test_seed {
    use super::SeaOrmStorage;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::departments::requests::CreateDepartmentRequest;
    use crate::models::offerings::requests::CreateOfferingRequest;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::models::teachers::requests::CreateTeacherRequest;
    use crate::models::terms::entities::SemesterName;
    use crate::models::terms::requests::{CreateAcademicYearRequest, CreateSemesterRequest};

    pub(crate) async fn seed_student(storage: &SeaOrmStorage, code: &str) -> i64 {
        let detail = storage
            .create_student_impl(CreateStudentRequest {
                username: format!("stu_{code}"),
                email: format!("{code}@example.com"),
                password: "hashed-password".to_string(),
                display_name: Some(format!("学生{code}")),
                student_code: code.to_string(),
                department_id: None,
                date_of_birth: None,
                address: None,
                phone: None,
                admission_year_id: None,
            })
            .await
            .unwrap();
        detail.student.id
    }

    pub(crate) async fn seed_teacher(storage: &SeaOrmStorage, code: &str) -> i64 {
        let detail = storage
            .create_teacher_impl(CreateTeacherRequest {
                username: format!("tch_{code}"),
                email: format!("{code}@example.com"),
                password: "hashed-password".to_string(),
                display_name: Some(format!("教师{code}")),
                teacher_code: code.to_string(),
                department_id: None,
                date_of_birth: None,
                address: None,
                phone: None,
                qualification: None,
                joining_date: None,
            })
            .await
            .unwrap();
        detail.teacher.id
    }

    /// 部门、当前学年学期、课程、开课一条龙，返回开课 ID
    pub(crate) async fn seed_offering(storage: &SeaOrmStorage, max_students: i32) -> i64 {
        let dept = storage
            .create_department_impl(CreateDepartmentRequest {
                name: "计算机学院".to_string(),
                code: "CS".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let year = storage
            .create_academic_year_impl(CreateAcademicYearRequest {
                name: "2024-2025".to_string(),
                start_date: chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                end_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
                is_current: true,
            })
            .await
            .unwrap();

        let semester = storage
            .create_semester_impl(CreateSemesterRequest {
                academic_year_id: year.id,
                name: SemesterName::Fall,
                start_date: chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                end_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                is_current: true,
            })
            .await
            .unwrap();

        let course = storage
            .create_course_impl(CreateCourseRequest {
                code: "CS101".to_string(),
                name: "程序设计基础".to_string(),
                department_id: dept.id,
                credits: 3,
                description: None,
                prerequisite_ids: vec![],
            })
            .await
            .unwrap();

        let offering = storage
            .create_offering_impl(CreateOfferingRequest {
                course_id: course.id,
                semester_id: semester.id,
                teacher_id: None,
                max_students,
                schedule: None,
            })
            .await
            .unwrap();
        offering.id
    }
}
