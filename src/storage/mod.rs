use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 部门管理方法
    // 创建部门
    async fn create_department(&self, department: CreateDepartmentRequest) -> Result<Department>;
    // 通过ID获取部门
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    // 通过编码获取部门
    async fn get_department_by_code(&self, code: &str) -> Result<Option<Department>>;
    // 列出部门
    async fn list_departments_with_pagination(
        &self,
        query: DepartmentListQuery,
    ) -> Result<DepartmentListResponse>;
    // 更新部门信息
    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    // 删除部门
    async fn delete_department(&self, id: i64) -> Result<bool>;

    /// 学年与学期管理方法
    // 创建学年
    async fn create_academic_year(&self, year: CreateAcademicYearRequest) -> Result<AcademicYear>;
    // 通过ID获取学年
    async fn get_academic_year_by_id(&self, id: i64) -> Result<Option<AcademicYear>>;
    // 列出全部学年
    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>>;
    // 将指定学年设为当前学年，同时清除其他学年的当前标记
    async fn set_current_academic_year(&self, id: i64) -> Result<bool>;
    // 创建学期
    async fn create_semester(&self, semester: CreateSemesterRequest) -> Result<Semester>;
    // 通过ID获取学期
    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>>;
    // 列出学期，可按学年过滤
    async fn list_semesters(&self, academic_year_id: Option<i64>) -> Result<Vec<Semester>>;
    // 将指定学期设为当前学期，同时清除其他学期的当前标记
    async fn set_current_semester(&self, id: i64) -> Result<bool>;
    // 获取当前学年与学期
    async fn get_current_term(&self) -> Result<CurrentTermResponse>;

    /// 课程管理方法
    // 创建课程（含先修课程关系）
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    // 通过编码获取课程
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    // 课程详情（含先修课程列表）
    async fn get_course_detail(&self, id: i64) -> Result<Option<CourseDetail>>;
    // 列出课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 更新课程信息
    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>>;
    // 删除课程
    async fn delete_course(&self, id: i64) -> Result<bool>;
    // 添加先修课程关系
    async fn add_course_prerequisite(&self, course_id: i64, prerequisite_id: i64) -> Result<()>;
    // 移除先修课程关系
    async fn remove_course_prerequisite(
        &self,
        course_id: i64,
        prerequisite_id: i64,
    ) -> Result<bool>;
    // 列出课程的先修课程
    async fn list_course_prerequisites(&self, course_id: i64) -> Result<Vec<Course>>;

    /// 开课管理方法
    // 创建开课
    async fn create_offering(&self, offering: CreateOfferingRequest) -> Result<CourseOffering>;
    // 通过ID获取开课
    async fn get_offering_by_id(&self, id: i64) -> Result<Option<CourseOffering>>;
    // 开课详情（含实时容量信息）
    async fn get_offering_detail(&self, id: i64) -> Result<Option<OfferingDetail>>;
    // 列出开课概要
    async fn list_offerings_with_pagination(
        &self,
        query: OfferingListQuery,
    ) -> Result<OfferingListResponse>;
    // 更新开课信息
    async fn update_offering(
        &self,
        id: i64,
        update: UpdateOfferingRequest,
    ) -> Result<Option<CourseOffering>>;
    // 删除开课
    async fn delete_offering(&self, id: i64) -> Result<bool>;

    /// 选课管理方法
    // 学生选课，整个判定和写入在一个事务内完成
    async fn register_enrollment(
        &self,
        student_id: i64,
        offering_id: i64,
    ) -> Result<RegistrationOutcome>;
    // 学生退课
    async fn withdraw_enrollment(
        &self,
        student_id: i64,
        offering_id: i64,
    ) -> Result<WithdrawalOutcome>;
    // 开课花名册（活跃选课 + 学生信息）
    async fn get_offering_roster(&self, offering_id: i64) -> Result<RosterResponse>;
    // 批量更新成绩，返回更新的行数
    async fn update_grades(&self, offering_id: i64, update: UpdateGradesRequest) -> Result<u64>;
    // 学生的全部选课记录
    async fn list_student_enrollments(
        &self,
        student_id: i64,
    ) -> Result<StudentEnrollmentListResponse>;

    /// 学生档案管理方法
    // 创建学生（账号 + 档案在一个事务内）
    async fn create_student(&self, student: CreateStudentRequest) -> Result<StudentDetail>;
    // 学生自助注册（密码已哈希）
    async fn register_student_account(&self, register: RegisterRequest) -> Result<User>;
    // 通过ID获取学生档案
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 通过账号ID获取学生档案
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    // 通过学号获取学生档案
    async fn get_student_by_code(&self, student_code: &str) -> Result<Option<Student>>;
    // 学生主页（成绩历史 + 学期绩点 + 考勤统计）
    async fn get_student_profile(&self, id: i64) -> Result<Option<StudentProfileResponse>>;
    // 列出学生
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 更新学生档案
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    // 删除学生（档案与账号一并删除）
    async fn delete_student(&self, id: i64) -> Result<bool>;

    /// 教师档案管理方法
    // 创建教师（账号 + 档案在一个事务内）
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<TeacherDetail>;
    // 通过ID获取教师档案
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    // 通过账号ID获取教师档案
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    // 通过工号获取教师档案
    async fn get_teacher_by_code(&self, teacher_code: &str) -> Result<Option<Teacher>>;
    // 教师主页（档案 + 所授开课）
    async fn get_teacher_profile(&self, id: i64) -> Result<Option<TeacherProfileResponse>>;
    // 列出教师
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    // 更新教师档案
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>>;
    // 删除教师（档案与账号一并删除）
    async fn delete_teacher(&self, id: i64) -> Result<bool>;

    /// 作业管理方法
    // 创建作业
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 列出作业
    async fn list_assignments(&self, query: AssignmentListQuery) -> Result<AssignmentListResponse>;
    // 更新作业
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 删除作业
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    // 学生提交作业，重复提交返回冲突错误
    async fn submit_assignment(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<AssignmentSubmission>;
    // 列出作业的全部提交
    async fn list_submissions(&self, assignment_id: i64) -> Result<SubmissionListResponse>;
    // 批改提交
    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>>;

    /// 考勤管理方法
    // 登记学生考勤，同日重复登记返回冲突错误
    async fn mark_student_attendance(
        &self,
        mark: MarkAttendanceRequest,
    ) -> Result<AttendanceRecord>;
    // 学生考勤记录与统计
    async fn list_student_attendance(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse>;
    // 登记教师考勤
    async fn mark_teacher_attendance(
        &self,
        mark: MarkAttendanceRequest,
    ) -> Result<AttendanceRecord>;
    // 教师考勤记录与统计
    async fn list_teacher_attendance(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse>;

    /// 仪表盘聚合方法
    // 管理员总览
    async fn admin_dashboard(&self) -> Result<DashboardResponse>;
    // 学生学业概况
    async fn student_dashboard(&self, student_id: i64) -> Result<DashboardResponse>;
    // 教师开课概况
    async fn teacher_dashboard(&self, teacher_id: i64) -> Result<DashboardResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
