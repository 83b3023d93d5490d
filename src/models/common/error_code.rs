//! 业务错误码
//!
//! code 为 0 表示成功；1-999 与 HTTP 状态码对齐的通用错误；
//! 1000 以上按业务域分组。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    Conflict = 409,
    RateLimitExceeded = 429,
    InternalServerError = 500,

    // 认证相关 (10xx)
    AuthFailed = 1001,
    RegisterFailed = 1002,

    // 用户相关 (20xx)
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    CanNotDeleteCurrentUser = 2006,

    // 部门与学期 (30xx)
    DepartmentNotFound = 3001,
    DepartmentCodeAlreadyExists = 3002,
    AcademicYearNotFound = 3101,
    SemesterNotFound = 3102,
    TermAlreadyExists = 3103,

    // 课程与开课 (40xx)
    CourseNotFound = 4001,
    CourseCodeAlreadyExists = 4002,
    OfferingNotFound = 4101,
    OfferingAlreadyExists = 4102,
    OfferingInactive = 4103,

    // 选课相关 (50xx)
    EnrollmentNotFound = 5001,
    AlreadyEnrolled = 5002,
    OfferingFull = 5003,
    NotEnrolled = 5004,
    ScoreInvalid = 5005,

    // 学籍档案 (60xx)
    StudentNotFound = 6001,
    StudentCodeAlreadyExists = 6002,
    TeacherNotFound = 6101,
    TeacherCodeAlreadyExists = 6102,

    // 作业与考勤 (70xx)
    AssignmentNotFound = 7001,
    SubmissionNotFound = 7002,
    AttendanceAlreadyMarked = 7101,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Conflict as i32, 409);
        assert_eq!(ErrorCode::AlreadyEnrolled as i32, 5002);
        assert_eq!(ErrorCode::OfferingFull as i32, 5003);
    }
}
