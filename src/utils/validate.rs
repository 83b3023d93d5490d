use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid code regex"));

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("Invalid academic year regex"));

/// 单项成绩上限：平时 30 + 期中 30 + 期末 40，总分 100
pub const ASSIGNMENT_SCORE_MAX: f64 = 30.0;
pub const MIDTERM_SCORE_MAX: f64 = 30.0;
pub const FINAL_SCORE_MAX: f64 = 40.0;

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

pub fn validate_student_code(code: &str) -> Result<(), &'static str> {
    if code.is_empty() || code.len() > 20 {
        return Err("Student code length must be between 1 and 20 characters");
    }
    if !CODE_RE.is_match(code) {
        return Err("Student code must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_teacher_code(code: &str) -> Result<(), &'static str> {
    if code.is_empty() || code.len() > 20 {
        return Err("Teacher code length must be between 1 and 20 characters");
    }
    if !CODE_RE.is_match(code) {
        return Err("Teacher code must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

/// 学年名称形如 "2024-2025"，后一年必须紧跟前一年
pub fn validate_academic_year_name(name: &str) -> Result<(), &'static str> {
    let Some(caps) = ACADEMIC_YEAR_RE.captures(name) else {
        return Err("Academic year name must look like 2024-2025");
    };
    let first: i32 = caps[1].parse().map_err(|_| "Academic year is out of range")?;
    let second: i32 = caps[2].parse().map_err(|_| "Academic year is out of range")?;
    if second != first + 1 {
        return Err("Academic year must span two consecutive years");
    }
    Ok(())
}

/// 校验三项成绩各自的取值范围
pub fn validate_score_components(
    assignment: Option<f64>,
    midterm: Option<f64>,
    final_score: Option<f64>,
) -> Result<(), String> {
    let checks = [
        ("assignment score", assignment, ASSIGNMENT_SCORE_MAX),
        ("midterm score", midterm, MIDTERM_SCORE_MAX),
        ("final score", final_score, FINAL_SCORE_MAX),
    ];
    for (label, value, max) in checks {
        if let Some(v) = value
            && (v < 0.0 || v > max)
        {
            return Err(format!("{label} must be between 0 and {max}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_student_code() {
        assert!(validate_student_code("STU000001").is_ok());
        assert!(validate_student_code("S2024-001").is_ok());
        assert!(validate_student_code("").is_err());
        assert!(validate_student_code("编号一").is_err());
        assert!(validate_student_code("A".repeat(21).as_str()).is_err());
    }

    #[test]
    fn test_academic_year_name() {
        assert!(validate_academic_year_name("2024-2025").is_ok());
        assert!(validate_academic_year_name("2024-2026").is_err());
        assert!(validate_academic_year_name("2024/2025").is_err());
        assert!(validate_academic_year_name("24-25").is_err());
    }

    #[test]
    fn test_score_components() {
        assert!(validate_score_components(Some(30.0), Some(0.0), Some(40.0)).is_ok());
        assert!(validate_score_components(None, None, None).is_ok());
        assert!(validate_score_components(Some(30.5), None, None).is_err());
        assert!(validate_score_components(None, Some(-1.0), None).is_err());
        assert!(validate_score_components(None, None, Some(40.1)).is_err());
    }
}
