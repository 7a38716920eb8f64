use once_cell::sync::Lazy;
use regex::Regex;

// 存储过程名会直接拼进 CALL 语句，只允许普通标识符
static PROCEDURE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("Invalid procedure regex"));

static LOGIN_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._@+-]{3,100}$").expect("Invalid login name regex"));

pub fn validate_procedure_name(name: &str) -> Result<(), String> {
    if PROCEDURE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(format!("Illegal stored procedure name: {name:?}"))
    }
}

/// 登录名可以是用户名或邮箱
pub fn validate_login_name(login: &str) -> Result<(), &'static str> {
    if LOGIN_NAME_RE.is_match(login) {
        Ok(())
    } else {
        Err("Username must be 3-100 characters of letters, digits or . _ @ + -")
    }
}

/// 账号密码策略：至少 8 位，包含大写、小写和数字
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("a digit");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("Password needs {}", errors.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_names() {
        assert!(validate_procedure_name("sp_faculty_list").is_ok());
        assert!(validate_procedure_name("_internal2").is_ok());
        assert!(validate_procedure_name("sp_x; DROP TABLE users").is_err());
        assert!(validate_procedure_name("1sp").is_err());
        assert!(validate_procedure_name("").is_err());
        assert!(validate_procedure_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_login_names() {
        assert!(validate_login_name("std.6401@uni.ac.th").is_ok());
        assert!(validate_login_name("ab").is_err());
        assert!(validate_login_name("name with space").is_err());
    }

    #[test]
    fn test_password_policy_lists_every_gap() {
        assert!(validate_password("Attend2024").is_ok());
        let err = validate_password("short").unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("an uppercase letter"));
        assert!(err.contains("a digit"));
        assert!(!err.contains("a lowercase letter"));
    }
}
