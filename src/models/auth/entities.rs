use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// 账号归属类型，决定可访问的门户
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "auth.ts")]
pub enum AssignType {
    Admin,
    Lecturer,
    Student,
}

impl AssignType {
    pub fn admin_roles() -> &'static [AssignType] {
        &[AssignType::Admin]
    }
    pub fn lecturer_roles() -> &'static [AssignType] {
        &[AssignType::Lecturer]
    }
    pub fn student_roles() -> &'static [AssignType] {
        &[AssignType::Student]
    }
    pub fn mobile_roles() -> &'static [AssignType] {
        &[AssignType::Student, AssignType::Lecturer]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignType::Admin => "admin",
            AssignType::Lecturer => "lecturer",
            AssignType::Student => "student",
        }
    }
}

impl std::fmt::Display for AssignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(AssignType::Admin),
            "lecturer" => Ok(AssignType::Lecturer),
            "student" => Ok(AssignType::Student),
            _ => Err(format!("Invalid assign type: {s}")),
        }
    }
}

// 当前请求的认证用户，由 RequireJWT 写入请求扩展
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    pub assign_type: AssignType,
    /// 关联的讲师或学生记录 ID，管理员为空
    pub assign_to: Option<i64>,
}

/// sp_auth_login 返回的账号行
#[derive(Debug, Clone, Deserialize)]
pub struct LoginAccount {
    #[serde(deserialize_with = "lenient_i64")]
    pub user_id: i64,
    #[serde(default)]
    pub email: String,
    pub username: String,
    pub password_hash: String,
    #[serde(deserialize_with = "lenient_assign_type")]
    pub assign_type: AssignType,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub assign_to: Option<i64>,
    #[serde(default = "default_active", deserialize_with = "lenient_bool")]
    pub is_active: bool,
}

impl LoginAccount {
    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            user_id: self.user_id,
            email: self.email.clone(),
            username: self.username.clone(),
            assign_type: self.assign_type,
            assign_to: self.assign_to,
        }
    }
}

fn default_active() -> bool {
    true
}

// MySQL 的 TINYINT/DECIMAL 经 JSON 之后可能是数字也可能是字符串
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_i64(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing integer"))
}

fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("not an integer: {n}"))),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("not an integer: {s}"))),
        other => Err(serde::de::Error::custom(format!(
            "unexpected value: {other}"
        ))),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_i64().unwrap_or(0) != 0),
        serde_json::Value::String(s) => Ok(matches!(s.trim(), "1" | "true" | "TRUE")),
        serde_json::Value::Null => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "unexpected value: {other}"
        ))),
    }
}

fn lenient_assign_type<'de, D>(deserializer: D) -> Result<AssignType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_account_from_mysql_row() {
        let row = serde_json::json!({
            "user_id": "12",
            "email": "somchai@uni.test",
            "username": "somchai",
            "password_hash": "$argon2id$...",
            "assign_type": "Lecturer",
            "assign_to": 7,
            "is_active": 1,
        });
        let account: LoginAccount = serde_json::from_value(row).unwrap();
        assert_eq!(account.user_id, 12);
        assert_eq!(account.assign_type, AssignType::Lecturer);
        assert_eq!(account.assign_to, Some(7));
        assert!(account.is_active);
    }

    #[test]
    fn test_admin_without_assignment() {
        let row = serde_json::json!({
            "user_id": 1,
            "username": "admin",
            "password_hash": "x",
            "assign_type": "admin",
            "assign_to": null,
            "is_active": 0,
        });
        let account: LoginAccount = serde_json::from_value(row).unwrap();
        assert_eq!(account.assign_to, None);
        assert!(!account.is_active);
        assert_eq!(account.to_auth_user().assign_type, AssignType::Admin);
    }

    #[test]
    fn test_assign_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&AssignType::Student).unwrap(),
            "\"student\""
        );
        assert!("staff".parse::<AssignType>().is_err());
    }
}
