//! 按端点声明从请求中取出存储过程参数

use std::collections::HashMap;
use std::fmt;

use actix_web::{HttpRequest, http::StatusCode, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::catalog::{ArgKind, ArgSource, ArgSpec, UserField};
use crate::models::PaginationQuery;
use crate::models::auth::AuthUser;
use crate::utils::password::hash_password;
use crate::utils::validate::validate_password;

#[derive(Debug, Clone, PartialEq)]
pub enum ArgError {
    /// 请求体不是合法 JSON，或者不是对象
    InvalidBody(String),
    InvalidQuery(String),
    Missing(&'static str),
    Invalid {
        name: &'static str,
        reason: String,
    },
    /// 账号没有关联讲师或学生记录
    NotLinked,
    Unauthenticated,
    Internal(String),
}

impl ArgError {
    pub fn status(&self) -> StatusCode {
        match self {
            ArgError::InvalidBody(_)
            | ArgError::InvalidQuery(_)
            | ArgError::Missing(_)
            | ArgError::Invalid { .. } => StatusCode::BAD_REQUEST,
            ArgError::NotLinked => StatusCode::FORBIDDEN,
            ArgError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ArgError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ArgError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgError::InvalidBody(e) => write!(f, "Invalid request body: {e}"),
            ArgError::InvalidQuery(e) => write!(f, "Invalid query parameters: {e}"),
            ArgError::Missing(name) => write!(f, "Missing required parameter: {name}"),
            ArgError::Invalid { name, reason } => write!(f, "Invalid parameter {name}: {reason}"),
            ArgError::NotLinked => {
                f.write_str("Account is not linked to a lecturer or student record")
            }
            ArgError::Unauthenticated => f.write_str("Authentication required"),
            ArgError::Internal(e) => write!(f, "Failed to prepare parameters: {e}"),
        }
    }
}

/// 一次请求可提供的全部参数来源
#[derive(Debug, Default)]
pub struct ArgContext {
    pub path: HashMap<String, String>,
    pub query: Map<String, Value>,
    pub body: Value,
    pub user: Option<AuthUser>,
}

impl ArgContext {
    pub fn from_request(req: &HttpRequest, body: &[u8], user: Option<AuthUser>) -> Result<Self, ArgError> {
        let path = req
            .match_info()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map_err(|e| ArgError::InvalidQuery(e.to_string()))?
            .into_inner()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        Ok(Self {
            path,
            query,
            body: parse_body(body)?,
            user,
        })
    }

    pub fn pagination(&self) -> Result<(i64, i64), ArgError> {
        let query = PaginationQuery::deserialize(Value::Object(self.query.clone()))
            .map_err(|e| ArgError::InvalidQuery(e.to_string()))?;
        Ok(query.normalized())
    }

    fn raw(&self, spec: &ArgSpec) -> Result<Value, ArgError> {
        let value = match spec.source {
            ArgSource::Path => self
                .path
                .get(spec.name)
                .map(|v| Value::String(v.clone()))
                .unwrap_or(Value::Null),
            ArgSource::Query => self.query.get(spec.name).cloned().unwrap_or(Value::Null),
            ArgSource::Body => match &self.body {
                Value::Object(map) => map.get(spec.name).cloned().unwrap_or(Value::Null),
                Value::Null => Value::Null,
                _ => {
                    return Err(ArgError::InvalidBody(
                        "request body must be a JSON object".to_string(),
                    ));
                }
            },
            ArgSource::User(field) => return self.user_field(field),
            ArgSource::Page => Value::from(self.pagination()?.0),
            ArgSource::PageSize => Value::from(self.pagination()?.1),
        };
        Ok(value)
    }

    fn user_field(&self, field: UserField) -> Result<Value, ArgError> {
        let user = self.user.as_ref().ok_or(ArgError::Unauthenticated)?;
        Ok(match field {
            UserField::UserId => Value::from(user.user_id),
            UserField::AssignTo => Value::from(user.assign_to.ok_or(ArgError::NotLinked)?),
            UserField::Username => Value::String(user.username.clone()),
            UserField::Email => Value::String(user.email.clone()),
            UserField::AssignType => Value::String(user.assign_type.to_string()),
        })
    }
}

/// 空请求体视为 null
pub fn parse_body(body: &[u8]) -> Result<Value, ArgError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ArgError::InvalidBody(e.to_string()))
}

/// 按声明顺序解析所有参数
pub fn resolve_args(specs: &[ArgSpec], ctx: &ArgContext) -> Result<Vec<Value>, ArgError> {
    specs.iter().map(|spec| resolve_arg(spec, ctx)).collect()
}

fn resolve_arg(spec: &ArgSpec, ctx: &ArgContext) -> Result<Value, ArgError> {
    let raw = ctx.raw(spec)?;

    if is_blank(&raw) {
        return if spec.required {
            Err(ArgError::Missing(spec.name))
        } else {
            Ok(Value::Null)
        };
    }

    coerce(spec, raw)
}

// 表单常把未填写的字段提交为空串
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce(spec: &ArgSpec, value: Value) -> Result<Value, ArgError> {
    let name = spec.name;
    match spec.kind {
        ArgKind::Int => match &value {
            Value::Number(n) if n.is_i64() => Ok(value),
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| Value::from(f as i64))
                .ok_or_else(|| ArgError::invalid(name, "expected an integer")),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| ArgError::invalid(name, "expected an integer")),
            _ => Err(ArgError::invalid(name, "expected an integer")),
        },
        ArgKind::Decimal => match &value {
            Value::Number(_) => Ok(value),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::from)
                .ok_or_else(|| ArgError::invalid(name, "expected a number")),
            _ => Err(ArgError::invalid(name, "expected a number")),
        },
        ArgKind::Text => match value {
            Value::String(_) => Ok(value),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(ArgError::invalid(name, "expected a string")),
        },
        ArgKind::Date => {
            let s = as_str(name, &value)?;
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                .map_err(|_| ArgError::invalid(name, "expected a date in YYYY-MM-DD format"))
        }
        ArgKind::Time => {
            let s = as_str(name, &value)?.trim();
            NaiveTime::parse_from_str(s, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                .map(|t| Value::String(t.format("%H:%M:%S").to_string()))
                .map_err(|_| ArgError::invalid(name, "expected a time in HH:MM or HH:MM:SS format"))
        }
        ArgKind::Bool => match &value {
            Value::Bool(_) => Ok(value),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(ArgError::invalid(name, "expected a boolean")),
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                _ => Err(ArgError::invalid(name, "expected a boolean")),
            },
            _ => Err(ArgError::invalid(name, "expected a boolean")),
        },
        ArgKind::Json => match value {
            Value::String(s) => serde_json::from_str::<Value>(&s)
                .map(|_| Value::String(s))
                .map_err(|_| ArgError::invalid(name, "expected JSON")),
            other => Ok(Value::String(other.to_string())),
        },
        ArgKind::Password => {
            let password = as_str(name, &value)?;
            validate_password(password).map_err(|reason| ArgError::invalid(name, reason))?;
            hash_password(password)
                .map(Value::String)
                .map_err(|e| ArgError::Internal(e.to_string()))
        }
    }
}

fn as_str<'a>(name: &'static str, value: &'a Value) -> Result<&'a str, ArgError> {
    value
        .as_str()
        .ok_or_else(|| ArgError::invalid(name, "expected a string"))
}
