//! 存储过程调用

use super::SeaOrmStorage;
use crate::errors::{AttendanceError, Result};
use crate::models::procedures::{PagedRows, ProcMessage};
use crate::utils::validate::validate_procedure_name;
use sea_orm::{
    ConnectionTrait, DbBackend, FromQueryResult, JsonValue, Statement, TransactionTrait,
};
use serde_json::Value;
use tracing::debug;

pub(crate) const TOTAL_VAR: &str = "@p_total";
pub(crate) const MESSAGES_VAR: &str = "@p_messages_json";

/// 生成 `CALL name(?, ?, @out)`
pub(crate) fn build_call(procedure: &str, arg_count: usize, out_var: Option<&str>) -> Result<String> {
    validate_procedure_name(procedure).map_err(AttendanceError::procedure)?;

    let mut params = vec!["?"; arg_count];
    if let Some(out) = out_var {
        params.push(out);
    }
    Ok(format!("CALL {}({})", procedure, params.join(", ")))
}

/// JSON 参数转换为绑定值；数组和对象按 JSON 文本传入
pub(crate) fn to_db_value(value: Value) -> sea_orm::Value {
    match value {
        Value::Null => Option::<String>::None.into(),
        Value::Bool(b) => b.into(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if let Some(u) = n.as_u64() {
                u.into()
            } else {
                n.as_f64().unwrap_or_default().into()
            }
        }
        Value::String(s) => s.into(),
        composite @ (Value::Array(_) | Value::Object(_)) => composite.to_string().into(),
    }
}

fn call_statement(procedure: &str, args: Vec<Value>, out_var: Option<&str>) -> Result<Statement> {
    let sql = build_call(procedure, args.len(), out_var)?;
    debug!("{} with {} argument(s)", sql, args.len());
    Ok(Statement::from_sql_and_values(
        DbBackend::MySql,
        sql,
        args.into_iter().map(to_db_value),
    ))
}

fn raw(sql: &str) -> Statement {
    Statement::from_string(DbBackend::MySql, sql.to_string())
}

impl SeaOrmStorage {
    pub async fn query_impl(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<Value>> {
        let statement = call_statement(procedure, args, None)?;
        let rows = self.db.query_all_raw(statement).await.map_err(|e| {
            AttendanceError::database_operation(format!("CALL {procedure} failed: {e}"))
        })?;

        rows.iter()
            .map(|row| JsonValue::from_query_result(row, "").map_err(AttendanceError::from))
            .collect()
    }

    /// OUT 变量是会话级的，CALL 与读取必须在同一连接上，这里用事务固定连接
    pub async fn query_paged_impl(&self, procedure: &str, args: Vec<Value>) -> Result<PagedRows> {
        let statement = call_statement(procedure, args, Some(TOTAL_VAR))?;
        let txn = self.db.begin().await?;

        txn.execute_raw(raw("SET @p_total = NULL")).await?;
        let rows = txn.query_all_raw(statement).await.map_err(|e| {
            AttendanceError::database_operation(format!("CALL {procedure} failed: {e}"))
        })?;
        let total = txn
            .query_one_raw(raw(
                "SELECT CAST(COALESCE(@p_total, 0) AS SIGNED) AS total",
            ))
            .await?
            .map(|row| row.try_get::<i64>("", "total"))
            .transpose()?
            .unwrap_or(0);

        txn.commit().await?;

        let rows = rows
            .iter()
            .map(|row| JsonValue::from_query_result(row, ""))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(PagedRows { rows, total })
    }

    pub async fn execute_impl(
        &self,
        procedure: &str,
        args: Vec<Value>,
    ) -> Result<Vec<ProcMessage>> {
        let statement = call_statement(procedure, args, Some(MESSAGES_VAR))?;
        let txn = self.db.begin().await?;

        txn.execute_raw(raw("SET @p_messages_json = NULL")).await?;
        // 写过程也可能顺带 SELECT 结果集，这里只关心 OUT 消息
        txn.query_all_raw(statement).await.map_err(|e| {
            AttendanceError::database_operation(format!("CALL {procedure} failed: {e}"))
        })?;
        let raw_messages = txn
            .query_one_raw(raw(
                "SELECT CAST(@p_messages_json AS CHAR) AS messages",
            ))
            .await?
            .map(|row| row.try_get::<Option<String>>("", "messages"))
            .transpose()?
            .flatten();

        txn.commit().await?;

        ProcMessage::parse_list(raw_messages.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_call_without_out() {
        assert_eq!(
            build_call("sp_faculty_get", 1, None).unwrap(),
            "CALL sp_faculty_get(?)"
        );
        assert_eq!(
            build_call("sp_dashboard_summary", 0, None).unwrap(),
            "CALL sp_dashboard_summary()"
        );
    }

    #[test]
    fn test_build_call_appends_out_variable_last() {
        assert_eq!(
            build_call("sp_faculty_list", 3, Some(TOTAL_VAR)).unwrap(),
            "CALL sp_faculty_list(?, ?, ?, @p_total)"
        );
        assert_eq!(
            build_call("sp_faculty_create", 2, Some(MESSAGES_VAR)).unwrap(),
            "CALL sp_faculty_create(?, ?, @p_messages_json)"
        );
    }

    #[test]
    fn test_build_call_rejects_injection() {
        let err = build_call("sp_x(); DROP TABLE student; --", 0, None).unwrap_err();
        assert_eq!(err.code(), "E011");
    }

    #[test]
    fn test_to_db_value() {
        assert_eq!(to_db_value(json!(null)), sea_orm::Value::from(Option::<String>::None));
        assert_eq!(to_db_value(json!(7)), sea_orm::Value::from(7i64));
        assert_eq!(to_db_value(json!(2.5)), sea_orm::Value::from(2.5f64));
        assert_eq!(to_db_value(json!(true)), sea_orm::Value::from(true));
        assert_eq!(
            to_db_value(json!("2024-06-01")),
            sea_orm::Value::from("2024-06-01".to_string())
        );
        assert_eq!(
            to_db_value(json!([1, 2])),
            sea_orm::Value::from("[1,2]".to_string())
        );
    }
}
