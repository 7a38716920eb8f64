use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{AttendanceError, Result};
use crate::models::common::pagination::deserialize_string_to_i64;

/// 存储过程通过 `@p_messages_json` 输出的单条消息，`code == 0` 表示成功
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "procedures.ts")]
pub struct ProcMessage {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl ProcMessage {
    pub const SUCCESS_CODE: i64 = 0;

    /// 只看第一条消息
    pub fn is_success(messages: &[ProcMessage]) -> bool {
        messages
            .first()
            .is_some_and(|m| m.code == Self::SUCCESS_CODE)
    }

    /// 解析 OUT 参数的原始 JSON；未赋值（NULL 或空串）视为没有消息
    pub fn parse_list(raw: Option<&str>) -> Result<Vec<ProcMessage>> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Vec::new()),
            Some(raw) => raw,
        };

        // 有的过程只 SELECT 出单个对象而不是数组
        match serde_json::from_str::<serde_json::Value>(raw)? {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(AttendanceError::from))
                .collect(),
            object @ serde_json::Value::Object(_) => Ok(vec![serde_json::from_value(object)?]),
            other => Err(AttendanceError::procedure(format!(
                "Unexpected messages payload: {other}"
            ))),
        }
    }
}

/// 列表过程的一页数据及 `@p_total` 给出的总数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagedRows {
    pub rows: Vec<serde_json::Value>,
    pub total: i64,
}
