use rusqlite::Connection;
use serde_json::Value;

use crate::ipc::error::HandlerErr;
use crate::ipc::types::AppState;

pub fn db_conn(state: &AppState) -> Result<&Connection, HandlerErr> {
    state
        .db
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

pub fn db_conn_mut(state: &mut AppState) -> Result<&mut Connection, HandlerErr> {
    state
        .db
        .as_mut()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

/// Required non-empty string parameter, trimmed.
pub fn require_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    match params.get(key).and_then(|v| v.as_str()).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(HandlerErr::new(
            "bad_params",
            format!("missing params.{}", key),
        )),
    }
}

/// Optional string parameter; blank collapses to None.
pub fn optional_str(params: &Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn require_f64(params: &Value, key: &str) -> Result<f64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing params.{}", key)))
}

/// Integer parameter; form inputs sometimes arrive as numeric strings, so
/// both shapes are accepted.
pub fn require_i64(params: &Value, key: &str) -> Result<i64, HandlerErr> {
    let parsed = params.get(key).and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    });
    parsed.ok_or_else(|| HandlerErr::new("bad_params", format!("missing params.{}", key)))
}

pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
