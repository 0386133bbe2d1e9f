use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::Section;
use crate::db::FeedbackEntry;
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::auth;
use crate::ipc::helpers::{db_conn, now_iso, require_str};
use crate::ipc::types::{AppState, Request};

/// Public contact-form submission. Append-only; nothing here is gated.
fn submit(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let entry = FeedbackEntry {
        id: Uuid::new_v4().to_string(),
        name: require_str(params, "name")?,
        email: require_str(params, "email")?,
        message: require_str(params, "message")?,
        date: now_iso(),
    };
    conn.execute(
        "INSERT INTO feedback(id, name, email, message, date) VALUES (?, ?, ?, ?, ?)",
        (&entry.id, &entry.name, &entry.email, &entry.message, &entry.date),
    )?;
    Ok(json!({ "feedback": entry }))
}

/// Newest first, by insertion order.
fn list(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Feedback)?;
    let mut stmt =
        conn.prepare("SELECT id, name, email, message, date FROM feedback ORDER BY rowid DESC")?;
    let entries = stmt
        .query_map([], |row| {
            Ok(FeedbackEntry {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                message: row.get(3)?,
                date: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({ "feedback": entries }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "feedback.submit" => submit(state, &req.params),
        "feedback.list" => list(state),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
