use rusqlite::Connection;
use serde_json::{json, Value};

use crate::access::{self, Role, Section};
use crate::db;
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::helpers::{db_conn, require_str};
use crate::ipc::types::{AppState, Request};

const ROLE_KEY: &str = "session.role";
const ACTIVE_SECTION_KEY: &str = "session.activeSection";

/// Role of the current session, if any. Unknown constants in the store fail
/// closed to unauthenticated rather than crashing the gate.
pub fn current_role(conn: &Connection) -> Option<Role> {
    match db::settings_get_json(conn, ROLE_KEY, Value::Null) {
        Value::String(s) => Role::parse(&s),
        _ => None,
    }
}

fn stored_active_section(conn: &Connection) -> Option<Section> {
    match db::settings_get_json(conn, ACTIVE_SECTION_KEY, Value::Null) {
        Value::String(s) => Section::parse(&s),
        _ => None,
    }
}

/// Render-time permission check for a section-scoped method. Runs on every
/// dispatch, not just when the menu was built: the caller's idea of what it
/// may see can be stale.
pub fn require_section(conn: &Connection, section: Section) -> Result<Role, HandlerErr> {
    match current_role(conn) {
        Some(role) if access::is_permitted(Some(role), section) => Ok(role),
        _ => Err(HandlerErr::with_details(
            "access_denied",
            format!("section '{}' is not permitted for this session", section.as_str()),
            json!({ "section": section.as_str() }),
        )),
    }
}

fn sections_json(role: Option<Role>) -> Value {
    Value::Array(
        access::allowed_sections(role)
            .iter()
            .map(|s| Value::String(s.as_str().to_string()))
            .collect(),
    )
}

fn login(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let username = require_str(params, "username")?;
    let password = require_str(params, "password")?;

    let Some(role) = access::authenticate(&username, &password) else {
        return Err(HandlerErr::new("invalid_credentials", "invalid credentials"));
    };

    db::settings_set_json(conn, ROLE_KEY, &json!(role.as_str()))?;
    let active = access::default_section(Some(role));
    match active {
        Some(section) => {
            db::settings_set_json(conn, ACTIVE_SECTION_KEY, &json!(section.as_str()))?
        }
        None => db::settings_delete(conn, ACTIVE_SECTION_KEY)?,
    }

    Ok(json!({
        "role": role.as_str(),
        "roleName": role.display_name(),
        "sections": sections_json(Some(role)),
        "activeSection": active.map(|s| s.as_str()),
    }))
}

fn logout(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    db::settings_delete(conn, ROLE_KEY)?;
    db::settings_delete(conn, ACTIVE_SECTION_KEY)?;
    Ok(json!({ "ok": true }))
}

fn session(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let role = current_role(conn);

    // The stored selection may predate a role change. Reconcile it here,
    // deterministically, so no later render sees a dangling selection.
    let stored = stored_active_section(conn);
    let active = access::reconcile_active(role, stored);
    if active != stored {
        match active {
            Some(section) => {
                db::settings_set_json(conn, ACTIVE_SECTION_KEY, &json!(section.as_str()))?
            }
            None => db::settings_delete(conn, ACTIVE_SECTION_KEY)?,
        }
    }

    Ok(json!({
        "authenticated": role.is_some(),
        "role": role.map(|r| r.as_str()),
        "sections": sections_json(role),
        "activeSection": active.map(|s| s.as_str()),
    }))
}

fn select_section(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let raw = require_str(params, "section")?;
    let Some(section) = Section::parse(&raw) else {
        return Err(HandlerErr::with_details(
            "bad_params",
            "unknown section",
            json!({ "section": raw }),
        ));
    };

    require_section(conn, section)?;
    db::settings_set_json(conn, ACTIVE_SECTION_KEY, &json!(section.as_str()))?;
    Ok(json!({ "activeSection": section.as_str() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "auth.login" => login(state, &req.params),
        "auth.logout" => logout(state),
        "auth.session" => session(state),
        "auth.selectSection" => select_section(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
