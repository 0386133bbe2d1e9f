use serde_json::{json, Value};

use crate::access::Section;
use crate::catalog;
use crate::db;
use crate::inspire::{self, WorkspaceFileProvider};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::auth;
use crate::ipc::helpers::{db_conn, require_str};
use crate::ipc::types::{AppState, Request};

const LANGUAGE_KEY: &str = "language";
const VISITOR_COUNT_KEY: &str = "visitorCount";

/// Best-effort provider fetch; any failure serves the fixed fallback. The
/// caller learns which one it got so it can stop showing a loading state.
fn inspiration(state: &AppState) -> Result<Value, HandlerErr> {
    let (content, from_fallback) = match &state.workspace {
        Some(workspace) => inspire::daily_inspiration(&WorkspaceFileProvider::new(workspace)),
        None => (inspire::fallback(), true),
    };
    Ok(json!({ "inspiration": content, "fallback": from_fallback }))
}

fn language_get(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let language = db::settings_get_json(conn, LANGUAGE_KEY, json!("en"));
    Ok(json!({ "language": language }))
}

fn language_set(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let language = require_str(params, "language")?;
    if language != "en" && language != "bn" {
        return Err(HandlerErr::with_details(
            "bad_params",
            "language must be en or bn",
            json!({ "language": language }),
        ));
    }
    db::settings_set_json(conn, LANGUAGE_KEY, &json!(language))?;
    Ok(json!({ "language": language }))
}

/// One hit per visiting session; the counter survives restarts.
fn visitor_hit(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let count = db::settings_get_json(conn, VISITOR_COUNT_KEY, json!(0))
        .as_i64()
        .unwrap_or(0)
        + 1;
    db::settings_set_json(conn, VISITOR_COUNT_KEY, &json!(count))?;
    Ok(json!({ "count": count }))
}

fn dashboard_stats(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let role = auth::require_section(conn, Section::Dashboard)?;

    let residential: i64 = conn.query_row(
        "SELECT COUNT(*) FROM students WHERE residency = 'Residential'",
        [],
        |r| r.get(0),
    )?;
    let non_residential: i64 = conn.query_row(
        "SELECT COUNT(*) FROM students WHERE residency = 'Non-Residential'",
        [],
        |r| r.get(0),
    )?;
    let results: i64 = conn.query_row("SELECT COUNT(*) FROM results", [], |r| r.get(0))?;
    let donations: i64 = conn.query_row("SELECT COUNT(*) FROM donations", [], |r| r.get(0))?;
    let donation_total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM donations",
        [],
        |r| r.get(0),
    )?;
    let income_total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM incomes",
        [],
        |r| r.get(0),
    )?;
    let expense_total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM expenses",
        [],
        |r| r.get(0),
    )?;
    let feedback: i64 = conn.query_row("SELECT COUNT(*) FROM feedback", [], |r| r.get(0))?;

    Ok(json!({
        "roleName": role.display_name(),
        "students": {
            "total": residential + non_residential,
            "residential": residential,
            "nonResidential": non_residential,
        },
        "results": results,
        "donations": { "count": donations, "total": donation_total },
        "accounts": {
            "totalIncome": income_total,
            "totalExpenses": expense_total,
            "balance": income_total - expense_total,
        },
        "feedback": feedback,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "content.info" => Ok(json!({ "info": catalog::institution_info() })),
        "content.teachers" => Ok(json!({ "teachers": catalog::teachers() })),
        "content.staff" => Ok(json!({ "staff": catalog::staff() })),
        "content.notices" => Ok(json!({ "notices": catalog::notices() })),
        "content.gallery" => Ok(json!({ "gallery": catalog::gallery() })),
        "content.inspiration" => inspiration(state),
        "prefs.language.get" => language_get(state),
        "prefs.language.set" => language_set(state, &req.params),
        "visitor.hit" => visitor_hit(state),
        "dashboard.stats" => dashboard_stats(state),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
