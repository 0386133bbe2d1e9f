use chrono::{DateTime, Datelike, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::Section;
use crate::db::{self, Donation};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::auth;
use crate::ipc::helpers::{db_conn, db_conn_mut, now_iso, optional_str, require_f64, require_str};
use crate::ipc::types::{AppState, Request};

fn list(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Donations)?;
    let donations = db::load_donations(conn)?;
    Ok(json!({ "donations": donations }))
}

/// All-time and current-calendar-month totals for the summary cards.
fn summary(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Donations)?;
    let donations = db::load_donations(conn)?;

    let now = Utc::now();
    let total_all_time: f64 = donations.iter().map(|d| d.amount).sum();
    let total_this_month: f64 = donations
        .iter()
        .filter(|d| {
            DateTime::parse_from_rfc3339(&d.date)
                .map(|date| date.year() == now.year() && date.month() == now.month())
                .unwrap_or(false)
        })
        .map(|d| d.amount)
        .sum();

    Ok(json!({
        "totalAllTime": total_all_time,
        "totalThisMonth": total_this_month,
        "count": donations.len(),
    }))
}

/// Donations are append-only from the caller's perspective: recorded once,
/// never edited. Every write re-projects the income ledger before the
/// transaction commits, so income totals are never stale.
fn create(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn_mut(state)?;
    auth::require_section(conn, Section::Donations)?;
    let donor_name = require_str(params, "donorName")?;
    let amount = require_f64(params, "amount")?;
    if amount <= 0.0 {
        return Err(HandlerErr::with_details(
            "bad_params",
            "amount must be positive",
            json!({ "amount": amount }),
        ));
    }
    let purpose = optional_str(params, "purpose").unwrap_or_else(|| "General".to_string());

    let donation = Donation {
        id: Uuid::new_v4().to_string(),
        donor_name,
        amount,
        purpose,
        date: now_iso(),
    };

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO donations(id, donor_name, amount, purpose, date) VALUES (?, ?, ?, ?, ?)",
        (
            &donation.id,
            &donation.donor_name,
            donation.amount,
            &donation.purpose,
            &donation.date,
        ),
    )?;
    db::sync_incomes(&tx)?;
    tx.commit()
        .map_err(|e| HandlerErr::new("db_commit_failed", e.to_string()))?;

    Ok(json!({ "donation": donation }))
}

fn delete(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn_mut(state)?;
    auth::require_section(conn, Section::Donations)?;
    let id = require_str(params, "id")?;

    let tx = conn.transaction()?;
    let changed = tx.execute("DELETE FROM donations WHERE id = ?", [&id])?;
    if changed == 0 {
        return Err(HandlerErr::with_details(
            "not_found",
            "donation not found",
            json!({ "id": id }),
        ));
    }
    db::sync_incomes(&tx)?;
    tx.commit()
        .map_err(|e| HandlerErr::new("db_commit_failed", e.to_string()))?;

    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "donations.list" => list(state),
        "donations.summary" => summary(state),
        "donations.create" => create(state, &req.params),
        "donations.delete" => delete(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
