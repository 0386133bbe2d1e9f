use rusqlite::OptionalExtension;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::Section;
use crate::catalog::Bilingual;
use crate::db::{self, Expense, Income, Provenance};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::auth;
use crate::ipc::helpers::{db_conn, now_iso, require_f64, require_str};
use crate::ipc::types::{AppState, Request};

fn summary(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Accounts)?;
    let total_income: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM incomes",
        [],
        |r| r.get(0),
    )?;
    let total_expenses: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM expenses",
        [],
        |r| r.get(0),
    )?;
    Ok(json!({
        "totalIncome": total_income,
        "totalExpenses": total_expenses,
        "balance": total_income - total_expenses,
    }))
}

fn incomes_list(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Accounts)?;
    let incomes = db::load_incomes(conn)?;
    Ok(json!({ "incomes": incomes }))
}

fn incomes_create(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Accounts)?;
    let source = require_str(params, "source")?;
    let description = require_str(params, "description")?;
    let amount = require_f64(params, "amount")?;
    if amount <= 0.0 {
        return Err(HandlerErr::with_details(
            "bad_params",
            "amount must be positive",
            json!({ "amount": amount }),
        ));
    }

    let income = Income {
        id: Uuid::new_v4().to_string(),
        source: Bilingual::same(&source),
        description,
        amount,
        date: now_iso(),
        provenance: Provenance::Manual,
        donation_id: None,
    };
    db::insert_income(conn, &income)?;
    Ok(json!({ "income": income }))
}

/// Manual rows only. Derived rows are owned by the donation projection;
/// removing one means deleting its donation.
fn incomes_delete(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Accounts)?;
    let id = require_str(params, "id")?;
    let provenance: Option<String> = conn
        .query_row("SELECT provenance FROM incomes WHERE id = ?", [&id], |r| {
            r.get(0)
        })
        .optional()?;
    match provenance.as_deref() {
        None => Err(HandlerErr::with_details(
            "not_found",
            "income not found",
            json!({ "id": id }),
        )),
        Some("donation") => Err(HandlerErr::with_details(
            "bad_params",
            "income is derived from a donation; delete the donation instead",
            json!({ "id": id }),
        )),
        Some(_) => {
            conn.execute("DELETE FROM incomes WHERE id = ?", [&id])?;
            Ok(json!({ "ok": true }))
        }
    }
}

fn expenses_list(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Accounts)?;
    let expenses = db::load_expenses(conn)?;
    Ok(json!({ "expenses": expenses }))
}

fn expenses_create(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Accounts)?;
    let category = require_str(params, "category")?;
    let description = require_str(params, "description")?;
    let amount = require_f64(params, "amount")?;
    if amount <= 0.0 {
        return Err(HandlerErr::with_details(
            "bad_params",
            "amount must be positive",
            json!({ "amount": amount }),
        ));
    }

    let expense = Expense {
        id: Uuid::new_v4().to_string(),
        category: Bilingual::same(&category),
        description,
        amount,
        date: now_iso(),
    };
    conn.execute(
        "INSERT INTO expenses(id, category_en, category_bn, description, amount, date)
         VALUES (?, ?, ?, ?, ?, ?)",
        (
            &expense.id,
            &expense.category.en,
            &expense.category.bn,
            &expense.description,
            expense.amount,
            &expense.date,
        ),
    )?;
    Ok(json!({ "expense": expense }))
}

fn expenses_delete(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Accounts)?;
    let id = require_str(params, "id")?;
    let changed = conn.execute("DELETE FROM expenses WHERE id = ?", [&id])?;
    if changed == 0 {
        return Err(HandlerErr::with_details(
            "not_found",
            "expense not found",
            json!({ "id": id }),
        ));
    }
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "accounts.summary" => summary(state),
        "incomes.list" => incomes_list(state),
        "incomes.create" => incomes_create(state, &req.params),
        "incomes.delete" => incomes_delete(state, &req.params),
        "expenses.list" => expenses_list(state),
        "expenses.create" => expenses_create(state, &req.params),
        "expenses.delete" => expenses_delete(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
