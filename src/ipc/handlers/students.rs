use rusqlite::{Connection, OptionalExtension};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::Section;
use crate::db::{self, Residency, Student};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::auth;
use crate::ipc::helpers::{db_conn, require_i64, require_str};
use crate::ipc::types::{AppState, Request};

fn list(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Students)?;
    let students = db::load_students(conn)?;
    Ok(json!({ "students": students }))
}

fn subjects(state: &AppState) -> Result<Value, HandlerErr> {
    // Public: the result lookup page joins subject names for display.
    let conn = db_conn(state)?;
    let subjects = db::load_subjects(conn)?;
    Ok(json!({ "subjects": subjects }))
}

/// Roll numbers are unique among current students; a clash is a caller
/// mistake, reported before anything is written.
fn reject_duplicate_roll(
    conn: &Connection,
    roll_no: i64,
    excluding: Option<&str>,
) -> Result<(), HandlerErr> {
    let holder: Option<String> = match excluding {
        Some(id) => conn
            .query_row(
                "SELECT id FROM students WHERE roll_no = ? AND id != ?",
                (roll_no, id),
                |r| r.get(0),
            )
            .optional()?,
        None => conn
            .query_row("SELECT id FROM students WHERE roll_no = ?", [roll_no], |r| {
                r.get(0)
            })
            .optional()?,
    };
    match holder {
        Some(_) => Err(HandlerErr::with_details(
            "bad_params",
            "roll number already in use",
            json!({ "rollNo": roll_no }),
        )),
        None => Ok(()),
    }
}

fn student_fields(params: &Value) -> Result<(i64, String, String, String, String, String, String, Residency), HandlerErr> {
    let roll_no = require_i64(params, "rollNo")?;
    let name = require_str(params, "name")?;
    let class_name = require_str(params, "class")?;
    let section_label = require_str(params, "section")?;
    let guardian_name = require_str(params, "guardianName")?;
    let admission_date = require_str(params, "admissionDate")?;
    let contact = require_str(params, "contact")?;
    let residency_raw = require_str(params, "type")?;
    let Some(residency) = Residency::parse(&residency_raw) else {
        return Err(HandlerErr::with_details(
            "bad_params",
            "type must be Residential or Non-Residential",
            json!({ "type": residency_raw }),
        ));
    };
    Ok((
        roll_no,
        name,
        class_name,
        section_label,
        guardian_name,
        admission_date,
        contact,
        residency,
    ))
}

fn create(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Students)?;
    let (roll_no, name, class_name, section_label, guardian_name, admission_date, contact, residency) =
        student_fields(params)?;
    reject_duplicate_roll(conn, roll_no, None)?;

    let student = Student {
        id: Uuid::new_v4().to_string(),
        roll_no,
        name,
        class_name,
        section_label,
        guardian_name,
        admission_date,
        contact,
        residency,
    };
    conn.execute(
        "INSERT INTO students(id, roll_no, name, class_name, section_label,
                              guardian_name, admission_date, contact, residency)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        (
            &student.id,
            student.roll_no,
            &student.name,
            &student.class_name,
            &student.section_label,
            &student.guardian_name,
            &student.admission_date,
            &student.contact,
            student.residency.as_str(),
        ),
    )?;
    Ok(json!({ "student": student }))
}

fn update(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Students)?;
    let id = require_str(params, "id")?;
    let (roll_no, name, class_name, section_label, guardian_name, admission_date, contact, residency) =
        student_fields(params)?;
    reject_duplicate_roll(conn, roll_no, Some(&id))?;

    let changed = conn.execute(
        "UPDATE students SET roll_no = ?, name = ?, class_name = ?, section_label = ?,
                             guardian_name = ?, admission_date = ?, contact = ?, residency = ?
         WHERE id = ?",
        (
            roll_no,
            &name,
            &class_name,
            &section_label,
            &guardian_name,
            &admission_date,
            &contact,
            residency.as_str(),
            &id,
        ),
    )?;
    if changed == 0 {
        return Err(HandlerErr::with_details(
            "not_found",
            "student not found",
            json!({ "id": id }),
        ));
    }
    let student = Student {
        id,
        roll_no,
        name,
        class_name,
        section_label,
        guardian_name,
        admission_date,
        contact,
        residency,
    };
    Ok(json!({ "student": student }))
}

fn delete(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Students)?;
    let id = require_str(params, "id")?;
    let changed = conn.execute("DELETE FROM students WHERE id = ?", [&id])?;
    if changed == 0 {
        return Err(HandlerErr::with_details(
            "not_found",
            "student not found",
            json!({ "id": id }),
        ));
    }
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.list" => list(state),
        "students.create" => create(state, &req.params),
        "students.update" => update(state, &req.params),
        "students.delete" => delete(state, &req.params),
        "subjects.list" => subjects(state),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
