use rusqlite::Connection;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::Section;
use crate::calc::{self, LookupOutcome, SubjectMark};
use crate::db::{self, ResultRecord};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::auth;
use crate::ipc::helpers::{db_conn, now_iso, optional_str, require_i64, require_str};
use crate::ipc::types::{AppState, Request};

fn parse_marks(params: &Value) -> Result<Vec<SubjectMark>, HandlerErr> {
    let Some(raw) = params.get("marks") else {
        return Err(HandlerErr::new("bad_params", "missing params.marks"));
    };
    serde_json::from_value(raw.clone()).map_err(|e| {
        HandlerErr::with_details(
            "bad_params",
            "marks must be a list of { subjectId, score }",
            json!({ "error": e.to_string() }),
        )
    })
}

fn insert_marks(conn: &Connection, result_id: &str, marks: &[SubjectMark]) -> Result<(), HandlerErr> {
    let mut stmt = conn.prepare(
        "INSERT INTO result_marks(result_id, position, subject_id, score) VALUES (?, ?, ?, ?)",
    )?;
    for (position, mark) in marks.iter().enumerate() {
        stmt.execute((result_id, position as i64, &mark.subject_id, mark.score))?;
    }
    Ok(())
}

/// Management listing: each record joined with its student (tolerating a
/// dangling reference) and the computed summary, newest first.
fn list(state: &AppState) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Results)?;
    let students = db::load_students(conn)?;
    let mut results = db::load_results(conn)?;
    results.reverse();

    let rows: Vec<Value> = results
        .iter()
        .map(|result| {
            let student = students.iter().find(|s| s.id == result.student_id);
            let summary = calc::evaluate(&result.marks);
            json!({
                "result": result,
                "studentName": student.map(|s| s.name.clone()),
                "studentRollNo": student.map(|s| s.roll_no),
                "summary": summary,
            })
        })
        .collect();
    Ok(json!({ "results": rows }))
}

fn create(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Results)?;
    let student_id = require_str(params, "studentId")?;
    let exam_name = require_str(params, "examName")?;
    let marks = parse_marks(params)?;
    let teacher_remarks = optional_str(params, "teacherRemarks");

    let record = ResultRecord {
        id: Uuid::new_v4().to_string(),
        student_id,
        exam_name,
        marks,
        teacher_remarks,
        date: now_iso(),
    };
    conn.execute(
        "INSERT INTO results(id, student_id, exam_name, teacher_remarks, date)
         VALUES (?, ?, ?, ?, ?)",
        (
            &record.id,
            &record.student_id,
            &record.exam_name,
            &record.teacher_remarks,
            &record.date,
        ),
    )?;
    insert_marks(conn, &record.id, &record.marks)?;

    let summary = calc::evaluate(&record.marks);
    Ok(json!({ "result": record, "summary": summary }))
}

/// Edits replace the marks list wholesale; there is no incremental patching
/// of individual rows. The student link is fixed at creation.
fn update(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Results)?;
    let id = require_str(params, "id")?;
    let exam_name = require_str(params, "examName")?;
    let marks = parse_marks(params)?;
    let teacher_remarks = optional_str(params, "teacherRemarks");

    let changed = conn.execute(
        "UPDATE results SET exam_name = ?, teacher_remarks = ? WHERE id = ?",
        (&exam_name, &teacher_remarks, &id),
    )?;
    if changed == 0 {
        return Err(HandlerErr::with_details(
            "not_found",
            "result not found",
            json!({ "id": id }),
        ));
    }
    conn.execute("DELETE FROM result_marks WHERE result_id = ?", [&id])?;
    insert_marks(conn, &id, &marks)?;

    let summary = calc::evaluate(&marks);
    Ok(json!({ "id": id, "summary": summary }))
}

fn delete(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    auth::require_section(conn, Section::Results)?;
    let id = require_str(params, "id")?;
    let changed = conn.execute("DELETE FROM results WHERE id = ?", [&id])?;
    if changed == 0 {
        return Err(HandlerErr::with_details(
            "not_found",
            "result not found",
            json!({ "id": id }),
        ));
    }
    conn.execute("DELETE FROM result_marks WHERE result_id = ?", [&id])?;
    Ok(json!({ "ok": true }))
}

/// Public roll-number search for the check-result page. No session needed;
/// the outcome is a tagged variant so the caller can tell "no such student"
/// from "result not yet published".
fn lookup(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let conn = db_conn(state)?;
    let roll_no = require_i64(params, "rollNo")?;
    let students = db::load_students(conn)?;
    let results = db::load_results(conn)?;

    let outcome = match calc::lookup(roll_no, &students, &results) {
        LookupOutcome::NoStudent => json!({ "outcome": "no-student" }),
        LookupOutcome::NoResult { student } => json!({
            "outcome": "no-result",
            "student": student,
        }),
        LookupOutcome::Found {
            student,
            result,
            summary,
        } => json!({
            "outcome": "found",
            "student": student,
            "result": result,
            "summary": summary,
        }),
    };
    Ok(outcome)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "results.list" => list(state),
        "results.create" => create(state, &req.params),
        "results.update" => update(state, &req.params),
        "results.delete" => delete(state, &req.params),
        "results.lookup" => lookup(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
