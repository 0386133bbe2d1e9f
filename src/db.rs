use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calc::SubjectMark;
use crate::catalog::{self, Bilingual};
use crate::ledger;

/// Whether a student boards at the institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Residency {
    #[serde(rename = "Residential")]
    Residential,
    #[serde(rename = "Non-Residential")]
    NonResidential,
}

impl Residency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Residency::Residential => "Residential",
            Residency::NonResidential => "Non-Residential",
        }
    }

    pub fn parse(s: &str) -> Option<Residency> {
        match s {
            "Residential" => Some(Residency::Residential),
            "Non-Residential" => Some(Residency::NonResidential),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub roll_no: i64,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "section")]
    pub section_label: String,
    pub guardian_name: String,
    pub admission_date: String,
    pub contact: String,
    #[serde(rename = "type")]
    pub residency: Residency,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRow {
    pub id: String,
    pub name: Bilingual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: String,
    pub student_id: String,
    pub exam_name: String,
    pub marks: Vec<SubjectMark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_remarks: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_name: String,
    pub amount: f64,
    pub purpose: String,
    pub date: String,
}

/// Origin tag for income rows. Derived rows belong to the ledger projection
/// and carry the donation they mirror; manual rows belong to the bookkeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Manual,
    Donation,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Manual => "manual",
            Provenance::Donation => "donation",
        }
    }

    pub fn parse(s: &str) -> Option<Provenance> {
        match s {
            "manual" => Some(Provenance::Manual),
            "donation" => Some(Provenance::Donation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub source: Bilingual,
    pub description: String,
    pub amount: f64,
    pub date: String,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub category: Bilingual,
    pub description: String,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub date: String,
}

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("maktab.sqlite3");
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    seed_defaults(&conn)?;
    Ok(conn)
}

// Results reference students and subjects by id without FK enforcement;
// readers tolerate a dangling reference instead of failing.
pub fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id TEXT PRIMARY KEY,
            roll_no INTEGER NOT NULL,
            name TEXT NOT NULL,
            class_name TEXT NOT NULL,
            section_label TEXT NOT NULL,
            guardian_name TEXT NOT NULL,
            admission_date TEXT NOT NULL,
            contact TEXT NOT NULL,
            residency TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_roll ON students(roll_no)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS subjects(
            id TEXT PRIMARY KEY,
            name_en TEXT NOT NULL,
            name_bn TEXT NOT NULL,
            sort_order INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS results(
            id TEXT PRIMARY KEY,
            student_id TEXT NOT NULL,
            exam_name TEXT NOT NULL,
            teacher_remarks TEXT,
            date TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_results_student ON results(student_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS result_marks(
            result_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            subject_id TEXT NOT NULL,
            score REAL NOT NULL,
            PRIMARY KEY(result_id, position)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS donations(
            id TEXT PRIMARY KEY,
            donor_name TEXT NOT NULL,
            amount REAL NOT NULL,
            purpose TEXT NOT NULL,
            date TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS incomes(
            id TEXT PRIMARY KEY,
            source_en TEXT NOT NULL,
            source_bn TEXT NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            provenance TEXT NOT NULL,
            donation_id TEXT
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_incomes_provenance ON incomes(provenance)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses(
            id TEXT PRIMARY KEY,
            category_en TEXT NOT NULL,
            category_bn TEXT NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS feedback(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            message TEXT NOT NULL,
            date TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// First-run data: the subject catalog and a handful of demo students so a
/// fresh workspace is usable immediately. No-ops on a populated store.
pub fn seed_defaults(conn: &Connection) -> anyhow::Result<()> {
    let subject_count: i64 = conn.query_row("SELECT COUNT(*) FROM subjects", [], |r| r.get(0))?;
    if subject_count == 0 {
        for (i, (id, name)) in catalog::seed_subjects().iter().enumerate() {
            conn.execute(
                "INSERT INTO subjects(id, name_en, name_bn, sort_order) VALUES (?, ?, ?, ?)",
                (id, &name.en, &name.bn, i as i64),
            )?;
        }
    }

    let student_count: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
    if student_count == 0 {
        let demo: [(&str, i64, &str, &str, &str, &str, &str, &str, &str); 3] = [
            ("std1", 101, "Ahmed Ali", "Hifz", "A", "Mohammed Ali", "2024-01-10", "1234567890", "Residential"),
            ("std2", 102, "Fatima Begum", "Alim", "B", "Hussain Begum", "2024-01-12", "0987654321", "Non-Residential"),
            ("std3", 103, "Yusuf Khan", "Hifz", "A", "Ibrahim Khan", "2024-01-15", "1122334455", "Residential"),
        ];
        for row in demo {
            conn.execute(
                "INSERT INTO students(id, roll_no, name, class_name, section_label,
                                      guardian_name, admission_date, contact, residency)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                row,
            )?;
        }
    }

    Ok(())
}

/// Read a settings value, substituting the caller's default when the key is
/// missing or the stored text fails to parse. A corrupt key never corrupts
/// its neighbors and never propagates.
pub fn settings_get_json(conn: &Connection, key: &str, default: serde_json::Value) -> serde_json::Value {
    let stored: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key = ?", [key], |r| r.get(0))
        .ok();
    match stored {
        Some(text) => serde_json::from_str(&text).unwrap_or(default),
        None => default,
    }
}

pub fn settings_set_json(conn: &Connection, key: &str, value: &serde_json::Value) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings(key, value) VALUES (?, ?)",
        (key, serde_json::to_string(value)?),
    )?;
    Ok(())
}

pub fn settings_delete(conn: &Connection, key: &str) -> anyhow::Result<()> {
    conn.execute("DELETE FROM settings WHERE key = ?", [key])?;
    Ok(())
}

pub fn load_students(conn: &Connection) -> anyhow::Result<Vec<Student>> {
    let mut stmt = conn.prepare(
        "SELECT id, roll_no, name, class_name, section_label,
                guardian_name, admission_date, contact, residency
         FROM students ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let residency: String = row.get(8)?;
            Ok(Student {
                id: row.get(0)?,
                roll_no: row.get(1)?,
                name: row.get(2)?,
                class_name: row.get(3)?,
                section_label: row.get(4)?,
                guardian_name: row.get(5)?,
                admission_date: row.get(6)?,
                contact: row.get(7)?,
                residency: Residency::parse(&residency).unwrap_or(Residency::NonResidential),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn load_subjects(conn: &Connection) -> anyhow::Result<Vec<SubjectRow>> {
    let mut stmt = conn.prepare("SELECT id, name_en, name_bn FROM subjects ORDER BY sort_order")?;
    let rows = stmt
        .query_map([], |row| {
            let en: String = row.get(1)?;
            let bn: String = row.get(2)?;
            Ok(SubjectRow {
                id: row.get(0)?,
                name: Bilingual { en, bn },
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn load_results(conn: &Connection) -> anyhow::Result<Vec<ResultRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, exam_name, teacher_remarks, date FROM results ORDER BY rowid",
    )?;
    let mut results = stmt
        .query_map([], |row| {
            Ok(ResultRecord {
                id: row.get(0)?,
                student_id: row.get(1)?,
                exam_name: row.get(2)?,
                marks: Vec::new(),
                teacher_remarks: row.get(3)?,
                date: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut mark_stmt = conn.prepare(
        "SELECT subject_id, score FROM result_marks WHERE result_id = ? ORDER BY position",
    )?;
    for result in &mut results {
        result.marks = mark_stmt
            .query_map([&result.id], |row| {
                Ok(SubjectMark {
                    subject_id: row.get(0)?,
                    score: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
    }
    Ok(results)
}

pub fn load_donations(conn: &Connection) -> anyhow::Result<Vec<Donation>> {
    let mut stmt = conn.prepare(
        "SELECT id, donor_name, amount, purpose, date FROM donations ORDER BY date DESC, id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Donation {
                id: row.get(0)?,
                donor_name: row.get(1)?,
                amount: row.get(2)?,
                purpose: row.get(3)?,
                date: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn load_incomes(conn: &Connection) -> anyhow::Result<Vec<Income>> {
    let mut stmt = conn.prepare(
        "SELECT id, source_en, source_bn, description, amount, date, provenance, donation_id
         FROM incomes ORDER BY date DESC, id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let source_en: String = row.get(1)?;
            let source_bn: String = row.get(2)?;
            let provenance: String = row.get(6)?;
            Ok(Income {
                id: row.get(0)?,
                source: Bilingual {
                    en: source_en,
                    bn: source_bn,
                },
                description: row.get(3)?,
                amount: row.get(4)?,
                date: row.get(5)?,
                provenance: Provenance::parse(&provenance).unwrap_or(Provenance::Manual),
                donation_id: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn insert_income(conn: &Connection, income: &Income) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO incomes(id, source_en, source_bn, description, amount, date, provenance, donation_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        (
            &income.id,
            &income.source.en,
            &income.source.bn,
            &income.description,
            income.amount,
            &income.date,
            income.provenance.as_str(),
            &income.donation_id,
        ),
    )?;
    Ok(())
}

pub fn load_expenses(conn: &Connection) -> anyhow::Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, category_en, category_bn, description, amount, date
         FROM expenses ORDER BY date DESC, id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let category_en: String = row.get(1)?;
            let category_bn: String = row.get(2)?;
            Ok(Expense {
                id: row.get(0)?,
                category: Bilingual {
                    en: category_en,
                    bn: category_bn,
                },
                description: row.get(3)?,
                amount: row.get(4)?,
                date: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Re-project the income ledger from the donation list. Runs inside the
/// caller's transaction so nothing ever reads incomes stale relative to the
/// donation change that triggered it.
pub fn sync_incomes(conn: &Connection) -> anyhow::Result<()> {
    let donations = load_donations(conn)?;
    let incomes = load_incomes(conn)?;
    let next = ledger::reconcile(&donations, incomes);
    conn.execute("DELETE FROM incomes", [])?;
    for income in &next {
        insert_income(conn, income)?;
    }
    Ok(())
}
