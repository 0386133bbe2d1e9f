use serde::{Deserialize, Serialize};

use crate::db::{ResultRecord, Student};

/// One scored subject inside a result. Scores follow the form convention of
/// 0..=100 per subject; the evaluator takes them as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectMark {
    pub subject_id: String,
    pub score: f64,
}

/// Reportable summary for one exam record. `percentage` is preformatted to
/// two decimals for display; grading always runs on the unrounded value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub total_marks: f64,
    pub percentage: String,
    pub grade: &'static str,
}

/// Letter grade by inclusive lower-bound thresholds, first match wins.
pub fn grade_for(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A+"
    } else if percentage >= 80.0 {
        "A"
    } else if percentage >= 70.0 {
        "B"
    } else if percentage >= 60.0 {
        "C"
    } else if percentage >= 50.0 {
        "D"
    } else {
        "F"
    }
}

/// Percentage of the maximum attainable total, each subject out of 100.
/// Defined as 0 for an empty marks list.
pub fn percentage_of(marks: &[SubjectMark]) -> f64 {
    if marks.is_empty() {
        return 0.0;
    }
    let total: f64 = marks.iter().map(|m| m.score).sum();
    (total / (marks.len() as f64 * 100.0)) * 100.0
}

pub fn evaluate(marks: &[SubjectMark]) -> ResultSummary {
    let total_marks: f64 = marks.iter().map(|m| m.score).sum();
    let percentage = percentage_of(marks);
    ResultSummary {
        total_marks,
        percentage: format!("{:.2}", percentage),
        grade: grade_for(percentage),
    }
}

/// Outcome of a public roll-number search. The three cases are distinct
/// variants so callers cannot confuse "no such student" with "no result yet".
#[derive(Debug)]
pub enum LookupOutcome<'a> {
    NoStudent,
    NoResult {
        student: &'a Student,
    },
    Found {
        student: &'a Student,
        result: &'a ResultRecord,
        summary: ResultSummary,
    },
}

/// Find the student with the given roll number, then their result. Both scans
/// are first-match-wins over stored order: roll numbers are expected to be
/// unique, but nothing structural enforces it, so the tie-break is explicit.
pub fn lookup<'a>(
    roll_no: i64,
    students: &'a [Student],
    results: &'a [ResultRecord],
) -> LookupOutcome<'a> {
    let Some(student) = students.iter().find(|s| s.roll_no == roll_no) else {
        return LookupOutcome::NoStudent;
    };
    match results.iter().find(|r| r.student_id == student.id) {
        Some(result) => {
            let summary = evaluate(&result.marks);
            LookupOutcome::Found {
                student,
                result,
                summary,
            }
        }
        None => LookupOutcome::NoResult { student },
    }
}
