use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_maktabd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn maktabd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn roll_lookup_distinguishes_found_no_result_and_no_student() {
    let workspace = temp_dir("maktab-lookup");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // Seeded demo student Ahmed Ali holds roll 101. Publish a result for him
    // through the teacher's session.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "username": "teacher", "password": "teacher123" }),
    );
    let students = request_ok(&mut stdin, &mut reader, "3", "students.list", json!({}));
    let ahmed_id = students
        .get("students")
        .and_then(|v| v.as_array())
        .and_then(|arr| {
            arr.iter()
                .find(|s| s.get("rollNo").and_then(|v| v.as_i64()) == Some(101))
        })
        .and_then(|s| s.get("id"))
        .and_then(|v| v.as_str())
        .expect("seeded roll 101")
        .to_string();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "results.create",
        json!({
            "studentId": ahmed_id,
            "examName": "Annual Exam 2025",
            "marks": [
                { "subjectId": "sub1", "score": 90.0 },
                { "subjectId": "sub2", "score": 80.0 }
            ]
        }),
    );

    // The lookup itself is public.
    let _ = request_ok(&mut stdin, &mut reader, "5", "auth.logout", json!({}));

    let found = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "results.lookup",
        json!({ "rollNo": "101" }),
    );
    assert_eq!(found.get("outcome").and_then(|v| v.as_str()), Some("found"));
    assert_eq!(
        found
            .get("student")
            .and_then(|s| s.get("name"))
            .and_then(|v| v.as_str()),
        Some("Ahmed Ali")
    );
    let summary = found.get("summary").expect("summary");
    assert_eq!(summary.get("totalMarks").and_then(|v| v.as_f64()), Some(170.0));
    assert_eq!(summary.get("percentage").and_then(|v| v.as_str()), Some("85.00"));
    assert_eq!(summary.get("grade").and_then(|v| v.as_str()), Some("A"));

    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "results.lookup",
        json!({ "rollNo": 999 }),
    );
    assert_eq!(
        missing.get("outcome").and_then(|v| v.as_str()),
        Some("no-student")
    );
    assert!(missing.get("student").is_none());

    // Roll 103 exists but has no published result.
    let unpublished = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "results.lookup",
        json!({ "rollNo": 103 }),
    );
    assert_eq!(
        unpublished.get("outcome").and_then(|v| v.as_str()),
        Some("no-result")
    );
    assert_eq!(
        unpublished
            .get("student")
            .and_then(|s| s.get("name"))
            .and_then(|v| v.as_str()),
        Some("Yusuf Khan")
    );
}
