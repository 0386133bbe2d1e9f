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
fn contact_form_feeds_the_gated_feedback_list_newest_first() {
    let workspace = temp_dir("maktab-feedback");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // Public submissions, no session.
    for (i, name) in ["Abdul", "Halima", "Rafiq"].iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("submit-{}", i),
            "feedback.submit",
            json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "message": format!("Message from {}", name)
            }),
        );
    }

    // Listing is gated.
    let raw = request(&mut stdin, &mut reader, "2", "feedback.list", json!({}));
    assert_eq!(raw.get("ok").and_then(|v| v.as_bool()), Some(false));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "auth.login",
        json!({ "username": "content", "password": "content123" }),
    );
    let listed = request_ok(&mut stdin, &mut reader, "4", "feedback.list", json!({}));
    let names: Vec<&str> = listed
        .get("feedback")
        .and_then(|v| v.as_array())
        .expect("feedback rows")
        .iter()
        .map(|f| f.get("name").and_then(|v| v.as_str()).expect("name"))
        .collect();
    assert_eq!(names, vec!["Rafiq", "Halima", "Abdul"]);
}

#[test]
fn language_preference_and_visitor_counter_persist_across_restarts() {
    let workspace = temp_dir("maktab-prefs");
    {
        let (_child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": workspace.to_string_lossy() }),
        );

        let lang = request_ok(&mut stdin, &mut reader, "2", "prefs.language.get", json!({}));
        assert_eq!(lang.get("language").and_then(|v| v.as_str()), Some("en"));

        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "3",
            "prefs.language.set",
            json!({ "language": "bn" }),
        );
        let raw = request(
            &mut stdin,
            &mut reader,
            "4",
            "prefs.language.set",
            json!({ "language": "fr" }),
        );
        assert_eq!(raw.get("ok").and_then(|v| v.as_bool()), Some(false));

        let hit = request_ok(&mut stdin, &mut reader, "5", "visitor.hit", json!({}));
        assert_eq!(hit.get("count").and_then(|v| v.as_i64()), Some(1));
        let hit = request_ok(&mut stdin, &mut reader, "6", "visitor.hit", json!({}));
        assert_eq!(hit.get("count").and_then(|v| v.as_i64()), Some(2));
    }

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let lang = request_ok(&mut stdin, &mut reader, "2", "prefs.language.get", json!({}));
    assert_eq!(lang.get("language").and_then(|v| v.as_str()), Some("bn"));
    let hit = request_ok(&mut stdin, &mut reader, "3", "visitor.hit", json!({}));
    assert_eq!(hit.get("count").and_then(|v| v.as_i64()), Some(3));
}

#[test]
fn unknown_methods_and_missing_workspace_are_reported() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // Store-backed methods need a workspace first.
    let raw = request(&mut stdin, &mut reader, "1", "students.list", json!({}));
    assert_eq!(
        raw.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|c| c.as_str()),
        Some("no_workspace")
    );

    let raw = request(&mut stdin, &mut reader, "2", "no.such.method", json!({}));
    assert_eq!(
        raw.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|c| c.as_str()),
        Some("not_implemented")
    );

    let health = request_ok(&mut stdin, &mut reader, "3", "health", json!({}));
    assert!(health.get("version").and_then(|v| v.as_str()).is_some());
}
