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

fn error_code(value: &serde_json::Value) -> &str {
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|c| c.as_str())
        .unwrap_or("")
}

fn sections_of(result: &serde_json::Value) -> Vec<String> {
    result
        .get("sections")
        .and_then(|v| v.as_array())
        .expect("sections array")
        .iter()
        .map(|s| s.as_str().expect("section string").to_string())
        .collect()
}

#[test]
fn each_role_sees_its_own_sections_with_dashboard_first() {
    let workspace = temp_dir("maktab-auth-roles");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let cases = [
        (
            "superadmin",
            "super123",
            vec![
                "dashboard",
                "students",
                "results",
                "donations",
                "accounts",
                "routine",
                "gallery",
                "feedback",
            ],
        ),
        (
            "content",
            "content123",
            vec!["dashboard", "routine", "gallery", "feedback"],
        ),
        (
            "finance",
            "finance123",
            vec!["dashboard", "donations", "accounts"],
        ),
        ("teacher", "teacher123", vec!["dashboard", "students", "results"]),
    ];

    for (i, (username, password, expected)) in cases.iter().enumerate() {
        let login = request_ok(
            &mut stdin,
            &mut reader,
            &format!("login-{}", i),
            "auth.login",
            json!({ "username": username, "password": password }),
        );
        assert_eq!(sections_of(&login), *expected, "sections for {}", username);
        assert_eq!(
            login.get("activeSection").and_then(|v| v.as_str()),
            Some("dashboard")
        );
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("logout-{}", i),
            "auth.logout",
            json!({}),
        );
    }
}

#[test]
fn bad_credentials_and_logged_out_sessions_are_denied() {
    let workspace = temp_dir("maktab-auth-denied");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let raw = request(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "username": "superadmin", "password": "wrong" }),
    );
    assert_eq!(error_code(&raw), "invalid_credentials");

    // No session: empty sections, no active section, and every gated method
    // fails closed.
    let session = request_ok(&mut stdin, &mut reader, "3", "auth.session", json!({}));
    assert_eq!(session.get("authenticated").and_then(|v| v.as_bool()), Some(false));
    assert!(sections_of(&session).is_empty());
    assert!(session.get("activeSection").map(|v| v.is_null()).unwrap_or(true));

    for (i, method) in [
        "students.list",
        "results.list",
        "donations.list",
        "accounts.summary",
        "feedback.list",
        "dashboard.stats",
    ]
    .iter()
    .enumerate()
    {
        let raw = request(
            &mut stdin,
            &mut reader,
            &format!("gate-{}", i),
            method,
            json!({}),
        );
        assert_eq!(error_code(&raw), "access_denied", "method {}", method);
    }
}

#[test]
fn section_gate_is_rechecked_at_dispatch_not_just_in_the_menu() {
    let workspace = temp_dir("maktab-auth-gate");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "username": "finance", "password": "finance123" }),
    );

    // finance-manager may reach donations/accounts but not students or
    // results, even when the section is named directly.
    let _ = request_ok(&mut stdin, &mut reader, "3", "donations.list", json!({}));
    let raw = request(&mut stdin, &mut reader, "4", "students.list", json!({}));
    assert_eq!(error_code(&raw), "access_denied");
    let raw = request(
        &mut stdin,
        &mut reader,
        "5",
        "auth.selectSection",
        json!({ "section": "students" }),
    );
    assert_eq!(error_code(&raw), "access_denied");

    let raw = request(
        &mut stdin,
        &mut reader,
        "6",
        "auth.selectSection",
        json!({ "section": "no-such-section" }),
    );
    assert_eq!(error_code(&raw), "bad_params");
}

#[test]
fn stale_active_section_resets_after_role_change() {
    let workspace = temp_dir("maktab-auth-stale");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "username": "finance", "password": "finance123" }),
    );
    let selected = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "auth.selectSection",
        json!({ "section": "donations" }),
    );
    assert_eq!(
        selected.get("activeSection").and_then(|v| v.as_str()),
        Some("donations")
    );

    // Same workspace, different role: the held selection is no longer
    // permitted and must deterministically land on the new default.
    let login = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "auth.login",
        json!({ "username": "content", "password": "content123" }),
    );
    assert_eq!(
        login.get("activeSection").and_then(|v| v.as_str()),
        Some("dashboard")
    );
    let session = request_ok(&mut stdin, &mut reader, "5", "auth.session", json!({}));
    assert_eq!(
        session.get("activeSection").and_then(|v| v.as_str()),
        Some("dashboard")
    );
}

#[test]
fn session_survives_a_daemon_restart() {
    let workspace = temp_dir("maktab-auth-restart");
    {
        let (_child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": workspace.to_string_lossy() }),
        );
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "2",
            "auth.login",
            json!({ "username": "teacher", "password": "teacher123" }),
        );
    }

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let session = request_ok(&mut stdin, &mut reader, "2", "auth.session", json!({}));
    assert_eq!(session.get("authenticated").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(session.get("role").and_then(|v| v.as_str()), Some("teacher"));
    assert_eq!(
        sections_of(&session),
        vec!["dashboard", "students", "results"]
    );
}
