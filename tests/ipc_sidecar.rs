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

fn spawn_sidecar(storage: &PathBuf) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_rosterd");
    let mut child = Command::new(exe)
        .arg("--storage")
        .arg(storage)
        .arg("--latency-ms")
        .arg("0")
        .arg("--seed")
        .arg("1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn rosterd");
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
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

#[test]
fn sidecar_roster_session_roundtrip() {
    let workspace = temp_dir("rosterd-session");
    let db = workspace.join("roster.sqlite3");
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&db);

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["latencyMs"], 0);
    assert_eq!(health["demoAuth"], true);

    let denied = request(&mut stdin, &mut reader, "2", "students.list", json!({}));
    assert_eq!(error_code(&denied), "not_authenticated");

    let login = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "auth.login",
        json!({ "email": "one@one.com", "password": "x" }),
    );
    assert_eq!(login["user"]["email"], "one@one.com");

    let listed = request_ok(&mut stdin, &mut reader, "4", "students.list", json!({}));
    assert_eq!(listed["total"], 15);
    assert_eq!(listed["students"][0]["name"], "Alex Brown");

    let filtered = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "students.list",
        json!({ "query": { "courseFilter": "computer science", "searchTerm": "john" } }),
    );
    let names: Vec<&str> = filtered["students"]
        .as_array()
        .expect("students array")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["John Doe"]);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "students.create",
        json!({ "student": { "name": "Zoe", "email": "zoe@x.com", "course": "custom", "customCourse": "Astronomy" } }),
    );
    assert_eq!(created["status"], 201);
    assert_eq!(created["student"]["id"], 16);
    assert_eq!(created["student"]["course"], "Astronomy");
    assert_eq!(created["student"]["grade"], "C+");
    assert_eq!(created["student"]["performance"], 75);

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "students.update",
        json!({
            "id": 16,
            "patch": { "performance": 91 },
            "activity": { "description": "Observatory night", "date": "2023-10-01" }
        }),
    );
    assert_eq!(updated["student"]["grade"], "A");
    assert_eq!(
        updated["student"]["activities"][0]["description"],
        "Observatory night"
    );
    assert_eq!(
        updated["student"]["activities"][1]["description"],
        "Completed enrollment"
    );

    let missing = request(
        &mut stdin,
        &mut reader,
        "8",
        "students.delete",
        json!({ "id": 9999 }),
    );
    assert_eq!(error_code(&missing), "not_found");
    assert_eq!(missing["error"]["details"]["status"], 404);

    let bad = request(
        &mut stdin,
        &mut reader,
        "9",
        "students.create",
        json!({ "student": { "name": "", "email": "x", "course": "Art" } }),
    );
    assert_eq!(error_code(&bad), "validation_failed");

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "students.delete",
        json!({ "id": 1 }),
    );
    assert_eq!(deleted["message"], "Student deleted successfully");
    assert_eq!(deleted["student"]["name"], "John Doe");

    let unknown = request(&mut stdin, &mut reader, "11", "students.archive", json!({}));
    assert_eq!(error_code(&unknown), "not_implemented");

    drop(stdin);
    let _ = child.wait();

    // Restart over the same file: changes survive and the demo user is remembered.
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&db);
    let current = request_ok(&mut stdin, &mut reader, "1", "auth.current", json!({}));
    assert_eq!(current["user"]["email"], "one@one.com");
    let listed = request_ok(&mut stdin, &mut reader, "2", "students.list", json!({}));
    assert_eq!(listed["total"], 15);
    let ids: Vec<i64> = listed["students"]
        .as_array()
        .expect("students array")
        .iter()
        .filter_map(|s| s["id"].as_i64())
        .collect();
    assert!(!ids.contains(&1));
    assert!(ids.contains(&16));

    let reset = request_ok(&mut stdin, &mut reader, "3", "students.reset", json!({}));
    assert_eq!(reset["students"].as_array().map(|a| a.len()), Some(15));
    assert_eq!(reset["students"][0]["name"], "John Doe");

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn sidecar_helpers_theme_grades_and_sorting() {
    let workspace = temp_dir("rosterd-helpers");
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&workspace.join("roster.sqlite3"));

    let theme = request_ok(&mut stdin, &mut reader, "1", "theme.get", json!({}));
    assert_eq!(theme["theme"], "light");
    let theme = request_ok(&mut stdin, &mut reader, "2", "theme.toggle", json!({}));
    assert_eq!(theme["theme"], "dark");
    let theme = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "theme.set",
        json!({ "theme": "light" }),
    );
    assert_eq!(theme["theme"], "light");

    let g = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "grades.fromPerformance",
        json!({ "performance": 84 }),
    );
    assert_eq!(g["grade"], "B+");
    assert_eq!(g["band"], "b");
    let p = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "grades.toPerformance",
        json!({ "grade": "Z" }),
    );
    assert_eq!(p["performance"], 75);

    request_ok(&mut stdin, &mut reader, "6", "auth.demoLogin", json!({}));
    let sorted = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "students.sort",
        json!({ "key": "performance" }),
    );
    assert_eq!(sorted["query"]["sortDirection"], "ascending");
    assert_eq!(sorted["students"][0]["name"], "Liam Garcia");
    let sorted = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "students.sort",
        json!({ "key": "performance" }),
    );
    assert_eq!(sorted["query"]["sortDirection"], "descending");
    assert_eq!(sorted["students"][0]["name"], "Olivia Martin");

    let options = request_ok(&mut stdin, &mut reader, "9", "courses.options", json!({}));
    assert_eq!(options["courses"].as_array().map(|a| a.len()), Some(20));

    let bad = request(&mut stdin, &mut reader, "10", "students.delete", json!({}));
    assert_eq!(error_code(&bad), "bad_params");

    request_ok(&mut stdin, &mut reader, "11", "auth.logout", json!({}));
    let denied = request(&mut stdin, &mut reader, "12", "courses.list", json!({}));
    assert_eq!(error_code(&denied), "not_authenticated");

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
