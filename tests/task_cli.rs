mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestHome;

#[test]
fn add_writes_exact_blob() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();

    home.cmd()
        .args(["add", "Buy", "milk"])
        .assert()
        .success()
        .stdout(contains("Task added"))
        .stdout(contains("1. [ ] Buy milk"));

    assert_eq!(
        home.read_tasks().as_deref(),
        Some(r#"[{"text":"Buy milk","completed":false}]"#)
    );
    Ok(())
}

#[test]
fn add_trims_and_appends() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_tasks(r#"[{"text":"A","completed":true}]"#);

    home.cmd().args(["add", "  B  "]).assert().success();

    assert_eq!(
        home.read_tasks().as_deref(),
        Some(r#"[{"text":"A","completed":true},{"text":"B","completed":false}]"#)
    );
    Ok(())
}

#[test]
fn add_blank_is_user_error_and_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();

    home.cmd()
        .args(["add", "   "])
        .assert()
        .code(2)
        .stderr(contains("Please enter a task!"));
    assert_eq!(home.read_tasks(), None);

    let output = home.cmd().args(["--json", "add", ""]).output()?;
    assert_eq!(output.status.code(), Some(2));
    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["schema_version"], "taskbox.v1");
    assert_eq!(json["command"], "add");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 2);
    assert_eq!(json["error"]["kind"], "user_error");
    Ok(())
}

#[test]
fn list_shows_completed_first_when_stored_first() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_tasks(r#"[{"text":"A","completed":true},{"text":"B","completed":false}]"#);

    let output = home.cmd().arg("list").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let a = stdout.find("1. [x] A").expect("row for A");
    let b = stdout.find("2. [ ] B").expect("row for B");
    assert!(a < b);
    assert!(stdout.contains("- Open: 1"));
    assert!(stdout.contains("- Completed: 1"));
    Ok(())
}

#[test]
fn list_json_reports_positions_and_counts() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_tasks(r#"[{"text":"A","completed":true},{"text":"B","completed":false}]"#);

    let output = home.cmd().args(["--json", "list"]).output()?;
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["counts"]["completed"], 1);
    assert_eq!(json["data"]["tasks"][0]["position"], 1);
    assert_eq!(json["data"]["tasks"][0]["text"], "A");
    assert_eq!(json["data"]["tasks"][1]["completed"], false);
    assert!(json["data"].get("skipped").is_none());
    Ok(())
}

#[test]
fn corrupt_blob_lists_empty_with_warning() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_tasks("{not json");

    home.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("- Total: 0"))
        .stdout(contains("is not a task list"));

    // Listing never rewrites storage.
    assert_eq!(home.read_tasks().as_deref(), Some("{not json"));
    Ok(())
}

#[test]
fn malformed_elements_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_tasks(r#"[{"text":"keep"},{"text":"  "},42]"#);

    let output = home.cmd().args(["--json", "list"]).output()?;
    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["skipped"], 2);
    assert_eq!(json["warnings"][0], "skipped 2 malformed stored task(s)");
    Ok(())
}

#[test]
fn toggle_twice_restores_blob() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let seed = r#"[{"text":"A","completed":false},{"text":"B","completed":false}]"#;
    home.write_tasks(seed);

    home.cmd()
        .args(["toggle", "2"])
        .assert()
        .success()
        .stdout(contains("Task completed"));
    assert_eq!(
        home.read_tasks().as_deref(),
        Some(r#"[{"text":"A","completed":false},{"text":"B","completed":true}]"#)
    );

    home.cmd()
        .args(["done", "2"])
        .assert()
        .success()
        .stdout(contains("Task reopened"));
    assert_eq!(home.read_tasks().as_deref(), Some(seed));
    Ok(())
}

#[test]
fn rm_keeps_relative_order() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_tasks(
        r#"[{"text":"A","completed":false},{"text":"B","completed":true},{"text":"C","completed":false}]"#,
    );

    home.cmd()
        .args(["rm", "2"])
        .assert()
        .success()
        .stdout(contains("Task deleted"))
        .stdout(contains("2. [x] B"));

    assert_eq!(
        home.read_tasks().as_deref(),
        Some(r#"[{"text":"A","completed":false},{"text":"C","completed":false}]"#)
    );
    Ok(())
}

#[test]
fn bad_positions_are_user_errors() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_tasks(r#"[{"text":"A","completed":false}]"#);

    home.cmd()
        .args(["rm", "5"])
        .assert()
        .code(2)
        .stderr(contains("No task at position 5"))
        .stderr(contains("hint: taskbox list"));

    home.cmd()
        .args(["toggle", "0"])
        .assert()
        .code(2)
        .stderr(contains("positions start at 1"));

    let output = home.cmd().args(["--json", "edit", "3", "x"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["error"]["details"]["position"], 3);

    assert_eq!(
        home.read_tasks().as_deref(),
        Some(r#"[{"text":"A","completed":false}]"#)
    );
    Ok(())
}

#[test]
fn edit_replaces_text_or_reports_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_tasks(r#"[{"text":"Walk dog","completed":true}]"#);

    home.cmd()
        .args(["edit", "1", "Walk", "the", "dog"])
        .assert()
        .success()
        .stdout(contains("Task edited"));
    assert_eq!(
        home.read_tasks().as_deref(),
        Some(r#"[{"text":"Walk the dog","completed":true}]"#)
    );

    let output = home
        .cmd()
        .args(["--json", "edit", "1", " Walk the dog "])
        .output()?;
    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["data"]["changed"], false);

    home.cmd()
        .args(["edit", "1", "   "])
        .assert()
        .success()
        .stdout(contains("Task unchanged"));
    assert_eq!(
        home.read_tasks().as_deref(),
        Some(r#"[{"text":"Walk the dog","completed":true}]"#)
    );
    Ok(())
}

#[test]
fn config_key_selects_blob_file() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.write_config("[storage]\nkey = \"work\"\n");

    home.cmd().args(["add", "ship it"]).assert().success();
    assert!(home.path().join("work.json").exists());
    assert_eq!(home.read_tasks(), None);

    let output = home.cmd().args(["--json", "path"]).output()?;
    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["data"]["key"], "work");
    assert_eq!(json["data"]["config_exists"], true);
    assert!(json["data"]["blob_path"]
        .as_str()
        .unwrap_or_default()
        .ends_with("work.json"));
    Ok(())
}

#[test]
fn quiet_suppresses_human_output() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let output = home.cmd().args(["-q", "add", "silent"]).output()?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(home.read_tasks().is_some());
    Ok(())
}

#[test]
fn dir_flag_overrides_env() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let other = tempfile::tempdir()?;

    home.cmd()
        .arg("--dir")
        .arg(other.path())
        .args(["add", "elsewhere"])
        .assert()
        .success();

    assert_eq!(home.read_tasks(), None);
    assert!(other.path().join("tasks.json").exists());
    Ok(())
}

#[test]
fn unreadable_blob_is_reported_and_never_overwritten() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let garbage: &[u8] = &[0xff, 0xfe, b'[', b']'];
    std::fs::write(home.tasks_file(), garbage)?;

    home.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("- Total: 0"))
        .stdout(contains("could not be read"));

    home.cmd()
        .args(["add", "clobber"])
        .assert()
        .code(4)
        .stderr(contains("refusing to overwrite"));

    let output = home.cmd().args(["--json", "rm", "1"]).output()?;
    assert_eq!(output.status.code(), Some(4));

    assert_eq!(std::fs::read(home.tasks_file())?, garbage);
    Ok(())
}
