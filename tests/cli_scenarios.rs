use std::path::Path;
use std::process::{Command, Output};

/// Run the `wp` binary against `db` from `cwd`, with an isolated config dir.
/// Stdout is a pipe, so terminal injection always degrades silently.
fn wp(db: &Path, cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wp"))
        .arg("--db")
        .arg(db)
        .args(args)
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd.join(".config-test"))
        .env_remove("WAYPOINT_DB")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wp")
}

fn stdout(out: &Output) -> String {
    String::from_utf8(out.stdout.clone()).unwrap()
}

#[test]
fn scenario_a_empty_store_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("waypoint.db");
    let out = wp(&db, dir.path(), &["ls"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "");
    assert!(db.exists(), "store should be created on first use");
}

#[test]
fn scenario_b_set_then_peek_prints_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let proj = dir.path().join("proj");
    std::fs::create_dir(&proj).unwrap();
    let proj = proj.canonicalize().unwrap();
    let db = dir.path().join("waypoint.db");

    let out = wp(&db, &proj, &["set", "proj"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "");

    let out = wp(&db, dir.path(), &["peek", "proj"]);
    assert_eq!(stdout(&out), format!("{}\n", proj.display()));
}

#[test]
fn scenario_c_reserved_name_without_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("waypoint.db");

    // stdin is not a terminal, so the override prompt declines.
    let out = wp(&db, dir.path(), &["set", "go"]);
    assert!(out.status.success());
    assert!(stdout(&out).starts_with("Unallowed waypoint name"));
    assert_eq!(std::fs::read_to_string(&db).unwrap(), "");

    let out = wp(&db, dir.path(), &["peek", "go"]);
    assert_eq!(stdout(&out), "No such waypoint!\n");
}

#[test]
fn scenario_d_existing_file_lists_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("waypoint.db");
    std::fs::write(&db, "a => /x\nb => /y\n").unwrap();

    let out = wp(&db, dir.path(), &["ls"]);
    assert_eq!(stdout(&out), "a\nb\n");
    let out = wp(&db, dir.path(), &["list"]);
    assert_eq!(stdout(&out), "a\nb\n");
    let out = wp(&db, dir.path(), &["peek", "b"]);
    assert_eq!(stdout(&out), "/y\n");
}

#[test]
fn scenario_e_malformed_line_is_a_clear_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("waypoint.db");
    std::fs::write(&db, "a => /x\nbadline\n").unwrap();

    let out = wp(&db, dir.path(), &["set", "c"]);
    assert!(!out.status.success());
    assert_eq!(stdout(&out), "");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("corrupt database"), "stderr: {stderr}");
    assert_eq!(std::fs::read_to_string(&db).unwrap(), "a => /x\nbadline\n");
}

#[test]
fn no_arguments_prints_hint() {
    let dir = tempfile::tempdir().unwrap();
    let out = wp(&dir.path().join("waypoint.db"), dir.path(), &[]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Confused? Run with 'help'.\n");
}

#[test]
fn shorthand_go_reports_found_even_without_a_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("waypoint.db");
    std::fs::write(&db, "home => /tmp\n").unwrap();

    let out = wp(&db, dir.path(), &["home"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "");

    let out = wp(&db, dir.path(), &["elsewhere"]);
    assert_eq!(stdout(&out), "No such waypoint!\n");
}

#[test]
fn emit_mode_prints_cd_payload() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("waypoint.db");
    std::fs::write(&db, "sp => /tmp/with space\n").unwrap();

    let out = wp(&db, dir.path(), &["--emit-cd", "sp"]);
    assert_eq!(stdout(&out), "__WP_CD__=/tmp/with space\n");
    let out = wp(&db, dir.path(), &["--emit-cd", "go", "sp"]);
    assert_eq!(stdout(&out), "__WP_CD__=/tmp/with space\n");
}

#[test]
fn rem_then_rem_again() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("waypoint.db");
    std::fs::write(&db, "a => /x\nb => /y\n").unwrap();

    assert_eq!(stdout(&wp(&db, dir.path(), &["rem", "a"])), "");
    assert_eq!(
        stdout(&wp(&db, dir.path(), &["rem", "a"])),
        "No such waypoint!\n"
    );
    assert_eq!(std::fs::read_to_string(&db).unwrap(), "b => /y\n");
}

#[test]
fn init_bash_prints_wrapper() {
    let dir = tempfile::tempdir().unwrap();
    let out = wp(&dir.path().join("waypoint.db"), dir.path(), &["--init-bash"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("wp() {"));
}
