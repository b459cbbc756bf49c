#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("RENO_PLANNER_CATALOG")
        .env_remove("RENO_PLANNER_CALENDAR")
        .env_remove("RENO_PLANNER_DB")
        .write_stdin(script.to_string())
        .assert()
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn cli_lists_templates_by_category() {
    let assert = run_cli("templates maintenance\nquit\n").success();
    let output = stdout_of(&assert);
    assert!(output.contains("roof-replacement"));
    assert!(output.contains("exterior-painting"));
    assert!(!output.contains("kitchen-renovation"));
}

#[test]
fn cli_reports_unknown_template() {
    run_cli("template nonexistent\nquit\n")
        .success()
        .stdout(str_contains("Template 'nonexistent' not found."));
}

#[test]
fn cli_calculates_end_dates() {
    run_cli("end 2024-01-01 60\nquit\n")
        .success()
        .stdout(str_contains("End date: 2024-03-01"));
    run_cli("end 2024-01-01 -5\nquit\n")
        .success()
        .stdout(str_contains("Error: invalid duration -5"));
    run_cli("end 2024/01/01 5\nquit\n")
        .success()
        .stdout(str_contains("Error: invalid date '2024/01/01'"));
}

#[test]
fn cli_plan_shows_cumulative_due_dates() {
    let assert = run_cli("plan kitchen-renovation 2025-01-01 Smith kitchen\nquit\n").success();
    let output = stdout_of(&assert);
    assert!(output.contains("Created plan 1 from 'kitchen-renovation'."));
    assert!(output.contains("name=Smith kitchen"));
    assert!(output.contains("end=2025-03-02"));
    assert!(output.contains("| Design and planning"));
    assert!(output.contains("2025-01-08"));
    assert!(output.contains("2025-01-22"));
    assert!(output.contains("2025-02-18"));
}

#[test]
fn cli_custom_plan_validates_dates() {
    run_cli("custom 2025-01-10 2025-01-01 Backwards\nquit\n")
        .success()
        .stdout(str_contains("must be on or before project end date"));
    run_cli("custom 2025-01-01 2025-01-10 Shed build\nplans\nquit\n")
        .success()
        .stdout(str_contains("id=1, name=Shed build"));
}

#[test]
fn cli_working_day_counting() {
    run_cli("counting working\nend 2025-01-03 1\nquit\n")
        .success()
        .stdout(str_contains("End date: 2025-01-06"));
}

#[test]
fn cli_working_day_counting_reports_holiday_years() {
    run_cli("plan kitchen-renovation 2026-03-02\ncounting working\nquit\n")
        .success()
        .stdout(str_contains("US federal holidays 2026-2036"));
}

#[test]
#[allow(deprecated)]
fn cli_counts_calendar_days_even_with_a_calendar_configured() {
    let mut calendar = NamedTempFile::new().expect("create temp calendar");
    std::io::Write::write_all(
        &mut calendar,
        br#"{"working_days": ["Mon", "Tue"], "holidays": []}"#,
    )
    .expect("write calendar");

    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    let assert = cmd
        .env_remove("RENO_PLANNER_CATALOG")
        .env_remove("RENO_PLANNER_DB")
        .env("RENO_PLANNER_CALENDAR", calendar.path())
        .write_stdin("end 2025-01-03 1\ncounting working\nend 2025-01-03 1\nquit\n")
        .assert()
        .success();
    let output = stdout_of(&assert);
    let (before, after) = output
        .split_once("Counting working days from RENO_PLANNER_CALENDAR.")
        .expect("working-day mode announced");
    assert!(before.contains("End date: 2025-01-04"));
    assert!(after.contains("End date: 2025-01-06"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "plan bathroom-renovation 2025-01-06 Upstairs bath\nsave json {path}\ncustom 2025-02-01 2025-02-02 Temp\nload json {path}\nshow\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = stdout_of(&assert);
    assert!(output.contains(&format!("Plan saved to {path}.")));
    assert!(output.contains(&format!("Plan loaded from {path}.")));
    let after_reload = output
        .split("Plan loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("name=Upstairs bath"));
    assert!(!after_reload.contains("name=Temp"));
}

#[test]
fn cli_save_and_load_csv_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "plan roof-replacement 2025-05-05\nsave csv {path}\nload csv {path}\nquit\n"
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Plan loaded from"))
        .stdout(str_contains("template=roof-replacement"));
}

#[test]
fn cli_show_without_plan_hints() {
    run_cli("show\nquit\n")
        .success()
        .stdout(str_contains("No current plan."));
}

#[test]
fn cli_unknown_command_is_reported() {
    run_cli("frobnicate\nquit\n")
        .success()
        .stdout(str_contains("Unknown command 'frobnicate'."));
}

#[cfg(feature = "sqlite")]
#[test]
#[allow(deprecated)]
fn cli_stores_plans_in_sqlite() {
    let db = NamedTempFile::new().expect("create temp db");
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    let assert = cmd
        .env_remove("RENO_PLANNER_CATALOG")
        .env_remove("RENO_PLANNER_CALENDAR")
        .env("RENO_PLANNER_DB", db.path())
        .write_stdin("plan exterior-painting 2025-06-02\ndb save\ndb list\nquit\n")
        .assert()
        .success();
    let output = stdout_of(&assert);
    assert!(output.contains("Stored plan 1."));
    assert!(output.contains("id=1, name=Exterior Painting"));
}
