use chrono::NaiveDate;
use reno_planner::{
    PersistenceError, ProjectPlan, ScheduleDeriver, TaskStatus, TemplateCatalog,
    load_plan_from_csv, load_plan_from_json, save_plan_to_csv, save_plan_to_json, validate_plan,
};
use std::fs;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_sample_plan() -> ProjectPlan {
    let bathroom = TemplateCatalog::builtin()
        .get_template("bathroom-renovation")
        .unwrap();
    let mut plan = ProjectPlan::from_template(
        3,
        "Upstairs bath, \"phase 1\"",
        bathroom,
        d(2025, 1, 6),
        &ScheduleDeriver::new(),
    )
    .unwrap();
    plan.tasks[0].status = TaskStatus::Completed;
    plan.tasks[1].status = TaskStatus::InProgress;
    plan.tasks[2].description = "Remove tile,\nfixtures and vanity".into();
    plan
}

#[test]
fn json_round_trip_preserves_plan() {
    let plan = build_sample_plan();
    let tmp = NamedTempFile::new().unwrap();
    save_plan_to_json(&plan, tmp.path()).unwrap();

    let loaded = load_plan_from_json(tmp.path()).unwrap();
    assert_eq!(loaded, plan);
}

#[test]
fn csv_round_trip_preserves_plan() {
    let plan = build_sample_plan();
    let tmp = NamedTempFile::new().unwrap();
    save_plan_to_csv(&plan, tmp.path()).unwrap();

    let loaded = load_plan_from_csv(tmp.path()).unwrap();
    assert_eq!(loaded, plan);
}

#[test]
fn custom_plan_without_tasks_survives_both_formats() {
    let plan = ProjectPlan::custom(9, "Attic insulation", d(2025, 10, 1), d(2025, 10, 15)).unwrap();
    let json = NamedTempFile::new().unwrap();
    let csv = NamedTempFile::new().unwrap();
    save_plan_to_json(&plan, json.path()).unwrap();
    save_plan_to_csv(&plan, csv.path()).unwrap();

    assert_eq!(load_plan_from_json(json.path()).unwrap(), plan);
    assert_eq!(load_plan_from_csv(csv.path()).unwrap(), plan);
}

#[test]
fn json_snapshot_is_versioned() {
    let plan = build_sample_plan();
    let tmp = NamedTempFile::new().unwrap();
    save_plan_to_json(&plan, tmp.path()).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(tmp.path()).unwrap()).unwrap();
    assert_eq!(raw["version"], 1);
    assert_eq!(raw["plan"]["tasks"][0]["status"], "completed");
    assert_eq!(raw["plan"]["tasks"][0]["due_date"], "2025-01-11");
}

#[test]
fn unknown_snapshot_version_is_rejected() {
    let plan = build_sample_plan();
    let tmp = NamedTempFile::new().unwrap();
    save_plan_to_json(&plan, tmp.path()).unwrap();
    let bumped = fs::read_to_string(tmp.path())
        .unwrap()
        .replacen("\"version\": 1", "\"version\": 2", 1);
    fs::write(tmp.path(), bumped).unwrap();

    let err = load_plan_from_json(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn csv_rows_are_reordered_by_position() {
    let plan = build_sample_plan();
    let tmp = NamedTempFile::new().unwrap();
    save_plan_to_csv(&plan, tmp.path()).unwrap();

    let contents = fs::read_to_string(tmp.path()).unwrap();
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let mut rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    // Keep the plan row first and reverse the task rows.
    rows[1..].reverse();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers).unwrap();
    for row in &rows {
        writer.write_record(row).unwrap();
    }
    fs::write(tmp.path(), writer.into_inner().unwrap()).unwrap();

    let loaded = load_plan_from_csv(tmp.path()).unwrap();
    assert_eq!(loaded.tasks, plan.tasks);
}

#[test]
fn csv_without_plan_row_is_rejected() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(
        tmp.path(),
        "position,title,description,priority,due_date,status,plan_json\n\
         1,Design,Sketch,high,2025-01-08,pending,\n",
    )
    .unwrap();
    let err = load_plan_from_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(msg) if msg.contains("no plan row")));
}

#[test]
fn csv_with_unknown_priority_is_rejected() {
    let plan = ProjectPlan::custom(1, "Porch", d(2025, 1, 1), d(2025, 1, 31)).unwrap();
    let tmp = NamedTempFile::new().unwrap();
    save_plan_to_csv(&plan, tmp.path()).unwrap();
    let mut contents = fs::read_to_string(tmp.path()).unwrap();
    contents.push_str("1,Sand,Sand boards,critical,2025-01-05,pending,\n");
    fs::write(tmp.path(), contents).unwrap();

    let err = load_plan_from_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn invalid_plans_are_not_written() {
    let mut plan = build_sample_plan();
    plan.tasks.swap(0, 3);
    assert!(validate_plan(&plan).is_err());

    let tmp = NamedTempFile::new().unwrap();
    let err = save_plan_to_json(&plan, tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));

    let mut blank = build_sample_plan();
    blank.name = "   ".into();
    assert!(matches!(
        save_plan_to_csv(&blank, tmp.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_plan_from_json(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}
