use chrono::{Datelike, NaiveDate, Weekday};
use reno_planner::catalog;
use reno_planner::schedule::{format_date, parse_date};
use reno_planner::{
    BudgetRange, DayCounting, ProjectTemplate, ScheduleDeriver, ScheduleError, TaskBlueprint,
    TaskPriority, TaskStatus, WorkCalendar, calculate_end_date, generate_tasks_from_template,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn three_step_template() -> ProjectTemplate {
    let mut template = ProjectTemplate::new(
        "three-step",
        "Three step job",
        "renovation",
        30,
        BudgetRange::new(1_000, 2_000),
    );
    template.tasks = vec![
        TaskBlueprint::new("Design", "Sketch the layout", TaskPriority::High, 7, "planning"),
        TaskBlueprint::new("Permits", "File paperwork", TaskPriority::Urgent, 14, "permits"),
        TaskBlueprint::new("Demolition", "Strip it out", TaskPriority::Medium, 3, "demolition"),
    ];
    template
}

#[test]
fn end_date_adds_calendar_days() {
    assert_eq!(calculate_end_date("2025-01-01", 60).unwrap(), "2025-03-02");
    assert_eq!(calculate_end_date("2025-01-01", 30).unwrap(), "2025-01-31");
}

#[test]
fn end_date_crosses_leap_day() {
    assert_eq!(calculate_end_date("2024-01-01", 60).unwrap(), "2024-03-01");
    assert_eq!(calculate_end_date("2024-02-28", 1).unwrap(), "2024-02-29");
    assert_eq!(calculate_end_date("2025-02-28", 1).unwrap(), "2025-03-01");
}

#[test]
fn end_date_crosses_year_boundary() {
    assert_eq!(calculate_end_date("2024-12-25", 10).unwrap(), "2025-01-04");
}

#[test]
fn zero_duration_is_identity() {
    for start in ["2025-01-01", "2024-02-29", "1999-12-31"] {
        assert_eq!(calculate_end_date(start, 0).unwrap(), start);
    }
}

#[test]
fn end_date_output_is_zero_padded() {
    assert_eq!(calculate_end_date("0999-01-01", 9).unwrap(), "0999-01-10");
}

#[test]
fn negative_duration_is_rejected() {
    assert_eq!(
        calculate_end_date("2025-01-01", -1),
        Err(ScheduleError::InvalidDuration { days: -1 })
    );
}

#[test]
fn malformed_start_is_rejected() {
    for input in [
        "2025/01/01",
        "2025-02-30",
        "tomorrow",
        "",
        "2025-1-1",
        "+2025-01-01",
    ] {
        assert!(
            matches!(
                calculate_end_date(input, 5),
                Err(ScheduleError::InvalidDate { .. })
            ),
            "{input:?} should be an invalid date"
        );
    }
}

#[test]
fn tasks_chain_cumulatively() {
    let tasks = generate_tasks_from_template(&three_step_template(), "2025-01-01").unwrap();
    let due: Vec<String> = tasks.iter().map(|t| format_date(t.due_date)).collect();
    assert_eq!(due, vec!["2025-01-08", "2025-01-22", "2025-01-25"]);
}

#[test]
fn tasks_copy_blueprint_fields_and_start_pending() {
    let template = three_step_template();
    let tasks = generate_tasks_from_template(&template, "2025-01-01").unwrap();
    assert_eq!(tasks.len(), template.tasks.len());
    for (task, blueprint) in tasks.iter().zip(&template.tasks) {
        assert_eq!(task.title, blueprint.title);
        assert_eq!(task.description, blueprint.description);
        assert_eq!(task.priority, blueprint.priority);
        assert_eq!(task.status, TaskStatus::Pending);
    }
}

#[test]
fn due_dates_are_prefix_sums_for_every_builtin_template() {
    let start = d(2025, 3, 15);
    let deriver = ScheduleDeriver::new();
    for template in catalog::list_all() {
        let tasks = deriver.derive_tasks(template, start).unwrap();
        assert_eq!(tasks.len(), template.tasks.len(), "{}", template.id);

        let mut running = 0;
        for (task, blueprint) in tasks.iter().zip(&template.tasks) {
            running += blueprint.estimated_days;
            assert_eq!(
                (task.due_date - start).num_days(),
                running,
                "{} / {}",
                template.id,
                blueprint.title
            );
        }
        if let Some(last) = tasks.last() {
            assert_eq!((last.due_date - start).num_days(), template.total_task_days());
        }
    }
}

#[test]
fn due_dates_never_decrease() {
    for template in catalog::list_all() {
        let tasks = generate_tasks_from_template(template, "2025-06-01").unwrap();
        assert!(
            tasks.windows(2).all(|pair| pair[0].due_date <= pair[1].due_date),
            "{} produced decreasing due dates",
            template.id
        );
    }
}

#[test]
fn zero_day_task_shares_previous_due_date() {
    let roof = catalog::get_template("roof-replacement").unwrap();
    let tasks = generate_tasks_from_template(roof, "2025-04-01").unwrap();
    let idx = roof
        .tasks
        .iter()
        .position(|t| t.estimated_days == 0)
        .expect("roof template has a zero-day task");
    let previous = if idx == 0 {
        d(2025, 4, 1)
    } else {
        tasks[idx - 1].due_date
    };
    assert_eq!(tasks[idx].due_date, previous);
}

#[test]
fn template_without_tasks_yields_empty_list() {
    let empty = ProjectTemplate::new("empty", "Empty", "misc", 3, BudgetRange::new(0, 0));
    assert!(generate_tasks_from_template(&empty, "2025-01-01").unwrap().is_empty());
}

#[test]
fn generation_is_idempotent() {
    let kitchen = catalog::get_template("kitchen-renovation").unwrap();
    let first = generate_tasks_from_template(kitchen, "2025-01-01").unwrap();
    let second = generate_tasks_from_template(kitchen, "2025-01-01").unwrap();
    assert_eq!(first, second);
}

#[test]
fn generation_rejects_bad_start() {
    let kitchen = catalog::get_template("kitchen-renovation").unwrap();
    assert_eq!(
        generate_tasks_from_template(kitchen, "01-01-2025"),
        Err(ScheduleError::InvalidDate {
            input: "01-01-2025".to_string()
        })
    );
}

#[test]
fn generation_rejects_negative_offsets() {
    let mut template = three_step_template();
    template.tasks[1].estimated_days = -4;
    assert_eq!(
        generate_tasks_from_template(&template, "2025-01-01"),
        Err(ScheduleError::InvalidDuration { days: -4 })
    );
}

#[test]
fn kitchen_last_task_lands_48_days_out() {
    let kitchen = catalog::get_template("kitchen-renovation").unwrap();
    let tasks = generate_tasks_from_template(kitchen, "2025-01-01").unwrap();
    assert_eq!(tasks[0].due_date, d(2025, 1, 8));
    assert_eq!(tasks.last().unwrap().due_date, d(2025, 2, 18));
}

#[test]
fn working_day_mode_skips_weekends_and_holidays() {
    let deriver = ScheduleDeriver::with_work_calendar(WorkCalendar::with_year_range(2025, 2025));
    assert!(matches!(deriver.counting(), DayCounting::WorkingDays(_)));

    // Friday 2025-01-03 plus one working day is Monday.
    assert_eq!(deriver.end_date(d(2025, 1, 3), 1).unwrap(), d(2025, 1, 6));
    // 2025-01-17 is a Friday; MLK day (01-20) is skipped.
    assert_eq!(deriver.end_date(d(2025, 1, 17), 1).unwrap(), d(2025, 1, 21));
    assert_eq!(deriver.end_date(d(2025, 1, 4), 0).unwrap(), d(2025, 1, 4));
}

#[test]
fn working_day_tasks_fall_on_working_days() {
    let calendar = WorkCalendar::with_year_range(2025, 2026);
    let deriver = ScheduleDeriver::with_work_calendar(calendar.clone());
    let tasks = deriver
        .generate_tasks_from_template(&three_step_template(), "2025-01-01")
        .unwrap();
    // 7 working days after New Year's Day: Jan 2,3,6,7,8,9,10.
    assert_eq!(tasks[0].due_date, d(2025, 1, 10));
    for task in &tasks {
        assert!(calendar.is_available(task.due_date));
        assert!(!matches!(task.due_date.weekday(), Weekday::Sat | Weekday::Sun));
    }
}

#[test]
fn custom_working_week_counts_saturdays() {
    let calendar = WorkCalendar::custom(
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ],
        Vec::<NaiveDate>::new(),
    )
    .unwrap();
    let deriver = ScheduleDeriver::with_work_calendar(calendar);
    assert_eq!(
        deriver.calculate_end_date("2025-01-03", 1).unwrap(),
        "2025-01-04"
    );
}

#[test]
fn parse_and_format_agree() {
    let date = parse_date("2025-07-04").unwrap();
    assert_eq!(date, d(2025, 7, 4));
    assert_eq!(format_date(date), "2025-07-04");
}
