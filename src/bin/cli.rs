use polars::prelude::{AnyValue, DataFrame};
use reno_planner::{
    PlannerConfig, ProjectBook, ProjectPlan, ProjectTemplate, ScheduleDeriver, TemplateCatalog,
    WorkCalendar, load_plan_from_csv, load_plan_from_json, save_plan_to_csv, save_plan_to_json,
    plan::date_from_polars_days,
    schedule::{format_date, parse_date},
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Years of federal holidays loaded past the plan start for `counting working`.
const FEDERAL_HOLIDAY_YEARS: i32 = 10;

fn render_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Date(days) => date_from_polars_days(*days)
            .map(format_date)
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| render_cell(&av)).unwrap_or_default())
            .collect();
        rows.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_line = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_line(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_line(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  templates [category]               List templates, optionally for one category\n  categories                         List template categories\n  template <id>                      Show a template's tasks and documents\n  end <YYYY-MM-DD> <days>            Calculate an end date\n  plan <template_id> <YYYY-MM-DD> [name...]\n                                     Create a plan from a template\n  custom <start> <end> [name...]     Create a plan without a template\n  plans                              List plans created this session\n  show                               Show the current plan\n  counting <calendar|working>        Count offsets in calendar or working days\n  save <json|csv> <path>             Save the current plan to disk\n  load <json|csv> <path>             Load a plan from disk\n  db save                            Store the current plan in RENO_PLANNER_DB\n  db load <id>                       Load a stored plan\n  db list                            List stored plans\n  quit|exit                          Exit"
    );
}

fn print_templates<'a>(templates: impl IntoIterator<Item = &'a ProjectTemplate>) {
    let mut any = false;
    for template in templates {
        any = true;
        println!(
            "  {:<28} {:<12} {:>4}d  {}-{}  {}",
            template.id,
            template.category,
            template.estimated_duration,
            template.budget_range.min,
            template.budget_range.max,
            template.name
        );
    }
    if !any {
        println!("No templates found.");
    }
}

fn print_template(template: &ProjectTemplate) {
    println!("{} ({})", template.name, template.id);
    println!("  {}", template.description);
    println!(
        "  category={}, estimated_duration={}d, budget={}-{}",
        template.category,
        template.estimated_duration,
        template.budget_range.min,
        template.budget_range.max
    );
    println!("Tasks:");
    for (idx, task) in template.tasks.iter().enumerate() {
        println!(
            "  {:>2}. {:<36} {:<7} +{}d  [{}]",
            idx + 1,
            task.title,
            task.priority,
            task.estimated_days,
            task.category
        );
    }
    if !template.suggested_documents.is_empty() {
        println!("Suggested documents: {}", template.suggested_documents.join(", "));
    }
}

fn print_plan(plan: &ProjectPlan) {
    println!("{}", plan.summary().to_cli_summary());
    match plan.to_dataframe() {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering plan: {e}"),
    }
    let late = plan.tasks_past_end();
    if !late.is_empty() {
        println!(
            "Warning: {} task(s) are due after the project end date {}.",
            late.len(),
            plan.end_date
        );
    }
}

fn rest_of_line<'a>(parts: impl Iterator<Item = &'a str>, fallback: &str) -> String {
    let text = parts.collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(feature = "sqlite")]
fn handle_db_command<'a>(
    config: &PlannerConfig,
    mut parts: impl Iterator<Item = &'a str>,
    current: &mut Option<ProjectPlan>,
    book: &mut ProjectBook,
) {
    use reno_planner::{PlanStore, SqlitePlanStore};

    let Some(path) = config.database_path.as_ref() else {
        println!("Set RENO_PLANNER_DB to a SQLite file to use the plan store.");
        return;
    };
    let store = match SqlitePlanStore::new(path) {
        Ok(store) => store,
        Err(e) => {
            println!("Error opening plan store: {e}");
            return;
        }
    };

    match (parts.next(), parts.next()) {
        (Some("save"), _) => match current.as_ref() {
            Some(plan) => match store.save_plan(plan) {
                Ok(()) => println!("Stored plan {}.", plan.id),
                Err(e) => println!("Error storing plan: {e}"),
            },
            None => println!("No current plan. Use 'plan' or 'custom' first."),
        },
        (Some("load"), Some(id_s)) => match id_s.parse::<i32>() {
            Ok(id) => match store.load_plan(id) {
                Ok(Some(plan)) => {
                    book.insert(plan.clone());
                    print_plan(&plan);
                    *current = Some(plan);
                }
                Ok(None) => println!("Plan {id} not found."),
                Err(e) => println!("Error loading plan: {e}"),
            },
            Err(_) => println!("Invalid id"),
        },
        (Some("list"), _) => match store.list_plans() {
            Ok(summaries) if summaries.is_empty() => println!("No stored plans."),
            Ok(summaries) => {
                for summary in summaries {
                    println!("  {}", summary.to_cli_summary());
                }
            }
            Err(e) => println!("Error listing plans: {e}"),
        },
        _ => println!("Usage: db <save|load <id>|list>"),
    }
}

#[cfg(not(feature = "sqlite"))]
fn handle_db_command<'a>(
    _config: &PlannerConfig,
    _parts: impl Iterator<Item = &'a str>,
    _current: &mut Option<ProjectPlan>,
    _book: &mut ProjectBook,
) {
    println!("Rebuild with the `sqlite` feature to use the plan store.");
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    let catalog: TemplateCatalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error loading template catalog: {e}");
            std::process::exit(2);
        }
    };
    let work_calendar = match config.load_work_calendar() {
        Ok(calendar) => calendar,
        Err(e) => {
            eprintln!("Error loading work calendar: {e}");
            std::process::exit(2);
        }
    };
    let mut deriver = ScheduleDeriver::new();

    let mut book = ProjectBook::new();
    let mut current: Option<ProjectPlan> = None;

    println!(
        "Renovation Planner (CLI) - {} templates loaded, type 'help' for commands\n",
        catalog.len()
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "templates" => match parts.next() {
                Some(category) => print_templates(catalog.list_by_category(category)),
                None => print_templates(catalog.list_all()),
            },
            "categories" => {
                for category in catalog.categories() {
                    println!("  {category}");
                }
            }
            "template" => match parts.next() {
                Some(id) => match catalog.get_template(id) {
                    Some(template) => print_template(template),
                    None => println!("Template '{id}' not found."),
                },
                None => println!("Usage: template <id>"),
            },
            "end" => match (parts.next(), parts.next()) {
                (Some(start_s), Some(days_s)) => match days_s.parse::<i64>() {
                    Ok(days) => match deriver.calculate_end_date(start_s, days) {
                        Ok(end) => println!("End date: {end}"),
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(_) => println!("Invalid duration"),
                },
                _ => println!("Usage: end <YYYY-MM-DD> <days>"),
            },
            "plan" => match (parts.next(), parts.next()) {
                (Some(template_id), Some(start_s)) => {
                    let Some(template) = catalog.get_template(template_id) else {
                        println!("Template '{template_id}' not found.");
                        continue;
                    };
                    let start = match parse_date(start_s) {
                        Ok(date) => date,
                        Err(e) => {
                            println!("Error: {e}");
                            continue;
                        }
                    };
                    let name = rest_of_line(parts, &template.name);
                    match book.create_from_template(name, template, start, &deriver) {
                        Ok(plan) => {
                            println!("Created plan {} from '{}'.", plan.id, template.id);
                            print_plan(plan);
                            current = Some(plan.clone());
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: plan <template_id> <YYYY-MM-DD> [name...]"),
            },
            "custom" => match (parts.next(), parts.next()) {
                (Some(start_s), Some(end_s)) => {
                    let dates = parse_date(start_s).and_then(|s| parse_date(end_s).map(|e| (s, e)));
                    match dates {
                        Ok((start, end)) => {
                            let name = rest_of_line(parts, "Custom project");
                            match book.create_custom(name, start, end) {
                                Ok(plan) => {
                                    println!("Created plan {} without a template.", plan.id);
                                    print_plan(plan);
                                    current = Some(plan.clone());
                                }
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: custom <start> <end> [name...]"),
            },
            "plans" => {
                if book.is_empty() {
                    println!("No plans yet.");
                }
                for summary in book.summaries() {
                    println!("  {}", summary.to_cli_summary());
                }
            }
            "show" => match current.as_ref() {
                Some(plan) => print_plan(plan),
                None => println!("No current plan. Use 'plan' or 'custom' first."),
            },
            "counting" => match parts.next() {
                Some("calendar") => {
                    deriver = ScheduleDeriver::new();
                    println!("Counting calendar days.");
                }
                Some("working") => match work_calendar.clone() {
                    Some(calendar) => {
                        deriver = ScheduleDeriver::with_work_calendar(calendar);
                        println!("Counting working days from RENO_PLANNER_CALENDAR.");
                    }
                    None => {
                        let year = current
                            .as_ref()
                            .map(|plan| chrono::Datelike::year(&plan.start_date))
                            .unwrap_or(2025);
                        let last = year + FEDERAL_HOLIDAY_YEARS;
                        deriver = ScheduleDeriver::with_work_calendar(
                            WorkCalendar::with_year_range(year, last),
                        );
                        println!(
                            "Counting working days (Mon-Fri, US federal holidays {year}-{last}; later holidays are not skipped)."
                        );
                    }
                },
                _ => println!("Usage: counting <calendar|working>"),
            },
            "save" => match (parts.next(), parts.next(), current.as_ref()) {
                (_, _, None) => println!("No current plan. Use 'plan' or 'custom' first."),
                (Some(fmt), Some(path), Some(plan)) => {
                    let result = match fmt {
                        "json" => save_plan_to_json(plan, path),
                        "csv" => save_plan_to_csv(plan, path),
                        _ => {
                            println!("Unknown format '{fmt}'. Use json or csv.");
                            continue;
                        }
                    };
                    match result {
                        Ok(()) => println!("Plan saved to {path}."),
                        Err(e) => println!("Error saving plan: {e}"),
                    }
                }
                _ => println!("Usage: save <json|csv> <path>"),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some(fmt), Some(path)) => {
                    let result = match fmt {
                        "json" => load_plan_from_json(path),
                        "csv" => load_plan_from_csv(path),
                        _ => {
                            println!("Unknown format '{fmt}'. Use json or csv.");
                            continue;
                        }
                    };
                    match result {
                        Ok(plan) => {
                            println!("Plan loaded from {path}.");
                            book.insert(plan.clone());
                            print_plan(&plan);
                            current = Some(plan);
                        }
                        Err(e) => println!("Error loading plan: {e}"),
                    }
                }
                _ => println!("Usage: load <json|csv> <path>"),
            },
            "db" => handle_db_command(&config, parts, &mut current, &mut book),
            _ => println!("Unknown command '{cmd}'. Type 'help' for commands."),
        }
    }
}
