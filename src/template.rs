use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            other => Err(format!("unknown task priority '{other}'")),
        }
    }
}

/// Advisory cost bracket for a template. Never enforced against real budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: i64,
    pub max: i64,
}

impl BudgetRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

/// One task definition inside a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBlueprint {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    /// Days after the previous task's due date (or the project start for the
    /// first task).
    pub estimated_days: i64,
    pub category: String,
}

impl TaskBlueprint {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: TaskPriority,
        estimated_days: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            estimated_days,
            category: category.into(),
        }
    }
}

/// A named, reusable description of a typical renovation or maintenance
/// project: its tasks in execution order, a rough duration and a budget
/// bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub category: String,
    /// Overall expected project length in calendar days.
    pub estimated_duration: i64,
    pub budget_range: BudgetRange,
    pub tasks: Vec<TaskBlueprint>,
    #[serde(default)]
    pub suggested_documents: Vec<String>,
}

impl ProjectTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        estimated_duration: i64,
        budget_range: BudgetRange,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            category: category.into(),
            estimated_duration,
            budget_range,
            tasks: Vec::new(),
            suggested_documents: Vec::new(),
        }
    }

    /// Sum of every blueprint offset; the distance between the project start
    /// and the last derived due date.
    pub fn total_task_days(&self) -> i64 {
        self.tasks.iter().map(|task| task.estimated_days).sum()
    }

    pub fn task_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for task in &self.tasks {
            if !categories.contains(&task.category.as_str()) {
                categories.push(task.category.as_str());
            }
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("URGENT".parse::<TaskPriority>(), Ok(TaskPriority::Urgent));
        assert_eq!(" medium ".parse::<TaskPriority>(), Ok(TaskPriority::Medium));
        assert!("critical".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn priority_serializes_lowercase() {
        let json = serde_json::to_string(&TaskPriority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn task_categories_keep_first_seen_order() {
        let mut template =
            ProjectTemplate::new("t", "T", "renovation", 10, BudgetRange::new(0, 1));
        template.tasks = vec![
            TaskBlueprint::new("a", "", TaskPriority::Low, 1, "planning"),
            TaskBlueprint::new("b", "", TaskPriority::Low, 1, "permits"),
            TaskBlueprint::new("c", "", TaskPriority::Low, 1, "planning"),
        ];
        assert_eq!(template.task_categories(), vec!["planning", "permits"]);
        assert_eq!(template.total_task_days(), 3);
    }
}
