use crate::template::ProjectTemplate;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateValidationError {
    #[error("template id must not be blank")]
    BlankId,
    #[error("duplicate template id '{0}'")]
    DuplicateId(String),
    #[error("template '{id}' has negative estimated_duration {days}")]
    NegativeDuration { id: String, days: i64 },
    #[error("template '{id}' budget range is inverted (min {min} > max {max})")]
    InvertedBudget { id: String, min: i64, max: i64 },
    #[error("template '{id}' task #{index} has a blank title")]
    BlankTaskTitle { id: String, index: usize },
    #[error("template '{id}' task '{title}' has negative estimated_days {days}")]
    NegativeTaskDays { id: String, title: String, days: i64 },
}

pub fn validate_template(template: &ProjectTemplate) -> Result<(), TemplateValidationError> {
    if template.id.trim().is_empty() {
        return Err(TemplateValidationError::BlankId);
    }

    if template.estimated_duration < 0 {
        return Err(TemplateValidationError::NegativeDuration {
            id: template.id.clone(),
            days: template.estimated_duration,
        });
    }

    let budget = template.budget_range;
    if budget.min > budget.max {
        return Err(TemplateValidationError::InvertedBudget {
            id: template.id.clone(),
            min: budget.min,
            max: budget.max,
        });
    }

    for (index, task) in template.tasks.iter().enumerate() {
        if task.title.trim().is_empty() {
            return Err(TemplateValidationError::BlankTaskTitle {
                id: template.id.clone(),
                index,
            });
        }
        if task.estimated_days < 0 {
            return Err(TemplateValidationError::NegativeTaskDays {
                id: template.id.clone(),
                title: task.title.clone(),
                days: task.estimated_days,
            });
        }
    }

    Ok(())
}

pub fn validate_template_collection(
    templates: &[ProjectTemplate],
) -> Result<(), TemplateValidationError> {
    let mut seen_ids = HashSet::with_capacity(templates.len());
    for template in templates {
        if !seen_ids.insert(template.id.as_str()) {
            return Err(TemplateValidationError::DuplicateId(template.id.clone()));
        }
        validate_template(template)?;
    }
    Ok(())
}
