//! Read-only collection of project templates.
//!
//! The catalog is built once (from the built-in set or a JSON file), validated,
//! and never mutated afterwards, so a single instance can be shared freely
//! between threads.

mod builtin;

use crate::template::ProjectTemplate;
use crate::template_validation::{self, TemplateValidationError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::info;

static BUILTIN: LazyLock<TemplateCatalog> = LazyLock::new(|| TemplateCatalog {
    templates: builtin::templates(),
});

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("catalog json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog: {0}")]
    Invalid(#[from] TemplateValidationError),
}

#[derive(Serialize, Deserialize)]
struct CatalogDocument {
    templates: Vec<ProjectTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: Vec<ProjectTemplate>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl TemplateCatalog {
    /// The renovation templates shipped with the crate.
    pub fn builtin() -> &'static TemplateCatalog {
        &BUILTIN
    }

    pub fn from_templates(templates: Vec<ProjectTemplate>) -> Result<Self, CatalogError> {
        template_validation::validate_template_collection(&templates)?;
        Ok(Self { templates })
    }

    /// Parse a catalog document of the form `{"templates": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_templates(document.templates)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let document: CatalogDocument = serde_json::from_reader(file)?;
        let catalog = Self::from_templates(document.templates)?;
        info!(
            path = %path.display(),
            templates = catalog.len(),
            "loaded template catalog"
        );
        Ok(catalog)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        let document = CatalogDocument {
            templates: self.templates.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Exact, case-sensitive id lookup. `None` means "no template", which
    /// callers treat as a custom project.
    pub fn get_template(&self, id: &str) -> Option<&ProjectTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Every template in definition order.
    pub fn list_all(&self) -> &[ProjectTemplate] {
        &self.templates
    }

    pub fn list_by_category(&self, category: &str) -> Vec<&ProjectTemplate> {
        self.templates
            .iter()
            .filter(|template| template.category == category)
            .collect()
    }

    /// Distinct categories, in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for template in &self.templates {
            if !categories.contains(&template.category.as_str()) {
                categories.push(template.category.as_str());
            }
        }
        categories
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Lookup in the built-in catalog.
pub fn get_template(id: &str) -> Option<&'static ProjectTemplate> {
    TemplateCatalog::builtin().get_template(id)
}

pub fn list_all() -> &'static [ProjectTemplate] {
    TemplateCatalog::builtin().list_all()
}

pub fn list_by_category(category: &str) -> Vec<&'static ProjectTemplate> {
    TemplateCatalog::builtin().list_by_category(category)
}
