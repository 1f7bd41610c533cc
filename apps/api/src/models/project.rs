use serde::{Deserialize, Serialize};

use super::{require_text, Document, ValidationError};
use crate::store::SortKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub demo_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order_index: i64,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";
    const SORT: &'static [SortKey] = &[SortKey::asc("order_index")];

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)
    }
}
