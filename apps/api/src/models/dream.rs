use serde::{Deserialize, Serialize};

use super::{require_text, Document, ValidationError};
use crate::store::SortKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DreamCategory {
    Career,
    Personal,
    Travel,
    Learning,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dream {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: DreamCategory,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub order_index: i64,
}

impl Document for Dream {
    const COLLECTION: &'static str = "dreams";
    const LABEL: &'static str = "Dream";
    const SORT: &'static [SortKey] = &[SortKey::asc("order_index")];

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)
    }
}
