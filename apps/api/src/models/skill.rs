use serde::{Deserialize, Serialize};

use super::{require_range, require_text, Document, ValidationError};
use crate::store::SortKey;

/// Declaration order is also the order of the grouped skills view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Tools,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: SkillCategory,
    /// Whole percent, 0 to 100. Fractional values are rejected.
    pub proficiency_level: i64,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub order_index: i64,
}

impl Document for Skill {
    const COLLECTION: &'static str = "skills";
    const LABEL: &'static str = "Skill";
    const SORT: &'static [SortKey] = &[SortKey::asc("order_index")];

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_range("proficiency_level", self.proficiency_level, 0, 100)
    }
}
