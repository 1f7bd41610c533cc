use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{dates, require_text, Document, ValidationError};
use crate::store::SortKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementCategory {
    Education,
    Career,
    Personal,
    Awards,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    #[serde(default, with = "dates::optional")]
    pub achievement_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: AchievementCategory,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub order_index: i64,
}

impl Document for Achievement {
    const COLLECTION: &'static str = "achievements";
    const LABEL: &'static str = "Achievement";
    // Most recent first; undated achievements trail.
    const SORT: &'static [SortKey] = &[SortKey::desc("achievement_date"), SortKey::asc("order_index")];

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{decode, writable_fields};
    use serde_json::json;

    #[test]
    fn test_undated_achievement_stores_null() {
        let achievement = decode::<Achievement>(
            writable_fields::<Achievement>(json!({"title": "Won", "description": "a hackathon"})).unwrap(),
        )
        .unwrap();
        assert_eq!(achievement.category, AchievementCategory::Other);
        assert_eq!(serde_json::to_value(&achievement).unwrap()["achievement_date"], json!(null));
    }

    #[test]
    fn test_bad_date_is_a_validation_error() {
        let result = decode::<Achievement>(
            writable_fields::<Achievement>(json!({
                "title": "Won",
                "description": "a hackathon",
                "achievement_date": "soon"
            }))
            .unwrap(),
        );
        assert!(matches!(result, Err(ValidationError::Malformed { .. })));
    }
}
