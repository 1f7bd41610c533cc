use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{dates, require_range, require_text, Document, ValidationError};
use crate::store::SortKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveStatus {
    InProgress,
    Completed,
    #[default]
    Planned,
}

fn default_priority() -> i64 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub title: String,
    pub description: String,
    #[serde(default, with = "dates::optional")]
    pub target_date: Option<DateTime<Utc>>,
    /// Whole number from 1 (highest) to 5.
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub status: ObjectiveStatus,
    #[serde(default)]
    pub order_index: i64,
}

impl Document for Objective {
    const COLLECTION: &'static str = "objectives";
    const LABEL: &'static str = "Objective";
    const SORT: &'static [SortKey] = &[SortKey::asc("priority"), SortKey::asc("order_index")];

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_range("priority", self.priority, 1, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{decode, writable_fields};
    use serde_json::json;

    fn decode_objective(value: serde_json::Value) -> Result<Objective, ValidationError> {
        decode::<Objective>(writable_fields::<Objective>(value)?)
    }

    #[test]
    fn test_objective_defaults() {
        let objective = decode_objective(json!({"title": "Ship", "description": "a SaaS"})).unwrap();
        assert_eq!(objective.priority, 3);
        assert_eq!(objective.status, ObjectiveStatus::Planned);
        assert!(objective.target_date.is_none());
    }

    #[test]
    fn test_status_uses_kebab_case() {
        let objective = decode_objective(json!({
            "title": "Ship",
            "description": "a SaaS",
            "status": "in-progress",
            "target_date": "2025-06-30"
        }))
        .unwrap();
        assert_eq!(objective.status, ObjectiveStatus::InProgress);
        let value = serde_json::to_value(&objective).unwrap();
        assert_eq!(value["status"], json!("in-progress"));
        assert_eq!(value["target_date"], json!("2025-06-30T00:00:00.000Z"));
    }

    #[test]
    fn test_priority_out_of_range() {
        let err = decode_objective(json!({"title": "Ship", "description": "x", "priority": 6})).unwrap_err();
        assert_eq!(err, ValidationError::OutOfRange { field: "priority", min: 1, max: 5 });
    }

    #[test]
    fn test_fractional_priority_rejected() {
        let err = decode_objective(json!({"title": "Ship", "description": "x", "priority": 2.5})).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { entity: "Objective", .. }));
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(decode_objective(json!({"title": "Ship", "description": "x", "status": "abandoned"})).is_err());
    }
}
