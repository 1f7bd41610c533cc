use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{dates, require_text, Document, ValidationError};
use crate::store::SortKey;

fn default_title() -> String {
    "My Resume".to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cv {
    #[serde(default = "default_title")]
    pub title: String,
    pub pdf_url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "dates::now", with = "dates::required")]
    pub uploaded_date: DateTime<Utc>,
}

impl Document for Cv {
    const COLLECTION: &'static str = "cv";
    const LABEL: &'static str = "CV";
    const SORT: &'static [SortKey] = &[SortKey::desc("uploaded_date")];
    const EXCLUSIVE_FLAG: Option<&'static str> = Some("is_active");

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("pdf_url", &self.pdf_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{decode, writable_fields};
    use serde_json::json;

    #[test]
    fn test_cv_defaults() {
        let before = Utc::now();
        let cv = decode::<Cv>(writable_fields::<Cv>(json!({"pdf_url": "https://cdn/cv.pdf"})).unwrap()).unwrap();
        assert_eq!(cv.title, "My Resume");
        assert!(cv.is_active);
        assert!(cv.filename.is_none());
        assert!(cv.uploaded_date >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn test_pdf_url_required() {
        assert!(decode::<Cv>(writable_fields::<Cv>(json!({"title": "Resume"})).unwrap()).is_err());
        assert_eq!(
            decode::<Cv>(writable_fields::<Cv>(json!({"pdf_url": ""})).unwrap()).unwrap_err(),
            ValidationError::Missing("pdf_url")
        );
    }
}
