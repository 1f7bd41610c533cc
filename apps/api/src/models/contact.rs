use serde::{Deserialize, Serialize};

use super::{require_text, Document, ValidationError};
use crate::store::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Email,
    Phone,
    Linkedin,
    Github,
    Twitter,
    Other,
}

fn default_icon() -> String {
    "fas fa-link".to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(rename = "type")]
    pub kind: ContactType,
    pub value: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Document for ContactInfo {
    const COLLECTION: &'static str = "contacts";
    const LABEL: &'static str = "Contact";
    const SORT: &'static [SortKey] = &[SortKey::asc("display_order")];

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("value", &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{decode, writable_fields};
    use serde_json::json;

    #[test]
    fn test_contact_defaults_and_type_field() {
        let contact = decode::<ContactInfo>(
            writable_fields::<ContactInfo>(json!({"type": "github", "value": "https://github.com/me"})).unwrap(),
        )
        .unwrap();
        assert_eq!(contact.kind, ContactType::Github);
        assert_eq!(contact.icon, "fas fa-link");
        assert!(contact.is_active);
        assert_eq!(serde_json::to_value(&contact).unwrap()["type"], json!("github"));
    }

    #[test]
    fn test_contact_type_outside_set_rejected() {
        let result = decode::<ContactInfo>(
            writable_fields::<ContactInfo>(json!({"type": "fax", "value": "555"})).unwrap(),
        );
        assert!(result.is_err());
    }
}
