pub mod achievement;
pub mod contact;
pub mod cv;
pub mod dates;
pub mod dream;
pub mod objective;
pub mod project;
pub mod skill;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::store::{SortKey, StoreError, StoredDocument};

pub use achievement::Achievement;
pub use contact::ContactInfo;
pub use cv::Cv;
pub use dream::Dream;
pub use objective::Objective;
pub use project::Project;
pub use skill::Skill;

/// Keys owned by the store; never taken from a request body.
pub const RESERVED_FIELDS: &[&str] = &["id", "_id", "created_at", "updated_at"];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("Invalid {entity}: {message}")]
    Malformed {
        entity: &'static str,
        message: String,
    },
}

/// A portfolio entity persisted as a JSON document in its own collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Human-facing singular name, used in messages such as "Skill not found".
    const LABEL: &'static str;
    /// Display order of list queries.
    const SORT: &'static [SortKey];
    /// Boolean field that at most one document of the collection may hold true.
    const EXCLUSIVE_FLAG: Option<&'static str> = None;

    /// Checks beyond what deserialization already enforces.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// A stored entity: its fields plus store-assigned identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: Document> Record<T> {
    pub fn new(fields: T) -> Self {
        let now = dates::now();
        Record {
            id: Uuid::new_v4(),
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_stored(doc: StoredDocument) -> Result<Self, StoreError> {
        let fields = serde_json::from_value(doc.body).map_err(|e| {
            StoreError::Corrupt(format!("{} {}: {e}", T::COLLECTION, doc.id))
        })?;
        Ok(Record {
            id: doc.id,
            fields,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }

    pub fn to_stored(&self) -> Result<StoredDocument, StoreError> {
        Ok(StoredDocument {
            id: self.id,
            body: serde_json::to_value(&self.fields)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Removes store-owned keys from a request body. Non-objects are rejected.
pub fn writable_fields<T: Document>(payload: Value) -> Result<Map<String, Value>, ValidationError> {
    let Value::Object(mut map) = payload else {
        return Err(ValidationError::Malformed {
            entity: T::LABEL,
            message: "request body must be a JSON object".to_string(),
        });
    };
    for key in RESERVED_FIELDS {
        map.remove(*key);
    }
    Ok(map)
}

/// Deserializes and validates a full set of entity fields.
pub fn decode<T: Document>(fields: Map<String, Value>) -> Result<T, ValidationError> {
    let entity: T = serde_json::from_value(Value::Object(fields)).map_err(|e| {
        ValidationError::Malformed {
            entity: T::LABEL,
            message: e.to_string(),
        }
    })?;
    entity.validate()?;
    Ok(entity)
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(())
}

pub(crate) fn require_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}
