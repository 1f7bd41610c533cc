//! JSON value ordering shared by both store backends.
//!
//! Mirrors PostgreSQL's jsonb btree ordering so the in-memory store sorts
//! exactly like `ORDER BY body -> 'field'`:
//! `null < string < number < boolean < array < object`.
//! A missing field sorts as `null`.

use std::cmp::Ordering;

use serde_json::Value;

use super::{Direction, SortKey, StoredDocument};

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

pub fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| compare_elements(x.iter(), y.iter())),
        (Value::Object(x), Value::Object(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| x.keys().cmp(y.keys()))
            .then_with(|| compare_elements(x.values(), y.values())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn compare_elements<'a>(
    xs: impl Iterator<Item = &'a Value>,
    ys: impl Iterator<Item = &'a Value>,
) -> Ordering {
    for (x, y) in xs.zip(ys) {
        let ord = compare_json(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Orders by the given keys, then `created_at` and `id` ascending so that
/// ties always come back in the same order.
pub fn compare_documents(a: &StoredDocument, b: &StoredDocument, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let left = a.body.get(key.field).unwrap_or(&Value::Null);
        let right = b.body.get(key.field).unwrap_or(&Value::Null);
        let ord = match key.direction {
            Direction::Asc => compare_json(left, right),
            Direction::Desc => compare_json(right, left),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn doc(body: Value, offset_secs: i64) -> StoredDocument {
        let at = Utc::now() + Duration::seconds(offset_secs);
        StoredDocument {
            id: Uuid::new_v4(),
            body,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_type_ranks_follow_jsonb() {
        assert_eq!(compare_json(&json!(null), &json!("a")), Ordering::Less);
        assert_eq!(compare_json(&json!("z"), &json!(0)), Ordering::Less);
        assert_eq!(compare_json(&json!(99), &json!(false)), Ordering::Less);
        assert_eq!(compare_json(&json!(true), &json!([])), Ordering::Less);
        assert_eq!(compare_json(&json!([1]), &json!({})), Ordering::Less);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(compare_json(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_json(&json!(1.5), &json!(1)), Ordering::Greater);
    }

    #[test]
    fn test_desc_dates_put_nulls_last() {
        let mut docs = vec![
            doc(json!({"achievement_date": null}), 0),
            doc(json!({"achievement_date": "2024-01-15T00:00:00.000Z"}), 1),
            doc(json!({"achievement_date": "2024-06-15T00:00:00.000Z"}), 2),
        ];
        let keys = [SortKey::desc("achievement_date")];
        docs.sort_by(|a, b| compare_documents(a, b, &keys));
        let dates: Vec<_> = docs.iter().map(|d| d.body["achievement_date"].clone()).collect();
        assert_eq!(
            dates,
            vec![
                json!("2024-06-15T00:00:00.000Z"),
                json!("2024-01-15T00:00:00.000Z"),
                json!(null)
            ]
        );
    }

    #[test]
    fn test_ties_fall_back_to_creation_order() {
        let first = doc(json!({"order_index": 1}), 0);
        let second = doc(json!({"order_index": 1}), 5);
        let keys = [SortKey::asc("order_index")];
        assert_eq!(compare_documents(&first, &second, &keys), Ordering::Less);
        assert_eq!(compare_documents(&second, &first, &keys), Ordering::Greater);
    }

    #[test]
    fn test_secondary_key_applies_on_primary_tie() {
        let a = doc(json!({"priority": 1, "order_index": 4}), 0);
        let b = doc(json!({"priority": 1, "order_index": 2}), 1);
        let c = doc(json!({"priority": 2, "order_index": 1}), 2);
        let keys = [SortKey::asc("priority"), SortKey::asc("order_index")];
        let mut docs = vec![c.clone(), a.clone(), b.clone()];
        docs.sort_by(|x, y| compare_documents(x, y, &keys));
        assert_eq!(docs, vec![b, a, c]);
    }
}
