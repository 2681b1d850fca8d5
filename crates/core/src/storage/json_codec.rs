use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::models::record::AssetRecord;

use super::traits::RecordCodec;

/// Key of the optional namespace other tools' data lives beside.
const NAMESPACE: &str = "costset";

/// Record codec for JSON record files.
///
/// Accepts three layouts on decode:
/// - flat: `{ "name": .., "price": .., "active_from": .., ... }`
/// - sectioned: `{ "name": .., "style": { "icon": .. }, "detail": { "price": .., ... } }`
/// - namespaced: the sectioned layout under a top-level `"costset"` key.
///
/// Encode always writes the sectioned layout, into the namespace when the
/// existing file uses one, leaving every unrelated key untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordCodec;

impl JsonRecordCodec {
    pub fn new() -> Self {
        Self
    }
}

impl RecordCodec for JsonRecordCodec {
    fn decode(&self, text: &str) -> Result<AssetRecord, CoreError> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(root) = root else {
            return Err(CoreError::Deserialization(
                "Record must be a JSON object".into(),
            ));
        };

        let src = match root.get(NAMESPACE) {
            Some(Value::Object(ns)) => ns,
            _ => &root,
        };
        let style = section(src, "style").or_else(|| section(&root, "style"));
        let detail = section(src, "detail").or_else(|| section(&root, "detail"));

        let mut flat = Map::new();
        let pick = |key: &str| -> Option<Value> {
            detail
                .and_then(|d| d.get(key))
                .or_else(|| src.get(key))
                .cloned()
        };

        if let Some(name) = src.get("name") {
            flat.insert("name".into(), name.clone());
        }
        if let Some(icon) = style.and_then(|s| s.get("icon")).or_else(|| src.get("icon")) {
            flat.insert("icon".into(), icon.clone());
        }
        for key in ["price", "active_from", "active_to", "recycle_price", "tags", "hidden"] {
            if let Some(value) = pick(key) {
                flat.insert(key.into(), value);
            }
        }

        Ok(serde_json::from_value(Value::Object(flat))?)
    }

    fn encode(&self, record: &AssetRecord, existing: Option<&str>) -> Result<String, CoreError> {
        let mut root = match existing.map(serde_json::from_str::<Value>) {
            Some(Ok(Value::Object(map))) => map,
            _ => Map::new(),
        };

        match root.remove(NAMESPACE) {
            Some(Value::Object(mut ns)) => {
                write_fields(&mut ns, record);
                root.insert(NAMESPACE.into(), Value::Object(ns));
            }
            other => {
                if let Some(value) = other {
                    root.insert(NAMESPACE.into(), value);
                }
                write_fields(&mut root, record);
            }
        }

        serde_json::to_string_pretty(&Value::Object(root))
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize record: {e}")))
    }
}

/// Write the record's keys in the sectioned layout, keeping unrelated keys.
fn write_fields(target: &mut Map<String, Value>, record: &AssetRecord) {
    target.insert("name".into(), Value::from(record.name.clone()));

    let mut style = take_section(target, "style");
    style.insert("icon".into(), Value::from(record.icon.clone()));
    target.insert("style".into(), Value::Object(style));

    let mut detail = take_section(target, "detail");
    detail.insert("price".into(), Value::from(record.price));
    detail.insert("active_from".into(), Value::from(record.active_from.clone()));
    detail.insert("active_to".into(), Value::from(record.active_to.clone()));
    detail.insert("recycle_price".into(), Value::from(record.recycle_price));
    detail.insert("tags".into(), Value::from(record.tags.clone()));
    target.insert("detail".into(), Value::Object(detail));
}

fn section<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    match map.get(key) {
        Some(Value::Object(inner)) => Some(inner),
        _ => None,
    }
}

/// Remove and return the object at `key`; a missing or non-object value yields an empty one.
fn take_section(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    }
}
