use serde_json::{Map, Value};

use crate::error::SyncError;

pub const TRAINING_SECTION: &str = "Training";
pub const MODEL_PARAMETERS: &str = "modelParameters";
pub const MODEL_TRAINING: &str = "training";

/// Shallow-merges `training["Training"]` into `base["modelParameters"]["training"]`.
///
/// Fallback values win on conflict. Missing intermediate objects are created;
/// an absent `Training` section merges nothing.
pub fn merge_training_section(
    mut base: Map<String, Value>,
    training: &Map<String, Value>,
) -> Result<Map<String, Value>, SyncError> {
    let section = match training.get(TRAINING_SECTION) {
        None | Some(Value::Null) => return Ok(base),
        Some(Value::Object(section)) => section,
        Some(_) => {
            return Err(SyncError::decode(
                "training configuration",
                "`Training` must be a JSON object",
            ))
        }
    };

    let model_parameters = object_entry(&mut base, MODEL_PARAMETERS)?;
    let target = object_entry(model_parameters, MODEL_TRAINING)?;
    for (name, value) in section {
        target.insert(name.clone(), value.clone());
    }

    Ok(base)
}

fn object_entry<'a>(
    parent: &'a mut Map<String, Value>,
    name: &str,
) -> Result<&'a mut Map<String, Value>, SyncError> {
    let entry = parent
        .entry(name.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if entry.is_null() {
        *entry = Value::Object(Map::new());
    }
    entry.as_object_mut().ok_or_else(|| {
        SyncError::decode(
            "base configuration",
            format!("`{name}` must be a JSON object"),
        )
    })
}
