use crate::error::{BudgetError, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keys the Gemini `responseSchema` field refuses.
const UNSUPPORTED_KEYS: [&str; 7] = [
    "$schema",
    "definitions",
    "title",
    "format",
    "additionalProperties",
    "minimum",
    "maximum",
];

/// JSON schema for `T` with every `$ref` inlined and unsupported keys removed.
pub fn gemini_schema<T: JsonSchema>() -> Result<Value> {
    let root = serde_json::to_value(schemars::schema_for!(T))?;
    let definitions = root
        .get("definitions")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    Ok(clean_node(root, &definitions))
}

fn clean_node(node: Value, definitions: &Map<String, Value>) -> Value {
    match node {
        Value::Object(map) => {
            if let Some(target) = map.get("$ref").and_then(Value::as_str) {
                let name = target.trim_start_matches("#/definitions/");
                if let Some(definition) = definitions.get(name) {
                    return clean_node(definition.clone(), definitions);
                }
            }

            let cleaned = map
                .into_iter()
                .filter(|(key, _)| !UNSUPPORTED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| {
                    let value = match value {
                        // property names are data, only their schemas get cleaned
                        Value::Object(properties) if key == "properties" => Value::Object(
                            properties
                                .into_iter()
                                .map(|(name, schema)| (name, clean_node(schema, definitions)))
                                .collect(),
                        ),
                        other => clean_node(other, definitions),
                    };
                    (key, value)
                })
                .collect();
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| clean_node(item, definitions))
                .collect(),
        ),
        other => other,
    }
}

/// Cuts any prose or code fence around the outermost JSON array or object.
pub fn clean_json_output(raw: &str) -> &str {
    let trimmed = raw.trim();
    let array = trimmed.find('[').zip(trimmed.rfind(']'));
    let object = trimmed.find('{').zip(trimmed.rfind('}'));

    let span = match (array, object) {
        (Some(a), Some(o)) => Some(if a.0 < o.0 { a } else { o }),
        (a, o) => a.or(o),
    };
    match span {
        Some((start, end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parses a model answer; a malformed answer is a failed request, not a storage problem.
pub fn parse_answer<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(clean_json_output(raw))
        .map_err(|e| BudgetError::AiRequestFailed(format!("unreadable answer: {}", e)))
}
