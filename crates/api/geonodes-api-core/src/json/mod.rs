use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::Value;

/// Policy describing how purely numeric arrays should be normalized when
/// converting shorthand JSON into the canonical `{ "type": ..., "data": ... }`
/// representation used by `geonodes_api_core::Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericArrayPolicy {
    /// Arrays of length 2/3/4 become Vec2/Vec3/ColorRgba respectively; other lengths are
    /// left untouched and fail to deserialize.
    AutoVectorKinds,
    /// Length 4 arrays are treated as a 3D vector followed by a dropped component. Used by
    /// hosts that send homogeneous coordinates.
    Homogeneous,
}

/// Errors produced while normalizing graph JSON blobs.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("graph json parse error: {0}")]
    GraphParse(String),
    #[error("serialize normalized graph: {0}")]
    GraphSerialize(String),
}

/// Normalize shorthand `Value` JSON into the canonical `{ "type": ..., "data": ... }`
/// representation understood by the serde derives on [`Value`]. This helper accepts
/// both shorthand objects such as `{ "vec3": [1, 2, 3] }` and primitive aliases
/// like `1.0`, `32` or `[0, 1, 0]`.
pub fn normalize_value_json(value: JsonValue) -> JsonValue {
    normalize_value_json_with_policy(value, NumericArrayPolicy::AutoVectorKinds)
}

fn normalize_value_json_with_policy(value: JsonValue, policy: NumericArrayPolicy) -> JsonValue {
    match value {
        JsonValue::Number(n) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
            Some(i) if !n.is_f64() => json!({ "type": "int", "data": i }),
            _ => json!({ "type": "float", "data": n }),
        },
        JsonValue::Bool(b) => json!({ "type": "bool", "data": b }),
        JsonValue::String(s) => json!({ "type": "text", "data": s }),
        JsonValue::Array(arr) => {
            if !arr.iter().all(|x| x.is_number()) {
                return JsonValue::Array(arr);
            }
            match (arr.len(), policy) {
                (2, _) => json!({ "type": "vec2", "data": arr }),
                (3, _) => json!({ "type": "vec3", "data": arr }),
                (4, NumericArrayPolicy::AutoVectorKinds) => {
                    json!({ "type": "colorrgba", "data": arr })
                }
                (4, NumericArrayPolicy::Homogeneous) => {
                    json!({ "type": "vec3", "data": &arr[..3] })
                }
                _ => JsonValue::Array(arr),
            }
        }
        JsonValue::Object(obj) => {
            if obj.contains_key("type") && obj.contains_key("data") {
                return JsonValue::Object(obj);
            }
            if let Some(text) = obj.get("text").and_then(|x| x.as_str()) {
                return json!({ "type": "text", "data": text });
            }
            if let Some(f) = obj.get("float").and_then(|x| x.as_f64()) {
                return json!({ "type": "float", "data": f });
            }
            if let Some(i) = obj.get("int").and_then(|x| x.as_i64()) {
                return json!({ "type": "int", "data": i });
            }
            if let Some(b) = obj.get("bool").and_then(|x| x.as_bool()) {
                return json!({ "type": "bool", "data": b });
            }
            if let Some(arr) = obj.get("vec2").and_then(|x| x.as_array()) {
                return json!({ "type": "vec2", "data": arr });
            }
            if let Some(arr) = obj.get("vec3").and_then(|x| x.as_array()) {
                return json!({ "type": "vec3", "data": arr });
            }
            if let Some(arr) = obj.get("color").and_then(|x| x.as_array()) {
                return json!({ "type": "colorrgba", "data": arr });
            }
            JsonValue::Object(obj)
        }
        other => other,
    }
}

/// Convenience helper that normalizes Value JSON then deserializes it into the
/// strongly typed [`Value`] enum.
pub fn parse_value(value: JsonValue) -> Result<Value, serde_json::Error> {
    let normalized = normalize_value_json(value);
    serde_json::from_value(normalized)
}

/// Variant of [`parse_value`] using [`NumericArrayPolicy::Homogeneous`].
pub fn parse_value_homogeneous(value: JsonValue) -> Result<Value, serde_json::Error> {
    let normalized = normalize_value_json_with_policy(value, NumericArrayPolicy::Homogeneous);
    serde_json::from_value(normalized)
}

/// Normalize a graph specification JSON value in-place: `kind` is accepted as an alias of
/// `type`, and every literal under a node's `values` object is normalized.
pub fn normalize_graph_spec_value(root: &mut JsonValue) {
    let Some(nodes) = root.get_mut("nodes").and_then(|n| n.as_array_mut()) else {
        return;
    };
    for node in nodes.iter_mut() {
        if let Some(kind) = node.get("kind").cloned() {
            if node.get("type").is_none() {
                node["type"] = kind;
            }
        }

        if let Some(values) = node.get_mut("values").and_then(|p| p.as_object_mut()) {
            for value in values.values_mut() {
                let taken = std::mem::take(value);
                *value = normalize_value_json(taken);
            }
        }
    }
}

/// Convenience wrapper that parses a JSON string, normalizes it, and returns
/// the normalized [`serde_json::Value`].
pub fn normalize_graph_spec_json(json_str: &str) -> Result<JsonValue, JsonError> {
    let mut root: JsonValue =
        serde_json::from_str(json_str).map_err(|e| JsonError::GraphParse(e.to_string()))?;
    normalize_graph_spec_value(&mut root);
    Ok(root)
}

/// Convenience wrapper that returns a JSON string with all shorthand normalized.
pub fn normalize_graph_spec_json_string(json_str: &str) -> Result<String, JsonError> {
    let value = normalize_graph_spec_json(json_str)?;
    serde_json::to_string(&value).map_err(|e| JsonError::GraphSerialize(e.to_string()))
}

/// Convert a core [`Value`] into the shorthand JSON structure (objects like `{ "vec3": [...] }`).
pub fn value_to_shorthand_json(value: &Value) -> JsonValue {
    match value {
        Value::Float(f) => json!({ "float": *f }),
        Value::Int(i) => json!({ "int": *i }),
        Value::Bool(b) => json!({ "bool": *b }),
        Value::Vec2(a) => json!({ "vec2": [a[0], a[1]] }),
        Value::Vec3(a) => json!({ "vec3": [a[0], a[1], a[2]] }),
        Value::ColorRgba(a) => json!({ "color": [a[0], a[1], a[2], a[3]] }),
        Value::Text(s) => json!({ "text": s }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_numeric_arrays_auto_vectors() {
        assert_eq!(normalize_value_json(json!([1, 2, 3]))["type"], "vec3");
        assert_eq!(normalize_value_json(json!([1, 2, 3, 1]))["type"], "colorrgba");
    }

    #[test]
    fn homogeneous_policy_drops_w() {
        let parsed = parse_value_homogeneous(json!([1.0, 2.0, 3.0, 1.0])).unwrap();
        assert_eq!(parsed, Value::Vec3([1.0, 2.0, 3.0]));
    }

    #[test]
    fn integers_and_floats_are_distinguished() {
        assert_eq!(parse_value(json!(32)).unwrap(), Value::Int(32));
        assert_eq!(parse_value(json!(1.5)).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn shorthand_round_trip() {
        for value in [
            Value::Float(0.25),
            Value::Int(-3),
            Value::Bool(true),
            Value::Vec2([1.0, 2.0]),
            Value::Vec3([1.0, 2.0, 3.0]),
            Value::ColorRgba([0.5, 0.5, 0.5, 1.0]),
            Value::Text("uv_map".into()),
        ] {
            let json = value_to_shorthand_json(&value);
            assert_eq!(parse_value(json).unwrap(), value);
        }
    }

    #[test]
    fn graph_spec_normalization_inserts_type() {
        let mut root = json!({
            "nodes": [
                {
                    "id": "sphere",
                    "kind": "mesh_primitive_uv_sphere",
                    "values": { "Segments": 8, "Radius": { "float": 2.0 } }
                }
            ]
        });
        normalize_graph_spec_value(&mut root);
        let node = &root["nodes"][0];
        assert_eq!(node["type"], "mesh_primitive_uv_sphere");
        assert_eq!(node["values"]["Segments"]["type"], "int");
        assert_eq!(node["values"]["Radius"]["type"], "float");
    }

    #[test]
    fn malformed_graph_json_reports_parse_error() {
        let err = normalize_graph_spec_json("{ nodes: ").unwrap_err();
        assert!(matches!(err, JsonError::GraphParse(_)));
    }
}
