//! Step schema: one recorded snapshot of an algorithm's execution.
//!
//! The wire format is the `step`/`description`/`data`/`pointers`/`highlight`
//! object. Older payload shapes (`index`, `state`, `arrayState`,
//! `highlightedIndices`, `action`) are accepted as aliases. Keys outside the
//! schema are ignored.
//!
//! Decoding ([`Step::from_json`]) is lenient field by field: a value of the
//! wrong shape falls back to the field's default instead of rejecting the
//! step. Only the first step of a trace is checked for shape, by the parser.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

const INDEX_KEYS: &[&str] = &["step", "index"];
const DESCRIPTION_KEYS: &[&str] = &["description", "action"];
const DATA_KEYS: &[&str] = &["data", "state", "arrayState"];
const HIGHLIGHT_KEYS: &[&str] = &["highlight", "highlightedIndices"];

/// A scalar cell value in a step's array state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl ScalarValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Int(v) => Some(*v as f64),
            ScalarValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::Bool(v) => write!(f, "{}", v),
            ScalarValue::Text(v) => f.write_str(v),
            ScalarValue::Null => f.write_str("null"),
        }
    }
}

impl ScalarValue {
    /// Cell value for any JSON value. Arrays and objects become their JSON
    /// text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ScalarValue::Null,
            Value::Bool(b) => ScalarValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(v) => ScalarValue::Int(v),
                None => n.as_f64().map_or(ScalarValue::Null, ScalarValue::Float),
            },
            Value::String(text) => ScalarValue::Text(text.clone()),
            other => ScalarValue::Text(other.to_string()),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Int(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Text(v.to_string())
    }
}

/// One point in an algorithm's execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    /// 1-based step number as reported by the producer.
    #[serde(rename = "step")]
    pub index: i64,

    /// Human-readable account of what happened at this step.
    pub description: String,

    /// Primary data structure at this point.
    #[serde(rename = "data")]
    pub array_state: Vec<ScalarValue>,

    /// Named cursors into `array_state`, in the order the producer listed them.
    pub pointers: IndexMap<String, i64>,

    /// Positions to emphasize. Not bounds-checked.
    #[serde(rename = "highlight")]
    pub highlighted_indices: Vec<i64>,
}

impl Step {
    pub fn new(index: i64, description: impl Into<String>) -> Self {
        Step {
            index,
            description: description.into(),
            array_state: Vec::new(),
            pointers: IndexMap::new(),
            highlighted_indices: Vec::new(),
        }
    }

    /// Decodes the step at 0-based `position` of a trace payload.
    ///
    /// When both a field and its alias are present, the first usable one in
    /// `step`/`index`, `description`/`action`, `data`/`state`/`arrayState`,
    /// `highlight`/`highlightedIndices` order wins. A missing or non-integral
    /// step number defaults to `position + 1`. Pointer entries and highlights
    /// that are not integers are dropped; integral floats such as `2.0` are
    /// accepted. A non-object value decodes to an empty step.
    pub fn from_json(value: &Value, position: usize) -> Self {
        let default_index = i64::try_from(position).map_or(i64::MAX, |p| p.saturating_add(1));
        let Value::Object(fields) = value else {
            return Step::new(default_index, "");
        };

        let index = first_field(fields, INDEX_KEYS, integral).unwrap_or(default_index);
        let description = first_field(fields, DESCRIPTION_KEYS, |v| match v {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_default();
        let array_state = first_field(fields, DATA_KEYS, |v| {
            v.as_array()
                .map(|items| items.iter().map(ScalarValue::from_json).collect())
        })
        .unwrap_or_default();
        let pointers = match fields.get("pointers") {
            Some(Value::Object(entries)) => entries
                .iter()
                .filter_map(|(name, target)| integral(target).map(|t| (name.clone(), t)))
                .collect(),
            _ => IndexMap::new(),
        };
        let highlighted_indices = first_field(fields, HIGHLIGHT_KEYS, |v| {
            v.as_array()
                .map(|items| items.iter().filter_map(integral).collect())
        })
        .unwrap_or_default();

        Step {
            index,
            description,
            array_state,
            pointers,
            highlighted_indices,
        }
    }

    pub fn with_array<V: Into<ScalarValue>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.array_state = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pointer(mut self, name: impl Into<String>, position: i64) -> Self {
        self.pointers.insert(name.into(), position);
        self
    }

    pub fn with_highlight(mut self, positions: impl IntoIterator<Item = i64>) -> Self {
        self.highlighted_indices = positions.into_iter().collect();
        self
    }

    /// Whether `position` is listed in `highlighted_indices`.
    pub fn is_highlighted(&self, position: usize) -> bool {
        self.highlighted_indices
            .iter()
            .any(|&h| usize::try_from(h).is_ok_and(|h| h == position))
    }

    /// Pointer names resolving to `position`, in the step's pointer order.
    ///
    /// Indices outside the array match nothing.
    pub fn pointers_at(&self, position: usize) -> impl Iterator<Item = &str> + '_ {
        let len = self.array_state.len();
        self.pointers.iter().filter_map(move |(name, &target)| {
            match usize::try_from(target) {
                Ok(target) if target < len && target == position => Some(name.as_str()),
                _ => None,
            }
        })
    }
}

/// First key in `keys` whose value `read` accepts.
fn first_field<T>(
    fields: &Map<String, Value>,
    keys: &[&str],
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter().find_map(|key| fields.get(*key).and_then(&read))
}

/// Integer view of a JSON number, accepting floats with no fractional part.
fn integral(value: &Value) -> Option<i64> {
    if let Some(v) = value.as_i64() {
        return Some(v);
    }
    let v = value.as_f64()?;
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Step {
        decode_at(json, 0)
    }

    fn decode_at(json: &str, position: usize) -> Step {
        let value: Value = serde_json::from_str(json).unwrap();
        Step::from_json(&value, position)
    }

    #[test]
    fn deserializes_canonical_shape() {
        let step = decode(
            r#"{"step": 2, "description": "compare", "data": [3, 1.5, "x"],
                "pointers": {"left": 0, "right": 2}, "highlight": [0, 2]}"#,
        );
        assert_eq!(step.index, 2);
        assert_eq!(step.description, "compare");
        assert_eq!(
            step.array_state,
            vec![
                ScalarValue::Int(3),
                ScalarValue::Float(1.5),
                ScalarValue::Text("x".to_string())
            ]
        );
        assert_eq!(step.pointers.get_index(0), Some((&"left".to_string(), &0)));
        assert_eq!(step.highlighted_indices, vec![0, 2]);
    }

    #[test]
    fn deserializes_legacy_aliases() {
        let step = decode(
            r#"{"index": 1, "action": "init", "arrayState": [2, 7],
                "pointers": {"i": 0}, "highlightedIndices": [0]}"#,
        );
        assert_eq!(step.index, 1);
        assert_eq!(step.description, "init");
        assert_eq!(step.array_state.len(), 2);
        assert!(step.is_highlighted(0));

        let step = decode(r#"{"step": 1, "state": [4]}"#);
        assert_eq!(step.array_state, vec![ScalarValue::Int(4)]);
    }

    #[test]
    fn missing_optional_fields_default() {
        let step = decode(r#"{"step": 1, "note": "extra"}"#);
        assert!(step.description.is_empty());
        assert!(step.array_state.is_empty());
        assert!(step.pointers.is_empty());
        assert!(step.highlighted_indices.is_empty());
    }

    #[test]
    fn missing_step_number_defaults_to_position() {
        assert_eq!(decode_at(r#"{"description": "later"}"#, 4).index, 5);
        assert_eq!(decode_at(r#"{"step": "three"}"#, 2).index, 3);
        let step = decode_at("42", 1);
        assert_eq!(step.index, 2);
        assert!(step.array_state.is_empty());
    }

    #[test]
    fn pointer_order_follows_the_payload() {
        let step = decode(r#"{"step": 1, "data": [1, 2], "pointers": {"right": 1, "left": 0}}"#);
        let names: Vec<&str> = step.pointers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["right", "left"]);
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let step = decode(
            r#"{"step": 1, "description": null, "data": null,
                "pointers": null, "highlight": null}"#,
        );
        assert!(step.description.is_empty());
        assert!(step.array_state.is_empty());
        assert!(step.pointers.is_empty());
        assert!(step.highlighted_indices.is_empty());
    }

    #[test]
    fn integral_floats_are_accepted() {
        let step = decode(
            r#"{"step": 3.0, "data": [1, 2, 3], "pointers": {"i": 1.0, "j": 1.5, "k": "x"},
                "highlight": [2.0, 0.5, "y", 1]}"#,
        );
        assert_eq!(step.index, 3);
        assert_eq!(step.pointers.len(), 1);
        assert_eq!(step.pointers.get("i"), Some(&1));
        assert_eq!(step.highlighted_indices, vec![2, 1]);
    }

    #[test]
    fn nested_cells_render_as_json_text() {
        let step = decode(r#"{"step": 1, "data": [[1, 2], {"k": 3}, true, null]}"#);
        assert_eq!(
            step.array_state,
            vec![
                ScalarValue::Text("[1,2]".to_string()),
                ScalarValue::Text(r#"{"k":3}"#.to_string()),
                ScalarValue::Bool(true),
                ScalarValue::Null,
            ]
        );
    }

    #[test]
    fn duplicate_aliases_resolve_by_precedence() {
        let step = decode(
            r#"{"index": 9, "step": 2, "action": "old", "description": "new",
                "arrayState": [7], "data": [1, 2], "highlightedIndices": [1], "highlight": [0]}"#,
        );
        assert_eq!(step.index, 2);
        assert_eq!(step.description, "new");
        assert_eq!(step.array_state.len(), 2);
        assert_eq!(step.highlighted_indices, vec![0]);

        // An unusable preferred key yields to its alias.
        let step = decode(r#"{"step": null, "index": 4, "data": "n/a", "state": [5]}"#);
        assert_eq!(step.index, 4);
        assert_eq!(step.array_state, vec![ScalarValue::Int(5)]);
    }

    #[test]
    fn pointers_at_keeps_collisions_and_ignores_out_of_range() {
        let step = Step::new(1, "s")
            .with_array([1i64, 2, 3, 4])
            .with_pointer("i", 1)
            .with_pointer("j", 1)
            .with_pointer("k", 10)
            .with_pointer("neg", -1);
        assert_eq!(step.pointers_at(1).collect::<Vec<_>>(), vec!["i", "j"]);
        assert_eq!(step.pointers_at(0).count(), 0);
        assert!((0..4).all(|p| step.pointers_at(p).all(|n| n != "k" && n != "neg")));
    }

    #[test]
    fn negative_highlight_matches_nothing() {
        let step = Step::new(1, "s").with_array([1i64]).with_highlight([-1]);
        assert!(!step.is_highlighted(0));
    }

    #[test]
    fn scalar_display() {
        assert_eq!(ScalarValue::Int(7).to_string(), "7");
        assert_eq!(ScalarValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ScalarValue::Float(3.0).to_string(), "3");
        assert_eq!(ScalarValue::Text("a".into()).to_string(), "a");
        assert_eq!(ScalarValue::Null.to_string(), "null");
    }
}
