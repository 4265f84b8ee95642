//! Normalization of serialized UI trees into the [`UiNode`] model.
//!
//! The remote interpreter describes one UI element per JSON value. Two shapes
//! are accepted, because the two interpreter-side emitters that exist in the
//! wild chose different encodings:
//!
//! - **Tuple form** (positional): `[tag, properties?, children?]`. Event
//!   handlers hide among the properties under keys with the reserved `on`
//!   prefix, e.g. `{"onChange": "cb1"}`.
//! - **Record form** (named): `{tag, attributes?, on?, children?}`. Event
//!   handlers are segregated into their own `on` map.
//!
//! Both reduce to the same semantic model, so normalization happens once at
//! the wire boundary and the rest of the system only ever sees [`UiNode`].
//!
//! # Event keys are detected structurally
//!
//! A tuple-form property key is an event binding only when it is the `on`
//! prefix followed by an uppercase letter (`onChange`, `onSubmit`). A plain
//! `starts_with("on")` test would misclassify ordinary data fields such as
//! `online` or `onset`; the uppercase requirement rules those out.
//!
//! # What the handler values are
//!
//! The value under an event key is *not* a callback. It is an opaque
//! correlation identifier the interpreter chose (any JSON value, typically a
//! short string or integer). The interpreter later matches it against the
//! `identifier` field of an inbound interaction message to resume the right
//! piece of its own logic. The host never interprets it.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// The reserved prefix that marks tuple-form property keys as event bindings.
pub const EVENT_KEY_PREFIX: &str = "on";

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors produced while normalizing a serialized tree.
///
/// These are protocol violations by the remote interpreter (or a corrupted
/// transport), not host bugs. The round-trip driver reports them and keeps
/// the last successfully displayed tree.
#[derive(Debug, Error)]
pub enum WireError {
    /// The node is neither a primitive leaf nor one of the two object shapes.
    ///
    /// `null` and bare booleans fall in here: the protocol has no meaning
    /// for them and silently coercing them to text would hide interpreter
    /// bugs.
    #[error("malformed node: {0}")]
    MalformedNode(String),

    /// A tuple-form node whose first element is not a tag string, or a
    /// record-form node without a `tag` field.
    #[error("node has no usable tag: {0}")]
    MissingTag(String),

    /// An attribute value was not a scalar (string, number, or boolean).
    ///
    /// Attributes are applied verbatim to native elements, and native
    /// elements only accept scalar attribute values.
    #[error("attribute '{key}' is not a scalar value")]
    NonScalarAttribute { key: String },
}

// ── The normalized model ──────────────────────────────────────────────────────

/// One node of the normalized UI tree.
///
/// String and number leaves become text children of their parent element;
/// everything else is an element. The tree is finite and acyclic by
/// construction (it is freshly deserialized JSON), and nesting depth is
/// bounded only by the UI the interpreter chose to describe.
#[derive(Debug, Clone, PartialEq)]
pub enum UiNode {
    /// A text leaf.
    Text(String),
    /// A numeric leaf. Kept as a number so the view layer decides formatting.
    Number(f64),
    /// An element with a tag, attributes, event handlers, and children.
    Element(UiElement),
}

/// The element payload of [`UiNode::Element`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiElement {
    /// Native element name, or a registered widget name. Widget names start
    /// with an uppercase letter (`Input`); native tags are lowercase.
    pub tag: String,
    /// Data attributes, applied verbatim to the native node. Values are
    /// guaranteed scalar (string / number / boolean) by normalization.
    pub attrs: BTreeMap<String, Value>,
    /// Event name → opaque correlation identifier.
    ///
    /// Event names are stored without the `on` prefix and lowercased at the
    /// first letter (`onChange` → `change`), matching the record form's
    /// bare names.
    pub handlers: BTreeMap<String, Value>,
    /// Ordered child nodes.
    pub children: Vec<UiNode>,
}

impl UiNode {
    /// Normalizes one freshly deserialized JSON value into a [`UiNode`].
    ///
    /// Accepts both wire shapes (tuple and record form) and recurses into
    /// children, so one call normalizes the whole tree.
    ///
    /// # Errors
    ///
    /// Returns a [`WireError`] if the value (or any descendant) violates the
    /// wire schema. Normalization is all-or-nothing: a malformed subtree
    /// fails the whole tree rather than being silently dropped.
    pub fn from_value(value: &Value) -> Result<UiNode, WireError> {
        match value {
            Value::String(s) => Ok(UiNode::Text(s.clone())),
            Value::Number(n) => {
                // All JSON numbers are representable as f64; `as_f64` only
                // returns None for non-finite values, which serde_json never
                // produces from valid JSON text.
                let n = n
                    .as_f64()
                    .ok_or_else(|| WireError::MalformedNode("non-finite number".to_string()))?;
                Ok(UiNode::Number(n))
            }
            Value::Array(items) => Self::from_tuple(items),
            Value::Object(map) => Self::from_record(map),
            Value::Bool(_) | Value::Null => Err(WireError::MalformedNode(format!(
                "expected element or text leaf, got {value}"
            ))),
        }
    }

    /// Normalizes the tuple form: `[tag, properties?, children?]`.
    fn from_tuple(items: &[Value]) -> Result<UiNode, WireError> {
        if items.is_empty() || items.len() > 3 {
            return Err(WireError::MalformedNode(format!(
                "tuple node must have 1 to 3 elements, got {}",
                items.len()
            )));
        }

        let tag = items[0]
            .as_str()
            .ok_or_else(|| WireError::MissingTag(format!("tuple tag was {}", items[0])))?
            .to_string();

        let mut element = UiElement {
            tag,
            ..UiElement::default()
        };

        // Position 1: properties. `null` means "no properties".
        if let Some(props) = items.get(1) {
            match props {
                Value::Null => {}
                Value::Object(map) => {
                    for (key, value) in map {
                        if let Some(event) = event_name_from_key(key) {
                            element.handlers.insert(event, value.clone());
                        } else {
                            element.attrs.insert(key.clone(), scalar(key, value)?);
                        }
                    }
                }
                other => {
                    return Err(WireError::MalformedNode(format!(
                        "tuple properties must be an object or null, got {other}"
                    )))
                }
            }
        }

        // Position 2: children. `null` means "no children".
        if let Some(children) = items.get(2) {
            match children {
                Value::Null => {}
                Value::Array(items) => {
                    element.children = items
                        .iter()
                        .map(UiNode::from_value)
                        .collect::<Result<_, _>>()?;
                }
                other => {
                    return Err(WireError::MalformedNode(format!(
                        "tuple children must be an array or null, got {other}"
                    )))
                }
            }
        }

        Ok(UiNode::Element(element))
    }

    /// Normalizes the record form: `{tag, attributes?, on?, children?}`.
    fn from_record(map: &serde_json::Map<String, Value>) -> Result<UiNode, WireError> {
        let tag = map
            .get("tag")
            .and_then(Value::as_str)
            .ok_or_else(|| WireError::MissingTag("record node without string 'tag'".to_string()))?
            .to_string();

        let mut element = UiElement {
            tag,
            ..UiElement::default()
        };

        if let Some(attrs) = map.get("attributes").filter(|v| !v.is_null()) {
            let attrs = attrs.as_object().ok_or_else(|| {
                WireError::MalformedNode("'attributes' must be an object or null".to_string())
            })?;
            for (key, value) in attrs {
                element.attrs.insert(key.clone(), scalar(key, value)?);
            }
        }

        if let Some(on) = map.get("on").filter(|v| !v.is_null()) {
            let on = on.as_object().ok_or_else(|| {
                WireError::MalformedNode("'on' must be an object or null".to_string())
            })?;
            for (event, identifier) in on {
                // Record-form event names are already bare ("change", not
                // "onChange"); they are stored as-is.
                element.handlers.insert(event.clone(), identifier.clone());
            }
        }

        if let Some(children) = map.get("children").filter(|v| !v.is_null()) {
            let children = children.as_array().ok_or_else(|| {
                WireError::MalformedNode("'children' must be an array or null".to_string())
            })?;
            element.children = children
                .iter()
                .map(UiNode::from_value)
                .collect::<Result<_, _>>()?;
        }

        Ok(UiNode::Element(element))
    }

    /// Convenience accessor: the element payload, if this node is one.
    pub fn as_element(&self) -> Option<&UiElement> {
        match self {
            UiNode::Element(e) => Some(e),
            _ => None,
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Returns the bare event name when `key` is structurally an event key.
///
/// A key is an event key when it is the `on` prefix followed by an uppercase
/// ASCII letter. The returned name has the prefix stripped and the first
/// letter lowercased: `onChange` → `change`, `onSubmit` → `submit`.
///
/// Keys like `online` are ordinary data fields and return `None`.
pub fn event_name_from_key(key: &str) -> Option<String> {
    let rest = key.strip_prefix(EVENT_KEY_PREFIX)?;
    let first = rest.chars().next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    let mut name = String::with_capacity(rest.len());
    name.push(first.to_ascii_lowercase());
    name.push_str(&rest[first.len_utf8()..]);
    Some(name)
}

/// Validates that an attribute value is scalar and clones it.
fn scalar(key: &str, value: &Value) -> Result<Value, WireError> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(value.clone()),
        _ => Err(WireError::NonScalarAttribute {
            key: key.to_string(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
