//! The host-side view-tree representation produced by translation.
//!
//! A [`ViewNode`] is what a view backend consumes: the shape mirrors the
//! classic "create element" primitive `h(tag, properties, children)`, with
//! event bindings carried as ready-to-invoke callbacks instead of the opaque
//! correlation identifiers that arrived on the wire.
//!
//! # Equality ignores callback identity
//!
//! Translating the same tree twice necessarily produces distinct closures.
//! Backends that diff trees need a structural equality that does not care
//! about that, so `PartialEq` here compares tags, attributes, children, and
//! event *names*, never the callbacks themselves.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::translate::registry::WidgetKind;
use crate::wire::message::EventSnapshot;

/// A callback wired to an event-bearing view node.
///
/// Invoking it with the snapshot of a native event synchronously builds one
/// `OutboundMessage` (carrying the identifier captured at translation time)
/// and pushes it to the session's event sink.
pub type EventCallback = Arc<dyn Fn(&EventSnapshot) + Send + Sync>;

/// One node of the translated view tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    /// A text leaf, rendered verbatim.
    Text(String),
    /// A numeric leaf; backends decide formatting.
    Number(f64),
    /// An element (native or widget) with attributes, events, and children.
    Element(ViewElement),
}

impl ViewNode {
    /// Number of direct children (0 for leaves).
    pub fn child_count(&self) -> usize {
        match self {
            ViewNode::Element(e) => e.children.len(),
            _ => 0,
        }
    }

    /// The element payload, if this node is one.
    pub fn as_element(&self) -> Option<&ViewElement> {
        match self {
            ViewNode::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// Resolved tag of a view element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRef {
    /// A native element name, passed through for the view library to resolve.
    Native(String),
    /// A registered custom widget, substituted at translation time.
    Widget(WidgetKind),
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagRef::Native(tag) => write!(f, "{tag}"),
            TagRef::Widget(kind) => write!(f, "<widget {kind:?}>"),
        }
    }
}

/// The element payload of [`ViewNode::Element`].
#[derive(Clone)]
pub struct ViewElement {
    /// The resolved tag.
    pub tag: TagRef,
    /// Data attributes, copied verbatim from the wire node.
    pub attrs: BTreeMap<String, Value>,
    /// Event bindings, one per handler the wire node declared.
    pub events: Vec<EventBinding>,
    /// Ordered translated children.
    pub children: Vec<ViewNode>,
}

impl ViewElement {
    /// Looks up the callback bound to `event`, if any.
    pub fn callback(&self, event: &str) -> Option<&EventCallback> {
        self.events
            .iter()
            .find(|b| b.event == event)
            .map(|b| &b.callback)
    }
}

impl fmt::Debug for ViewElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewElement")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("events", &self.events)
            .field("children", &self.children)
            .finish()
    }
}

impl PartialEq for ViewElement {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.attrs == other.attrs
            && self.children == other.children
            && self.events.len() == other.events.len()
            && self
                .events
                .iter()
                .zip(other.events.iter())
                .all(|(a, b)| a.event == b.event)
    }
}

/// One event binding on a view element.
#[derive(Clone)]
pub struct EventBinding {
    /// Bare event name (`change`, `submit`, `click`, ...).
    pub event: String,
    /// The generated protocol callback.
    pub callback: EventCallback,
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The callback is a closure with no useful Debug form of its own.
        f.debug_struct("EventBinding")
            .field("event", &self.event)
            .field("callback", &"<closure>")
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop_callback() -> EventCallback {
        Arc::new(|_snapshot: &EventSnapshot| {})
    }

    fn sample_element(value: &str, event: &str) -> ViewElement {
        ViewElement {
            tag: TagRef::Native("input".to_string()),
            attrs: BTreeMap::from([("value".to_string(), json!(value))]),
            events: vec![EventBinding {
                event: event.to_string(),
                callback: noop_callback(),
            }],
            children: vec![ViewNode::Text("x".to_string())],
        }
    }

    #[test]
    fn test_structural_equality_ignores_callback_identity() {
        // Two distinct closures, same structure.
        let a = sample_element("hi", "change");
        let b = sample_element("hi", "change");
        assert_eq!(ViewNode::Element(a), ViewNode::Element(b));
    }

    #[test]
    fn test_structural_equality_sees_attribute_differences() {
        let a = sample_element("hi", "change");
        let b = sample_element("hey", "change");
        assert_ne!(ViewNode::Element(a), ViewNode::Element(b));
    }

    #[test]
    fn test_structural_equality_sees_event_name_differences() {
        let a = sample_element("hi", "change");
        let b = sample_element("hi", "submit");
        assert_ne!(ViewNode::Element(a), ViewNode::Element(b));
    }

    #[test]
    fn test_child_count_counts_direct_children_only() {
        let element = ViewElement {
            tag: TagRef::Native("div".to_string()),
            attrs: BTreeMap::new(),
            events: Vec::new(),
            children: vec![
                ViewNode::Text("a".to_string()),
                ViewNode::Element(sample_element("x", "change")),
            ],
        };
        assert_eq!(ViewNode::Element(element).child_count(), 2);
        assert_eq!(ViewNode::Text("leaf".to_string()).child_count(), 0);
    }

    #[test]
    fn test_callback_lookup_by_event_name() {
        let element = sample_element("hi", "change");
        assert!(element.callback("change").is_some());
        assert!(element.callback("submit").is_none());
    }
}
