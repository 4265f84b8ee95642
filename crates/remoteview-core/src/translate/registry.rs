//! The closed set of custom widget names the translator can resolve.
//!
//! The wire protocol distinguishes native elements (lowercase tags, resolved
//! by the view library) from custom widgets (uppercase tags, resolved here by
//! local lookup). The set is closed on purpose: a tag never names arbitrary
//! code, only an entry in this table.

use std::collections::BTreeMap;

/// The widgets a host build knows how to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum WidgetKind {
    /// A controlled text input: keeps a local echo of its value for
    /// responsive typing, resynchronized from attributes after every round
    /// trip. See `remoteview-host`'s widget module for the implementation.
    TextInput,
}

/// Widget-name → widget-kind lookup table.
///
/// [`WidgetRegistry::default`] registers the standard set (`Input`). Hosts
/// embedding additional widgets extend it with [`WidgetRegistry::register`]
/// before constructing their translator.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    widgets: BTreeMap<String, WidgetKind>,
}

impl WidgetRegistry {
    /// An empty registry with no widgets at all.
    pub fn empty() -> Self {
        Self {
            widgets: BTreeMap::new(),
        }
    }

    /// Registers `name` as a reference to `kind`, replacing any previous
    /// registration of the same name.
    pub fn register(&mut self, name: impl Into<String>, kind: WidgetKind) {
        self.widgets.insert(name.into(), kind);
    }

    /// Resolves a widget name to its kind.
    pub fn resolve(&self, name: &str) -> Option<WidgetKind> {
        self.widgets.get(name).copied()
    }

    /// Whether `tag` is written as a widget reference.
    ///
    /// Widget references start with an uppercase ASCII letter; native tags
    /// are lowercase. This is a structural property of the wire protocol,
    /// not a convention of this table.
    pub fn is_widget_reference(tag: &str) -> bool {
        tag.chars().next().is_some_and(|c| c.is_ascii_uppercase())
    }
}

impl Default for WidgetRegistry {
    /// The standard registry: `Input` → [`WidgetKind::TextInput`].
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("Input", WidgetKind::TextInput);
        registry
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
