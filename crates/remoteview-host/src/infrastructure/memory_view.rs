//! An in-process view backend.
//!
//! [`MemoryView`] holds the currently displayed tree, validates native tag
//! names, and routes fired events into the tree's callbacks. Change events on
//! text-input widgets pass through the widget's [`ControlledInput`] state so
//! the local echo behaves exactly as it would in a real toolkit binding.
//!
//! Each apply replaces the whole tree. Controlled-input state survives the
//! replacement keyed by tree path, mirroring how positional reconciliation
//! keeps component state alive across re-renders.

use std::collections::BTreeMap;

use remoteview_core::{EventSnapshot, TagRef, ViewNode, WidgetKind};

use crate::application::ports::{ViewBackend, ViewError};
use crate::widgets::ControlledInput;

/// A [`ViewBackend`] that stores the tree in memory.
#[derive(Default)]
pub struct MemoryView {
    root: Option<ViewNode>,
    inputs: BTreeMap<Vec<usize>, ControlledInput>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires a native event at the node addressed by `path` (child indices
    /// from the root).
    ///
    /// # Errors
    ///
    /// Fails when nothing is mounted, when the path addresses no element, or
    /// when the element carries no handler for `event`.
    pub fn fire_event(
        &mut self,
        path: &[usize],
        event: &str,
        snapshot: EventSnapshot,
    ) -> Result<(), ViewError> {
        let not_found = || ViewError::NodeNotFound {
            path: path.to_vec(),
        };

        let (callback, through_input) = {
            let root = self.root.as_ref().ok_or(ViewError::NotMounted)?;
            let element = node_at(root, path)
                .and_then(ViewNode::as_element)
                .ok_or_else(not_found)?;
            let callback = element
                .callback(event)
                .cloned()
                .ok_or_else(|| ViewError::NoHandler {
                    path: path.to_vec(),
                    event: event.to_string(),
                })?;
            let through_input = event == "change"
                && matches!(element.tag, TagRef::Widget(WidgetKind::TextInput));
            (callback, through_input)
        };

        if through_input {
            if let Some(input) = self.inputs.get_mut(path) {
                input.change(&snapshot, &callback);
                return Ok(());
            }
        }
        callback(&snapshot);
        Ok(())
    }

    /// The echoed value of the text input at `path`, if one is mounted there.
    pub fn input_value(&self, path: &[usize]) -> Option<&str> {
        self.inputs.get(path).map(ControlledInput::value)
    }

    fn install(&mut self, tree: ViewNode) -> Result<(), ViewError> {
        validate(&tree)?;
        self.sync_inputs(&tree);
        self.root = Some(tree);
        Ok(())
    }

    /// Rebuilds controlled-input state for `tree`, carrying over existing
    /// state at matching paths and dropping state for inputs that vanished.
    fn sync_inputs(&mut self, tree: &ViewNode) {
        let mut mounted = Vec::new();
        collect_inputs(tree, &mut Vec::new(), &mut mounted);

        let mut inputs = BTreeMap::new();
        for (path, value) in mounted {
            let mut input = self.inputs.remove(&path).unwrap_or_default();
            input.sync_from_props(&value);
            inputs.insert(path, input);
        }
        self.inputs = inputs;
    }
}

impl ViewBackend for MemoryView {
    fn mount(&mut self, tree: ViewNode) -> Result<(), ViewError> {
        self.install(tree)
    }

    fn apply(&mut self, tree: ViewNode) -> Result<(), ViewError> {
        self.install(tree)
    }

    fn current(&self) -> Option<&ViewNode> {
        self.root.as_ref()
    }
}

/// Walks `path` down the tree by child index.
fn node_at<'a>(root: &'a ViewNode, path: &[usize]) -> Option<&'a ViewNode> {
    let mut node = root;
    for &index in path {
        node = node.as_element()?.children.get(index)?;
    }
    Some(node)
}

/// Records the path and declared value of every text-input widget.
fn collect_inputs(node: &ViewNode, path: &mut Vec<usize>, out: &mut Vec<(Vec<usize>, String)>) {
    let Some(element) = node.as_element() else {
        return;
    };
    if matches!(element.tag, TagRef::Widget(WidgetKind::TextInput)) {
        let value = element
            .attrs
            .get("value")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        out.push((path.clone(), value));
    }
    for (index, child) in element.children.iter().enumerate() {
        path.push(index);
        collect_inputs(child, path, out);
        path.pop();
    }
}

/// Rejects native tags the toolkit could not materialize.
fn validate(node: &ViewNode) -> Result<(), ViewError> {
    let Some(element) = node.as_element() else {
        return Ok(());
    };
    if let TagRef::Native(tag) = &element.tag {
        let well_formed = !tag.is_empty()
            && tag
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !well_formed {
            return Err(ViewError::InvalidTag { tag: tag.clone() });
        }
    }
    for child in &element.children {
        validate(child)?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
