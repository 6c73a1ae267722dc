//! Document arena and tree operations

use slotmap::{new_key_type, Key, SlotMap};

use crate::element::Element;

new_key_type! {
    pub struct ElementId;
}

impl ElementId {
    /// Convert to a raw u64 representation, for type-erased contexts
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Owns every element and the tree structure between them.
///
/// A fresh document contains a single `body` element; detached elements can
/// be created freely and attached with [`append_child`](Self::append_child)
/// or [`insert_after`](Self::insert_after).
pub struct Document {
    elements: SlotMap<ElementId, Element>,
    body: ElementId,
    focused: Option<ElementId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut elements = SlotMap::with_key();
        let body = elements.insert(Element::new("body"));
        Self {
            elements,
            body,
            focused: None,
        }
    }

    /// The root element
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: impl Into<String>) -> ElementId {
        self.elements.insert(Element::new(tag))
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if !self.elements.contains_key(parent) || !self.elements.contains_key(child) {
            return;
        }
        self.detach(child);
        self.elements[parent].children.push(child);
        self.elements[child].parent = Some(parent);
    }

    /// Insert `element` as the next sibling of `anchor`.
    ///
    /// An anchor with no parent is treated as a child of `body`, so the
    /// element lands at the end of the body.
    pub fn insert_after(&mut self, anchor: ElementId, element: ElementId) {
        if !self.elements.contains_key(anchor) || !self.elements.contains_key(element) {
            return;
        }
        self.detach(element);
        let parent = self.elements[anchor].parent.unwrap_or(self.body);
        let index = self.elements[parent]
            .children
            .iter()
            .position(|&c| c == anchor)
            .map(|i| i + 1)
            .unwrap_or(self.elements[parent].children.len());
        self.elements[parent].children.insert(index, element);
        self.elements[element].parent = Some(parent);
    }

    /// Unlink an element from its parent, keeping it (and its subtree) alive
    pub fn detach(&mut self, element: ElementId) {
        let Some(parent) = self.elements.get(element).and_then(|e| e.parent) else {
            return;
        };
        if let Some(p) = self.elements.get_mut(parent) {
            p.children.retain(|&c| c != element);
        }
        if let Some(e) = self.elements.get_mut(element) {
            e.parent = None;
        }
    }

    /// Remove an element and its entire subtree from the arena
    pub fn remove(&mut self, element: ElementId) {
        if !self.elements.contains_key(element) {
            return;
        }
        self.detach(element);

        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if let Some(e) = self.elements.remove(id) {
                stack.extend(e.children);
            }
            if self.focused == Some(id) {
                self.focused = None;
            }
        }
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.elements
            .get(id)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    pub fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.parent(id)?;
        let siblings = &self.elements.get(parent)?.children;
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    // =========================================================================
    // Element convenience accessors
    // =========================================================================

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.add_class(class);
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.remove_class(class);
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.has_class(class))
    }

    pub fn set_content(&mut self, id: ElementId, content: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.set_content(content);
        }
    }

    /// Content of an element; `""` for a missing element
    pub fn content(&self, id: ElementId) -> &str {
        self.elements.get(id).map(Element::content).unwrap_or("")
    }

    pub fn set_data(&mut self, id: ElementId, key: &str, value: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.set_data(key, value);
        }
    }

    pub fn data(&self, id: ElementId, key: &str) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.data(key))
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.set_value(value);
        }
    }

    pub fn value(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).and_then(Element::value)
    }

    pub fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(e) = self.elements.get_mut(id) {
            e.set_visible(visible);
        }
    }

    /// Visibility of an element; false for a missing element
    pub fn is_visible(&self, id: ElementId) -> bool {
        self.elements.get(id).is_some_and(Element::is_visible)
    }

    pub fn set_height(&mut self, id: ElementId, height: f32) {
        if let Some(e) = self.elements.get_mut(id) {
            e.set_height(height);
        }
    }

    pub fn height(&self, id: ElementId) -> f32 {
        self.elements.get(id).map(Element::height).unwrap_or(0.0)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn focus(&mut self, id: ElementId) {
        if self.elements.contains_key(id) {
            self.focused = Some(id);
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_structure() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("span");

        doc.append_child(doc.body(), parent);
        doc.append_child(parent, child);

        assert_eq!(doc.parent(child), Some(parent));
        assert_eq!(doc.children(parent), vec![child]);
        assert_eq!(doc.children(doc.body()), vec![parent]);
    }

    #[test]
    fn test_insert_after_orders_siblings() {
        let mut doc = Document::new();
        let a = doc.create_element("span");
        let b = doc.create_element("span");
        let c = doc.create_element("div");

        doc.append_child(doc.body(), a);
        doc.append_child(doc.body(), b);
        doc.insert_after(a, c);

        assert_eq!(doc.children(doc.body()), vec![a, c, b]);
        assert_eq!(doc.next_sibling(a), Some(c));
        assert_eq!(doc.next_sibling(c), Some(b));
    }

    #[test]
    fn test_insert_after_detached_anchor_lands_in_body() {
        let mut doc = Document::new();
        let anchor = doc.create_element("span");
        let el = doc.create_element("div");

        doc.insert_after(anchor, el);
        assert_eq!(doc.parent(el), Some(doc.body()));
    }

    #[test]
    fn test_remove_drops_subtree_and_focus() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("input");
        doc.append_child(doc.body(), parent);
        doc.append_child(parent, child);
        doc.focus(child);

        doc.remove(parent);

        assert!(!doc.contains(parent));
        assert!(!doc.contains(child));
        assert_eq!(doc.focused(), None);
        assert!(doc.children(doc.body()).is_empty());
    }

    #[test]
    fn test_classes() {
        let mut doc = Document::new();
        let el = doc.create_element("div");

        doc.add_class(el, "editable");
        doc.add_class(el, "editable");
        assert!(doc.has_class(el, "editable"));
        assert_eq!(doc.element(el).unwrap().classes().len(), 1);

        doc.remove_class(el, "editable");
        assert!(!doc.has_class(el, "editable"));
    }

    #[test]
    fn test_content_value_and_visibility() {
        let mut doc = Document::new();
        let el = doc.create_element("input");

        doc.set_content(el, "hello");
        assert_eq!(doc.content(el), "hello");

        doc.set_value(el, "typed");
        assert_eq!(doc.value(el), Some("typed"));

        assert!(doc.is_visible(el));
        doc.set_visible(el, false);
        assert!(!doc.is_visible(el));
    }

    #[test]
    fn test_dataset() {
        let mut doc = Document::new();
        let el = doc.create_element("span");
        doc.set_data(el, "value", "42");
        assert_eq!(doc.data(el, "value"), Some("42"));
        assert_eq!(doc.data(el, "missing"), None);
    }
}
