//! Element data: tag, classes, dataset, content, visibility

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::document::ElementId;

/// A single element in the tree.
///
/// Structure (parent/children) is owned by the [`Document`](crate::Document)
/// and mutated only through it, so links stay consistent.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    classes: SmallVec<[String; 4]>,
    dataset: FxHashMap<String, String>,
    content: String,
    value: Option<String>,
    visible: bool,
    height: f32,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
}

impl Element {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: SmallVec::new(),
            dataset: FxHashMap::default(),
            content: String::new(),
            value: None,
            visible: true,
            height: 0.0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Tag name ("div", "span", "button", ...)
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Class list, in insertion order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Dataset entry (`data-*` attribute analog)
    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.dataset.insert(key.into(), value.into());
    }

    /// Content as an opaque markup string
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Form value, for input-like elements
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Measured height as reported by the host
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}
