//! Input factory contract
//!
//! The factory is the widget's external collaborator: given a descriptor
//! merged with the current committed value, it builds the editing control
//! and delivers it through a callback. The contract is asynchronous - a
//! factory may invoke the callback before returning or hold it until the
//! control is available (e.g. options fetched elsewhere).

use inlay_core::value_text;
use inlay_dom::{Document, ElementId};
use serde::Deserialize;
use serde_json::Value;

use crate::context::EditorContext;

/// Kind of input control a factory can produce
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Single-line text input (default)
    #[default]
    Text,
    /// Multi-line text input
    Textarea,
    /// Selection control with labeled options
    Select,
}

/// A labeled choice for selection controls
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

/// Factory descriptor: input kind plus kind-specific parameters
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct InputDescriptor {
    #[serde(rename = "type")]
    pub kind: InputKind,
    /// Declared option list for selection controls
    pub options: Option<Vec<SelectOption>>,
}

/// Factory request: the descriptor merged with the committed value
#[derive(Clone, Debug)]
pub struct InputProps {
    pub descriptor: InputDescriptor,
    pub placeholder: String,
    pub value: Value,
}

/// The constructed editing control.
///
/// Wraps the input element plus the input semantics the widget needs:
/// value access, select-all, and option labels for selection controls.
/// The element's form value is the single source of truth for the text.
pub struct InputControl {
    element: ElementId,
    kind: InputKind,
    options: Vec<SelectOption>,
    selection: Option<(usize, usize)>,
}

impl InputControl {
    pub fn new(element: ElementId, kind: InputKind) -> Self {
        Self {
            element,
            kind,
            options: Vec::new(),
            selection: None,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Current text of the control; `""` when the element has no value
    pub fn value(&self, doc: &Document) -> String {
        doc.value(self.element).unwrap_or_default().to_string()
    }

    /// Replace the control's text, dropping any selection
    pub fn set_value(&mut self, doc: &mut Document, text: &str) {
        doc.set_value(self.element, text);
        self.selection = None;
    }

    /// Select the entire text
    pub fn select_all(&mut self, doc: &Document) {
        let len = self.value(doc).chars().count();
        self.selection = Some((0, len));
    }

    /// Selection span in characters, if any
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Options present on the control (declared or populated later)
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Replace the option list, for selects populated after construction
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
    }

    /// Label of the option matching the control's current text
    pub fn selected_label(&self, doc: &Document) -> Option<&str> {
        let current = doc.value(self.element).unwrap_or_default();
        self.options
            .iter()
            .find(|o| value_text(&o.value) == current)
            .map(|o| o.label.as_str())
    }
}

/// Callback through which a factory delivers its constructed control
pub type InputReady = Box<dyn FnOnce(&mut EditorContext, InputControl) + Send>;

/// Builds editing controls for inline editors.
///
/// Implementations create the input element in the context's document and
/// invoke `ready` once the control is usable. The widget assumes the
/// callback eventually fires; until then the instance stays pending.
pub trait InputFactory: Send + Sync {
    fn create(&self, props: InputProps, ctx: &mut EditorContext, ready: InputReady);
}

/// Reference factory covering the built-in input kinds.
///
/// Builds the control synchronously: an `input`, `textarea`, or `select`
/// element prefilled with the committed value, with declared options
/// carried onto the control.
pub struct TextInputFactory;

impl InputFactory for TextInputFactory {
    fn create(&self, props: InputProps, ctx: &mut EditorContext, ready: InputReady) {
        let doc = ctx.document_mut();
        let tag = match props.descriptor.kind {
            InputKind::Text => "input",
            InputKind::Textarea => "textarea",
            InputKind::Select => "select",
        };
        let element = doc.create_element(tag);
        doc.add_class(element, "inlay-input");
        if !props.placeholder.is_empty() {
            doc.set_data(element, "placeholder", &props.placeholder);
        }
        doc.set_value(element, &value_text(&props.value));

        let mut control = InputControl::new(element, props.descriptor.kind);
        if let Some(options) = props.descriptor.options {
            control.set_options(options);
        }
        ready(ctx, control);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption {
                value: json!(1),
                label: "Low".to_string(),
            },
            SelectOption {
                value: json!(2),
                label: "High".to_string(),
            },
        ]
    }

    #[test]
    fn test_control_value_round_trip() {
        let mut doc = Document::new();
        let element = doc.create_element("input");
        let mut control = InputControl::new(element, InputKind::Text);

        assert_eq!(control.value(&doc), "");
        control.set_value(&mut doc, "hello");
        assert_eq!(control.value(&doc), "hello");
    }

    #[test]
    fn test_select_all_spans_the_text() {
        let mut doc = Document::new();
        let element = doc.create_element("input");
        let mut control = InputControl::new(element, InputKind::Text);

        control.set_value(&mut doc, "héllo");
        control.select_all(&doc);
        assert_eq!(control.selection(), Some((0, 5)));

        control.set_value(&mut doc, "x");
        assert_eq!(control.selection(), None);
    }

    #[test]
    fn test_selected_label_matches_textually() {
        let mut doc = Document::new();
        let element = doc.create_element("select");
        let mut control = InputControl::new(element, InputKind::Select);
        control.set_options(options());

        control.set_value(&mut doc, "2");
        assert_eq!(control.selected_label(&doc), Some("High"));

        control.set_value(&mut doc, "9");
        assert_eq!(control.selected_label(&doc), None);
    }

    #[test]
    fn test_descriptor_deserializes_from_dataset_json() {
        let descriptor: InputDescriptor = serde_json::from_str(
            r#"{"type": "select", "options": [{"value": 1, "label": "Low"}]}"#,
        )
        .unwrap();
        assert_eq!(descriptor.kind, InputKind::Select);
        assert_eq!(descriptor.options.unwrap()[0].label, "Low");

        let default: InputDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(default.kind, InputKind::Text);
        assert!(default.options.is_none());
    }
}
