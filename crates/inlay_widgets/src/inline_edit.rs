//! The inline click-to-edit widget
//!
//! An [`InlineEdit`] turns a display element into an editor: a trigger
//! interaction swaps the element for an input control with confirm/cancel
//! buttons and an error container (the tools fragment), and a confirmed
//! change is handed to the caller-supplied update delegate. The delegate
//! eventually raises a success or error notification back on the instance.
//!
//! Instances are owned and orchestrated by an
//! [`EditorContext`](crate::EditorContext); the widget itself holds the
//! per-instance state: committed value, error list, statechart, and the
//! generated fragments.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Value};

use inlay_core::events::{event_types, trigger_from_name, Event};
use inlay_core::fsm::StateMachine;
use inlay_core::template::{format, nl2br, value_text};
use inlay_core::Error;
use inlay_dom::{Document, ElementId};

use crate::context::{EditorContext, EditorId};
use crate::factory::{InputControl, InputDescriptor, InputFactory, InputKind};

/// Minimum height for a multi-line input opened over a tall display element
pub const MIN_TEXTAREA_HEIGHT: f32 = 120.0;

/// Widget statechart states
pub mod states {
    /// Showing the committed value as static content
    pub const DISPLAY: u32 = 0;
    /// Waiting on the input factory after a trigger
    pub const PENDING: u32 = 1;
    /// Tools visible, input accepting edits
    pub const EDITING: u32 = 2;
    /// Terminal; all bindings removed
    pub const DESTROYED: u32 = 3;
}

/// Markup templates rendered through the template formatter
pub mod templates {
    /// One rendered error entry in the errors container
    pub const ERROR: &str = r#"<div class="editable-error">{{ error }}</div>"#;
    /// Markup shown in place of an empty committed value
    pub const PLACEHOLDER: &str = r#"<span class="placeholder">{{ placeholder }}</span>"#;
}

/// Class names applied to generated fragments
mod class {
    pub const EDITABLE: &str = "editable";
    pub const TOOLS: &str = "editable-tools";
    pub const BUTTONS: &str = "editable-buttons";
    pub const BUTTON_GROUP: &str = "btn-group";
    pub const BUTTON: &str = "btn";
    pub const BUTTON_BASE: &str = "btn-inlay";
    pub const CONFIRM: &str = "btn-inlay-confirm";
    pub const CANCEL: &str = "btn-inlay-cancel";
    pub const ERRORS: &str = "editable-errors";
    pub const HAS_ERROR: &str = "has-error";
    pub const ICON: &str = "overlay-icon";
}

/// Update delegate: receives the context, the instance id, and the
/// candidate value, and must eventually raise a success or error
/// notification on the instance.
pub type UpdateFn = Arc<dyn Fn(&mut EditorContext, EditorId, &Value) + Send + Sync>;

/// Success hook: receives the notification event, the new value, the
/// previous value, and the optional external model payload.
pub type SuccessFn = Arc<dyn Fn(&Event, &Value, &Value, Option<&Value>) + Send + Sync>;

/// The default update delegate: commits the candidate immediately by
/// raising a success notification, for pure client-side edits.
pub fn default_update() -> UpdateFn {
    Arc::new(|ctx, id, value| ctx.notify_success(id, value.clone(), None))
}

/// InlineEdit configuration
#[derive(Clone)]
pub struct InlineEditConfig {
    /// Input factory descriptor
    pub factory: InputDescriptor,
    /// Static value -> label overrides for display rendering
    pub tag: IndexMap<String, String>,
    /// Interaction that opens the editor
    pub trigger: u32,
    /// Update delegate invoked on a changed confirm
    pub update: UpdateFn,
    /// Hook invoked on a success notification
    pub success: Option<SuccessFn>,
    /// Message describing a factory failure, for hosts that surface it
    pub error_message: String,
    /// Markup text shown in place of an empty value
    pub placeholder: String,
}

impl Default for InlineEditConfig {
    fn default() -> Self {
        Self {
            factory: InputDescriptor::default(),
            tag: IndexMap::new(),
            trigger: event_types::CLICK,
            update: default_update(),
            success: None,
            error_message: "Unable to generate the input.".to_string(),
            placeholder: String::new(),
        }
    }
}

impl InlineEditConfig {
    /// Overlay recognized dataset entries from the display element.
    ///
    /// Malformed entries are logged and skipped; configuration never aborts.
    pub(crate) fn apply_dataset(&mut self, doc: &Document, element: ElementId) {
        if let Some(raw) = doc.data(element, "factory") {
            match serde_json::from_str(raw) {
                Ok(descriptor) => self.factory = descriptor,
                Err(source) => warn_invalid("factory", source),
            }
        }
        if let Some(raw) = doc.data(element, "tag") {
            match serde_json::from_str::<IndexMap<String, String>>(raw) {
                Ok(tag) => self.tag = tag,
                Err(source) => warn_invalid("tag", source),
            }
        }
        if let Some(name) = doc.data(element, "trigger") {
            match trigger_from_name(name) {
                Some(trigger) => self.trigger = trigger,
                None => tracing::warn!(trigger = name, "unknown trigger name, keeping default"),
            }
        }
        if let Some(message) = doc.data(element, "error-message") {
            self.error_message = message.to_string();
        }
        if let Some(placeholder) = doc.data(element, "placeholder") {
            self.placeholder = placeholder.to_string();
        }
    }
}

fn warn_invalid(key: &str, source: serde_json::Error) {
    let err = Error::InvalidOption {
        key: key.to_string(),
        source,
    };
    tracing::warn!(%err, "ignoring declarative option");
}

/// Create an inline editor builder
pub fn inline_edit() -> InlineEditBuilder {
    InlineEditBuilder::default()
}

/// Builder recording caller overrides.
///
/// Unset fields fall through to the dataset-resolved defaults at attach
/// time, giving the defaults <- dataset <- caller merge order.
#[derive(Default)]
pub struct InlineEditBuilder {
    factory: Option<InputDescriptor>,
    kind: Option<InputKind>,
    tag: Option<IndexMap<String, String>>,
    trigger: Option<u32>,
    update: Option<UpdateFn>,
    success: Option<SuccessFn>,
    error_message: Option<String>,
    placeholder: Option<String>,
}

impl InlineEditBuilder {
    /// Set the full factory descriptor
    pub fn factory(mut self, descriptor: InputDescriptor) -> Self {
        self.factory = Some(descriptor);
        self
    }

    /// Set the input kind, keeping other factory parameters
    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Use a multi-line input
    pub fn textarea(self) -> Self {
        self.kind(InputKind::Textarea)
    }

    /// Use a selection control with the given options
    pub fn select(mut self, options: Vec<crate::factory::SelectOption>) -> Self {
        self.factory = Some(InputDescriptor {
            kind: InputKind::Select,
            options: Some(options),
        });
        self
    }

    /// Add a static value -> label display override
    pub fn tag_label(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.tag
            .get_or_insert_with(IndexMap::new)
            .insert(value.into(), label.into());
        self
    }

    /// Set the interaction that opens the editor
    pub fn trigger(mut self, event_type: u32) -> Self {
        self.trigger = Some(event_type);
        self
    }

    /// Set the update delegate
    pub fn update<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut EditorContext, EditorId, &Value) + Send + Sync + 'static,
    {
        self.update = Some(Arc::new(f));
        self
    }

    /// Set the success hook
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event, &Value, &Value, Option<&Value>) + Send + Sync + 'static,
    {
        self.success = Some(Arc::new(f));
        self
    }

    /// Set the factory failure message
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set the empty-value placeholder text
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub(crate) fn apply(self, mut config: InlineEditConfig) -> InlineEditConfig {
        if let Some(factory) = self.factory {
            config.factory = factory;
        }
        if let Some(kind) = self.kind {
            config.factory.kind = kind;
        }
        if let Some(tag) = self.tag {
            config.tag = tag;
        }
        if let Some(trigger) = self.trigger {
            config.trigger = trigger;
        }
        if let Some(update) = self.update {
            config.update = update;
        }
        if let Some(success) = self.success {
            config.success = Some(success);
        }
        if let Some(error_message) = self.error_message {
            config.error_message = error_message;
        }
        if let Some(placeholder) = self.placeholder {
            config.placeholder = placeholder;
        }
        config
    }
}

/// Per-instance state of an inline editor
pub struct InlineEdit {
    pub(crate) element: ElementId,
    pub(crate) config: InlineEditConfig,
    pub(crate) factory: Arc<dyn InputFactory>,
    pub(crate) fsm: StateMachine,
    pub(crate) value: Value,
    errors: Vec<String>,
    pub(crate) input: Option<InputControl>,
    icon: Option<ElementId>,
    tools: Option<ElementId>,
    buttons: Option<ElementId>,
    pub(crate) confirm_button: Option<ElementId>,
    pub(crate) cancel_button: Option<ElementId>,
    error_box: Option<ElementId>,
}

impl InlineEdit {
    pub(crate) fn new(
        element: ElementId,
        config: InlineEditConfig,
        factory: Arc<dyn InputFactory>,
        value: Value,
    ) -> Self {
        Self {
            element,
            config,
            factory,
            fsm: Self::create_fsm(),
            value,
            errors: Vec::new(),
            input: None,
            icon: None,
            tools: None,
            buttons: None,
            confirm_button: None,
            cancel_button: None,
            error_box: None,
        }
    }

    fn create_fsm() -> StateMachine {
        StateMachine::builder(states::DISPLAY)
            // A trigger always passes through pending; a cached input
            // delivers INPUT_READY synchronously. Repeated triggers while
            // pending have no transition and are absorbed.
            .on(states::DISPLAY, event_types::TRIGGER, states::PENDING)
            .on(states::PENDING, event_types::INPUT_READY, states::EDITING)
            .on(states::PENDING, event_types::CANCEL, states::DISPLAY)
            .on(states::EDITING, event_types::CANCEL, states::DISPLAY)
            .on(states::EDITING, event_types::SUCCESS, states::DISPLAY)
            .on(states::DISPLAY, event_types::DESTROY, states::DESTROYED)
            .on(states::PENDING, event_types::DESTROY, states::DESTROYED)
            .on(states::EDITING, event_types::DESTROY, states::DESTROYED)
            .build()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The display element this editor owns
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Current statechart state (one of [`states`])
    pub fn state(&self) -> u32 {
        self.fsm.current_state()
    }

    /// Whether this editor is the open one
    pub fn is_active(&self) -> bool {
        self.state() == states::EDITING
    }

    /// Last committed value, never a speculative edit
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Current validation error messages
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn config(&self) -> &InlineEditConfig {
        &self.config
    }

    /// Input kind from the factory descriptor
    pub fn input_kind(&self) -> InputKind {
        self.config.factory.kind
    }

    /// The editing control, once the factory has delivered it
    pub fn input(&self) -> Option<&InputControl> {
        self.input.as_ref()
    }

    /// The tools fragment, once built
    pub fn tools_element(&self) -> Option<ElementId> {
        self.tools
    }

    /// The button group inside the tools fragment
    pub fn buttons_element(&self) -> Option<ElementId> {
        self.buttons
    }

    pub fn confirm_button(&self) -> Option<ElementId> {
        self.confirm_button
    }

    pub fn cancel_button(&self) -> Option<ElementId> {
        self.cancel_button
    }

    pub fn error_box(&self) -> Option<ElementId> {
        self.error_box
    }

    pub fn icon(&self) -> Option<ElementId> {
        self.icon
    }

    /// Swap the input factory for subsequent control construction
    pub fn set_input_factory(&mut self, factory: Arc<dyn InputFactory>) {
        self.factory = factory;
    }

    pub fn has_placeholder(&self) -> bool {
        !self.config.placeholder.trim().is_empty()
    }

    fn placeholder_markup(&self) -> String {
        format(
            templates::PLACEHOLDER,
            &json!({ "placeholder": self.config.placeholder }),
        )
    }

    // =========================================================================
    // Setup and fragments
    // =========================================================================

    pub(crate) fn setup(&mut self, doc: &mut Document) {
        if self.has_placeholder() && doc.content(self.element).trim().is_empty() {
            let markup = self.placeholder_markup();
            doc.set_content(self.element, &markup);
        }
        doc.add_class(self.element, class::EDITABLE);
        self.generate_icon(doc);
    }

    fn generate_icon(&mut self, doc: &mut Document) {
        let icon = doc.create_element("i");
        for name in [class::ICON, "fa", "fa-pencil"] {
            doc.add_class(icon, name);
        }
        doc.append_child(self.element, icon);
        self.icon = Some(icon);
    }

    /// Factory request for the current configuration and committed value
    pub(crate) fn input_props(&self) -> crate::factory::InputProps {
        crate::factory::InputProps {
            descriptor: self.config.factory.clone(),
            placeholder: self.config.placeholder.clone(),
            value: self.value.clone(),
        }
    }

    /// Build the tools fragment around the delivered input control and
    /// insert it after the display element. Called once; the fragment is
    /// cached for later edit sessions.
    pub(crate) fn build_tools(&mut self, doc: &mut Document) {
        let Some(input) = &self.input else {
            return;
        };
        let input_element = input.element();

        let confirm = doc.create_element("button");
        for name in [class::BUTTON, class::BUTTON_BASE, class::CONFIRM] {
            doc.add_class(confirm, name);
        }
        let cancel = doc.create_element("button");
        for name in [class::BUTTON, class::BUTTON_BASE, class::CANCEL] {
            doc.add_class(cancel, name);
        }
        let buttons = doc.create_element("div");
        doc.add_class(buttons, class::BUTTONS);
        doc.add_class(buttons, class::BUTTON_GROUP);
        doc.append_child(buttons, confirm);
        doc.append_child(buttons, cancel);

        let error_box = doc.create_element("div");
        doc.add_class(error_box, class::ERRORS);

        let tools = doc.create_element("div");
        doc.add_class(tools, class::TOOLS);
        doc.append_child(tools, input_element);
        doc.append_child(tools, buttons);
        doc.append_child(tools, error_box);
        doc.insert_after(self.element, tools);

        self.tools = Some(tools);
        self.buttons = Some(buttons);
        self.confirm_button = Some(confirm);
        self.cancel_button = Some(cancel);
        self.error_box = Some(error_box);
    }

    // =========================================================================
    // Activation and wrapup
    // =========================================================================

    /// Show the tools and hand focus to the input. The context has already
    /// deactivated every other instance.
    pub(crate) fn activate(&mut self, doc: &mut Document) {
        let height = doc.height(self.element);

        if let Some(tools) = self.tools {
            doc.set_visible(tools, true);
        }
        if let Some(input) = &mut self.input {
            doc.focus(input.element());
            input.select_all(doc);
            if input.kind() == InputKind::Textarea {
                doc.set_height(input.element(), height.max(MIN_TEXTAREA_HEIGHT));
            }
        }
        doc.set_visible(self.element, false);
    }

    /// Return to display mode: clear errors, hide the tools, reset the
    /// input to the committed value, re-render the display element, and
    /// regenerate the edit-affordance icon.
    pub(crate) fn wrapup(&mut self, doc: &mut Document) {
        self.clear_errors(doc);
        if let Some(tools) = self.tools {
            doc.set_visible(tools, false);
        }
        let committed = value_text(&self.value);
        if let Some(input) = &mut self.input {
            input.set_value(doc, &committed);
        }
        let tag = self.value_tag(doc);
        doc.set_content(self.element, &tag);
        doc.set_visible(self.element, true);
        if let Some(icon) = self.icon.take() {
            doc.remove(icon);
        }
        self.generate_icon(doc);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(crate) fn set_errors(&mut self, doc: &mut Document, errors: Vec<String>) {
        self.errors = errors;
        self.compile_errors(doc);
    }

    pub(crate) fn add_error(&mut self, doc: &mut Document, error: String) {
        self.errors.push(error);
        self.compile_errors(doc);
    }

    pub(crate) fn clear_errors(&mut self, doc: &mut Document) {
        self.errors.clear();
        if let Some(tools) = self.tools {
            doc.remove_class(tools, class::HAS_ERROR);
        }
        self.compile_errors(doc);
    }

    fn compile_errors(&mut self, doc: &mut Document) {
        let Some(error_box) = self.error_box else {
            return;
        };
        if !self.errors.is_empty() {
            if let Some(tools) = self.tools {
                doc.add_class(tools, class::HAS_ERROR);
            }
        }
        let markup: String = self
            .errors
            .iter()
            .map(|error| format(templates::ERROR, &json!({ "error": error })))
            .collect();
        doc.set_content(error_box, &markup);
    }

    // =========================================================================
    // Display rendering
    // =========================================================================

    /// Resolve what the display element shows for the committed value.
    ///
    /// Priority: static tag-map label, declared factory option label (with
    /// the control's selected option as fallback for options loaded after
    /// construction), the selected option of a dynamically populated
    /// selection control, the placeholder markup for an empty value, and
    /// finally the trimmed text with newlines as `<br/>`.
    pub fn value_tag(&self, doc: &Document) -> String {
        let key = value_text(&self.value);

        if let Some(label) = self.config.tag.get(&key) {
            return label.clone();
        }

        if let Some(options) = &self.config.factory.options {
            if let Some(option) = options.iter().find(|o| value_text(&o.value) == key) {
                return option.label.clone();
            }
            return self
                .input
                .as_ref()
                .and_then(|input| input.selected_label(doc))
                .unwrap_or_default()
                .to_string();
        }

        if self.input.as_ref().is_some_and(InputControl::has_options) {
            return self
                .input
                .as_ref()
                .and_then(|input| input.selected_label(doc))
                .unwrap_or_default()
                .to_string();
        }

        if key.is_empty() && self.has_placeholder() {
            return self.placeholder_markup();
        }

        nl2br(key.trim())
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Render the final value, strip the editable affordances, and drop the
    /// generated fragments. The context removes the instance afterwards;
    /// this is irreversible.
    pub(crate) fn destroy(&mut self, doc: &mut Document) {
        let tag = self.value_tag(doc);
        doc.set_content(self.element, &tag);
        doc.set_visible(self.element, true);
        doc.remove_class(self.element, class::EDITABLE);
        if let Some(icon) = self.icon.take() {
            doc.remove(icon);
        }
        if let Some(tools) = self.tools.take() {
            doc.remove(tools);
        }
        self.input = None;
        self.buttons = None;
        self.confirm_button = None;
        self.cancel_button = None;
        self.error_box = None;
        self.fsm.send(event_types::DESTROY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{SelectOption, TextInputFactory};

    fn editor_with(config: InlineEditConfig, value: Value) -> (Document, InlineEdit) {
        let mut doc = Document::new();
        let element = doc.create_element("span");
        let body = doc.body();
        doc.append_child(body, element);
        let editor = InlineEdit::new(element, config, Arc::new(TextInputFactory), value);
        (doc, editor)
    }

    fn select_options() -> Vec<SelectOption> {
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
    fn test_fsm_absorbs_triggers_while_pending() {
        let (_doc, mut editor) = editor_with(InlineEditConfig::default(), json!("hello"));

        assert_eq!(editor.state(), states::DISPLAY);
        assert!(editor.fsm.send(event_types::TRIGGER));
        assert_eq!(editor.state(), states::PENDING);

        // A second trigger during the factory window has no transition
        assert!(!editor.fsm.send(event_types::TRIGGER));
        assert_eq!(editor.state(), states::PENDING);

        assert!(editor.fsm.send(event_types::INPUT_READY));
        assert_eq!(editor.state(), states::EDITING);
    }

    #[test]
    fn test_value_tag_prefers_static_tag_labels() {
        let mut config = InlineEditConfig::default();
        config.factory.kind = InputKind::Select;
        config.factory.options = Some(select_options());
        config.tag.insert("2".to_string(), "Two".to_string());

        let (doc, editor) = editor_with(config, json!(2));
        assert_eq!(editor.value_tag(&doc), "Two");
    }

    #[test]
    fn test_value_tag_resolves_declared_option_labels() {
        let mut config = InlineEditConfig::default();
        config.factory.kind = InputKind::Select;
        config.factory.options = Some(select_options());

        let (doc, editor) = editor_with(config, json!(2));
        assert_eq!(editor.value_tag(&doc), "High");
    }

    #[test]
    fn test_value_tag_renders_placeholder_for_empty_value() {
        let mut config = InlineEditConfig::default();
        config.placeholder = "Nothing here".to_string();

        let (doc, editor) = editor_with(config, json!(""));
        assert_eq!(
            editor.value_tag(&doc),
            r#"<span class="placeholder">Nothing here</span>"#
        );
    }

    #[test]
    fn test_value_tag_trims_and_converts_newlines() {
        let (doc, editor) = editor_with(InlineEditConfig::default(), json!("  line1\nline2  "));
        assert_eq!(editor.value_tag(&doc), "line1<br/>line2");
    }

    #[test]
    fn test_setup_marks_element_and_renders_placeholder() {
        let mut config = InlineEditConfig::default();
        config.placeholder = "Empty".to_string();

        let (mut doc, mut editor) = editor_with(config, json!(""));
        editor.setup(&mut doc);

        let element = editor.element();
        assert!(doc.has_class(element, "editable"));
        assert_eq!(doc.content(element), r#"<span class="placeholder">Empty</span>"#);

        let icon = editor.icon().unwrap();
        assert!(doc.has_class(icon, "overlay-icon"));
        assert_eq!(doc.parent(icon), Some(element));
    }

    #[test]
    fn test_builder_merge_order() {
        let mut base = InlineEditConfig::default();
        base.placeholder = "from dataset".to_string();
        base.error_message = "from dataset".to_string();

        let merged = inline_edit().placeholder("from caller").apply(base);
        assert_eq!(merged.placeholder, "from caller");
        assert_eq!(merged.error_message, "from dataset");
    }
}
