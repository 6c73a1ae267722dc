//! Editor context - owns the document, the instance registry, and events
//!
//! The [`EditorContext`] is the explicitly owned coordinator for page-level
//! editor lifecycle: it holds the element tree, the ordered registry of
//! attached instances, the event dispatcher, and the page-level "an editor
//! is active" flag. Exclusivity (at most one open editor) is enforced here
//! at activation time by force-cancelling any other active instance.

use std::sync::Arc;

use serde_json::Value;
use slotmap::{new_key_type, Key, SlotMap};

use inlay_core::events::{event_types, Event, EventData, EventDispatcher};
use inlay_core::template::value_text;
use inlay_core::{Error, Result};
use inlay_dom::{Document, ElementId};

use crate::command::Command;
use crate::factory::{InputControl, InputFactory, TextInputFactory};
use crate::inline_edit::{inline_edit, states, InlineEdit, InlineEditBuilder};

new_key_type! {
    pub struct EditorId;
}

impl EditorId {
    /// Convert to a raw u64 representation, for event targets
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// The central coordinator for inline editors on a page.
///
/// All entry points address instances by [`EditorId`]; operations on ids
/// that are not attached are logged and skipped, never fatal.
pub struct EditorContext {
    document: Document,
    editors: SlotMap<EditorId, InlineEdit>,
    /// Registration order; append-only while instances live
    order: Vec<EditorId>,
    /// Dispatcher for the externally observable notifications
    pub events: EventDispatcher,
    /// Factory handed to newly attached instances
    input_factory: Arc<dyn InputFactory>,
    editor_active: bool,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorContext {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            editors: SlotMap::with_key(),
            order: Vec::new(),
            events: EventDispatcher::new(),
            input_factory: Arc::new(TextInputFactory),
            editor_active: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Replace the factory handed to instances attached from now on
    pub fn set_default_input_factory(&mut self, factory: Arc<dyn InputFactory>) {
        self.input_factory = factory;
    }

    /// Replace the factory of an already attached instance
    pub fn set_input_factory(&mut self, id: EditorId, factory: Arc<dyn InputFactory>) {
        if let Some(editor) = self.editors.get_mut(id) {
            editor.set_input_factory(factory);
        }
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Attach an editor to a display element.
    ///
    /// Configuration merges defaults, recognized dataset entries on the
    /// element, and the caller's builder overrides, in that order. The
    /// initial committed value is the `value` dataset entry (JSON-coerced)
    /// when present, otherwise the element's trimmed text content.
    pub fn attach(&mut self, element: ElementId, builder: InlineEditBuilder) -> EditorId {
        let mut config = crate::inline_edit::InlineEditConfig::default();
        config.apply_dataset(&self.document, element);
        let config = builder.apply(config);

        let value = match self.document.data(element, "value") {
            Some(raw) => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            }
            None => Value::String(self.document.content(element).trim().to_string()),
        };

        let factory = self.input_factory.clone();
        let id = self
            .editors
            .insert(InlineEdit::new(element, config, factory, value));
        self.order.push(id);

        let Self {
            editors, document, ..
        } = self;
        editors[id].setup(document);
        id
    }

    /// Configuration shorthand: attach with only an update delegate
    pub fn attach_with_update<F>(&mut self, element: ElementId, update: F) -> EditorId
    where
        F: Fn(&mut EditorContext, EditorId, &Value) + Send + Sync + 'static,
    {
        self.attach(element, inline_edit().update(update))
    }

    pub fn editor(&self, id: EditorId) -> Option<&InlineEdit> {
        self.editors.get(id)
    }

    /// Attached instances in registration order
    pub fn instances(&self) -> &[EditorId] {
        &self.order
    }

    /// Every attached instance except `id`, in registration order
    pub fn others(&self, id: EditorId) -> Vec<EditorId> {
        self.order.iter().copied().filter(|&e| e != id).collect()
    }

    /// The instance currently in editing mode, if any
    pub fn active_editor(&self) -> Option<EditorId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.editors.get(id).is_some_and(InlineEdit::is_active))
    }

    /// Page-level flag: whether any editor is currently open
    pub fn is_editor_active(&self) -> bool {
        self.editor_active
    }

    // =========================================================================
    // Interaction routing
    // =========================================================================

    /// Route a page interaction to whatever editor binding it hits: a
    /// display element's configured trigger, or a confirm/cancel button.
    pub fn interact(&mut self, element: ElementId, event_type: u32) {
        let display_hit = self.order.iter().copied().find(|&id| {
            self.editors
                .get(id)
                .is_some_and(|e| e.element() == element && e.config().trigger == event_type)
        });
        if let Some(id) = display_hit {
            self.trigger(id);
            return;
        }

        if event_type == event_types::CLICK {
            let button_hit = self.order.iter().copied().find_map(|id| {
                let editor = self.editors.get(id)?;
                if editor.confirm_button() == Some(element) {
                    Some((id, true))
                } else if editor.cancel_button() == Some(element) {
                    Some((id, false))
                } else {
                    None
                }
            });
            if let Some((id, confirm)) = button_hit {
                if confirm {
                    self.confirm(id);
                } else {
                    self.cancel(id);
                }
                return;
            }
        }

        tracing::trace!(event_type, "interaction with no editor binding");
    }

    /// Convenience for the default trigger interaction
    pub fn click(&mut self, element: ElementId) {
        self.interact(element, event_types::CLICK);
    }

    /// Apply a command parsed from a declarative name.
    ///
    /// Unknown or reserved names and unattached ids are logged and refused.
    pub fn dispatch(&mut self, id: EditorId, name: &str) -> Result<()> {
        let command = match Command::parse(name) {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(%err, "command dispatch refused");
                return Err(err);
            }
        };
        if !self.editors.contains_key(id) {
            tracing::warn!(command = command.name(), "command on unattached editor");
            return Err(Error::Uninitialized);
        }
        match command {
            Command::Trigger => self.trigger(id),
            Command::Confirm => self.confirm(id),
            Command::Cancel => self.cancel(id),
            Command::ClearErrors => self.clear_errors(id),
            Command::ShowErrors => self.show_errors(id),
            Command::Destroy => self.destroy(id),
        }
        Ok(())
    }

    // =========================================================================
    // State machine entry points
    // =========================================================================

    /// Open the editor: request an input control on first use, then
    /// activate. Repeated triggers while the factory is pending are
    /// absorbed by the statechart.
    pub fn trigger(&mut self, id: EditorId) {
        let Some(editor) = self.editors.get(id) else {
            tracing::warn!("trigger on unattached editor");
            return;
        };
        let originating = editor.config().trigger;
        self.events.dispatch(&Event::with_data(
            event_types::BEFORE_TRIGGER,
            id.to_raw(),
            EventData::Interaction {
                trigger: originating,
            },
        ));

        let mut advanced = false;
        let mut cached = false;
        let mut request = None;
        if let Some(editor) = self.editors.get_mut(id) {
            advanced = editor.fsm.send(event_types::TRIGGER);
            cached = editor.input.is_some();
            if advanced && !cached {
                request = Some((editor.factory.clone(), editor.input_props()));
            }
        }

        if advanced {
            if cached {
                if let Some(editor) = self.editors.get_mut(id) {
                    editor.fsm.send(event_types::INPUT_READY);
                }
                self.activate(id);
            } else if let Some((factory, props)) = request {
                factory.create(
                    props,
                    self,
                    Box::new(move |ctx, control| ctx.deliver_input(id, control)),
                );
            }
        }

        self.events.dispatch(&Event::with_data(
            event_types::AFTER_TRIGGER,
            id.to_raw(),
            EventData::Interaction {
                trigger: originating,
            },
        ));
    }

    /// Accept a control from the input factory. Builds the tools fragment
    /// on first delivery and activates the editor. Deliveries for ids that
    /// are not pending are discarded.
    pub fn deliver_input(&mut self, id: EditorId, control: InputControl) {
        let accepted = {
            let Self {
                editors, document, ..
            } = self;
            match editors.get_mut(id) {
                Some(editor) if editor.state() == states::PENDING => {
                    editor.input = Some(control);
                    editor.build_tools(document);
                    editor.fsm.send(event_types::INPUT_READY);
                    true
                }
                _ => {
                    tracing::warn!("input delivered with no pending editor, discarding");
                    document.remove(control.element());
                    false
                }
            }
        };
        if accepted {
            self.activate(id);
        }
    }

    fn activate(&mut self, id: EditorId) {
        self.cancel_others(id);
        let activated = {
            let Self {
                editors, document, ..
            } = self;
            match editors.get_mut(id) {
                Some(editor) if editor.is_active() => {
                    editor.activate(document);
                    true
                }
                _ => false,
            }
        };
        if activated {
            self.editor_active = true;
        }
    }

    fn cancel_others(&mut self, id: EditorId) {
        for other in self.others(id) {
            if self.editors.get(other).is_some_and(InlineEdit::is_active) {
                tracing::debug!("force-cancelling other active editor");
                self.cancel(other);
            }
        }
    }

    /// Close the editor without committing, restoring the display from the
    /// committed value
    pub fn cancel(&mut self, id: EditorId) {
        let was_active;
        let cancelled = {
            let Self {
                editors, document, ..
            } = self;
            let Some(editor) = editors.get_mut(id) else {
                tracing::warn!("cancel on unattached editor");
                return;
            };
            was_active = editor.is_active();
            if editor.fsm.send(event_types::CANCEL) {
                editor.wrapup(document);
                true
            } else {
                false
            }
        };
        if cancelled && was_active {
            self.editor_active = false;
        }
    }

    /// Commit attempt: an unchanged value behaves as cancel, a changed one
    /// is handed to the update delegate. The delegate must eventually call
    /// [`notify_success`](Self::notify_success) or
    /// [`notify_error`](Self::notify_error); no timeout is enforced.
    pub fn confirm(&mut self, id: EditorId) {
        let outcome = {
            let Some(editor) = self.editors.get(id) else {
                tracing::warn!("confirm on unattached editor");
                return;
            };
            if !editor.is_active() {
                return;
            }
            let Some(input) = editor.input() else {
                return;
            };
            let text = input.value(&self.document);
            if text == value_text(editor.value()) {
                None
            } else {
                Some((Value::String(text), editor.config().update.clone()))
            }
        };

        match outcome {
            None => self.cancel(id),
            Some((candidate, update)) => update(self, id, &candidate),
        }
    }

    // =========================================================================
    // Notifications from the update delegate
    // =========================================================================

    /// Success notification: commits the value, runs the success hook, and
    /// returns the editor to display mode.
    pub fn notify_success(&mut self, id: EditorId, value: Value, model: Option<Value>) {
        let Some(editor) = self.editors.get(id) else {
            tracing::warn!("success notification for unattached editor");
            return;
        };
        let previous = editor.value().clone();
        let hook = editor.config().success.clone();

        let event = Event::with_data(
            event_types::SUCCESS,
            id.to_raw(),
            EventData::Success {
                value: value.clone(),
                model: model.clone(),
            },
        );
        self.events.dispatch(&event);
        if let Some(hook) = hook {
            hook(&event, &value, &previous, model.as_ref());
        }

        let was_active;
        {
            let Self {
                editors, document, ..
            } = self;
            let Some(editor) = editors.get_mut(id) else {
                return;
            };
            was_active = editor.is_active();
            editor.value = value;
            editor.fsm.send(event_types::SUCCESS);
            editor.wrapup(document);
        }
        if was_active {
            self.editor_active = false;
        }
    }

    /// Error notification: replaces the error list and re-renders the error
    /// container. The editor stays in editing mode; the committed value is
    /// untouched.
    pub fn notify_error(&mut self, id: EditorId, errors: Vec<String>) {
        if !self.editors.contains_key(id) {
            tracing::warn!("error notification for unattached editor");
            return;
        }
        self.events.dispatch(&Event::with_data(
            event_types::ERROR,
            id.to_raw(),
            EventData::Errors {
                errors: errors.clone(),
            },
        ));
        let Self {
            editors, document, ..
        } = self;
        if let Some(editor) = editors.get_mut(id) {
            editor.set_errors(document, errors);
        }
    }

    // =========================================================================
    // Error helpers
    // =========================================================================

    pub fn add_error(&mut self, id: EditorId, error: impl Into<String>) {
        let Self {
            editors, document, ..
        } = self;
        if let Some(editor) = editors.get_mut(id) {
            editor.add_error(document, error.into());
        }
    }

    pub fn clear_errors(&mut self, id: EditorId) {
        let Self {
            editors, document, ..
        } = self;
        if let Some(editor) = editors.get_mut(id) {
            editor.clear_errors(document);
        }
    }

    pub fn show_errors(&mut self, id: EditorId) {
        let Self {
            editors, document, ..
        } = self;
        if let Some(editor) = editors.get(id) {
            if let Some(error_box) = editor.error_box() {
                document.set_visible(error_box, true);
            }
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Tear an instance down: final display render, affordances removed,
    /// bindings dropped, instance unregistered. Irreversible.
    pub fn destroy(&mut self, id: EditorId) {
        let Some(mut editor) = self.editors.remove(id) else {
            tracing::warn!("destroy on unattached editor");
            return;
        };
        let was_active = editor.is_active();
        editor.destroy(&mut self.document);
        self.events.unregister_target(id.to_raw());
        self.order.retain(|&e| e != id);
        if was_active {
            self.editor_active = false;
        }
    }
}
