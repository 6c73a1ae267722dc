//! Inlay Widget Library
//!
//! The inline click-to-edit editor: a display element that swaps to an
//! input control with confirm/cancel affordances and per-instance error
//! display.
//!
//! # Architecture
//!
//! The widget system is built on three pillars:
//!
//! 1. **Statechart-Driven Lifecycle**: each editor runs a small state
//!    machine (display, pending, editing, destroyed). Interactions that are
//!    meaningless in the current state - a second click while the input
//!    factory is still pending, for example - are absorbed by the chart
//!    instead of guarded by flags.
//!
//! 2. **Owned Registry**: an [`EditorContext`] owns the element tree and
//!    every attached instance, and enforces "at most one open editor" by
//!    force-cancelling others at activation time. There is no hidden
//!    global state.
//!
//! 3. **Pluggable Input Factory**: the editing control is built by an
//!    [`InputFactory`] collaborator through an asynchronous callback, so
//!    hosts can supply their own controls (or options fetched elsewhere).
//!
//! # Example
//!
//! ```rust
//! use inlay_widgets::prelude::*;
//!
//! let mut ctx = EditorContext::new();
//!
//! // A display element somewhere on the page
//! let element = {
//!     let doc = ctx.document_mut();
//!     let el = doc.create_element("span");
//!     doc.set_content(el, "hello");
//!     let body = doc.body();
//!     doc.append_child(body, el);
//!     el
//! };
//!
//! // Attach with the default update delegate (commit immediately)
//! let id = ctx.attach(element, inline_edit().placeholder("Empty"));
//!
//! // Click to edit, change the input, confirm
//! ctx.click(element);
//! let input = ctx.editor(id).unwrap().input().unwrap().element();
//! ctx.document_mut().set_value(input, "world");
//! let confirm = ctx.editor(id).unwrap().confirm_button().unwrap();
//! ctx.click(confirm);
//!
//! assert_eq!(ctx.document().content(element), "world");
//! ```

pub mod command;
pub mod context;
pub mod factory;
pub mod inline_edit;

pub use command::Command;
pub use context::{EditorContext, EditorId};
pub use factory::{
    InputControl, InputDescriptor, InputFactory, InputKind, InputProps, InputReady, SelectOption,
    TextInputFactory,
};
pub use inline_edit::{
    default_update, inline_edit, states, templates, InlineEdit, InlineEditBuilder,
    InlineEditConfig, SuccessFn, UpdateFn, MIN_TEXTAREA_HEIGHT,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::command::Command;
    pub use crate::context::{EditorContext, EditorId};
    pub use crate::factory::{
        InputControl, InputDescriptor, InputFactory, InputKind, InputProps, SelectOption,
        TextInputFactory,
    };
    pub use crate::inline_edit::{inline_edit, InlineEdit, InlineEditBuilder, InlineEditConfig};
}
