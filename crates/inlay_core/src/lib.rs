//! Inlay Core Primitives
//!
//! This crate provides the foundational pieces for the Inlay widget library:
//!
//! - **Event Dispatch**: typed event constants and a per-target dispatcher
//! - **State Machines**: flat statecharts for widget interaction states
//! - **Template Formatting**: `{{ path.to.value|filter }}` placeholder
//!   resolution over JSON data mappings
//! - **Error Taxonomy**: the non-fatal configuration/lookup errors
//!
//! # Example
//!
//! ```rust
//! use inlay_core::template::format;
//! use serde_json::json;
//!
//! let rendered = format("Hello {{ user.name }}", &json!({"user": {"name": "Ana"}}));
//! assert_eq!(rendered, "Hello Ana");
//!
//! // Missing data degrades to the fallback, it never aborts rendering
//! assert_eq!(format("Hello {{ user.name }}", &json!({})), "Hello ");
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod template;

pub use error::{Error, Result};
pub use events::{event_types, Event, EventData, EventDispatcher};
pub use fsm::{EventId, StateId, StateMachine, StateMachineBuilder, Transition};
pub use template::{format, format_with_fallback, nl2br, value_text};
