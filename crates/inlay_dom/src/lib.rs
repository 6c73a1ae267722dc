//! Inlay Element Tree
//!
//! A minimal retained element model standing in for the host document:
//! element identity, parent/child structure, class lists, datasets,
//! content, visibility, measured heights, and form values. Widgets
//! manipulate elements through a [`Document`] arena; hosts and tests
//! observe the same surface.
//!
//! This is deliberately not a DOM library: no parsing, no styling, no
//! layout. Content is an opaque markup string.

pub mod document;
pub mod element;

pub use document::{Document, ElementId};
pub use element::Element;
