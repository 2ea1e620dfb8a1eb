// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_document --heading-base-level=0

//! Understory Document: a small, Kurbo-native, in-memory document.
//!
//! Understory Document is a stand-in rendering surface for UI tooling that needs a document
//! to point at: onboarding overlays, inspectors, and the tests and demos of such tools.
//!
//! - Represents a hierarchy of elements (tag, id, classes, text) with page-space boxes and flags.
//! - Answers geometry questions: page and client boxes, rendered size, scroll, whole-page extent.
//! - Resolves CSS-like selectors (type, `#id`, `.class`, descendant, lists) in document order.
//! - Records mutations per connected observer, in batches drained by the consumer.
//! - Keeps a registry of pointer listeners and resolves pointer events by hit testing.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange anything.
//! Boxes are given by the caller, relative to the parent's origin; the only sizing rule is a
//! tiny stylesheet ([`Document::style_class`]) that gives empty boxes an intrinsic size per class.
//!
//! ## Attached, detached, removed
//!
//! - [`Document::insert`] and [`Document::append`] attach a node below a parent.
//! - [`Document::detach`] unlinks a node; it keeps its id and can be appended again.
//! - [`Document::remove`] unlinks and frees the subtree; its ids become stale.
//!
//! Only attached nodes are rendered, queried, hit, or reported in mutation batches.
//! Geometry of detached or stale nodes is a zero box.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_document::{Document, ElementSpec, Selector};
//! use kurbo::{Rect, Vec2};
//!
//! let mut doc = Document::new();
//! let toolbar = doc.insert(
//!     doc.body(),
//!     ElementSpec::new("nav").with_class("toolbar").with_bounds(Rect::new(0.0, 0.0, 800.0, 48.0)),
//! );
//! let save = doc.insert(
//!     toolbar,
//!     ElementSpec::new("button").with_id("save").with_bounds(Rect::new(700.0, 8.0, 780.0, 40.0)),
//! );
//!
//! let sel = Selector::parse(".toolbar #save").unwrap();
//! assert_eq!(doc.query_selector_all(&sel), vec![save]);
//!
//! doc.set_scroll(Vec2::new(0.0, 20.0));
//! assert_eq!(doc.client_rect(save), Rect::new(700.0, -12.0, 780.0, 20.0));
//! ```
//!
//! ### Observing mutations
//!
//! ```
//! use understory_document::{Document, ElementSpec, MutationKind};
//! use kurbo::Rect;
//!
//! let mut doc = Document::new();
//! let observer = doc.observe();
//! let card = doc.insert(doc.body(), ElementSpec::new("div").with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
//! doc.set_class(card, "selected", true);
//!
//! let batch = doc.take_records(observer);
//! assert_eq!(batch.len(), 2);
//! assert_eq!(batch[0].target, doc.body());
//! assert_eq!(batch[1].kind, MutationKind::Attributes);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod selector;
mod types;

pub use document::{DEFAULT_VIEWPORT, Document, Hit};
pub use selector::{Selector, SelectorError};
pub use types::{
    ElementSpec, ListenerId, Mutation, MutationKind, NodeFlags, NodeId, ObserverId, PointerEvent,
    PointerKind, PointerMask,
};
