// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering surface a tour runs against.
//!
//! ## Overview
//!
//! The tour never touches a concrete document. Everything it needs (node resolution,
//! geometry, overlay node lifecycle, and subscriptions) goes through [`Surface`].
//! Implement it for your toolkit's document handle; the `document_adapter` feature
//! implements it for [`understory_document`](https://docs.rs/understory_document).
//!
//! Methods take `&self`: a surface is a handle, and implementations use whatever interior
//! mutability their document needs.

use std::fmt::Debug;

use kurbo::{Point, Rect, Size, Vec2};

use crate::types::{InteractionKinds, MutationRecord};

/// Handle of an interaction listener registered with [`Surface::listen`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(pub u64);

/// Handle of a mutation observer connected with [`Surface::observe`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObserverId(pub u64);

/// Markup for an overlay node: a class and nested parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup {
    /// Class of this node.
    pub class: String,
    /// Child parts, in order.
    pub children: Vec<Markup>,
}

impl Markup {
    /// A node with a single class and no children.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            children: Vec::new(),
        }
    }

    /// Append a child part.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

/// Absolute placement of an overlay node in page coordinates.
///
/// Applying a frame also makes the node displayed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Top-left corner.
    pub origin: Point,
    /// Explicit size, or `None` to keep the node's intrinsic size.
    pub size: Option<Size>,
}

impl Frame {
    /// The zero-size frame at the page origin applied before the first update.
    pub const INITIAL: Self = Self {
        origin: Point::ORIGIN,
        size: Some(Size::ZERO),
    };
}

/// Consumed interface of the rendering surface.
pub trait Surface: Send + Sync + 'static {
    /// Node handle.
    type Node: Copy + Eq + Debug + Send + Sync + 'static;

    // --- resolution ---

    /// First node matching `selector` that is currently rendered, if any.
    fn query_visible(&self, selector: &str) -> Option<Self::Node>;

    /// Returns true if `selector` parses. Steps with unparsable selectors are rejected.
    fn is_valid_selector(&self, selector: &str) -> bool;

    /// Returns true if `node` is `ancestor` or inside its subtree.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool;

    // --- geometry ---

    /// Viewport-relative box of `node`. A zero box for detached nodes.
    fn client_rect(&self, node: Self::Node) -> Rect;

    /// Rendered size of `node`: the larger of its scroll and offset extents. Zero when not rendered.
    fn rendered_size(&self, node: Self::Node) -> Size;

    /// Current scroll offset of the page.
    fn scroll_offset(&self) -> Vec2;

    /// Rendered extent of the whole document.
    fn document_extent(&self) -> Size;

    // --- overlay nodes ---

    /// Create a detached node tree from markup and return its root.
    fn create(&self, markup: &Markup) -> Self::Node;

    /// Append a node to the document body.
    fn append(&self, node: Self::Node);

    /// Remove a node from its parent. Idempotent.
    fn remove(&self, node: Self::Node);

    /// First node in `root`'s subtree carrying `class`.
    fn part(&self, root: Self::Node, class: &str) -> Option<Self::Node>;

    /// Replace the text content of a node.
    fn set_text(&self, node: Self::Node, text: &str);

    /// Add (`enabled`) or remove a class.
    fn set_class(&self, node: Self::Node, class: &str, enabled: bool);

    /// Display `node` at `frame`.
    fn set_frame(&self, node: Self::Node, frame: Frame);

    // --- subscriptions ---

    /// Register an interaction listener for `kinds`, delivered before application handlers.
    fn listen(&self, kinds: InteractionKinds) -> ListenerId;

    /// Unregister a listener. Idempotent.
    fn unlisten(&self, id: ListenerId);

    /// Connect a mutation observer over the whole document (child lists, attributes, subtree).
    fn observe(&self) -> ObserverId;

    /// Disconnect an observer. Idempotent.
    fn disconnect(&self, id: ObserverId);

    /// Drain the pending mutation batch of an observer.
    fn take_records(&self, id: ObserverId) -> Vec<MutationRecord<Self::Node>>;
}
