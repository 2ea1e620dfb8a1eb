// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, flags, element specs, mutations, and pointer kinds.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect};

/// Identifier for a node in the document.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Detaching a node (see [`Document::detach`](crate::Document::detach)) does not free its slot;
/// the id stays live and can be appended again.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// A node is newer than another when it has a higher generation,
    /// or the same generation and a higher slot.
    pub(crate) fn is_newer_than(self, other: Self) -> bool {
        (self.1 > other.1) || (self.1 == other.1 && self.0 > other.0)
    }
}

bitflags::bitflags! {
    /// Node flags controlling rendering and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is rendered. A node without this flag hides its whole subtree.
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Everything the document knows about one element.
///
/// `bounds` is expressed relative to the parent's origin. A zero-sized box falls back to the
/// intrinsic size registered for one of the element's classes with
/// [`Document::style_class`](crate::Document::style_class).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSpec {
    /// Tag name, matched case-sensitively by type selectors.
    pub tag: String,
    /// Optional `id` attribute.
    pub id: Option<String>,
    /// Class list, in insertion order and without duplicates.
    pub classes: Vec<String>,
    /// Text content.
    pub text: String,
    /// Box relative to the parent's origin.
    pub bounds: Rect,
    /// Z-order among overlapping nodes. Higher is on top.
    pub z_index: i32,
    /// Rendering and picking flags.
    pub flags: NodeFlags,
}

impl ElementSpec {
    /// Create a visible, pickable element with the given tag and an empty box.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            flags: NodeFlags::default(),
            ..Default::default()
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the box relative to the parent's origin.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the z-index.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Returns true if the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// What changed about a mutation target.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MutationKind {
    /// A child was appended to or removed from the target.
    ChildList,
    /// An attribute of the target (box, flags, classes, text, z-order) changed.
    Attributes,
}

/// One entry in a mutation batch.
///
/// The target's subtree is the affected region: any node it contains may have moved.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Mutation {
    /// Node whose subtree changed.
    pub target: NodeId,
    /// Kind of change.
    pub kind: MutationKind,
}

/// Handle of a connected mutation observer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObserverId(pub u64);

/// Handle of a registered pointer listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(pub u64);

/// Pointer interaction kinds delivered by the document.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerKind {
    /// Primary button click.
    Click,
    /// Double click.
    DoubleClick,
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Pointer entered a node (does not bubble).
    Enter,
    /// Pointer left a node (does not bubble).
    Leave,
    /// Pointer moved onto a node.
    Over,
    /// Pointer moved off a node.
    Out,
}

impl PointerKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Click,
        Self::DoubleClick,
        Self::Down,
        Self::Up,
        Self::Enter,
        Self::Leave,
        Self::Over,
        Self::Out,
    ];

    /// The single-bit mask for this kind.
    pub const fn mask(self) -> PointerMask {
        match self {
            Self::Click => PointerMask::CLICK,
            Self::DoubleClick => PointerMask::DOUBLE_CLICK,
            Self::Down => PointerMask::DOWN,
            Self::Up => PointerMask::UP,
            Self::Enter => PointerMask::ENTER,
            Self::Leave => PointerMask::LEAVE,
            Self::Over => PointerMask::OVER,
            Self::Out => PointerMask::OUT,
        }
    }
}

bitflags::bitflags! {
    /// Set of pointer kinds a listener subscribes to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointerMask: u8 {
        /// [`PointerKind::Click`].
        const CLICK        = 0b0000_0001;
        /// [`PointerKind::DoubleClick`].
        const DOUBLE_CLICK = 0b0000_0010;
        /// [`PointerKind::Down`].
        const DOWN         = 0b0000_0100;
        /// [`PointerKind::Up`].
        const UP           = 0b0000_1000;
        /// [`PointerKind::Enter`].
        const ENTER        = 0b0001_0000;
        /// [`PointerKind::Leave`].
        const LEAVE        = 0b0010_0000;
        /// [`PointerKind::Over`].
        const OVER         = 0b0100_0000;
        /// [`PointerKind::Out`].
        const OUT          = 0b1000_0000;
    }
}

/// A pointer event resolved against the document.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Interaction kind.
    pub kind: PointerKind,
    /// Topmost pickable node under the pointer.
    pub target: NodeId,
    /// Root→target path.
    pub path: Vec<NodeId>,
    /// Page-space pointer position.
    pub point: Point,
}
