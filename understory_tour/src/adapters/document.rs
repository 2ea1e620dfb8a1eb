// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Surface`] for Understory Document.
//!
//! ## Feature
//!
//! Enable with `document_adapter`.
//!
//! ## Notes
//!
//! [`SharedDocument`] is a cloneable handle to a [`Document`] behind a mutex. Give one clone
//! to the tour and keep another to edit the page, then feed mutation batches and pointer
//! events back to the tour.
//!
//! Overlay markup becomes `div` elements carrying the markup class. Overlays are visible but
//! not pickable, so pointer events land on the page underneath. Frames without an explicit
//! size produce an empty box; give overlay classes an intrinsic size with
//! [`Document::style_class`].
//!
//! Never hold the guard from [`SharedDocument::lock`] while calling into the tour.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::{Rect, Size, Vec2};
use understory_document::{
    Document, ElementSpec, NodeFlags, NodeId, PointerEvent, PointerKind, PointerMask, Selector,
};

use crate::surface::{Frame, ListenerId, Markup, ObserverId, Surface};
use crate::types::{Interaction, InteractionKind, InteractionKinds, MutationRecord};

/// A document shared between the page and a tour.
#[derive(Clone, Debug, Default)]
pub struct SharedDocument {
    doc: Arc<Mutex<Document>>,
}

impl SharedDocument {
    /// Share `doc`.
    pub fn new(doc: Document) -> Self {
        Self {
            doc: Arc::new(Mutex::new(doc)),
        }
    }

    /// Lock the document for reading or editing.
    pub fn lock(&self) -> MutexGuard<'_, Document> {
        self.doc.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn build(doc: &mut Document, markup: &Markup) -> NodeId {
        let node = doc.create(
            ElementSpec::new("div")
                .with_class(markup.class.as_str())
                .with_flags(NodeFlags::VISIBLE),
        );
        for child in &markup.children {
            let part = Self::build(doc, child);
            doc.append(node, part);
        }
        node
    }
}

/// Map a pointer kind to the tour's interaction kind.
pub fn interaction_kind(kind: PointerKind) -> InteractionKind {
    match kind {
        PointerKind::Click => InteractionKind::Click,
        PointerKind::DoubleClick => InteractionKind::DoubleClick,
        PointerKind::Down => InteractionKind::PointerDown,
        PointerKind::Up => InteractionKind::PointerUp,
        PointerKind::Enter => InteractionKind::PointerEnter,
        PointerKind::Leave => InteractionKind::PointerLeave,
        PointerKind::Over => InteractionKind::PointerOver,
        PointerKind::Out => InteractionKind::PointerOut,
    }
}

/// Pointer mask covering `kinds`.
pub fn pointer_mask(kinds: InteractionKinds) -> PointerMask {
    PointerKind::ALL
        .into_iter()
        .filter(|&kind| kinds.contains(interaction_kind(kind).bit()))
        .fold(PointerMask::empty(), |mask, kind| mask | kind.mask())
}

impl From<&PointerEvent> for Interaction<NodeId> {
    fn from(event: &PointerEvent) -> Self {
        Self::new(interaction_kind(event.kind), event.target)
    }
}

impl Surface for SharedDocument {
    type Node = NodeId;

    fn query_visible(&self, selector: &str) -> Option<NodeId> {
        let selector = match Selector::parse(selector) {
            Ok(selector) => selector,
            Err(err) => {
                tracing::warn!(selector, %err, "invalid selector");
                return None;
            }
        };
        let doc = self.lock();
        doc.query_selector_all(&selector)
            .into_iter()
            .find(|&node| doc.is_rendered(node))
    }

    fn is_valid_selector(&self, selector: &str) -> bool {
        Selector::parse(selector).is_ok()
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.lock().contains(ancestor, node)
    }

    fn client_rect(&self, node: NodeId) -> Rect {
        self.lock().client_rect(node)
    }

    fn rendered_size(&self, node: NodeId) -> Size {
        self.lock().rendered_size(node)
    }

    fn scroll_offset(&self) -> Vec2 {
        self.lock().scroll()
    }

    fn document_extent(&self) -> Size {
        self.lock().extent()
    }

    fn create(&self, markup: &Markup) -> NodeId {
        Self::build(&mut self.lock(), markup)
    }

    fn append(&self, node: NodeId) {
        let mut doc = self.lock();
        let body = doc.body();
        doc.append(body, node);
    }

    fn remove(&self, node: NodeId) {
        self.lock().remove(node);
    }

    fn part(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.lock().find_class(root, class)
    }

    fn set_text(&self, node: NodeId, text: &str) {
        self.lock().set_text(node, text);
    }

    fn set_class(&self, node: NodeId, class: &str, enabled: bool) {
        self.lock().set_class(node, class, enabled);
    }

    fn set_frame(&self, node: NodeId, frame: Frame) {
        let size = frame.size.unwrap_or(Size::ZERO);
        self.lock()
            .set_bounds(node, Rect::from_origin_size(frame.origin, size));
    }

    fn listen(&self, kinds: InteractionKinds) -> ListenerId {
        ListenerId(self.lock().listen(pointer_mask(kinds)).0)
    }

    fn unlisten(&self, id: ListenerId) {
        self.lock()
            .unlisten(understory_document::ListenerId(id.0));
    }

    fn observe(&self) -> ObserverId {
        ObserverId(self.lock().observe().0)
    }

    fn disconnect(&self, id: ObserverId) {
        self.lock()
            .disconnect(understory_document::ObserverId(id.0));
    }

    fn take_records(&self, id: ObserverId) -> Vec<MutationRecord<NodeId>> {
        self.lock()
            .take_records(understory_document::ObserverId(id.0))
            .into_iter()
            .map(|m| MutationRecord { target: m.target })
            .collect()
    }
}
