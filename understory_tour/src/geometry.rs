// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-space geometry reads over a [`Surface`].

use kurbo::{Rect, Size};

use crate::surface::Surface;

/// Read-only geometry queries used by highlights, tooltips, and recovery.
///
/// Every query is a pure read of surface state. Detached nodes report a zero box and are
/// never visible.
#[derive(Debug)]
pub struct GeometryProbe<'a, S> {
    surface: &'a S,
}

impl<'a, S: Surface> GeometryProbe<'a, S> {
    /// Probe `surface`.
    pub fn new(surface: &'a S) -> Self {
        Self { surface }
    }

    /// Box of `node` relative to the page origin: its viewport box shifted by the scroll offset.
    ///
    /// A detached node yields [`Rect::ZERO`], without the scroll shift.
    pub fn bounding_box(&self, node: S::Node) -> Rect {
        let client = self.surface.client_rect(node);
        if client == Rect::ZERO {
            return Rect::ZERO;
        }
        client + self.surface.scroll_offset()
    }

    /// Returns true if `node` renders with a positive width and height.
    pub fn is_visible(&self, node: S::Node) -> bool {
        let size = self.surface.rendered_size(node);
        size.width > 0.0 && size.height > 0.0
    }

    /// Rendered size of the whole document.
    pub fn page_size(&self) -> Size {
        self.surface.document_extent()
    }
}
