// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlays glued to a target: the [`Positionable`] capability and the box [`Highlight`].

use kurbo::{Rect, Size};

use crate::geometry::GeometryProbe;
use crate::surface::{Frame, Markup, Surface};

/// Class of the highlight frame node.
pub const CLASS_HIGHLIGHT: &str = "understory-tour_highlight";
/// Extra class on the highlight frame in mask mode.
pub const CLASS_MASK: &str = "with-mask";

/// An overlay node positioned relative to a target.
///
/// ## Lifecycle
///
/// - [`show`](Positionable::show) attaches the overlay, applies [`Frame::INITIAL`], then updates.
/// - [`update`](Positionable::update) recomputes geometry from the target. No-op while hidden.
/// - [`hide`](Positionable::hide) detaches the overlay. Idempotent.
pub trait Positionable<S: Surface> {
    /// Attach the overlay and position it.
    fn show(&mut self, surface: &S);
    /// Reposition the overlay after the target moved.
    fn update(&mut self, surface: &S);
    /// Detach the overlay.
    fn hide(&mut self, surface: &S);
    /// Rendered size of the overlay node; zero while hidden.
    fn size(&self, surface: &S) -> Size;
    /// Page-space box computed by the last update.
    fn position(&self) -> Rect;
}

/// A frame drawn around a target, expanded by `padding` on every side.
#[derive(Clone, Debug)]
pub struct Highlight<N> {
    target: N,
    padding: f64,
    mask: bool,
    node: Option<N>,
    position: Rect,
}

impl<N: Copy> Highlight<N> {
    /// Create a hidden highlight for `target`.
    pub fn new(target: N, padding: f64, mask: bool) -> Self {
        Self {
            target,
            padding,
            mask,
            node: None,
            position: Rect::ZERO,
        }
    }

    /// The overlay node while shown.
    pub fn node(&self) -> Option<N> {
        self.node
    }

    /// Returns true when the page-dimming mask is enabled.
    pub fn is_masked(&self) -> bool {
        self.mask
    }
}

impl<S: Surface> Positionable<S> for Highlight<S::Node> {
    fn show(&mut self, surface: &S) {
        Positionable::<S>::hide(self, surface);
        let node = surface.create(&Markup::new(CLASS_HIGHLIGHT));
        if self.mask {
            surface.set_class(node, CLASS_MASK, true);
        }
        surface.append(node);
        self.node = Some(node);

        self.position = Rect::ZERO;
        surface.set_frame(node, Frame::INITIAL);
        Positionable::<S>::update(self, surface);
    }

    fn update(&mut self, surface: &S) {
        let Some(node) = self.node else {
            return;
        };
        let target = GeometryProbe::new(surface).bounding_box(self.target);
        self.position = target.inflate(self.padding, self.padding);
        surface.set_frame(
            node,
            Frame {
                origin: self.position.origin(),
                size: Some(self.position.size()),
            },
        );
    }

    fn hide(&mut self, surface: &S) {
        if let Some(node) = self.node.take() {
            surface.remove(node);
        }
    }

    fn size(&self, surface: &S) -> Size {
        self.node
            .map(|node| surface.rendered_size(node))
            .unwrap_or(Size::ZERO)
    }

    fn position(&self) -> Rect {
        self.position
    }
}
