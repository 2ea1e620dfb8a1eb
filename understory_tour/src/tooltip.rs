// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Captioned tooltip and its placement strategies.
//!
//! ## Placement
//!
//! With `margin = padding + TOOLTIP_DISTANCE` and the target's page box `t`:
//!
//! | Side     | Origin                                   | Caret  |
//! |----------|------------------------------------------|--------|
//! | `Left`   | `(t.left - width - margin, t.top - padding)` | right  |
//! | `Right`  | `(t.right + margin, t.top - padding)`        | left   |
//! | `Top`    | `(t.left - padding, t.top - height - margin)`| bottom |
//! | `Bottom` | `(t.left - padding, t.bottom + margin)`      | top    |
//!
//! `Auto` resolves to `Top` when `t.bottom + height + margin` reaches the page height, and to
//! `Bottom` otherwise. Only overflow past the page bottom is considered; horizontal overflow
//! is left alone.

use kurbo::{Point, Rect, Size};

use crate::geometry::GeometryProbe;
use crate::highlight::Positionable;
use crate::surface::{Frame, Markup, Surface};

/// Gap in pixels between the highlighted box and the tooltip.
pub const TOOLTIP_DISTANCE: f64 = 10.0;

/// Class of the tooltip root node.
pub const CLASS_TOOLTIP: &str = "understory-tour_tooltip";
/// Class of the caret part.
pub const CLASS_TOOLTIP_CARET: &str = "understory-tour_tooltip-caret";
/// Class of the title part.
pub const CLASS_TOOLTIP_TITLE: &str = "understory-tour_tooltip-title";
/// Class of the description part.
pub const CLASS_TOOLTIP_DESCRIPTION: &str = "understory-tour_tooltip-description";

/// Which side of the target a tooltip is placed on.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Side {
    /// Before the target's left edge.
    Left,
    /// After the target's right edge.
    Right,
    /// Above the target.
    Top,
    /// Below the target.
    Bottom,
    /// Below, unless that would reach the page bottom.
    #[default]
    Auto,
}

/// Direction the caret points, toward the target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Caret {
    /// Points left (tooltip on the right).
    Left,
    /// Points right (tooltip on the left).
    Right,
    /// Points up (tooltip below).
    Up,
    /// Points down (tooltip above).
    Down,
}

impl Caret {
    const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Class set on the caret part.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "top",
            Self::Down => "bottom",
        }
    }
}

/// A resolved tooltip placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Concrete side; never [`Side::Auto`].
    pub side: Side,
    /// Page-space top-left corner of the tooltip.
    pub origin: Point,
    /// Caret direction.
    pub caret: Caret,
}

/// Place a tooltip of size `tooltip` next to the page box `target`.
pub fn place(side: Side, target: Rect, tooltip: Size, padding: f64, page: Size) -> Placement {
    let margin = padding + TOOLTIP_DISTANCE;
    match side {
        Side::Left => Placement {
            side,
            origin: Point::new(target.x0 - tooltip.width - margin, target.y0 - padding),
            caret: Caret::Right,
        },
        Side::Right => Placement {
            side,
            origin: Point::new(target.x1 + margin, target.y0 - padding),
            caret: Caret::Left,
        },
        Side::Top => Placement {
            side,
            origin: Point::new(target.x0 - padding, target.y0 - tooltip.height - margin),
            caret: Caret::Down,
        },
        Side::Bottom => Placement {
            side,
            origin: Point::new(target.x0 - padding, target.y1 + margin),
            caret: Caret::Up,
        },
        Side::Auto => {
            let page_height_after_show = target.y1 + tooltip.height + margin;
            let resolved = if page_height_after_show >= page.height {
                Side::Top
            } else {
                Side::Bottom
            };
            place(resolved, target, tooltip, padding, page)
        }
    }
}

/// A tooltip bubble with title and description, placed beside a target.
#[derive(Clone, Debug)]
pub struct Tooltip<N> {
    target: N,
    title: String,
    description: String,
    side: Side,
    padding: f64,
    node: Option<N>,
    caret: Option<N>,
    position: Rect,
    placement: Option<Placement>,
}

impl<N: Copy> Tooltip<N> {
    /// Create a hidden tooltip for `target`.
    pub fn new(
        target: N,
        title: impl Into<String>,
        description: impl Into<String>,
        side: Side,
        padding: f64,
    ) -> Self {
        Self {
            target,
            title: title.into(),
            description: description.into(),
            side,
            padding,
            node: None,
            caret: None,
            position: Rect::ZERO,
            placement: None,
        }
    }

    /// Rendered title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rendered description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Configured side.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Placement chosen by the last update.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// The tooltip root node while shown.
    pub fn node(&self) -> Option<N> {
        self.node
    }

    fn markup() -> Markup {
        Markup::new(CLASS_TOOLTIP)
            .child(Markup::new(CLASS_TOOLTIP_CARET))
            .child(Markup::new(CLASS_TOOLTIP_TITLE))
            .child(Markup::new(CLASS_TOOLTIP_DESCRIPTION))
    }
}

impl<S: Surface> Positionable<S> for Tooltip<S::Node> {
    fn show(&mut self, surface: &S) {
        Positionable::<S>::hide(self, surface);
        let node = surface.create(&Self::markup());
        surface.append(node);
        self.node = Some(node);
        self.caret = surface.part(node, CLASS_TOOLTIP_CARET);
        if let Some(title) = surface.part(node, CLASS_TOOLTIP_TITLE) {
            surface.set_text(title, &self.title);
        }
        if let Some(description) = surface.part(node, CLASS_TOOLTIP_DESCRIPTION) {
            surface.set_text(description, &self.description);
        }

        surface.set_frame(
            node,
            Frame {
                origin: Frame::INITIAL.origin,
                size: None,
            },
        );
        Positionable::<S>::update(self, surface);
    }

    fn update(&mut self, surface: &S) {
        let Some(node) = self.node else {
            return;
        };
        let probe = GeometryProbe::new(surface);
        let target = probe.bounding_box(self.target);
        let size = Positionable::<S>::size(self, surface);
        let placement = place(self.side, target, size, self.padding, probe.page_size());

        surface.set_frame(
            node,
            Frame {
                origin: placement.origin,
                size: None,
            },
        );
        if let Some(caret) = self.caret {
            for c in Caret::ALL {
                surface.set_class(caret, c.class(), c == placement.caret);
            }
        }
        self.position = Rect::from_origin_size(placement.origin, size);
        self.placement = Some(placement);
    }

    fn hide(&mut self, surface: &S) {
        self.caret = None;
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

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: Size = Size::new(1000.0, 2000.0);

    #[test]
    fn auto_picks_bottom_when_page_has_room() {
        let target = Rect::new(100.0, 450.0, 300.0, 500.0);
        let tooltip = Size::new(200.0, 100.0);
        // 500 + 100 + (10 + 10) = 620 < 650
        let p = place(Side::Auto, target, tooltip, 10.0, Size::new(1000.0, 650.0));
        assert_eq!(p.side, Side::Bottom);
        assert_eq!(p.caret, Caret::Up);
        assert_eq!(p.origin, Point::new(90.0, 520.0));
    }

    #[test]
    fn auto_picks_top_when_it_would_reach_page_bottom() {
        let target = Rect::new(100.0, 450.0, 300.0, 500.0);
        let tooltip = Size::new(200.0, 100.0);
        // 620 >= 600
        let p = place(Side::Auto, target, tooltip, 10.0, Size::new(1000.0, 600.0));
        assert_eq!(p.side, Side::Top);
        assert_eq!(p.caret, Caret::Down);
        assert_eq!(p.origin, Point::new(90.0, 330.0));

        // Exactly reaching the page bottom also flips.
        let p = place(Side::Auto, target, tooltip, 10.0, Size::new(1000.0, 620.0));
        assert_eq!(p.side, Side::Top);
    }

    #[test]
    fn horizontal_sides_align_to_target_top() {
        let target = Rect::new(400.0, 100.0, 500.0, 140.0);
        let tooltip = Size::new(150.0, 60.0);

        let left = place(Side::Left, target, tooltip, 5.0, PAGE);
        assert_eq!(left.origin, Point::new(400.0 - 150.0 - 15.0, 95.0));
        assert_eq!(left.caret, Caret::Right);

        let right = place(Side::Right, target, tooltip, 5.0, PAGE);
        assert_eq!(right.origin, Point::new(515.0, 95.0));
        assert_eq!(right.caret, Caret::Left);
    }

    #[test]
    fn horizontal_overflow_is_not_corrected() {
        let target = Rect::new(0.0, 100.0, 40.0, 140.0);
        let p = place(Side::Left, target, Size::new(150.0, 60.0), 5.0, PAGE);
        assert!(p.origin.x < 0.0);
    }

    #[test]
    fn caret_classes_match_overlay_css() {
        assert_eq!(Caret::Up.class(), "top");
        assert_eq!(Caret::Down.class(), "bottom");
        assert_eq!(Caret::Left.class(), "left");
        assert_eq!(Caret::Right.class(), "right");
    }
}
