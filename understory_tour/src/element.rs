// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A resolved step target with its overlays.

use crate::highlight::{Highlight, Positionable};
use crate::surface::Surface;
use crate::tooltip::Tooltip;
use crate::types::InteractionKind;

/// One resolved target of the current step: its highlight, optional tooltip, and trigger.
///
/// Created fresh each time a step is shown and dismissed before the next step's elements
/// are highlighted.
#[derive(Debug)]
pub struct StepElement<N> {
    target: N,
    highlight: Highlight<N>,
    tooltip: Option<Tooltip<N>>,
    trigger: Option<InteractionKind>,
    highlighted: bool,
}

impl<N: Copy> StepElement<N> {
    /// Bind `target` to its overlays.
    pub fn new(
        target: N,
        highlight: Highlight<N>,
        tooltip: Option<Tooltip<N>>,
        trigger: Option<InteractionKind>,
    ) -> Self {
        Self {
            target,
            highlight,
            tooltip,
            trigger,
            highlighted: false,
        }
    }

    /// The resolved target node.
    pub fn target(&self) -> N {
        self.target
    }

    /// Returns true if interacting with this element can advance the tour.
    pub fn is_trigger(&self) -> bool {
        self.trigger.is_some()
    }

    /// Interaction kind this element reacts to.
    pub fn trigger_kind(&self) -> Option<InteractionKind> {
        self.trigger
    }

    /// Returns true between [`highlight`](Self::highlight) and [`dismiss`](Self::dismiss).
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// The highlight frame.
    pub fn highlight_frame(&self) -> &Highlight<N> {
        &self.highlight
    }

    /// The tooltip, if configured.
    pub fn tooltip(&self) -> Option<&Tooltip<N>> {
        self.tooltip.as_ref()
    }
}

impl<N: Copy> StepElement<N> {
    /// Show the highlight and tooltip.
    pub fn highlight<S: Surface<Node = N>>(&mut self, surface: &S) {
        Positionable::<S>::show(&mut self.highlight, surface);
        if let Some(tooltip) = &mut self.tooltip {
            Positionable::<S>::show(tooltip, surface);
        }
        self.highlighted = true;
    }

    /// Reposition the overlays after a layout change.
    pub fn update<S: Surface<Node = N>>(&mut self, surface: &S) {
        Positionable::<S>::update(&mut self.highlight, surface);
        if let Some(tooltip) = &mut self.tooltip {
            Positionable::<S>::update(tooltip, surface);
        }
    }

    /// Hide the overlays. Safe on an element that was never highlighted.
    pub fn dismiss<S: Surface<Node = N>>(&mut self, surface: &S) {
        Positionable::<S>::hide(&mut self.highlight, surface);
        if let Some(tooltip) = &mut self.tooltip {
            Positionable::<S>::hide(tooltip, surface);
        }
        self.highlighted = false;
    }
}
