// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the tour: status, interactions, mutation records, and navigation outcomes.

/// Status of a tour's navigation state machine.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Status {
    /// No active step.
    #[default]
    Ready,
    /// The current step's targets are not resolvable yet; the next mutation batch retries.
    Querying,
    /// The current step is shown and its targets are watched.
    Watching,
    /// A shown target became invisible; the tour is retreating.
    Lost,
    /// A navigation transition is in flight. Other navigation calls are no-ops.
    Moving,
    /// All steps completed.
    Finished,
}

/// Pointer interaction kinds the tour listens to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InteractionKind {
    /// Primary button click. The default trigger.
    Click,
    /// Double click.
    DoubleClick,
    /// Button pressed.
    PointerDown,
    /// Button released.
    PointerUp,
    /// Pointer entered a node.
    PointerEnter,
    /// Pointer left a node.
    PointerLeave,
    /// Pointer moved onto a node.
    PointerOver,
    /// Pointer moved off a node.
    PointerOut,
}

impl InteractionKind {
    /// The single-bit set for this kind.
    pub const fn bit(self) -> InteractionKinds {
        match self {
            Self::Click => InteractionKinds::CLICK,
            Self::DoubleClick => InteractionKinds::DOUBLE_CLICK,
            Self::PointerDown => InteractionKinds::POINTER_DOWN,
            Self::PointerUp => InteractionKinds::POINTER_UP,
            Self::PointerEnter => InteractionKinds::POINTER_ENTER,
            Self::PointerLeave => InteractionKinds::POINTER_LEAVE,
            Self::PointerOver => InteractionKinds::POINTER_OVER,
            Self::PointerOut => InteractionKinds::POINTER_OUT,
        }
    }
}

bitflags::bitflags! {
    /// A set of [`InteractionKind`]s, used when subscribing to the surface.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InteractionKinds: u8 {
        /// [`InteractionKind::Click`].
        const CLICK         = 0b0000_0001;
        /// [`InteractionKind::DoubleClick`].
        const DOUBLE_CLICK  = 0b0000_0010;
        /// [`InteractionKind::PointerDown`].
        const POINTER_DOWN  = 0b0000_0100;
        /// [`InteractionKind::PointerUp`].
        const POINTER_UP    = 0b0000_1000;
        /// [`InteractionKind::PointerEnter`].
        const POINTER_ENTER = 0b0001_0000;
        /// [`InteractionKind::PointerLeave`].
        const POINTER_LEAVE = 0b0010_0000;
        /// [`InteractionKind::PointerOver`].
        const POINTER_OVER  = 0b0100_0000;
        /// [`InteractionKind::PointerOut`].
        const POINTER_OUT   = 0b1000_0000;
    }
}

/// A pointer interaction, delivered before application-level handlers run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Interaction<N> {
    /// Interaction kind.
    pub kind: InteractionKind,
    /// Innermost node the interaction is aimed at.
    pub target: N,
}

impl<N> Interaction<N> {
    /// Create an interaction.
    pub fn new(kind: InteractionKind, target: N) -> Self {
        Self { kind, target }
    }
}

/// Whether an interaction may continue to application handlers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Let the interaction propagate normally.
    Continue,
    /// Prevent the default action and stop all further propagation.
    StopAndConsume,
}

/// One record of a mutation batch: the subtree rooted at `target` changed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MutationRecord<N> {
    /// Root of the affected subtree.
    pub target: N,
}

/// How a navigation call settled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Navigated {
    /// The step was shown; the tour is watching it.
    Shown {
        /// Index of the step now shown.
        step: usize,
    },
    /// The step's targets could not be resolved.
    Unresolved {
        /// Index of the step that failed to resolve.
        step: usize,
    },
    /// A hook declined the transition; the prior status was restored.
    Vetoed,
    /// The last step was passed and the tour finished.
    Finished,
    /// Nothing happened: another transition was in flight, the tour was reset
    /// while the hook was pending, or the tour has nothing to navigate.
    Ignored,
}
