// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Step configuration: targets, triggers, and tooltips.

use crate::error::{Result, TourError};
use crate::tooltip::Side;
use crate::types::InteractionKind;

/// What a step points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target<N> {
    /// Resolves to the first currently visible node matching the selector.
    Selector(String),
    /// Resolves to the node itself.
    Node(N),
}

impl<N> From<&str> for Target<N> {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.into())
    }
}

impl<N> From<String> for Target<N> {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

/// Interaction that advances the tour when observed on a target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Trigger {
    /// The target does not advance the tour.
    #[default]
    Off,
    /// Interactions of this kind inside the target advance the tour.
    On(InteractionKind),
}

impl Trigger {
    /// The interaction kind to match, if enabled.
    pub fn kind(self) -> Option<InteractionKind> {
        match self {
            Self::Off => None,
            Self::On(kind) => Some(kind),
        }
    }
}

impl From<bool> for Trigger {
    /// `true` is a click trigger.
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::On(InteractionKind::Click)
        } else {
            Self::Off
        }
    }
}

impl From<InteractionKind> for Trigger {
    fn from(kind: InteractionKind) -> Self {
        Self::On(kind)
    }
}

/// Tooltip shown next to a target.
///
/// A plain string converts into a description-only tooltip:
///
/// ```
/// use understory_tour::{Side, TooltipSpec};
///
/// let tip = TooltipSpec::from("Type a query here");
/// assert_eq!(tip.description, "Type a query here");
/// assert!(tip.title.is_empty());
/// assert_eq!(tip.side, Side::Auto);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipSpec {
    /// Title, rendered after the step progress.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Placement side.
    pub side: Side,
    /// Padding override; the target's padding otherwise.
    pub padding: Option<f64>,
}

impl TooltipSpec {
    /// A tooltip with a description and automatic placement.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the placement side.
    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Override the padding used for placement.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }
}

impl From<&str> for TooltipSpec {
    fn from(description: &str) -> Self {
        Self::new(description)
    }
}

impl From<String> for TooltipSpec {
    fn from(description: String) -> Self {
        Self::new(description)
    }
}

/// One target of a step and how to present it.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetSpec<N> {
    /// What to highlight.
    pub target: Target<N>,
    /// Dim the rest of the page.
    pub mask: bool,
    /// Interaction that advances the tour.
    pub trigger: Trigger,
    /// Optional tooltip.
    pub tooltip: Option<TooltipSpec>,
    /// Padding override; the tour's padding otherwise.
    pub padding: Option<f64>,
}

impl<N> TargetSpec<N> {
    /// A target with no mask, trigger, or tooltip.
    pub fn new(target: impl Into<Target<N>>) -> Self {
        Self {
            target: target.into(),
            mask: false,
            trigger: Trigger::Off,
            tooltip: None,
            padding: None,
        }
    }

    /// A target that is a literal node.
    pub fn node(node: N) -> Self {
        Self::new(Target::Node(node))
    }

    /// Enable or disable the page mask.
    #[must_use]
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    /// Set the trigger; `true` means click.
    #[must_use]
    pub fn with_trigger(mut self, trigger: impl Into<Trigger>) -> Self {
        self.trigger = trigger.into();
        self
    }

    /// Attach a tooltip.
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<TooltipSpec>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Override the highlight padding.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    fn declares_target(&self) -> bool {
        match &self.target {
            Target::Selector(s) => !s.trim().is_empty(),
            Target::Node(_) => true,
        }
    }
}

/// One unit of a tour: a target, or a group of targets shown together.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<N> {
    targets: Vec<TargetSpec<N>>,
}

impl<N> Step<N> {
    /// A step with a single target.
    pub fn new(target: TargetSpec<N>) -> Self {
        Self {
            targets: vec![target],
        }
    }

    /// A step whose targets must all resolve for it to be shown.
    pub fn group(targets: impl IntoIterator<Item = TargetSpec<N>>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// Targets in declaration order.
    pub fn targets(&self) -> &[TargetSpec<N>] {
        &self.targets
    }

    /// Check that every member declares a target.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.targets.is_empty() {
            return Err(TourError::Configuration {
                step: index,
                reason: "a step needs at least one target",
            });
        }
        if !self.targets.iter().all(TargetSpec::declares_target) {
            return Err(TourError::Configuration {
                step: index,
                reason: "a target is required",
            });
        }
        Ok(())
    }
}

impl<N> From<TargetSpec<N>> for Step<N> {
    fn from(target: TargetSpec<N>) -> Self {
        Self::new(target)
    }
}
