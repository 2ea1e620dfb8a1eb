// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tour --heading-base-level=0

//! Understory Tour: a guided-tour engine for rendered documents.
//!
//! ## Overview
//!
//! A tour walks a user through an ordered sequence of [`Step`]s. Each step points at one or
//! more targets; the tour draws a [`Highlight`] around each and an optional [`Tooltip`] next
//! to it, and advances when a trigger interaction lands inside a target or when the host
//! navigates programmatically.
//!
//! The tour does not own a document. It talks to one through the [`Surface`] trait: node
//! resolution, geometry, overlay nodes, and subscriptions. The `document_adapter` feature
//! implements [`Surface`] for Understory Document.
//!
//! ## State machine
//!
//! | Status     | Meaning |
//! |------------|---------|
//! | `Ready`    | No active step. |
//! | `Querying` | The current step's targets are not resolvable yet. |
//! | `Watching` | The current step is shown and monitored. |
//! | `Lost`     | A shown target became invisible; the tour retreats. |
//! | `Moving`   | A transition is in flight; other navigation is a no-op. |
//! | `Finished` | Every step was completed. |
//!
//! Navigation calls return a [`Transition`] future. The `Moving` guard and the veto hook run
//! when the call is made; the commit runs when the transition is polled. A move without a
//! veto hook commits before the call returns.
//!
//! ## Feeding the tour
//!
//! - Mutation batches: [`Tour::handle_mutations`] or [`Tour::flush_mutations`]. Overlays
//!   follow layout shifts, `Querying` steps are retried, lost targets trigger a retreat, and
//!   a tour behind its reached step catches up.
//! - Pointer interactions: [`Tour::handle_interaction`], before application handlers. With
//!   the default [`Scope::Highlighted`], interactions outside highlighted targets come back
//!   as [`Outcome::StopAndConsume`].
//!
//! ## Minimal usage
//!
//! ```
//! # #[cfg(feature = "document_adapter")]
//! # {
//! use futures::executor::block_on;
//! use kurbo::Rect;
//! use understory_document::{Document, ElementSpec};
//! use understory_tour::adapters::document::SharedDocument;
//! use understory_tour::{Navigated, Status, Step, TargetSpec, Tour, TourOptions};
//!
//! let page = SharedDocument::new(Document::new());
//! {
//!     let mut doc = page.lock();
//!     let body = doc.body();
//!     doc.insert(body, ElementSpec::new("input").with_id("search").with_bounds(Rect::new(10.0, 10.0, 210.0, 40.0)));
//!     doc.insert(body, ElementSpec::new("button").with_id("go").with_bounds(Rect::new(220.0, 10.0, 280.0, 40.0)));
//! }
//!
//! let tour = Tour::new(page.clone(), TourOptions::default());
//! tour.set_steps(vec![
//!     Step::new(TargetSpec::new("#search").with_tooltip("Type a query")),
//!     Step::new(TargetSpec::new("#go").with_trigger(true)),
//! ])
//! .unwrap();
//!
//! assert_eq!(tour.start(0).unwrap(), Navigated::Shown { step: 0 });
//! assert_eq!(tour.status(), Status::Watching);
//!
//! assert_eq!(block_on(tour.go_next_step()), Navigated::Shown { step: 1 });
//! assert_eq!(block_on(tour.go_next_step()), Navigated::Finished);
//! assert_eq!(tour.status(), Status::Finished);
//! # }
//! ```

pub mod adapters;
mod element;
mod engine;
mod error;
mod geometry;
mod highlight;
mod options;
mod step;
mod surface;
mod tooltip;
mod types;

pub use element::StepElement;
pub use engine::{Handled, Tour, Transition};
pub use error::{Result, TourError};
pub use geometry::GeometryProbe;
pub use highlight::{CLASS_HIGHLIGHT, CLASS_MASK, Highlight, Positionable};
pub use options::{
    FinishHook, NavigationHook, Scope, ScopePredicate, StepHook, TitleFormat, TourOptions,
    default_title,
};
pub use step::{Step, Target, TargetSpec, TooltipSpec, Trigger};
pub use surface::{Frame, ListenerId, Markup, ObserverId, Surface};
pub use tooltip::{
    CLASS_TOOLTIP, CLASS_TOOLTIP_CARET, CLASS_TOOLTIP_DESCRIPTION, CLASS_TOOLTIP_TITLE, Caret,
    Placement, Side, TOOLTIP_DISTANCE, Tooltip, place,
};
pub use types::{
    Interaction, InteractionKind, InteractionKinds, MutationRecord, Navigated, Outcome, Status,
};
