// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tour engine: step sequence, navigation state machine, recovery, and scoping.
//!
//! ## Transitions
//!
//! Navigation calls ([`Tour::go_next_step`], [`Tour::go_prev_step`], [`Tour::jump_to_step`])
//! run their synchronous prefix immediately: the [`Status::Moving`] guard is checked and set,
//! and the veto hook is invoked. They return a [`Transition`], a future that awaits the hook
//! and then commits. Drive it on any executor.
//!
//! Without a veto hook for the move there is nothing to await: the move commits before the
//! call returns and the [`Transition`] is already settled, so dropping it loses nothing.
//!
//! While a transition is in flight every other navigation call resolves to
//! [`Navigated::Ignored`] without invoking hooks. A hook that never resolves stalls
//! navigation until [`Tour::reset`]; there is no timeout. Dropping a transition whose hook
//! is still pending has the same effect.
//!
//! [`Tour::reset`] bumps an epoch; a transition whose hook resolves after a reset does not
//! commit and resolves to [`Navigated::Ignored`].
//!
//! ## Recovery
//!
//! Feed mutation batches to [`Tour::handle_mutations`] (or call [`Tour::flush_mutations`] to
//! drain the tour's own observer). Watched elements inside a mutated subtree are
//! repositioned, then:
//!
//! - `Querying`: the current step is retried.
//! - `Watching`: if a target became invisible the tour is `Lost` and retreats; otherwise, if
//!   the current step is behind the reached step, it jumps forward to catch up.
//! - `Moving`: nothing else happens. The catch-up is dropped and retried on the next batch.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tracing::{debug, info, trace};

use crate::element::StepElement;
use crate::error::{Result, TourError};
use crate::geometry::GeometryProbe;
use crate::highlight::Highlight;
use crate::options::{Scope, TourOptions};
use crate::step::{Step, Target, TargetSpec};
use crate::surface::{ListenerId, ObserverId, Surface};
use crate::tooltip::Tooltip;
use crate::types::{Interaction, InteractionKinds, MutationRecord, Navigated, Outcome, Status};

/// An in-flight navigation. Resolves once the veto hook settles and the move commits.
#[must_use = "a transition commits only when polled to completion"]
pub struct Transition {
    inner: BoxFuture<'static, Navigated>,
}

impl Transition {
    fn new(fut: impl Future<Output = Navigated> + Send + 'static) -> Self {
        Self { inner: fut.boxed() }
    }

    /// A transition that has already settled.
    pub fn ready(outcome: Navigated) -> Self {
        Self::new(future::ready(outcome))
    }
}

impl Future for Transition {
    type Output = Navigated;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Navigated> {
        self.inner.poll_unpin(cx)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition").finish_non_exhaustive()
    }
}

/// Result of routing an interaction through the tour.
#[derive(Debug)]
#[must_use]
pub struct Handled {
    /// Whether the interaction may reach application handlers.
    pub outcome: Outcome,
    /// The forward transition started by a trigger, if any.
    pub transition: Option<Transition>,
}

impl Handled {
    fn pass() -> Self {
        Self {
            outcome: Outcome::Continue,
            transition: None,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Subscriptions {
    listener: ListenerId,
    observer: ObserverId,
}

#[derive(Debug)]
struct TourState<N> {
    status: Status,
    steps: Vec<Step<N>>,
    current_step: usize,
    reached_step: usize,
    elements: Vec<StepElement<N>>,
    /// Indices into `elements` of the trigger elements.
    triggers: Vec<usize>,
    epoch: u64,
    subscriptions: Option<Subscriptions>,
}

impl<N> TourState<N> {
    fn set_status(&mut self, to: Status) {
        if self.status != to {
            debug!(from = ?self.status, to = ?to, step = self.current_step, "status");
            self.status = to;
        }
    }
}

enum PrevCommit {
    Settled(Navigated),
    RetreatFurther,
}

struct Inner<S: Surface> {
    surface: S,
    options: TourOptions<S::Node>,
    state: Mutex<TourState<S::Node>>,
}

impl<S: Surface> Drop for Inner<S> {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(subs) = state.subscriptions.take() {
            self.surface.unlisten(subs.listener);
            self.surface.disconnect(subs.observer);
        }
    }
}

/// A guided tour over a [`Surface`].
///
/// Cloning yields another handle to the same tour. Subscriptions to the surface are
/// acquired by [`Tour::new`] and released by [`Tour::destroy`] or when the last handle drops.
pub struct Tour<S: Surface> {
    inner: Arc<Inner<S>>,
}

impl<S: Surface> Clone for Tour<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Surface> fmt::Debug for Tour<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Tour")
            .field("status", &state.status)
            .field("steps", &state.steps.len())
            .field("current_step", &state.current_step)
            .field("reached_step", &state.reached_step)
            .field("elements", &state.elements.len())
            .field("destroyed", &state.subscriptions.is_none())
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Tour<S> {
    /// Create a tour and subscribe to the surface's interactions and mutations.
    pub fn new(surface: S, options: TourOptions<S::Node>) -> Self {
        let listener = surface.listen(InteractionKinds::all());
        let observer = surface.observe();
        debug!(?listener, ?observer, "tour subscribed");
        let state = TourState {
            status: Status::Ready,
            steps: Vec::new(),
            current_step: 0,
            reached_step: 0,
            elements: Vec::new(),
            triggers: Vec::new(),
            epoch: 0,
            subscriptions: Some(Subscriptions { listener, observer }),
        };
        Self {
            inner: Arc::new(Inner {
                surface,
                options,
                state: Mutex::new(state),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TourState<S::Node>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The surface the tour renders on.
    pub fn surface(&self) -> &S {
        &self.inner.surface
    }

    /// The tour's options.
    pub fn options(&self) -> &TourOptions<S::Node> {
        &self.inner.options
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.lock().status
    }

    /// Index of the current step.
    pub fn current_step(&self) -> usize {
        self.lock().current_step
    }

    /// Farthest step index shown so far.
    pub fn reached_step(&self) -> usize {
        self.lock().reached_step
    }

    /// Number of configured steps.
    pub fn step_count(&self) -> usize {
        self.lock().steps.len()
    }

    /// Returns true while step elements are shown.
    pub fn is_active(&self) -> bool {
        !self.lock().elements.is_empty()
    }

    /// Returns true once [`destroy`](Self::destroy) released the subscriptions.
    pub fn is_destroyed(&self) -> bool {
        self.lock().subscriptions.is_none()
    }

    /// Targets of the current elements.
    pub fn current_targets(&self) -> Vec<S::Node> {
        self.lock().elements.iter().map(StepElement::target).collect()
    }

    /// Targets of the current elements that act as triggers.
    pub fn current_triggers(&self) -> Vec<S::Node> {
        let state = self.lock();
        state
            .triggers
            .iter()
            .map(|&i| state.elements[i].target())
            .collect()
    }

    /// Inspect the current elements.
    pub fn with_elements<R>(&self, f: impl FnOnce(&[StepElement<S::Node>]) -> R) -> R {
        f(&self.lock().elements)
    }

    /// Replace the step sequence.
    ///
    /// Every step is validated first, including that its selectors parse on the surface; on
    /// error nothing changes. On success the tour is reset and waits for [`start`](Self::start).
    pub fn set_steps(&self, steps: Vec<Step<S::Node>>) -> Result<()> {
        let surface = &self.inner.surface;
        for (index, step) in steps.iter().enumerate() {
            step.validate(index)?;
            let unparsable = step.targets().iter().any(|spec| match &spec.target {
                Target::Selector(selector) => !surface.is_valid_selector(selector),
                Target::Node(_) => false,
            });
            if unparsable {
                return Err(TourError::Configuration {
                    step: index,
                    reason: "a selector cannot be parsed",
                });
            }
        }
        let mut state = self.lock();
        if state.subscriptions.is_none() {
            return Err(TourError::Destroyed);
        }
        self.reset_locked(&mut state);
        debug!(steps = steps.len(), "steps set");
        state.steps = steps;
        Ok(())
    }

    /// Show step `index`.
    ///
    /// Any in-flight transition is superseded. When the step cannot be resolved yet the tour
    /// keeps querying on later mutation batches.
    pub fn start(&self, index: usize) -> Result<Navigated> {
        let outcome = {
            let mut state = self.lock();
            if state.subscriptions.is_none() {
                return Err(TourError::Destroyed);
            }
            let len = state.steps.len();
            if index >= len {
                return Err(TourError::InvalidStep { index, len });
            }
            state.epoch += 1;
            state.current_step = index;
            if self.show_step_locked(&mut state, index, true) {
                Navigated::Shown { step: index }
            } else {
                Navigated::Unresolved { step: index }
            }
        };
        info!(step = index, ?outcome, "tour started");
        if let Some(hook) = &self.inner.options.on_start {
            hook(index);
        }
        Ok(outcome)
    }

    /// Move to the next step, finishing the tour after the last one.
    pub fn go_next_step(&self) -> Transition {
        let mut state = self.lock();
        if state.subscriptions.is_none()
            || state.steps.is_empty()
            || matches!(state.status, Status::Moving | Status::Finished)
        {
            trace!(status = ?state.status, "next ignored");
            return Transition::ready(Navigated::Ignored);
        }
        let current = state.current_step;
        let next = current + 1;
        let last = state.status;
        let epoch = state.epoch;
        state.set_status(Status::Moving);
        drop(state);

        let Some(hook) = self
            .inner
            .options
            .before_next
            .as_ref()
            .map(|hook| hook(current, next))
        else {
            let outcome = self.commit_next(epoch, last, next, true);
            debug!(?outcome, "next settled");
            return Transition::ready(outcome);
        };
        let tour = self.clone();
        Transition::new(async move {
            let allowed = hook.await;
            let outcome = tour.commit_next(epoch, last, next, allowed);
            debug!(?outcome, "next settled");
            outcome
        })
    }

    fn commit_next(&self, epoch: u64, last: Status, next: usize, allowed: bool) -> Navigated {
        let mut state = self.lock();
        if state.epoch != epoch {
            return Navigated::Ignored;
        }
        if !allowed {
            state.set_status(last);
            return Navigated::Vetoed;
        }
        if next >= state.steps.len() {
            drop(state);
            return self.finish();
        }
        state.current_step = next;
        if self.show_step_locked(&mut state, next, true) {
            Navigated::Shown { step: next }
        } else {
            Navigated::Unresolved { step: next }
        }
    }

    fn finish(&self) -> Navigated {
        if let Some(hook) = &self.inner.options.on_finish {
            hook();
        }
        let mut state = self.lock();
        self.reset_locked(&mut state);
        state.set_status(Status::Finished);
        info!("tour finished");
        Navigated::Finished
    }

    /// Move to the previous step.
    ///
    /// At step 0 the tour stays on step 0 and queries it again. A retreat started from
    /// [`Status::Lost`] does not take the `Moving` guard, and keeps retreating while the
    /// earlier step cannot be resolved either.
    pub fn go_prev_step(&self) -> Transition {
        let mut state = self.lock();
        if state.subscriptions.is_none()
            || state.steps.is_empty()
            || state.status == Status::Moving
        {
            trace!(status = ?state.status, "prev ignored");
            return Transition::ready(Navigated::Ignored);
        }
        let current = state.current_step;
        let prev = current.saturating_sub(1);
        let last = state.status;
        let epoch = state.epoch;
        if last != Status::Lost {
            state.set_status(Status::Moving);
        }
        drop(state);

        let Some(hook) = self
            .inner
            .options
            .before_prev
            .as_ref()
            .map(|hook| hook(current, prev))
        else {
            return self.settle_prev(epoch, last, prev, true);
        };
        let tour = self.clone();
        Transition::new(async move {
            let allowed = hook.await;
            tour.settle_prev(epoch, last, prev, allowed).await
        })
    }

    fn settle_prev(&self, epoch: u64, last: Status, prev: usize, allowed: bool) -> Transition {
        match self.commit_prev(epoch, last, prev, allowed) {
            PrevCommit::Settled(outcome) => {
                debug!(?outcome, "prev settled");
                Transition::ready(outcome)
            }
            PrevCommit::RetreatFurther => self.go_prev_step(),
        }
    }

    fn commit_prev(&self, epoch: u64, last: Status, prev: usize, allowed: bool) -> PrevCommit {
        let mut state = self.lock();
        if state.epoch != epoch {
            return PrevCommit::Settled(Navigated::Ignored);
        }
        if !allowed {
            state.set_status(last);
            return PrevCommit::Settled(Navigated::Vetoed);
        }
        let target = if state.current_step == 0 {
            state.set_status(Status::Querying);
            0
        } else {
            prev
        };
        state.current_step = target;
        if self.show_step_locked(&mut state, target, true) {
            return PrevCommit::Settled(Navigated::Shown { step: target });
        }
        if state.status == Status::Lost && state.current_step > 0 {
            debug!(step = target, "retreat target unresolved; retreating further");
            return PrevCommit::RetreatFurther;
        }
        if last == Status::Lost {
            // Nowhere left to retreat: drop the lost overlays and query step 0.
            for element in &mut state.elements {
                element.dismiss(&self.inner.surface);
            }
            state.elements.clear();
            state.triggers.clear();
            state.set_status(Status::Querying);
        }
        PrevCommit::Settled(Navigated::Unresolved { step: target })
    }

    /// Jump to step `index` without querying retries.
    ///
    /// The current step changes only if the target step resolves now; otherwise the prior
    /// status is restored. Returns [`TourError::InvalidStep`] if `index` is out of range.
    pub fn jump_to_step(&self, index: usize) -> Result<Transition> {
        let mut state = self.lock();
        if state.subscriptions.is_none() || state.status == Status::Moving {
            trace!(status = ?state.status, "jump ignored");
            return Ok(Transition::ready(Navigated::Ignored));
        }
        let len = state.steps.len();
        if index >= len {
            return Err(TourError::InvalidStep { index, len });
        }
        let current = state.current_step;
        let last = state.status;
        let epoch = state.epoch;
        state.set_status(Status::Moving);
        drop(state);

        let Some(hook) = self
            .inner
            .options
            .before_jump
            .as_ref()
            .map(|hook| hook(current, index))
        else {
            let outcome = self.commit_jump(epoch, last, index, true);
            debug!(?outcome, "jump settled");
            return Ok(Transition::ready(outcome));
        };
        let tour = self.clone();
        Ok(Transition::new(async move {
            let allowed = hook.await;
            let outcome = tour.commit_jump(epoch, last, index, allowed);
            debug!(?outcome, "jump settled");
            outcome
        }))
    }

    fn commit_jump(&self, epoch: u64, last: Status, index: usize, allowed: bool) -> Navigated {
        let mut state = self.lock();
        if state.epoch != epoch {
            return Navigated::Ignored;
        }
        if !allowed {
            state.set_status(last);
            return Navigated::Vetoed;
        }
        if !self.show_step_locked(&mut state, index, false) {
            state.set_status(last);
            return Navigated::Unresolved { step: index };
        }
        state.current_step = index;
        drop(state);
        if let Some(hook) = &self.inner.options.after_jump {
            hook(index);
        }
        Navigated::Shown { step: index }
    }

    /// Resolve and show step `index`. All-or-nothing: on failure the current elements stay.
    fn show_step_locked(
        &self,
        state: &mut TourState<S::Node>,
        index: usize,
        keep_querying: bool,
    ) -> bool {
        let surface = &self.inner.surface;
        let Some(step) = state.steps.get(index) else {
            return false;
        };
        let resolved: Option<Vec<_>> = step
            .targets()
            .iter()
            .map(|spec| match &spec.target {
                Target::Selector(selector) => surface.query_visible(selector),
                Target::Node(node) => Some(*node),
            })
            .collect();
        let Some(resolved) = resolved else {
            trace!(step = index, "step unresolved");
            if keep_querying && state.status != Status::Lost {
                state.set_status(Status::Querying);
            }
            return false;
        };

        let total = state.steps.len();
        let mut elements: Vec<_> = resolved
            .into_iter()
            .zip(state.steps[index].targets())
            .map(|(node, spec)| self.build_element(node, spec, index, total))
            .collect();

        for element in &mut state.elements {
            element.dismiss(surface);
        }
        for element in &mut elements {
            element.highlight(surface);
        }
        state.reached_step = state.reached_step.max(index);
        state.triggers = elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_trigger())
            .map(|(i, _)| i)
            .collect();
        state.elements = elements;
        state.set_status(Status::Watching);
        debug!(step = index, elements = state.elements.len(), "step shown");
        true
    }

    fn build_element(
        &self,
        node: S::Node,
        spec: &TargetSpec<S::Node>,
        index: usize,
        total: usize,
    ) -> StepElement<S::Node> {
        let options = &self.inner.options;
        let padding = spec.padding.unwrap_or(options.padding);
        let highlight = Highlight::new(node, padding, spec.mask);
        let tooltip = spec.tooltip.as_ref().map(|tip| {
            Tooltip::new(
                node,
                (options.title_format)(index + 1, total, &tip.title),
                tip.description.clone(),
                tip.side,
                tip.padding.unwrap_or(padding),
            )
        });
        StepElement::new(node, highlight, tooltip, spec.trigger.kind())
    }

    fn reset_locked(&self, state: &mut TourState<S::Node>) {
        for element in &mut state.elements {
            element.dismiss(&self.inner.surface);
        }
        state.elements.clear();
        state.triggers.clear();
        state.steps.clear();
        state.current_step = 0;
        state.reached_step = 0;
        state.epoch += 1;
        state.set_status(Status::Ready);
    }

    /// Dismiss every element, forget the steps, and return to [`Status::Ready`]. Idempotent.
    pub fn reset(&self) {
        let mut state = self.lock();
        self.reset_locked(&mut state);
    }

    /// Reset and release the surface subscriptions. Idempotent.
    ///
    /// Later navigation calls resolve to [`Navigated::Ignored`]; [`start`](Self::start) and
    /// [`set_steps`](Self::set_steps) return [`TourError::Destroyed`].
    pub fn destroy(&self) {
        let mut state = self.lock();
        self.reset_locked(&mut state);
        if let Some(subs) = state.subscriptions.take() {
            self.inner.surface.unlisten(subs.listener);
            self.inner.surface.disconnect(subs.observer);
            info!("tour destroyed");
        }
    }

    /// Drain the tour's own mutation observer and process the batch.
    pub fn flush_mutations(&self) -> Option<Transition> {
        let observer = self.lock().subscriptions?.observer;
        let records = self.inner.surface.take_records(observer);
        if records.is_empty() {
            return None;
        }
        self.handle_mutations(&records)
    }

    /// Process a batch of mutation records.
    ///
    /// Returns the follow-up transition (a retreat or a catch-up jump), if one was started.
    pub fn handle_mutations(&self, records: &[MutationRecord<S::Node>]) -> Option<Transition> {
        let surface = &self.inner.surface;
        let mut state = self.lock();
        if state.subscriptions.is_none() {
            return None;
        }
        trace!(records = records.len(), status = ?state.status, "mutation batch");

        for element in &mut state.elements {
            let target = element.target();
            if records.iter().any(|r| surface.contains(r.target, target)) {
                element.update(surface);
            }
        }

        let status = state.status;
        match status {
            Status::Querying => {
                let step = state.current_step;
                self.show_step_locked(&mut state, step, true);
                None
            }
            Status::Watching => {
                let probe = GeometryProbe::new(surface);
                let lost = state
                    .elements
                    .iter()
                    .any(|element| !probe.is_visible(element.target()));
                if lost {
                    state.set_status(Status::Lost);
                    drop(state);
                    Some(self.go_prev_step())
                } else if state.current_step < state.reached_step {
                    let reached = state.reached_step;
                    drop(state);
                    self.jump_to_step(reached).ok()
                } else {
                    None
                }
            }
            Status::Moving => {
                trace!("transition in flight; recovery skipped");
                None
            }
            Status::Ready | Status::Lost | Status::Finished => None,
        }
    }

    /// Route an interaction through scope restriction and trigger matching.
    ///
    /// Out-of-scope interactions are consumed, even while no step is shown.
    pub fn handle_interaction(&self, interaction: &Interaction<S::Node>) -> Handled {
        let surface = &self.inner.surface;
        let (targets, triggers) = {
            let state = self.lock();
            if state.subscriptions.is_none() {
                return Handled::pass();
            }
            let targets: Vec<_> = state.elements.iter().map(StepElement::target).collect();
            let triggers: Vec<_> = state
                .triggers
                .iter()
                .filter_map(|&i| {
                    let element = &state.elements[i];
                    element.trigger_kind().map(|kind| (element.target(), kind))
                })
                .collect();
            (targets, triggers)
        };
        trace!(kind = ?interaction.kind, node = ?interaction.target, "interaction");

        let in_highlighted = || {
            targets
                .iter()
                .any(|&t| surface.contains(t, interaction.target))
        };
        let in_scope = match &self.inner.options.scope {
            Scope::Unrestricted => true,
            Scope::Highlighted => in_highlighted(),
            Scope::Custom(predicate) => predicate(interaction) || in_highlighted(),
        };
        if !in_scope {
            trace!(node = ?interaction.target, "interaction out of scope");
            return Handled {
                outcome: Outcome::StopAndConsume,
                transition: None,
            };
        }
        if targets.is_empty() {
            return Handled::pass();
        }

        let triggered = triggers
            .iter()
            .any(|&(t, kind)| kind == interaction.kind && surface.contains(t, interaction.target));
        if triggered {
            debug!(kind = ?interaction.kind, "trigger");
            return Handled {
                outcome: Outcome::Continue,
                transition: Some(self.go_next_step()),
            };
        }
        Handled::pass()
    }
}
