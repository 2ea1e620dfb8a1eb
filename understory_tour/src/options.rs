// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tour-wide options and hooks.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::types::Interaction;

/// Hook consulted before a transition from `current` to `next`. Resolve to `false` to veto.
pub type NavigationHook = Arc<dyn Fn(usize, usize) -> BoxFuture<'static, bool> + Send + Sync>;

/// Hook receiving a step index.
pub type StepHook = Arc<dyn Fn(usize) + Send + Sync>;

/// Hook run once when the tour finishes.
pub type FinishHook = Arc<dyn Fn() + Send + Sync>;

/// Predicate widening the interaction scope.
pub type ScopePredicate<N> = Arc<dyn Fn(&Interaction<N>) -> bool + Send + Sync>;

/// Formats a tooltip title from `(position, total, title)`, `position` being one-based.
pub type TitleFormat = Arc<dyn Fn(usize, usize, &str) -> String + Send + Sync>;

/// Which interactions may reach the page while a tour is running.
#[derive(Clone, Default)]
pub enum Scope<N> {
    /// Every interaction passes.
    Unrestricted,
    /// Only interactions inside highlighted targets pass.
    #[default]
    Highlighted,
    /// Interactions pass inside highlighted targets or when the predicate accepts them.
    Custom(ScopePredicate<N>),
}

impl<N> fmt::Debug for Scope<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => f.write_str("Unrestricted"),
            Self::Highlighted => f.write_str("Highlighted"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Default progress title: `Step 2/5  Search`.
pub fn default_title(position: usize, total: usize, title: &str) -> String {
    if title.is_empty() {
        format!("Step {position}/{total}")
    } else {
        format!("Step {position}/{total}  {title}")
    }
}

/// Options shared by every step of a tour.
///
/// ```
/// use understory_tour::{Scope, TourOptions};
///
/// let options: TourOptions<u32> = TourOptions::default()
///     .with_padding(8.0)
///     .with_scope(Scope::Unrestricted)
///     .before_next(|_current, next| async move { next != 3 });
/// assert_eq!(options.padding, 8.0);
/// assert!(options.before_next.is_some());
/// ```
#[derive(Clone)]
pub struct TourOptions<N> {
    /// Space between a target and its highlight frame.
    pub padding: f64,
    /// Interaction scope.
    pub scope: Scope<N>,
    /// Tooltip title formatter.
    pub title_format: TitleFormat,
    /// Run by `start` once the start index is valid.
    pub on_start: Option<StepHook>,
    /// Run when the last step is passed.
    pub on_finish: Option<FinishHook>,
    /// Consulted before moving forward.
    pub before_next: Option<NavigationHook>,
    /// Consulted before moving backward.
    pub before_prev: Option<NavigationHook>,
    /// Consulted before jumping.
    pub before_jump: Option<NavigationHook>,
    /// Run after a successful jump.
    pub after_jump: Option<StepHook>,
}

impl<N> Default for TourOptions<N> {
    fn default() -> Self {
        Self {
            padding: 5.0,
            scope: Scope::Highlighted,
            title_format: Arc::new(default_title),
            on_start: None,
            on_finish: None,
            before_next: None,
            before_prev: None,
            before_jump: None,
            after_jump: None,
        }
    }
}

fn navigation_hook<F, Fut>(hook: F) -> NavigationHook
where
    F: Fn(usize, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    Arc::new(move |current, next| hook(current, next).boxed())
}

impl<N> TourOptions<N> {
    /// Set the highlight padding.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the interaction scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Scope<N>) -> Self {
        self.scope = scope;
        self
    }

    /// Set the tooltip title formatter.
    #[must_use]
    pub fn with_title_format(
        mut self,
        format: impl Fn(usize, usize, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.title_format = Arc::new(format);
        self
    }

    /// Set the start hook.
    #[must_use]
    pub fn on_start(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_start = Some(Arc::new(hook));
        self
    }

    /// Set the finish hook.
    #[must_use]
    pub fn on_finish(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Arc::new(hook));
        self
    }

    /// Set the forward veto hook.
    #[must_use]
    pub fn before_next<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(usize, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.before_next = Some(navigation_hook(hook));
        self
    }

    /// Set the backward veto hook.
    #[must_use]
    pub fn before_prev<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(usize, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.before_prev = Some(navigation_hook(hook));
        self
    }

    /// Set the jump veto hook.
    #[must_use]
    pub fn before_jump<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(usize, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.before_jump = Some(navigation_hook(hook));
        self
    }

    /// Set the hook run after a successful jump.
    #[must_use]
    pub fn after_jump(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.after_jump = Some(Arc::new(hook));
        self
    }
}

impl<N> fmt::Debug for TourOptions<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourOptions")
            .field("padding", &self.padding)
            .field("scope", &self.scope)
            .field("on_start", &self.on_start.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .field("before_next", &self.before_next.is_some())
            .field("before_prev", &self.before_prev.is_some())
            .field("before_jump", &self.before_jump.is_some())
            .field("after_jump", &self.after_jump.is_some())
            .finish_non_exhaustive()
    }
}
