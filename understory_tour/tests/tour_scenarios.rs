// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tours against Understory Document.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::channel::oneshot;
use futures::executor::block_on;
use kurbo::{Point, Rect, Size, Vec2};
use understory_document::{Document, ElementSpec, NodeId, PointerKind};
use understory_tour::adapters::document::SharedDocument;
use understory_tour::{
    CLASS_HIGHLIGHT, CLASS_MASK, CLASS_TOOLTIP, CLASS_TOOLTIP_CARET, CLASS_TOOLTIP_TITLE,
    Handled, Interaction, InteractionKind, Navigated, Outcome, Scope, Side, Status, Step,
    TargetSpec, TooltipSpec, Tour, TourError, TourOptions, Transition,
};

fn page() -> SharedDocument {
    SharedDocument::new(Document::new())
}

fn add(page: &SharedDocument, id: &str, bounds: Rect) -> NodeId {
    let mut doc = page.lock();
    let body = doc.body();
    doc.insert(
        body,
        ElementSpec::new("button").with_id(id).with_bounds(bounds),
    )
}

fn row(i: u32) -> Rect {
    let y = 20.0 + f64::from(i) * 60.0;
    Rect::new(20.0, y, 140.0, y + 40.0)
}

fn step(selector: &str) -> Step<NodeId> {
    Step::new(TargetSpec::new(selector))
}

fn settle(transition: Option<Transition>) -> Option<Navigated> {
    transition.map(block_on)
}

fn click(page: &SharedDocument, tour: &Tour<SharedDocument>, pt: Point) -> Handled {
    let event = page
        .lock()
        .pointer_event(PointerKind::Click, pt)
        .expect("something under the pointer");
    tour.handle_interaction(&Interaction::from(&event))
}

fn center(r: Rect) -> Point {
    r.center()
}

#[test]
fn reached_step_never_decreases() {
    let page = page();
    for (i, id) in (0_u32..).zip(["a", "b", "c", "d"]) {
        add(&page, id, row(i));
    }
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![step("#a"), step("#b"), step("#c"), step("#d")])
        .unwrap();

    let mut seen = vec![];
    tour.start(1).unwrap();
    seen.push(tour.reached_step());
    block_on(tour.go_next_step());
    seen.push(tour.reached_step());
    block_on(tour.go_prev_step());
    seen.push(tour.reached_step());
    block_on(tour.go_prev_step());
    seen.push(tour.reached_step());
    block_on(tour.jump_to_step(3).unwrap());
    seen.push(tour.reached_step());
    block_on(tour.jump_to_step(0).unwrap());
    seen.push(tour.reached_step());
    settle(tour.flush_mutations());
    seen.push(tour.reached_step());

    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(seen, vec![1, 2, 2, 2, 3, 3, 3]);
    assert!(tour.reached_step() >= tour.current_step());
}

#[test]
fn navigation_is_a_no_op_while_moving() {
    let page = page();
    add(&page, "a", row(0));
    add(&page, "b", row(1));
    add(&page, "c", row(2));

    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel::<bool>();
    let rx = Arc::new(Mutex::new(Some(rx)));
    let options = TourOptions::default().before_next({
        let calls = Arc::clone(&calls);
        move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            let rx = rx.lock().unwrap().take();
            async move {
                match rx {
                    Some(rx) => rx.await.unwrap_or(false),
                    None => true,
                }
            }
        }
    });
    let tour = Tour::new(page.clone(), options);
    tour.set_steps(vec![step("#a"), step("#b"), step("#c")])
        .unwrap();
    tour.start(0).unwrap();

    let pending = tour.go_next_step();
    assert_eq!(tour.status(), Status::Moving);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(block_on(tour.go_next_step()), Navigated::Ignored);
    assert_eq!(block_on(tour.go_prev_step()), Navigated::Ignored);
    assert_eq!(block_on(tour.jump_to_step(2).unwrap()), Navigated::Ignored);
    // Catch-up and recovery are skipped while the transition is pending.
    assert!(tour.flush_mutations().is_none());
    assert_eq!(tour.status(), Status::Moving);
    assert_eq!(tour.current_step(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tx.send(true).unwrap();
    assert_eq!(block_on(pending), Navigated::Shown { step: 1 });
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn absent_target_is_shown_once_it_appears() {
    let page = page();
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![step("#late")]).unwrap();

    assert_eq!(tour.start(0).unwrap(), Navigated::Unresolved { step: 0 });
    assert_eq!(tour.status(), Status::Querying);
    assert!(!tour.is_active());

    // Unrelated changes keep it querying.
    add(&page, "other", row(0));
    assert!(tour.flush_mutations().is_none());
    assert_eq!(tour.status(), Status::Querying);

    let late = add(&page, "late", row(1));
    assert!(tour.flush_mutations().is_none());
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_targets(), vec![late]);
}

#[test]
fn hidden_match_is_not_resolved() {
    let page = page();
    let hidden = add(&page, "x", row(0));
    page.lock()
        .set_flags(hidden, understory_document::NodeFlags::PICKABLE);
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![step("#x")]).unwrap();
    assert_eq!(tour.start(0).unwrap(), Navigated::Unresolved { step: 0 });

    page.lock()
        .set_flags(hidden, understory_document::NodeFlags::default());
    settle(tour.flush_mutations());
    assert_eq!(tour.status(), Status::Watching);
}

#[test]
fn vetoed_next_leaves_state_unchanged() {
    let page = page();
    add(&page, "a", row(0));
    add(&page, "b", row(1));
    let tour = Tour::new(
        page.clone(),
        TourOptions::default().before_next(|_, _| async { false }),
    );
    tour.set_steps(vec![step("#a"), step("#b")]).unwrap();
    tour.start(0).unwrap();

    let targets = tour.current_targets();
    let overlay = tour.with_elements(|e| e[0].highlight_frame().node());
    assert!(overlay.is_some());

    assert_eq!(block_on(tour.go_next_step()), Navigated::Vetoed);
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_step(), 0);
    assert_eq!(tour.current_targets(), targets);
    assert_eq!(
        tour.with_elements(|e| e[0].highlight_frame().node()),
        overlay
    );
}

#[test]
fn triggers_advance_and_scope_suppresses() {
    let page = page();
    let a = add(&page, "a", row(0));
    add(&page, "b", row(1));
    add(&page, "c", row(2));
    let outside = Rect::new(400.0, 400.0, 500.0, 440.0);
    add(&page, "outside", outside);

    let finished = Arc::new(AtomicUsize::new(0));
    let options = TourOptions::default().on_finish({
        let finished = Arc::clone(&finished);
        move || {
            finished.fetch_add(1, Ordering::SeqCst);
        }
    });
    let tour = Tour::new(page.clone(), options);
    tour.set_steps(vec![
        Step::new(TargetSpec::new("#a").with_trigger(true)),
        Step::new(TargetSpec::new("#b").with_trigger(true)),
        step("#c"),
    ])
    .unwrap();
    tour.start(0).unwrap();
    assert_eq!(tour.current_triggers(), vec![a]);

    let handled = click(&page, &tour, center(row(0)));
    assert_eq!(handled.outcome, Outcome::Continue);
    assert_eq!(settle(handled.transition), Some(Navigated::Shown { step: 1 }));

    let handled = click(&page, &tour, center(outside));
    assert_eq!(handled.outcome, Outcome::StopAndConsume);
    assert!(handled.transition.is_none());
    assert_eq!(tour.current_step(), 1);

    let handled = click(&page, &tour, center(row(1)));
    assert_eq!(settle(handled.transition), Some(Navigated::Shown { step: 2 }));
    assert!(tour.current_triggers().is_empty());

    let handled = click(&page, &tour, center(row(2)));
    assert_eq!(handled.outcome, Outcome::Continue);
    assert!(handled.transition.is_none());
    assert_eq!(tour.current_step(), 2);
    assert_eq!(finished.load(Ordering::SeqCst), 0);

    assert_eq!(block_on(tour.go_next_step()), Navigated::Finished);
    assert_eq!(tour.status(), Status::Finished);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert_eq!(block_on(tour.go_next_step()), Navigated::Ignored);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert!(!tour.is_active());
    assert_eq!(tour.step_count(), 0);
}

#[test]
fn grouped_step_shows_once_every_target_resolves() {
    let page = page();
    let a = add(&page, "a", row(0));
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![
        Step::group([
            TargetSpec::new("#a").with_trigger(true),
            TargetSpec::new("#b").with_tooltip("Then this"),
        ]),
        Step::new(TargetSpec::node(a)),
    ])
    .unwrap();

    assert_eq!(tour.start(0).unwrap(), Navigated::Unresolved { step: 0 });
    assert_eq!(tour.status(), Status::Querying);
    assert!(!tour.is_active());

    let b = add(&page, "b", row(1));
    settle(tour.flush_mutations());
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_targets(), vec![a, b]);
    assert_eq!(tour.current_triggers(), vec![a]);

    // Every member is in scope; only the trigger advances.
    let handled = click(&page, &tour, center(row(1)));
    assert_eq!(handled.outcome, Outcome::Continue);
    assert!(handled.transition.is_none());

    let handled = click(&page, &tour, center(row(0)));
    assert_eq!(settle(handled.transition), Some(Navigated::Shown { step: 1 }));
    assert_eq!(tour.current_targets(), vec![a]);
    assert!(tour.current_triggers().is_empty());
}

#[test]
fn unpolled_transitions_without_hooks_still_commit() {
    let page = page();
    add(&page, "a", row(0));
    add(&page, "b", row(1));
    let c = add(&page, "c", row(2));
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![
        Step::new(TargetSpec::new("#a").with_trigger(true)),
        step("#b"),
        step("#c"),
    ])
    .unwrap();
    tour.start(0).unwrap();

    // A host that only looks at the outcome.
    let outcome = click(&page, &tour, center(row(0))).outcome;
    assert_eq!(outcome, Outcome::Continue);
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_step(), 1);

    drop(tour.go_next_step());
    assert_eq!(tour.current_step(), 2);
    drop(tour.flush_mutations());

    page.lock().remove(c);
    drop(tour.flush_mutations());
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_step(), 1);

    assert_eq!(block_on(tour.go_prev_step()), Navigated::Shown { step: 0 });
    assert_eq!(tour.reached_step(), 2);
}

#[test]
fn trigger_kind_must_match() {
    let page = page();
    let a = add(&page, "a", row(0));
    add(&page, "b", row(1));
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![
        Step::new(TargetSpec::new("#a").with_trigger(InteractionKind::DoubleClick)),
        step("#b"),
    ])
    .unwrap();
    tour.start(0).unwrap();

    let handled = click(&page, &tour, center(row(0)));
    assert!(handled.transition.is_none());

    let handled =
        tour.handle_interaction(&Interaction::new(InteractionKind::DoubleClick, a));
    assert_eq!(settle(handled.transition), Some(Navigated::Shown { step: 1 }));
}

#[test]
fn custom_scope_widens_and_unrestricted_passes() {
    let page = page();
    add(&page, "a", row(0));
    let help = add(&page, "help", row(3));
    let tour = Tour::new(
        page.clone(),
        TourOptions::<NodeId>::default().with_scope(Scope::Custom(Arc::new(
            move |i: &Interaction<NodeId>| i.target == help,
        ))),
    );
    tour.set_steps(vec![step("#a")]).unwrap();
    tour.start(0).unwrap();

    assert_eq!(click(&page, &tour, center(row(3))).outcome, Outcome::Continue);
    assert_eq!(
        click(&page, &tour, Point::new(900.0, 700.0)).outcome,
        Outcome::StopAndConsume
    );

    let open = Tour::new(
        page.clone(),
        TourOptions::default().with_scope(Scope::Unrestricted),
    );
    open.set_steps(vec![step("#a")]).unwrap();
    open.start(0).unwrap();
    assert_eq!(
        click(&page, &open, Point::new(900.0, 700.0)).outcome,
        Outcome::Continue
    );
}

#[test]
fn lost_target_retreats_to_previous_step() {
    let page = page();
    add(&page, "first", row(0));
    let second = add(&page, "second", row(1));

    let retreats = Arc::new(Mutex::new(vec![]));
    let options = TourOptions::default().before_prev({
        let retreats = Arc::clone(&retreats);
        move |from, to| {
            retreats.lock().unwrap().push((from, to));
            async { true }
        }
    });
    let tour = Tour::new(page.clone(), options);
    tour.set_steps(vec![step("#first"), step("#second")])
        .unwrap();
    tour.start(0).unwrap();
    assert_eq!(block_on(tour.go_next_step()), Navigated::Shown { step: 1 });
    settle(tour.flush_mutations());

    page.lock().remove(second);
    let retreat = tour.flush_mutations().expect("retreat");
    assert_eq!(tour.status(), Status::Lost);
    assert_eq!(block_on(retreat), Navigated::Shown { step: 0 });
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_step(), 0);
    assert_eq!(tour.reached_step(), 1);
    assert_eq!(*retreats.lock().unwrap(), vec![(1, 0)]);

    // Catch-up fails while the target is missing and keeps the tour where it is.
    assert_eq!(
        settle(tour.flush_mutations()),
        Some(Navigated::Unresolved { step: 1 })
    );
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_step(), 0);

    // Once it is back, the tour catches up to the reached step.
    let second = add(&page, "second", row(1));
    assert_eq!(
        settle(tour.flush_mutations()),
        Some(Navigated::Shown { step: 1 })
    );
    assert_eq!(tour.current_targets(), vec![second]);
}

#[test]
fn lost_retreat_skips_unresolvable_steps() {
    let page = page();
    add(&page, "first", row(0));
    let middle = add(&page, "middle", row(1));
    let last = add(&page, "last", row(2));
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![step("#first"), step("#middle"), step("#last")])
        .unwrap();
    tour.start(2).unwrap();
    settle(tour.flush_mutations());

    {
        let mut doc = page.lock();
        doc.remove(middle);
        doc.remove(last);
    }
    let retreat = tour.flush_mutations().expect("retreat");
    assert_eq!(block_on(retreat), Navigated::Shown { step: 0 });
    assert_eq!(tour.current_step(), 0);
    assert_eq!(tour.status(), Status::Watching);
}

#[test]
fn lost_with_nothing_left_queries_step_zero() {
    let page = page();
    let only = add(&page, "only", row(0));
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![step("#only")]).unwrap();
    tour.start(0).unwrap();
    settle(tour.flush_mutations());

    page.lock().remove(only);
    let retreat = tour.flush_mutations().expect("retreat");
    assert_eq!(block_on(retreat), Navigated::Unresolved { step: 0 });
    assert_eq!(tour.status(), Status::Querying);
    assert!(!tour.is_active());

    add(&page, "only", row(0));
    settle(tour.flush_mutations());
    assert_eq!(tour.status(), Status::Watching);
}

#[test]
fn prev_at_first_step_queries_it_again() {
    let page = page();
    add(&page, "a", row(0));
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![step("#a"), step("#b")]).unwrap();
    tour.start(0).unwrap();
    assert_eq!(block_on(tour.go_prev_step()), Navigated::Shown { step: 0 });
    assert_eq!(tour.current_step(), 0);
    assert_eq!(tour.status(), Status::Watching);
}

#[test]
fn unresolved_next_keeps_querying() {
    let page = page();
    add(&page, "a", row(0));
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![step("#a"), step("#b")]).unwrap();
    tour.start(0).unwrap();

    assert_eq!(block_on(tour.go_next_step()), Navigated::Unresolved { step: 1 });
    assert_eq!(tour.status(), Status::Querying);
    assert_eq!(tour.current_step(), 1);

    let b = add(&page, "b", row(1));
    settle(tour.flush_mutations());
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_targets(), vec![b]);
}

#[test]
fn jump_commits_only_when_the_step_resolves() {
    let page = page();
    add(&page, "a", row(0));
    add(&page, "c", row(2));
    let jumped = Arc::new(Mutex::new(vec![]));
    let options = TourOptions::default()
        .before_jump(|_, to| async move { to != 0 })
        .after_jump({
            let jumped = Arc::clone(&jumped);
            move |to| jumped.lock().unwrap().push(to)
        });
    let tour = Tour::new(page.clone(), options);
    tour.set_steps(vec![step("#a"), step("#b"), step("#c")])
        .unwrap();
    tour.start(0).unwrap();

    assert_eq!(
        block_on(tour.jump_to_step(1).unwrap()),
        Navigated::Unresolved { step: 1 }
    );
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_step(), 0);

    assert_eq!(
        block_on(tour.jump_to_step(2).unwrap()),
        Navigated::Shown { step: 2 }
    );
    assert_eq!(tour.current_step(), 2);

    assert_eq!(block_on(tour.jump_to_step(0).unwrap()), Navigated::Vetoed);
    assert_eq!(tour.status(), Status::Watching);
    assert_eq!(tour.current_step(), 2);

    assert_eq!(*jumped.lock().unwrap(), vec![2]);
    assert!(matches!(
        tour.jump_to_step(9),
        Err(TourError::InvalidStep { index: 9, len: 3 })
    ));
}

#[test]
fn reset_while_hook_pending_discards_the_transition() {
    let page = page();
    add(&page, "a", row(0));
    add(&page, "b", row(1));
    let (tx, rx) = oneshot::channel::<bool>();
    let rx = Arc::new(Mutex::new(Some(rx)));
    let tour = Tour::new(
        page.clone(),
        TourOptions::default().before_next(move |_, _| {
            let rx = rx.lock().unwrap().take();
            async move {
                match rx {
                    Some(rx) => rx.await.unwrap_or(false),
                    None => true,
                }
            }
        }),
    );
    tour.set_steps(vec![step("#a"), step("#b")]).unwrap();
    tour.start(0).unwrap();

    let pending = tour.go_next_step();
    tour.reset();
    assert_eq!(tour.status(), Status::Ready);
    tx.send(true).unwrap();
    assert_eq!(block_on(pending), Navigated::Ignored);
    assert_eq!(tour.status(), Status::Ready);
    assert!(!tour.is_active());
}

#[test]
fn configuration_errors_surface_synchronously() {
    let page = page();
    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![step("#a")]).unwrap();

    let err = tour
        .set_steps(vec![step("#a"), Step::new(TargetSpec::new(""))])
        .unwrap_err();
    assert!(matches!(err, TourError::Configuration { step: 1, .. }));
    assert_eq!(tour.step_count(), 1);

    let err = tour
        .set_steps(vec![step("#a"), step("#a"), step("#b >")])
        .unwrap_err();
    assert_eq!(
        err,
        TourError::Configuration {
            step: 2,
            reason: "a selector cannot be parsed",
        }
    );
    assert_eq!(tour.step_count(), 1);

    assert!(matches!(
        tour.start(1),
        Err(TourError::InvalidStep { index: 1, len: 1 })
    ));
}

#[test]
fn start_runs_the_start_hook() {
    let page = page();
    add(&page, "a", row(0));
    let started = Arc::new(Mutex::new(vec![]));
    let tour = Tour::new(
        page.clone(),
        TourOptions::default().on_start({
            let started = Arc::clone(&started);
            move |index| started.lock().unwrap().push(index)
        }),
    );
    tour.set_steps(vec![step("#a")]).unwrap();
    tour.start(0).unwrap();
    assert_eq!(*started.lock().unwrap(), vec![0]);
}

#[test]
fn overlays_follow_the_target() {
    let page = page();
    page.lock()
        .style_class(CLASS_TOOLTIP, Size::new(200.0, 80.0));
    let target = add(&page, "search", Rect::new(10.0, 300.0, 110.0, 340.0));
    page.lock().set_scroll(Vec2::new(0.0, 100.0));

    let tour = Tour::new(page.clone(), TourOptions::default());
    tour.set_steps(vec![
        Step::new(
            TargetSpec::new("#search")
                .with_mask(true)
                .with_tooltip(TooltipSpec::new("Type here").with_title("Search")),
        ),
        step("#search"),
    ])
    .unwrap();
    tour.start(0).unwrap();

    let (frame, tip) = tour.with_elements(|e| {
        (
            e[0].highlight_frame().node().unwrap(),
            e[0].tooltip().and_then(|t| t.node()).unwrap(),
        )
    });
    {
        let doc = page.lock();
        let frame_el = doc.element(frame).unwrap();
        assert!(frame_el.has_class(CLASS_HIGHLIGHT));
        assert!(frame_el.has_class(CLASS_MASK));
        assert_eq!(doc.page_rect(frame), Rect::new(5.0, 295.0, 115.0, 345.0));

        let title = doc.find_class(tip, CLASS_TOOLTIP_TITLE).unwrap();
        assert_eq!(doc.element(title).unwrap().text, "Step 1/2  Search");
        assert_eq!(doc.page_rect(tip).origin(), Point::new(5.0, 355.0));
        let caret = doc.element(doc.find_class(tip, CLASS_TOOLTIP_CARET).unwrap()).unwrap();
        assert!(caret.has_class("top"));
        assert!(!caret.has_class("bottom"));
    }
    assert_eq!(
        tour.with_elements(|e| e[0].tooltip().and_then(|t| t.placement()).map(|p| p.side)),
        Some(Side::Bottom)
    );

    // Move the target near the page bottom: the tooltip flips above it.
    page.lock()
        .set_bounds(target, Rect::new(10.0, 700.0, 110.0, 740.0));
    assert!(tour.flush_mutations().is_none());
    {
        let doc = page.lock();
        assert_eq!(doc.page_rect(frame), Rect::new(5.0, 695.0, 115.0, 745.0));
        assert_eq!(doc.page_rect(tip).origin(), Point::new(5.0, 605.0));
        let caret = doc.element(doc.find_class(tip, CLASS_TOOLTIP_CARET).unwrap()).unwrap();
        assert!(caret.has_class("bottom"));
        assert!(!caret.has_class("top"));
    }

    // Moving on removes the previous step's overlays.
    assert_eq!(block_on(tour.go_next_step()), Navigated::Shown { step: 1 });
    assert!(!page.lock().is_alive(frame));
    assert!(!page.lock().is_alive(tip));
}

#[test]
fn destroy_releases_subscriptions() {
    let page = page();
    add(&page, "a", row(0));
    let tour = Tour::new(page.clone(), TourOptions::default());
    assert_eq!(page.lock().listener_count(), 1);
    assert_eq!(page.lock().observer_count(), 1);
    assert!(page.lock().is_listening(PointerKind::Out));

    tour.set_steps(vec![step("#a"), step("#a")]).unwrap();
    tour.start(0).unwrap();
    let overlay = tour.with_elements(|e| e[0].highlight_frame().node().unwrap());

    tour.destroy();
    tour.destroy();
    assert!(tour.is_destroyed());
    assert_eq!(page.lock().listener_count(), 0);
    assert_eq!(page.lock().observer_count(), 0);
    assert!(!page.lock().is_alive(overlay));

    assert_eq!(block_on(tour.go_next_step()), Navigated::Ignored);
    assert_eq!(block_on(tour.go_prev_step()), Navigated::Ignored);
    assert_eq!(block_on(tour.jump_to_step(0).unwrap()), Navigated::Ignored);
    assert!(tour.flush_mutations().is_none());
    assert_eq!(click(&page, &tour, center(row(0))).outcome, Outcome::Continue);
    assert!(matches!(tour.start(0), Err(TourError::Destroyed)));
    tour.reset();

    assert_eq!(page.lock().listener_count(), 0);
    assert_eq!(page.lock().observer_count(), 0);
}

#[test]
fn dropping_the_last_handle_releases_subscriptions() {
    let page = page();
    {
        let tour = Tour::new(page.clone(), TourOptions::default());
        let other = tour.clone();
        drop(tour);
        assert_eq!(page.lock().listener_count(), 1);
        drop(other);
    }
    assert_eq!(page.lock().listener_count(), 0);
    assert_eq!(page.lock().observer_count(), 0);
}
