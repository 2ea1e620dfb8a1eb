// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A three-step tour over a small toolbar page.
//!
//! The first two steps advance on a click inside their target. A click elsewhere is
//! consumed by the tour. The last step has no trigger and is finished programmatically.
//!
//! Run:
//! - `cargo run -p understory_demos --example guided_tour`
//! - `RUST_LOG=understory_tour=trace cargo run -p understory_demos --example guided_tour`

use futures::executor::block_on;
use kurbo::{Point, Rect, Size};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_document::{Document, ElementSpec, PointerKind};
use understory_tour::adapters::document::SharedDocument;
use understory_tour::{
    CLASS_TOOLTIP, CLASS_TOOLTIP_CARET, CLASS_TOOLTIP_TITLE, Handled, Interaction, Side, Step,
    TargetSpec, TooltipSpec, Tour, TourOptions,
};

fn report(tour: &Tour<SharedDocument>, page: &SharedDocument) {
    println!(
        "  status={:?} step={} reached={}",
        tour.status(),
        tour.current_step(),
        tour.reached_step()
    );
    let tips: Vec<_> = tour.with_elements(|elements| {
        elements
            .iter()
            .filter_map(|e| e.tooltip().and_then(|t| t.node()))
            .collect()
    });
    let doc = page.lock();
    for tip in tips {
        let title = doc
            .find_class(tip, CLASS_TOOLTIP_TITLE)
            .and_then(|t| doc.element(t))
            .map(|el| el.text.clone())
            .unwrap_or_default();
        let caret = doc
            .find_class(tip, CLASS_TOOLTIP_CARET)
            .and_then(|c| doc.element(c))
            .map(|el| el.classes.join(" "))
            .unwrap_or_default();
        println!(
            "  tooltip {:?} at {:?} [{caret}]",
            title,
            doc.page_rect(tip)
        );
    }
}

fn click(tour: &Tour<SharedDocument>, page: &SharedDocument, pt: Point) {
    let Some(event) = page.lock().pointer_event(PointerKind::Click, pt) else {
        return;
    };
    let Handled {
        outcome,
        transition,
    } = tour.handle_interaction(&Interaction::from(&event));
    println!("click at {pt:?} -> {outcome:?}");
    if let Some(transition) = transition {
        println!("  -> {:?}", block_on(transition));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let page = SharedDocument::new(Document::new());
    let (search, go, help) = {
        let mut doc = page.lock();
        doc.style_class(CLASS_TOOLTIP, Size::new(220.0, 72.0));
        let body = doc.body();
        let toolbar = doc.insert(
            body,
            ElementSpec::new("nav")
                .with_class("toolbar")
                .with_bounds(Rect::new(0.0, 0.0, 1024.0, 56.0)),
        );
        let search = Rect::new(16.0, 12.0, 316.0, 44.0);
        doc.insert(
            toolbar,
            ElementSpec::new("input").with_id("search").with_bounds(search),
        );
        let go = Rect::new(328.0, 12.0, 408.0, 44.0);
        doc.insert(
            toolbar,
            ElementSpec::new("button").with_id("go").with_bounds(go),
        );
        let help = Rect::new(940.0, 700.0, 1008.0, 740.0);
        doc.insert(
            body,
            ElementSpec::new("a").with_class("help").with_bounds(help),
        );
        (search, go, help)
    };

    let options = TourOptions::default()
        .on_start(|step| println!("started at step {step}"))
        .on_finish(|| println!("finished"))
        .before_next(|current, next| async move {
            println!("before_next {current} -> {next}");
            true
        });
    let tour = Tour::new(page.clone(), options);
    tour.set_steps(vec![
        Step::new(
            TargetSpec::new(".toolbar #search")
                .with_mask(true)
                .with_trigger(true)
                .with_tooltip(TooltipSpec::new("Type what you are looking for.").with_title("Search")),
        ),
        Step::new(
            TargetSpec::new("#go")
                .with_trigger(true)
                .with_tooltip(TooltipSpec::new("Run the search.").with_side(Side::Right)),
        ),
        Step::new(TargetSpec::new(".help").with_tooltip("Help lives here.")),
    ])
    .expect("steps are well formed");

    let started = tour.start(0).expect("step 0 exists");
    println!("start -> {started:?}");
    report(&tour, &page);

    click(&tour, &page, help.center());
    click(&tour, &page, search.center());
    report(&tour, &page);

    click(&tour, &page, go.center());
    report(&tour, &page);

    println!("next -> {:?}", block_on(tour.go_next_step()));
    report(&tour, &page);

    tour.destroy();
    let doc = page.lock();
    info!(
        listeners = doc.listener_count(),
        observers = doc.observer_count(),
        "page released"
    );
}
