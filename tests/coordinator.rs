//! Lifecycle events, match ceiling and concurrent cycles

mod common;

use std::thread;

use common::{references, session, session_with, with_limit};
use pathmark::host::BufferSurface;
use pathmark::{BufferEvent, BufferId, CycleOutcome, HighlightSettings};

// ============================================================================
// Match ceiling
// ============================================================================

#[test]
fn test_count_at_ceiling_is_highlighted() {
    let (host, coordinator) = session_with(with_limit(3));
    let buffer = host.open(references(3), "source.php");

    let outcome = coordinator.on_open(buffer);

    assert!(matches!(outcome, CycleOutcome::Highlighted { matches: 3, .. }));
    assert!(!coordinator.store().is_ignored(buffer));
    assert_eq!(coordinator.store().last_matches(buffer).len(), 3);
}

#[test]
fn test_count_above_ceiling_is_ignored() {
    let (host, coordinator) = session_with(with_limit(3));
    let buffer = host.open(references(4), "source.php");

    let outcome = coordinator.on_open(buffer);

    assert_eq!(outcome, CycleOutcome::Ignored { count: 4 });
    assert!(coordinator.store().is_ignored(buffer));
    assert!(host.operations().is_empty());
    assert!(coordinator.store().snapshot(buffer).is_none());
}

#[test]
fn test_default_ceiling_is_two_hundred() {
    let (host, coordinator) = session();
    let at_limit = host.open(references(200), "text.plain");
    let over_limit = host.open(references(201), "text.plain");

    assert!(matches!(
        coordinator.on_open(at_limit),
        CycleOutcome::Highlighted { matches: 200, .. }
    ));
    assert_eq!(
        coordinator.on_open(over_limit),
        CycleOutcome::Ignored { count: 201 }
    );
}

#[test]
fn test_ignoring_leaves_previous_decorations() {
    let (host, coordinator) = session_with(with_limit(2));
    let buffer = host.open("route::home", "source.php");
    coordinator.on_open(buffer);
    let before = host.decorations(buffer);
    host.take_operations();

    host.set_text(buffer, references(3));
    let outcome = coordinator.on_edit(buffer);

    assert_eq!(outcome, CycleOutcome::Ignored { count: 3 });
    assert!(host.take_operations().is_empty());
    assert_eq!(host.decorations(buffer), before);
    // The last committed matches are kept as well
    assert_eq!(coordinator.store().last_matches(buffer).len(), 1);
}

#[test]
fn test_ignored_buffer_stays_ignored_across_edits() {
    let (host, coordinator) = session_with(with_limit(1));
    let buffer = host.open(references(2), "source.php");
    coordinator.on_open(buffer);

    host.set_text(buffer, "route::home");
    assert_eq!(coordinator.on_edit(buffer), CycleOutcome::Skipped);
    assert_eq!(coordinator.on_edit(buffer), CycleOutcome::Skipped);
    assert_eq!(coordinator.on_activate(buffer), CycleOutcome::Skipped);
    assert!(host.operations().is_empty());
}

#[test]
fn test_close_and_reopen_resumes_scanning() {
    let (host, coordinator) = session_with(with_limit(1));
    let buffer = host.open(references(2), "source.php");
    coordinator.on_open(buffer);
    assert!(coordinator.store().is_ignored(buffer));

    coordinator.on_close(buffer);
    assert!(!coordinator.store().is_ignored(buffer));

    host.set_text(buffer, "route::home");
    let outcome = coordinator.on_open(buffer);
    assert!(matches!(outcome, CycleOutcome::Highlighted { matches: 1, .. }));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_state_is_created_on_first_scan() {
    let (host, coordinator) = session();
    let buffer = host.open("route::home", "source.php");
    assert!(coordinator.store().snapshot(buffer).is_none());

    coordinator.on_activate(buffer);

    let snapshot = coordinator.store().snapshot(buffer).unwrap();
    assert_eq!(snapshot.last_matches.len(), 1);
    assert_eq!(snapshot.last_scopes.len(), 1);
}

#[test]
fn test_close_discards_state() {
    let (host, coordinator) = session();
    let buffer = host.open("route::home", "source.php");
    coordinator.on_open(buffer);

    let outcome = coordinator.handle(BufferEvent::Closed(buffer));

    assert_eq!(outcome, CycleOutcome::Released);
    assert!(coordinator.store().snapshot(buffer).is_none());
    assert!(coordinator.store().last_scopes(buffer).is_empty());
}

#[test]
fn test_events_dispatch_to_handlers() {
    let (host, coordinator) = session();
    let buffer = host.open("route::home", "source.php");

    assert!(matches!(
        coordinator.handle(BufferEvent::Opened(buffer)),
        CycleOutcome::Highlighted { .. }
    ));
    assert!(matches!(
        coordinator.handle(BufferEvent::Edited(buffer)),
        CycleOutcome::Highlighted { .. }
    ));
    assert!(matches!(
        coordinator.handle(BufferEvent::Activated(buffer)),
        CycleOutcome::Highlighted { .. }
    ));
}

#[test]
fn test_unknown_buffer_is_skipped() {
    let (host, coordinator) = session();
    let buffer = BufferId(4242);
    assert!(host.text(buffer).is_none());

    assert_eq!(coordinator.on_edit(buffer), CycleOutcome::Skipped);
    assert!(coordinator.store().snapshot(buffer).is_none());
}

#[test]
fn test_highlighting_disabled_still_records_matches() {
    let settings = HighlightSettings {
        highlight_urls: false,
        ..HighlightSettings::default()
    };
    let (host, coordinator) = session_with(settings);
    let buffer = host.open("return route('route::users.show');", "source.php");

    let outcome = coordinator.on_open(buffer);

    assert_eq!(outcome, CycleOutcome::Recorded { matches: 1 });
    assert!(host.operations().is_empty());
    assert_eq!(coordinator.store().last_matches(buffer)[0].text, "route::users.show");

    host.set_caret(buffer, 16);
    assert_eq!(
        coordinator.resolve_under_cursor(buffer).as_deref(),
        Some("route::users.show")
    );
}

#[test]
fn test_reloaded_settings_apply_to_next_event() {
    let (host, coordinator) = session();
    let buffer = host.open("route::home", "source.php");
    coordinator.on_open(buffer);

    coordinator.reload_settings(with_limit(0));
    assert_eq!(coordinator.settings().max_url_limit, 0);

    assert_eq!(coordinator.on_edit(buffer), CycleOutcome::Ignored { count: 1 });
}

// ============================================================================
// Ordering and concurrency
// ============================================================================

#[test]
fn test_results_older_than_committed_cycle_are_dropped() {
    let (host, coordinator) = session();
    let buffer = host.open("route::home", "source.php");
    coordinator.on_open(buffer);
    let before = host.decorations(buffer);
    host.take_operations();

    // Pretend a cycle that started later than any future one already committed
    coordinator.store().lock().entry(buffer).committed_cycle = u64::MAX;

    host.set_text(buffer, "nothing here");
    assert_eq!(coordinator.on_activate(buffer), CycleOutcome::Stale);
    assert!(host.take_operations().is_empty());
    assert_eq!(host.decorations(buffer), before);
    assert_eq!(coordinator.store().last_matches(buffer).len(), 1);
}

#[test]
fn test_overlapping_events_keep_decorations_in_sync() {
    const TEXTS: [&str; 4] = [
        "route::home",
        "'route::a' b::c",
        "\"x::y\" `t::u` z::w",
        "",
    ];

    let (host, coordinator) = session();
    let buffers: Vec<BufferId> = (0..2).map(|_| host.open(TEXTS[0], "source.php")).collect();

    thread::scope(|s| {
        for worker in 0..4 {
            let host = &host;
            let coordinator = &coordinator;
            let buffers = &buffers;
            s.spawn(move || {
                for i in 0..200 {
                    let buffer = buffers[(i + worker) % buffers.len()];
                    host.set_text(buffer, TEXTS[(i * 7 + worker) % TEXTS.len()]);
                    coordinator.on_edit(buffer);
                }
            });
        }
        for worker in 0..4 {
            let coordinator = &coordinator;
            let buffers = &buffers;
            s.spawn(move || {
                for i in 0..200 {
                    coordinator.on_activate(buffers[(i + worker) % buffers.len()]);
                }
            });
        }
    });

    for &buffer in &buffers {
        let mut stored = coordinator.store().last_scopes(buffer);
        stored.sort();
        assert_eq!(host.visible_scopes(buffer), stored);
    }
}
