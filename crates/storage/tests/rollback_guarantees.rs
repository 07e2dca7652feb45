mod support;

use ns_core::GenerationOptions;
use ns_storage::{
    NoopObserver, PagesetStore, ProgressEvent, ReferenceTemplate, RunObserver, StoreError,
};
use rusqlite::Connection;
use std::path::Path;
use support::*;

fn snapshot(path: &Path) -> (Vec<u8>, Vec<i64>) {
    (
        std::fs::read(path).expect("read pageset bytes"),
        row_counts(path),
    )
}

/// 3x3 layout with one occupied cell: 90 cells, 19 reserved, 70 free.
fn seventy_slot_pageset(dir: &Path) -> std::path::PathBuf {
    let path = blank_pageset(dir, &[(1, "3,3")]);
    let conn = Connection::open(&path).expect("seed db");
    conn.execute(
        "INSERT INTO ElementPlacement (GridPosition, GridSpan, Visible, ElementReferenceId, PageLayoutId) VALUES ('1,1', '1,1', 1, 900, 1)",
        [],
    )
    .expect("occupied cell");
    path
}

#[test]
fn capacity_shortfall_fails_and_leaves_the_file_untouched() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = seventy_slot_pageset(dir.path());
    let before = snapshot(&path);

    let mut store = PagesetStore::open(&path).expect("open pageset");
    let err = store
        .generate(
            request(
                plan(&numbered_slides(71), &GenerationOptions::default()),
                load_reference(dir.path()),
            ),
            &mut NoopObserver,
        )
        .expect_err("71 chunks cannot fit 70 slots");
    assert_eq!(err.code(), "CAPACITY_EXHAUSTED");
    assert!(err.to_string().contains("required=71, available=70"));
    drop(store);

    assert_eq!(snapshot(&path), before);
}

#[test]
fn exactly_full_capacity_commits() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = seventy_slot_pageset(dir.path());

    let mut store = PagesetStore::open(&path).expect("open pageset");
    let outcome = store
        .generate(
            request(
                plan(&numbered_slides(70), &GenerationOptions::default()),
                load_reference(dir.path()),
            ),
            &mut NoopObserver,
        )
        .expect("70 chunks fit 70 slots");
    assert_eq!(outcome.buttons_written, 70);
    assert_eq!(store.capacity().expect("capacity").available_cells(), 0);
}

struct AbortAfter {
    batches: usize,
    seen: Vec<ProgressEvent>,
}

impl RunObserver for AbortAfter {
    fn on_progress(&mut self, event: ProgressEvent) {
        self.seen.push(event);
    }

    fn should_abort(&self) -> bool {
        let written = self
            .seen
            .iter()
            .filter(|event| matches!(event, ProgressEvent::ButtonsWritten { .. }))
            .count();
        written >= self.batches
    }
}

#[test]
fn abort_between_slides_rolls_everything_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = blank_pageset(dir.path(), &[(1, "4,3")]);
    let before = snapshot(&path);

    let mut observer = AbortAfter {
        batches: 1,
        seen: Vec::new(),
    };
    let mut store = PagesetStore::open(&path).expect("open pageset");
    let err = store
        .generate(
            request(
                plan(&numbered_slides(3), &GenerationOptions::default()),
                load_reference(dir.path()),
            ),
            &mut observer,
        )
        .expect_err("observer aborts after the first slide");
    assert!(matches!(err, StoreError::Aborted));
    assert_eq!(
        observer.seen,
        vec![
            ProgressEvent::Planned {
                buttons: 3,
                layouts: 1
            },
            ProgressEvent::HomeButtonCopied,
            ProgressEvent::ButtonsWritten {
                written: 1,
                total: 3
            },
        ]
    );
    drop(store);

    assert_eq!(snapshot(&path), before);
}

#[test]
fn corrupt_sequence_table_is_an_integrity_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = blank_pageset(dir.path(), &[(1, "4,3")]);
    Connection::open(&path)
        .expect("seed db")
        .execute(
            "INSERT INTO sqlite_sequence(name, seq) VALUES ('Button', 'garbage')",
            [],
        )
        .expect("corrupt sequence");
    let before = snapshot(&path);

    let mut store = PagesetStore::open(&path).expect("open pageset");
    let err = store
        .generate(
            request(
                plan(&numbered_slides(1), &GenerationOptions::default()),
                load_reference(dir.path()),
            ),
            &mut NoopObserver,
        )
        .expect_err("corrupt sequence");
    assert_eq!(err.code(), "STORE_INTEGRITY");
    drop(store);
    assert_eq!(snapshot(&path), before);
}

#[test]
fn multiple_content_pages_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = blank_pageset(dir.path(), &[(1, "4,3")]);
    Connection::open(&path)
        .expect("seed db")
        .execute("INSERT INTO Page (Id, Title) VALUES (4, 'Second')", [])
        .expect("extra page");

    let mut store = PagesetStore::open(&path).expect("open pageset");
    let err = store
        .generate(
            request(
                plan(&numbered_slides(1), &GenerationOptions::default()),
                load_reference(dir.path()),
            ),
            &mut NoopObserver,
        )
        .expect_err("two content pages");
    match err {
        StoreError::StoreIntegrity(message) => {
            assert_eq!(message, "pageset has multiple content pages: Untitled, Second");
        }
        other => panic!("expected StoreIntegrity, got {other:?}"),
    }
}

#[test]
fn unknown_layout_selection_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = blank_pageset(dir.path(), &[(1, "4,3")]);
    let before = snapshot(&path);
    let mut req = request(
        plan(&numbered_slides(1), &GenerationOptions::default()),
        load_reference(dir.path()),
    );
    req.layouts = Some(vec![1, 77]);

    let mut store = PagesetStore::open(&path).expect("open pageset");
    let err = store
        .generate(req, &mut NoopObserver)
        .expect_err("layout 77 does not exist");
    assert_eq!(err.code(), "INVALID_OPTION");
    drop(store);
    assert_eq!(snapshot(&path), before);
}

#[test]
fn template_without_home_button_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty_ref.spb");
    drop(create_schema(&path));

    let err = ReferenceTemplate::load(&path).expect_err("no home button");
    match err {
        StoreError::StoreIntegrity(message) => {
            assert_eq!(message, "reference template has no Home button");
        }
        other => panic!("expected StoreIntegrity, got {other:?}"),
    }
}

#[test]
fn open_requires_an_existing_pageset_with_the_expected_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = PagesetStore::open(dir.path().join("nope.spb")).expect_err("missing file");
    assert_eq!(missing.code(), "IO");
    assert!(!dir.path().join("nope.spb").exists());

    let foreign = dir.path().join("foreign.db");
    Connection::open(&foreign)
        .expect("foreign db")
        .execute_batch("CREATE TABLE Button (Id INTEGER PRIMARY KEY);")
        .expect("foreign schema");
    let err = PagesetStore::open(&foreign).expect_err("foreign schema");
    assert_eq!(err.code(), "STORE_INTEGRITY");
    assert!(err.to_string().contains("ElementReference"));
}

#[test]
fn sql_failure_partway_through_a_batch_rolls_everything_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = blank_pageset(dir.path(), &[(1, "4,3"), (2, "3,3")]);
    Connection::open(&path)
        .expect("seed db")
        .execute_batch(
            r#"
            CREATE TRIGGER reject_third_button BEFORE INSERT ON Button
            WHEN NEW.Label = 'Slide title 3'
            BEGIN
                SELECT RAISE(ABORT, 'button rejected');
            END;
            "#,
        )
        .expect("failing trigger");
    let before = snapshot(&path);

    let mut observer = AbortAfter {
        batches: usize::MAX,
        seen: Vec::new(),
    };
    let mut store = PagesetStore::open(&path).expect("open pageset");
    let err = store
        .generate(
            request(
                plan(&numbered_slides(4), &GenerationOptions::default()),
                load_reference(dir.path()),
            ),
            &mut observer,
        )
        .expect_err("third button insert fails");
    assert_eq!(err.code(), "SQL");
    assert!(err.to_string().contains("button rejected"));
    assert_eq!(
        observer.seen.last(),
        Some(&ProgressEvent::ButtonsWritten {
            written: 2,
            total: 4
        })
    );
    drop(store);

    assert_eq!(snapshot(&path), before);
}

#[test]
fn home_cell_taken_by_another_element_is_an_integrity_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = blank_pageset(dir.path(), &[(1, "4,3")]);
    Connection::open(&path)
        .expect("seed db")
        .execute(
            "INSERT INTO ElementPlacement (GridPosition, GridSpan, Visible, ElementReferenceId, PageLayoutId) VALUES ('2,1', '2,2', 1, 900, 1)",
            [],
        )
        .expect("element over the home cell");
    let before = snapshot(&path);

    let mut store = PagesetStore::open(&path).expect("open pageset");
    let err = store
        .generate(
            request(
                plan(&numbered_slides(1), &GenerationOptions::default()),
                load_reference(dir.path()),
            ),
            &mut NoopObserver,
        )
        .expect_err("home cell is covered");
    match err {
        StoreError::StoreIntegrity(message) => {
            assert_eq!(message, "layout 1: home cell 3,2 is taken by another element");
        }
        other => panic!("expected StoreIntegrity, got {other:?}"),
    }
    drop(store);
    assert_eq!(snapshot(&path), before);
}
