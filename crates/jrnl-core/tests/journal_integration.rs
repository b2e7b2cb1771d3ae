//! Journal behavior against the SQLite-backed store.

use chrono::{Duration, TimeZone, Utc};
use jrnl_core::graph::{Quad, QuadStore, Value};
use jrnl_core::journal::entry::{JOURNAL_ENTRY, PRED_CREATED_AT, PRED_IS_A};
use jrnl_core::{
    open_journal, open_store, FakeClock, GetOptions, Journal, JournalError, MalformedReason,
};

#[test]
fn entries_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jrnl.db");

    let id = {
        let mut journal = open_journal(&path).unwrap();
        journal.add_entry("first day\n").unwrap().unwrap()
    };

    let journal = open_journal(&path).unwrap();
    let entries = journal.get(&GetOptions::all()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].contents, "first day\n");
}

#[test]
fn created_at_is_close_to_call_time() {
    let dir = tempfile::tempdir().unwrap();
    let mut journal = open_journal(&dir.path().join("jrnl.db")).unwrap();

    let before = Utc::now();
    journal.add_entry("now").unwrap();
    let after = Utc::now();

    let entries = journal.get(&GetOptions::all()).unwrap();
    let created = entries[0].created_at;
    assert!(created >= before - Duration::seconds(1));
    assert!(created <= after + Duration::seconds(1));
}

#[test]
fn empty_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut journal = open_journal(&dir.path().join("jrnl.db")).unwrap();
    assert!(journal.add_entry("").unwrap().is_none());
    assert!(journal.add_entry("\n\n").unwrap().is_none());
    assert!(journal.store().is_empty().unwrap());
}

#[test]
fn day_range_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let day = Utc.with_ymd_and_hms(2023, 11, 2, 0, 0, 0).unwrap();
    let clock = FakeClock::new(day - Duration::minutes(1));
    let store = open_store(&dir.path().join("jrnl.db")).unwrap();
    let mut journal = Journal::with_clock(store, clock.clone());

    journal.add_entry("late the night before").unwrap();
    clock.set(day + Duration::hours(9));
    journal.add_entry("breakfast").unwrap();
    clock.set(day + Duration::hours(19));
    journal.add_entry("dinner").unwrap();
    clock.set(day + Duration::days(1));
    journal.add_entry("next midnight").unwrap();

    let mut whole_day: Vec<_> = journal
        .get(&GetOptions::between(day, day + Duration::days(1)))
        .unwrap()
        .into_iter()
        .map(|e| e.contents)
        .collect();
    whole_day.sort();
    assert_eq!(whole_day, ["breakfast", "dinner"]);

    let afternoon: Vec<_> = journal
        .get(&GetOptions::all().after(day + Duration::hours(12)))
        .unwrap()
        .into_iter()
        .map(|e| e.contents)
        .collect();
    assert_eq!(afternoon.len(), 2);
    assert!(afternoon.contains(&"dinner".to_string()));
    assert!(afternoon.contains(&"next midnight".to_string()));
}

#[test]
fn corrupt_entry_surfaces_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jrnl.db");
    {
        let mut store = open_store(&path).unwrap();
        store
            .apply(&[
                Quad::new(Value::iri("orphan"), PRED_IS_A, Value::iri(JOURNAL_ENTRY)),
                Quad::new(Value::iri("orphan"), PRED_CREATED_AT, Utc::now()),
            ])
            .unwrap();
    }

    let journal = open_journal(&path).unwrap();
    match journal.get(&GetOptions::all()) {
        Err(JournalError::MalformedEntry { subject, reason }) => {
            assert_eq!(subject, "orphan");
            assert_eq!(reason, MalformedReason::Missing("contents"));
        }
        other => panic!("expected MalformedEntry, got {other:?}"),
    }
}

#[test]
fn second_journal_on_same_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jrnl.db");
    let mut first = open_journal(&path).unwrap();
    first.add_entry("mine").unwrap();

    assert!(matches!(
        open_journal(&path),
        Err(JournalError::StoreLocked { .. })
    ));

    first.into_store().close().unwrap();
    let reopened = open_journal(&path).unwrap();
    assert_eq!(reopened.get(&GetOptions::all()).unwrap().len(), 1);
}
