use crate::{History, LazyEvent, LazyHistory, LazyMeta, Reason, Settled};
use chrono::{DateTime, Utc};

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn items(history: &History<i32>) -> Vec<i32> {
    history.stack().map(|entry| entry.item).collect()
}

#[test]
fn test_empty_history() {
    let history: History<i32> = History::new();
    assert!(history.is_empty());
    assert_eq!(history.count(), 0);
    assert!(history.first().is_none());
    assert!(history.last().is_none());
}

#[test]
fn test_single_entry_is_first_and_last() {
    let history = History::new().record_at(1, at(1), Some(0));
    assert_eq!(history.count(), 1);
    assert_eq!(history.retained(), 1);
    assert_eq!(history.first().map(|e| e.item), Some(1));
    assert_eq!(history.last().map(|e| e.item), Some(1));
}

#[test]
fn test_unlimited_keeps_everything() {
    let history = (1..=6).fold(History::new(), |h, n| h.record_at(n, at(n as i64), None));
    assert_eq!(history.count(), 6);
    assert_eq!(items(&history), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_limit_keeps_first_recent_middle_and_last() {
    let history = (1..=10).fold(History::new(), |h, n| h.record_at(n, at(n as i64), Some(3)));
    assert_eq!(history.count(), 10);
    assert_eq!(items(&history), vec![1, 7, 8, 9, 10]);
    assert_eq!(history.first().map(|e| e.at), Some(at(1)));
    assert_eq!(history.last().map(|e| e.at), Some(at(10)));
}

#[test]
fn test_zero_limit_keeps_first_and_last() {
    let history = (1..=4).fold(History::new(), |h, n| h.record_at(n, at(n as i64), Some(0)));
    assert_eq!(items(&history), vec![1, 4]);
}

#[test]
fn test_count_is_independent_of_limit() {
    for limit in [Some(0), Some(1), Some(5), None] {
        let history = (0..50).fold(History::new(), |h, n| h.record(n, limit));
        assert_eq!(history.count(), 50);
        if let Some(limit) = limit {
            assert!(history.retained() <= limit + 2);
        }
        assert_eq!(history.first().map(|e| e.item), Some(0));
        assert_eq!(history.last().map(|e| e.item), Some(49));
    }
}

#[test]
fn test_record_does_not_touch_a_kept_copy() {
    let before = History::new().record_at(1, at(1), None);
    let after = before.clone().record_at(2, at(2), None);
    assert_eq!(items(&before), vec![1]);
    assert_eq!(items(&after), vec![1, 2]);
}

#[test]
fn test_events_are_routed_to_their_buckets() {
    let events = vec![
        LazyEvent::Loading,
        LazyEvent::Fulfilled(5),
        LazyEvent::Loading,
        LazyEvent::rejected(Reason::error("err")),
        LazyEvent::Fulfilled(6),
    ];
    let history = events
        .iter()
        .fold(LazyHistory::default(), |h, event| h.record(event, None));

    assert_eq!(history.loading.count(), 2);
    assert_eq!(history.settled.count(), 3);
    assert_eq!(history.fulfilled.count(), 2);
    assert_eq!(history.rejected.count(), 1);

    assert_eq!(items(&history.fulfilled), vec![5, 6]);
    assert_eq!(
        history.rejected.last().map(|e| e.item.reason.clone()),
        Some(Reason::error("err"))
    );
    assert_eq!(
        history.settled.first().map(|e| e.item.clone()),
        Some(Settled::Fulfilled(5))
    );
}

#[test]
fn test_meta_fulfilled_accessors() {
    let meta = LazyMeta::new()
        .record(&LazyEvent::Loading, None)
        .record(&LazyEvent::Fulfilled(1), None)
        .record(&LazyEvent::rejected(Reason::Timeout), None)
        .record(&LazyEvent::Fulfilled(2), None);

    assert_eq!(meta.fulfilled_count(), 2);
    assert_eq!(meta.last_value(), Some(&2));
    assert_eq!(meta.last_settled(), Some(&Settled::Fulfilled(2)));
    assert!(meta.first_fulfilled_at().is_some());
    assert!(meta.first_fulfilled_at() <= meta.last_fulfilled_at());
    assert!(meta.started_at <= meta.first_fulfilled_at().unwrap());
}

#[test]
fn test_meta_without_fulfilled() {
    let meta: LazyMeta<i32> = LazyMeta::new().record(&LazyEvent::Loading, None);
    assert_eq!(meta.fulfilled_count(), 0);
    assert_eq!(meta.last_value(), None);
    assert_eq!(meta.first_fulfilled_at(), None);
    assert_eq!(meta.last_settled(), None);
}
