use crate::{LazyEvent, Reason, Rejection, Retry, Settled};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_loading() {
    let loading: LazyEvent<i32> = LazyEvent::default();
    assert!(loading.is_loading());
    assert!(!loading.is_settled());
    assert!(!loading.is_fulfilled());
    assert!(!loading.is_rejected());
    assert_eq!(loading.value_ref(), None);
    assert_eq!(loading.as_settled(), None);
    assert_eq!(loading.value(), None);
}

#[test]
fn test_fulfilled() {
    let fulfilled = LazyEvent::fulfilled(8);
    assert!(!fulfilled.is_loading());
    assert!(fulfilled.is_settled());
    assert!(fulfilled.is_fulfilled());
    assert!(!fulfilled.is_rejected());
    assert_eq!(fulfilled.value_ref(), Some(&8));
    assert_eq!(fulfilled.as_settled(), Some(Settled::Fulfilled(8)));
    assert_eq!(fulfilled.value(), Some(8));
}

#[test]
fn test_rejected() {
    let rejected: LazyEvent<i32> = LazyEvent::rejected_with_message("Connection failed");
    assert!(rejected.is_settled());
    assert!(rejected.is_rejected());
    assert_eq!(rejected.value_ref(), None);
    assert_eq!(
        rejected.rejection().map(|r| &r.reason),
        Some(&Reason::error("Connection failed"))
    );

    let settled = rejected.into_settled();
    assert!(matches!(settled, Some(Settled::Rejected(_))));
}

#[test]
fn test_settled_round_trips_into_event() {
    let settled: Settled<i32> = Settled::Rejected(Rejection::new(Reason::Timeout));
    assert!(settled.is_rejected());
    assert_eq!(settled.value_ref(), None);

    let event: LazyEvent<i32> = settled.clone().into();
    assert_eq!(event.into_settled(), Some(settled));
}

#[test]
fn test_retry_can_be_called_repeatedly() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let retry = Retry::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let rejection = Rejection::new(Reason::Cancelled).with_retry(retry.clone());

    assert!(rejection.try_retry());
    assert!(rejection.try_retry());
    retry.call();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    assert!(!Rejection::new(Reason::None).try_retry());
}

#[test]
fn test_retry_equality_is_identity() {
    let retry = Retry::new(|| {});
    let other = Retry::new(|| {});
    assert_eq!(retry, retry.clone());
    assert_ne!(retry, other);

    let a: LazyEvent<i32> = LazyEvent::rejected_with_retry(Reason::Timeout, retry.clone());
    let b: LazyEvent<i32> = LazyEvent::rejected_with_retry(Reason::Timeout, retry);
    assert_eq!(a, b);
    assert_eq!(format!("{:?}", other), "Retry(..)");
}
