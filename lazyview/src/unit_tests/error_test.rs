use crate::{LazyError, Reason};
use std::collections::HashSet;

#[test]
fn test_reason_methods() {
    let none = Reason::None;
    assert!(none.is_none());
    assert!(!none.is_error());
    assert!(!none.is_cancelled());
    assert!(!none.is_timeout());

    let error = Reason::error("message");
    assert!(!error.is_none());
    assert!(error.is_error());
    assert!(!error.is_cancelled());
    assert!(!error.is_timeout());

    assert!(Reason::Cancelled.is_cancelled());
    assert!(Reason::Timeout.is_timeout());
}

#[test]
fn test_reason_display() {
    assert_eq!(Reason::error("boom").to_string(), "boom");
    assert_eq!(Reason::None.to_string(), "Operation returned None!");
    assert_eq!(Reason::Cancelled.to_string(), "Task was cancelled!");
    assert_eq!(Reason::Timeout.to_string(), "deadline has elapsed!");
}

#[test]
fn test_reason_hash() {
    let reasons: HashSet<Reason> = [
        Reason::error("message"),
        Reason::error("message"),
        Reason::None,
        Reason::Cancelled,
        Reason::Timeout,
    ]
    .into_iter()
    .collect();
    assert_eq!(reasons.len(), 4);
}

#[test]
fn test_unhandled_displays_the_reason_itself() {
    let error = LazyError::Unhandled(Reason::error("x"));
    assert_eq!(error.to_string(), "x");
    assert_eq!(error.reason(), Some(&Reason::error("x")));

    assert_eq!(LazyError::TornDown.reason(), None);
    assert_eq!(LazyError::TornDown.to_string(), "view was torn down");
    assert_eq!(
        LazyError::Config("bad".to_string()).to_string(),
        "invalid lazy configuration: bad"
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_reason_serde() {
    let error = Reason::error("message");
    let serialized = serde_json::to_string(&error).unwrap();
    assert_eq!(serialized, r#"{"error":"message"}"#);
    let deserialized: Reason = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, error);

    for (reason, json) in [
        (Reason::None, r#""none""#),
        (Reason::Cancelled, r#""cancelled""#),
        (Reason::Timeout, r#""timeout""#),
    ] {
        assert_eq!(serde_json::to_string(&reason).unwrap(), json);
        assert_eq!(serde_json::from_str::<Reason>(json).unwrap(), reason);
    }
}
