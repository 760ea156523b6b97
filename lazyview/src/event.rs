use crate::Reason;
use std::fmt;
use std::sync::Arc;

/// A manual retry trigger attached to a rejection.
///
/// Cloning shares the same callback. Calling it more than once is fine; a
/// retry built by [`LazySource`](crate::LazySource) emits `Loading` and then a
/// fresh settled event every time.
#[derive(Clone)]
pub struct Retry(Arc<dyn Fn() + Send + Sync>);

impl Retry {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Retry(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Retry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Retry(..)")
    }
}

// Two retries are the same if they share the callback.
impl PartialEq for Retry {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A rejected outcome: the reason plus an optional retry.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub reason: Reason,
    pub retry: Option<Retry>,
}

impl Rejection {
    pub fn new(reason: Reason) -> Self {
        Rejection {
            reason,
            retry: None,
        }
    }

    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Invokes the retry callback if there is one. Returns whether it ran.
    pub fn try_retry(&self) -> bool {
        match &self.retry {
            Some(retry) => {
                retry.call();
                true
            }
            None => false,
        }
    }
}

/// One status notification from an asynchronous source.
#[derive(Debug, Clone, PartialEq)]
pub enum LazyEvent<D> {
    Loading,
    Fulfilled(D),
    Rejected(Rejection),
}

/// An event that is not loading.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<D> {
    Fulfilled(D),
    Rejected(Rejection),
}

impl<D> LazyEvent<D> {
    pub fn loading() -> Self {
        LazyEvent::Loading
    }

    pub fn fulfilled(value: D) -> Self {
        LazyEvent::Fulfilled(value)
    }

    pub fn rejected(reason: Reason) -> Self {
        LazyEvent::Rejected(Rejection::new(reason))
    }

    pub fn rejected_with_retry(reason: Reason, retry: Retry) -> Self {
        LazyEvent::Rejected(Rejection::new(reason).with_retry(retry))
    }

    pub fn rejected_with_message(message: impl Into<String>) -> Self {
        LazyEvent::rejected(Reason::error(message))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LazyEvent::Loading)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, LazyEvent::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, LazyEvent::Rejected(_))
    }

    pub fn value_ref(&self) -> Option<&D> {
        match self {
            LazyEvent::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    pub fn value(self) -> Option<D> {
        match self {
            LazyEvent::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            LazyEvent::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    pub fn as_settled(&self) -> Option<Settled<D>>
    where
        D: Clone,
    {
        self.clone().into_settled()
    }

    pub fn into_settled(self) -> Option<Settled<D>> {
        match self {
            LazyEvent::Loading => None,
            LazyEvent::Fulfilled(value) => Some(Settled::Fulfilled(value)),
            LazyEvent::Rejected(rejection) => Some(Settled::Rejected(rejection)),
        }
    }
}

impl<D> Settled<D> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Settled::Rejected(_))
    }

    pub fn value_ref(&self) -> Option<&D> {
        match self {
            Settled::Fulfilled(value) => Some(value),
            Settled::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Settled::Fulfilled(_) => None,
            Settled::Rejected(rejection) => Some(rejection),
        }
    }
}

impl<D> Default for LazyEvent<D> {
    fn default() -> Self {
        LazyEvent::Loading
    }
}

impl<D> From<Settled<D>> for LazyEvent<D> {
    fn from(settled: Settled<D>) -> Self {
        match settled {
            Settled::Fulfilled(value) => LazyEvent::Fulfilled(value),
            Settled::Rejected(rejection) => LazyEvent::Rejected(rejection),
        }
    }
}

impl<D> From<Rejection> for LazyEvent<D> {
    fn from(rejection: Rejection) -> Self {
        LazyEvent::Rejected(rejection)
    }
}
