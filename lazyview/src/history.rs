use crate::{LazyEvent, Rejection, Settled};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// An item tagged with the moment it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub at: DateTime<Utc>,
    pub item: T,
}

/// A bounded, counted log of past items.
///
/// Retention is "first + middle window + last": the very first entry and the
/// latest entry always survive, and with a `stack_limit` of `n` at most the `n`
/// most recent entries in between are kept. The stack therefore never holds
/// more than `n + 2` entries. `count` tracks every recorded item, retained or
/// not.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    count: usize,
    stack: VecDeque<Stamped<T>>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        History {
            count: 0,
            stack: VecDeque::new(),
        }
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `item` now. Consumes the history and returns the next one.
    pub fn record(self, item: T, stack_limit: Option<usize>) -> Self {
        self.record_at(item, Utc::now(), stack_limit)
    }

    pub fn record_at(mut self, item: T, at: DateTime<Utc>, stack_limit: Option<usize>) -> Self {
        self.count += 1;
        self.stack.push_back(Stamped { at, item });
        if let Some(limit) = stack_limit {
            // Index 0 is the first entry, the back is the latest one.
            while self.stack.len() > limit + 2 {
                self.stack.remove(1);
            }
        }
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn first(&self) -> Option<&Stamped<T>> {
        self.stack.front()
    }

    pub fn last(&self) -> Option<&Stamped<T>> {
        self.stack.back()
    }

    /// Retained entries, oldest first.
    pub fn stack(&self) -> impl Iterator<Item = &Stamped<T>> {
        self.stack.iter()
    }

    pub fn retained(&self) -> usize {
        self.stack.len()
    }
}

/// Past events split by category.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyHistory<D> {
    pub loading: History<()>,
    pub settled: History<Settled<D>>,
    pub fulfilled: History<D>,
    pub rejected: History<Rejection>,
}

impl<D> Default for LazyHistory<D> {
    fn default() -> Self {
        LazyHistory {
            loading: History::new(),
            settled: History::new(),
            fulfilled: History::new(),
            rejected: History::new(),
        }
    }
}

impl<D: Clone> LazyHistory<D> {
    pub fn record(self, event: &LazyEvent<D>, stack_limit: Option<usize>) -> Self {
        self.record_at(event, Utc::now(), stack_limit)
    }

    /// Appends `event` to every bucket whose category matches it.
    pub fn record_at(
        self,
        event: &LazyEvent<D>,
        at: DateTime<Utc>,
        stack_limit: Option<usize>,
    ) -> Self {
        let LazyHistory {
            loading,
            settled,
            fulfilled,
            rejected,
        } = self;
        match event {
            LazyEvent::Loading => LazyHistory {
                loading: loading.record_at((), at, stack_limit),
                settled,
                fulfilled,
                rejected,
            },
            LazyEvent::Fulfilled(value) => LazyHistory {
                loading,
                settled: settled.record_at(Settled::Fulfilled(value.clone()), at, stack_limit),
                fulfilled: fulfilled.record_at(value.clone(), at, stack_limit),
                rejected,
            },
            LazyEvent::Rejected(rejection) => LazyHistory {
                loading,
                settled: settled.record_at(Settled::Rejected(rejection.clone()), at, stack_limit),
                fulfilled,
                rejected: rejected.record_at(rejection.clone(), at, stack_limit),
            },
        }
    }
}

/// Bookkeeping handed to every view callback.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyMeta<D> {
    pub started_at: DateTime<Utc>,
    pub history: LazyHistory<D>,
}

impl<D> Default for LazyMeta<D> {
    fn default() -> Self {
        LazyMeta {
            started_at: Utc::now(),
            history: LazyHistory::default(),
        }
    }
}

impl<D> LazyMeta<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_fulfilled_at(&self) -> Option<DateTime<Utc>> {
        self.history.fulfilled.first().map(|entry| entry.at)
    }

    pub fn last_fulfilled_at(&self) -> Option<DateTime<Utc>> {
        self.history.fulfilled.last().map(|entry| entry.at)
    }

    pub fn fulfilled_count(&self) -> usize {
        self.history.fulfilled.count()
    }

    /// The most recent fulfilled value, if any.
    pub fn last_value(&self) -> Option<&D> {
        self.history.fulfilled.last().map(|entry| &entry.item)
    }

    /// The most recent settled outcome, if any.
    pub fn last_settled(&self) -> Option<&Settled<D>> {
        self.history.settled.last().map(|entry| &entry.item)
    }
}

impl<D: Clone> LazyMeta<D> {
    pub fn record(self, event: &LazyEvent<D>, stack_limit: Option<usize>) -> Self {
        LazyMeta {
            started_at: self.started_at,
            history: self.history.record(event, stack_limit),
        }
    }
}
