use futures_signals::signal::{Mutable, Signal, SignalExt};
use std::fmt;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct GateState {
    generation: u64,
    ready: bool,
}

/// Withholds readiness until a delay has elapsed uninterrupted.
///
/// The gate is polled on every render with the delay that currently applies.
/// A change of that delay starts a new cycle: the gate closes, the previous
/// timer is cancelled and a new one is armed on the ambient tokio runtime. A
/// zero delay is ready straight away. Dropping the gate cancels its timer.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use lazyview::DelayGate;
/// use std::time::Duration;
///
/// let mut gate = DelayGate::new();
/// assert!(gate.poll(Duration::ZERO));
/// assert!(!gate.poll(Duration::from_millis(5)));
/// tokio::time::sleep(Duration::from_millis(20)).await;
/// assert!(gate.poll(Duration::from_millis(5)));
/// # }
/// ```
pub struct DelayGate {
    state: Mutable<GateState>,
    delay: Option<Duration>,
    timer: Option<DropGuard>,
}

impl fmt::Debug for DelayGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayGate")
            .field("delay", &self.delay)
            .field("ready", &self.is_ready())
            .field("armed", &self.timer.is_some())
            .finish()
    }
}

impl Default for DelayGate {
    fn default() -> Self {
        DelayGate {
            state: Mutable::new(GateState {
                generation: 0,
                ready: false,
            }),
            delay: None,
            timer: None,
        }
    }
}

impl DelayGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluates the gate for `delay` and returns whether it is ready.
    pub fn poll(&mut self, delay: Duration) -> bool {
        if self.delay != Some(delay) {
            self.restart(delay);
        }
        self.is_ready()
    }

    pub fn is_ready(&self) -> bool {
        self.state.lock_ref().ready
    }

    /// The delay of the current cycle, `None` before the first poll.
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Readiness as a signal, so a host can re-render when a timer fires.
    pub fn signal(&self) -> impl Signal<Item = bool> {
        self.state.signal_ref(|state| state.ready).dedupe()
    }

    /// Starts a new cycle for `delay`, discarding any pending timer.
    pub fn restart(&mut self, delay: Duration) {
        self.cancel();
        self.delay = Some(delay);

        let generation = {
            let mut state = self.state.lock_mut();
            state.generation += 1;
            state.ready = delay.is_zero();
            state.generation
        };
        if delay.is_zero() {
            return;
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(?delay, "no tokio runtime, delay gate opens immediately");
                self.state.lock_mut().ready = true;
                return;
            }
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let state = self.state.clone();
        handle.spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {
                    trace!(generation, "delay gate timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let mut state = state.lock_mut();
                    // A newer cycle may have started between the sleep and the lock.
                    if state.generation == generation {
                        state.ready = true;
                        trace!(generation, "delay gate ready");
                    }
                }
            }
        });
        self.timer = Some(token.drop_guard());
        trace!(generation, ?delay, "delay gate restarted");
    }

    /// Cancels the pending timer, if any. Readiness is left as it is; the next
    /// [`poll`](DelayGate::poll) starts a new cycle whatever its delay.
    pub fn cancel(&mut self) {
        self.timer.take();
        self.delay = None;
    }
}
