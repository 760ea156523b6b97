use crate::{IntoEvent, LazyEvent, LazyStreamExt, Reason, Retry, StopIf};
use futures::{Stream, StreamExt};
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

/// Releases a value produced by a run once it is superseded.
pub type Cleanup<D> = Arc<dyn Fn(D) + Send + Sync>;

/// Produces [`LazyEvent`]s from futures, streams or manual pushes.
///
/// Every emission goes, in order, to each [`subscribe`](LazySource::subscribe)r.
/// The latest event is also held in a `futures-signals` [`Mutable`] for
/// [`get`](LazySource::get) and [`to_signal`](LazySource::to_signal); that view
/// only ever shows the newest event. To drive a [`LazyView`](crate::LazyView)
/// use [`LazyView::follow`](crate::LazyView::follow), which seeds the view and
/// subscribes in one step.
///
/// A `Loading` emission while the source is already loading is dropped. Every
/// task the source spawns is a child of one cancellation token:
/// [`close`](LazySource::close) or dropping the source stops them, ends every
/// subscription and ignores later emissions.
pub struct LazySource<D> {
    shared: Arc<Shared<D>>,
    token: CancellationToken,
}

struct Shared<D> {
    event: Mutable<LazyEvent<D>>,
    outlets: Mutex<Outlets<D>>,
}

struct Outlets<D> {
    subscribers: Vec<UnboundedSender<LazyEvent<D>>>,
    cleanup: Option<Cleanup<D>>,
    // The value of the latest fulfilled run, handed to `cleanup` when superseded.
    owned: Option<D>,
}

/// An active stream subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _guard: DropGuard,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

/// Every event a source emits after subscribing, in emission order.
///
/// Ends when the source is closed or dropped.
#[must_use = "streams do nothing unless polled"]
pub struct Events<D> {
    receiver: UnboundedReceiver<LazyEvent<D>>,
}

impl<D> Stream for Events<D> {
    type Item = LazyEvent<D>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl<D> Shared<D> {
    fn lock(&self) -> MutexGuard<'_, Outlets<D>> {
        self.outlets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Hands the owned value to the cleanup callback, outside the lock.
    fn release(&self) {
        let released = {
            let mut outlets = self.lock();
            outlets.owned.take().zip(outlets.cleanup.clone())
        };
        if let Some((value, cleanup)) = released {
            trace!("superseded value released");
            cleanup(value);
        }
    }

    fn shut(&self) {
        self.lock().subscribers.clear();
        self.release();
    }
}

impl<D: Clone> Shared<D> {
    fn emit(&self, token: &CancellationToken, next: LazyEvent<D>) {
        let mut outlets = self.lock();
        self.send(&mut outlets, token, next);
    }

    // Emits the outcome of a run. A fulfilled value becomes owned; the one it
    // replaces, left over from an overlapping run, is released.
    fn settle(&self, token: &CancellationToken, next: LazyEvent<D>) {
        let superseded = {
            let mut outlets = self.lock();
            if token.is_cancelled() {
                return;
            }
            let owns = outlets.cleanup.is_some();
            let superseded = match next.value_ref() {
                Some(value) if owns => outlets.owned.replace(value.clone()),
                _ => None,
            };
            self.send(&mut outlets, token, next);
            superseded.zip(outlets.cleanup.clone())
        };
        if let Some((value, cleanup)) = superseded {
            cleanup(value);
        }
    }

    fn send(&self, outlets: &mut Outlets<D>, token: &CancellationToken, next: LazyEvent<D>) {
        if token.is_cancelled() {
            trace!("emission after close ignored");
            return;
        }
        if next.is_loading() && self.event.lock_ref().is_loading() {
            return;
        }
        outlets
            .subscribers
            .retain(|subscriber| subscriber.send(next.clone()).is_ok());
        self.event.set(next);
    }

    fn subscribe(&self) -> (LazyEvent<D>, Events<D>) {
        let mut outlets = self.lock();
        let (sender, receiver) = unbounded_channel();
        outlets.subscribers.push(sender);
        (self.event.get_cloned(), Events { receiver })
    }
}

impl<D> LazySource<D>
where
    D: Clone + Send + Sync + 'static,
{
    /// A source that starts out loading.
    pub fn new() -> Self {
        Self::starting_with(LazyEvent::Loading)
    }

    /// A source that starts out fulfilled with `value`.
    pub fn with_initial(value: D) -> Self {
        Self::starting_with(LazyEvent::Fulfilled(value))
    }

    fn starting_with(event: LazyEvent<D>) -> Self {
        LazySource {
            shared: Arc::new(Shared {
                event: Mutable::new(event),
                outlets: Mutex::new(Outlets {
                    subscribers: Vec::new(),
                    cleanup: None,
                    owned: None,
                }),
            }),
            token: CancellationToken::new(),
        }
    }

    /// Sets a callback releasing values produced by
    /// [`async_execute`](LazySource::async_execute). It receives a run's value
    /// when the next run starts, and when the source is closed or dropped.
    pub fn with_cleanup<F>(self, cleanup: F) -> Self
    where
        F: Fn(D) + Send + Sync + 'static,
    {
        self.shared.lock().cleanup = Some(Arc::new(cleanup));
        self
    }

    pub fn get(&self) -> LazyEvent<D> {
        self.shared.event.get_cloned()
    }

    /// The latest event as a signal. Intermediate events may be skipped.
    pub fn to_signal(&self) -> MutableSignalCloned<LazyEvent<D>> {
        self.shared.event.signal_cloned()
    }

    /// The latest event as a stream, starting with the current one.
    /// Intermediate events may be skipped; use [`subscribe`](LazySource::subscribe)
    /// to see every event.
    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<LazyEvent<D>>> {
        self.shared.event.signal_cloned().to_stream()
    }

    /// Latest events up to and including the next settled one. For awaiting an
    /// outcome; intermediate events may be skipped.
    pub fn until_settled(
        &self,
    ) -> StopIf<SignalStream<MutableSignalCloned<LazyEvent<D>>>, fn(&LazyEvent<D>) -> bool> {
        self.to_stream()
            .stop_if(LazyEvent::<D>::is_settled as fn(&LazyEvent<D>) -> bool)
    }

    /// Every event emitted from now on, in order. The current event is not
    /// repeated.
    pub fn subscribe(&self) -> Events<D> {
        self.shared.subscribe().1
    }

    /// The current event together with a subscription to every later one,
    /// taken atomically so nothing is missed or seen twice.
    pub fn snapshot(&self) -> (LazyEvent<D>, Events<D>) {
        self.shared.subscribe()
    }

    /// Emits `event` unless the source is closed.
    pub fn push(&self, event: LazyEvent<D>) {
        self.shared.emit(&self.token, event);
    }

    /// Emits `Loading`, then the outcome of the future built by `factory`.
    /// Must be called from within a tokio runtime.
    ///
    /// Rejections carry a [`Retry`] that runs `factory` again the same way.
    pub fn async_execute<F, Fut, R>(&self, factory: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoEvent<D> + Send + 'static,
    {
        run(
            Handle::current(),
            self.shared.clone(),
            self.token.clone(),
            Arc::new(factory),
            None,
        );
    }

    /// Like [`async_execute`](LazySource::async_execute), rejecting with
    /// [`Reason::Timeout`] when the future takes longer than `timeout`.
    pub fn async_execute_with_timeout<F, Fut, R>(&self, factory: F, timeout: Duration)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoEvent<D> + Send + 'static,
    {
        run(
            Handle::current(),
            self.shared.clone(),
            self.token.clone(),
            Arc::new(factory),
            Some(timeout),
        );
    }

    /// Emits `Loading`, then one event per stream item until the stream ends
    /// or the subscription is dropped.
    pub fn observe<S, E>(&self, stream: S) -> Subscription
    where
        S: Stream<Item = Result<D, E>> + Send + 'static,
        E: ToString + Send + 'static,
    {
        let token = self.token.child_token();
        let shared = self.shared.clone();
        shared.emit(&token, LazyEvent::Loading);

        let subscribed = token.clone();
        tokio::spawn(async move {
            let mut stream = Box::pin(stream);
            loop {
                let item = tokio::select! {
                    biased;
                    _ = subscribed.cancelled() => break,
                    item = stream.next() => item,
                };
                match item {
                    Some(item) => shared.emit(&subscribed, item.into_event()),
                    None => break,
                }
            }
            trace!("observed stream finished");
        });

        Subscription {
            _guard: token.drop_guard(),
        }
    }

    /// Stops every task, ends every subscription and ignores later emissions.
    pub fn close(&self) {
        if !self.token.is_cancelled() {
            debug!("lazy source closed");
        }
        self.token.cancel();
        self.shared.shut();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl<D> Default for LazySource<D>
where
    D: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Drop for LazySource<D> {
    fn drop(&mut self) {
        self.token.cancel();
        self.shared.shut();
    }
}

// The previous run's value is released and Loading emitted before the future
// is even built, so a retry always shows up as a fresh load. The handle lets a
// retry fire from outside the runtime.
fn run<D, F, Fut, R>(
    handle: Handle,
    shared: Arc<Shared<D>>,
    token: CancellationToken,
    factory: Arc<F>,
    timeout: Option<Duration>,
) where
    D: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoEvent<D> + Send + 'static,
{
    if token.is_cancelled() {
        return;
    }
    shared.release();
    shared.emit(&token, LazyEvent::Loading);
    let computation = factory();

    let spawner = handle.clone();
    spawner.spawn(async move {
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            outcome = bounded(computation, timeout) => outcome,
        };
        let next = match outcome {
            LazyEvent::Rejected(rejection) => {
                debug!(reason = %rejection.reason, "lazy source run rejected");
                let retry = {
                    let weak = Arc::downgrade(&shared);
                    let token = token.clone();
                    let factory = factory.clone();
                    Retry::new(move || rerun(&handle, &weak, &token, &factory, timeout))
                };
                LazyEvent::Rejected(rejection.with_retry(retry))
            }
            other => other,
        };
        shared.settle(&token, next);
    });
}

// Retries hold the source weakly: the retry lives inside an emitted event.
fn rerun<D, F, Fut, R>(
    handle: &Handle,
    shared: &Weak<Shared<D>>,
    token: &CancellationToken,
    factory: &Arc<F>,
    timeout: Option<Duration>,
) where
    D: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoEvent<D> + Send + 'static,
{
    match shared.upgrade() {
        Some(shared) => run(handle.clone(), shared, token.clone(), factory.clone(), timeout),
        None => trace!("retry after the source was dropped ignored"),
    }
}

async fn bounded<D, Fut, R>(computation: Fut, timeout: Option<Duration>) -> LazyEvent<D>
where
    Fut: Future<Output = R>,
    R: IntoEvent<D>,
{
    match timeout {
        Some(timeout) => match tokio::time::timeout(timeout, computation).await {
            Ok(result) => result.into_event(),
            Err(_) => LazyEvent::rejected(Reason::Timeout),
        },
        None => computation.await.into_event(),
    }
}
