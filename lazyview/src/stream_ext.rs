use futures_core::stream::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream helpers used when following a [`LazySource`](crate::LazySource).
pub trait LazyStreamExt: Stream {
    /// Yields items until `test` matches one, yields that item, then ends.
    ///
    /// ```
    /// use futures::StreamExt;
    /// use lazyview::{LazyEvent, LazyStreamExt};
    ///
    /// # futures::executor::block_on(async {
    /// let events = futures::stream::iter(vec![
    ///     LazyEvent::Loading,
    ///     LazyEvent::Fulfilled(1),
    ///     LazyEvent::Fulfilled(2),
    /// ]);
    /// let seen: Vec<_> = events.stop_if(LazyEvent::is_settled).collect().await;
    /// assert_eq!(seen, vec![LazyEvent::Loading, LazyEvent::Fulfilled(1)]);
    /// # });
    /// ```
    fn stop_if<F>(self, test: F) -> StopIf<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        StopIf {
            stream: self,
            done: false,
            test,
        }
    }
}

impl<T: ?Sized> LazyStreamExt for T where T: Stream {}

/// Stream returned by [`LazyStreamExt::stop_if`].
#[pin_project(project = StopIfProj)]
#[derive(Debug)]
#[must_use = "streams do nothing unless polled"]
pub struct StopIf<S, F> {
    #[pin]
    stream: S,
    done: bool,
    test: F,
}

impl<S, F> Stream for StopIf<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let StopIfProj { stream, done, test } = self.project();
        if *done {
            return Poll::Ready(None);
        }
        let next = match stream.poll_next(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(next) => next,
        };
        *done = next.as_ref().map_or(true, |item| test(item));
        Poll::Ready(next)
    }
}
