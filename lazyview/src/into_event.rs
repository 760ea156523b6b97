use crate::{LazyEvent, Reason};

/// Converts the output of a computation into a settled [`LazyEvent`].
///
/// [`LazySource::async_execute`](crate::LazySource::async_execute) accepts any
/// future whose output implements this, so a computation can return a bare
/// value, a `Result` or an `Option`.
pub trait IntoEvent<D> {
    fn into_event(self) -> LazyEvent<D>;
}

impl<D> IntoEvent<D> for D {
    fn into_event(self) -> LazyEvent<D> {
        LazyEvent::Fulfilled(self)
    }
}

impl<D, E> IntoEvent<D> for Result<D, E>
where
    E: ToString,
{
    fn into_event(self) -> LazyEvent<D> {
        match self {
            Ok(value) => LazyEvent::Fulfilled(value),
            Err(error) => LazyEvent::rejected(Reason::Error(error.to_string())),
        }
    }
}

impl<D> IntoEvent<D> for Option<D> {
    fn into_event(self) -> LazyEvent<D> {
        match self {
            Some(value) => LazyEvent::Fulfilled(value),
            None => LazyEvent::rejected(Reason::None),
        }
    }
}
