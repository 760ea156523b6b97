use crate::{LazyError, LazyMeta, LazyOptions, Reason, Rejection, Retry, Settings, Settled, ViewState};
use std::sync::Arc;
use tracing::trace;

pub struct LoadingProps<'a, D> {
    pub title: Option<String>,
    pub meta: &'a LazyMeta<D>,
}

pub struct ReloadingProps<'a, D, O> {
    pub title: Option<String>,
    /// Whether the reloading indicator should be visible yet.
    pub reloading: bool,
    pub meta: &'a LazyMeta<D>,
    /// The stale settled content.
    pub children: O,
}

pub struct ErrorProps<'a, D> {
    pub reason: &'a Reason,
    pub retry: Option<Retry>,
    pub meta: &'a LazyMeta<D>,
}

pub struct ReloadErrorProps<'a, D, O> {
    pub reason: &'a Reason,
    pub retry: Option<Retry>,
    pub meta: &'a LazyMeta<D>,
    /// Content of the last fulfilled value.
    pub children: O,
}

pub struct RenderProps<'a, D, O> {
    pub meta: &'a LazyMeta<D>,
    pub children: O,
}

pub type OnLoading<D, O> = Arc<dyn for<'a> Fn(LoadingProps<'a, D>) -> O + Send + Sync>;
pub type OnReloading<D, O> = Arc<dyn for<'a> Fn(ReloadingProps<'a, D, O>) -> O + Send + Sync>;
pub type OnError<D, O> = Arc<dyn for<'a> Fn(ErrorProps<'a, D>) -> O + Send + Sync>;
pub type OnReloadError<D, O> =
    Arc<dyn for<'a> Fn(ReloadErrorProps<'a, D, O>) -> O + Send + Sync>;
pub type OnRender<D, O> = Arc<dyn for<'a> Fn(RenderProps<'a, D, O>) -> O + Send + Sync>;

/// Which delay gates are open for this render.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Readiness {
    pub loading: bool,
    pub reloading: bool,
}

impl Readiness {
    pub fn ready() -> Self {
        Readiness {
            loading: true,
            reloading: true,
        }
    }
}

/// Turns a [`ViewState`] into output by picking the configured view.
///
/// | state | output |
/// |---|---|
/// | `Invisible` | `O::default()` |
/// | `Loading` | `on_loading`, or nothing while hidden or gated |
/// | `Reloading` | `on_reloading` around the stale settled content |
/// | `Settled(Fulfilled)` | `on_render` around the content callback |
/// | `Settled(Rejected)` | `on_reload_error` around the last fulfilled content, else `on_error` |
///
/// A rejection that reaches neither error view is returned as
/// [`LazyError::Unhandled`].
pub struct Dispatcher<'a, D, O> {
    options: &'a LazyOptions<D, O>,
    settings: &'a Settings,
    readiness: Readiness,
    meta: &'a LazyMeta<D>,
}

impl<'a, D, O: Default> Dispatcher<'a, D, O> {
    pub fn new(
        options: &'a LazyOptions<D, O>,
        settings: &'a Settings,
        readiness: Readiness,
        meta: &'a LazyMeta<D>,
    ) -> Self {
        Dispatcher {
            options,
            settings,
            readiness,
            meta,
        }
    }

    pub fn dispatch<F>(&self, view: &ViewState<D>, mut content: F) -> Result<O, LazyError>
    where
        F: FnMut(&D, &LazyMeta<D>) -> O,
    {
        match view {
            ViewState::Invisible => Ok(O::default()),
            ViewState::Loading => Ok(self.loading()),
            ViewState::Reloading(settled) => {
                let children = self.settled(settled, &mut content)?;
                let reloading = self.settings.show_reloading && self.readiness.reloading;
                trace!(reloading, "dispatch reloading");
                Ok(match &self.options.on_reloading {
                    Some(on_reloading) => on_reloading(ReloadingProps {
                        title: self.settings.reloading_title.clone(),
                        reloading,
                        meta: self.meta,
                        children,
                    }),
                    None => children,
                })
            }
            ViewState::Settled(settled) => self.settled(settled, &mut content),
        }
    }

    fn loading(&self) -> O {
        if !self.settings.show_loading || !self.readiness.loading {
            return O::default();
        }
        match &self.options.on_loading {
            Some(on_loading) => on_loading(LoadingProps {
                title: self.settings.loading_title.clone(),
                meta: self.meta,
            }),
            None => O::default(),
        }
    }

    fn settled<F>(&self, settled: &Settled<D>, content: &mut F) -> Result<O, LazyError>
    where
        F: FnMut(&D, &LazyMeta<D>) -> O,
    {
        match settled {
            Settled::Fulfilled(value) => Ok(self.fulfilled(value, content)),
            Settled::Rejected(rejection) => self.rejected(rejection, content),
        }
    }

    fn fulfilled<F>(&self, value: &D, content: &mut F) -> O
    where
        F: FnMut(&D, &LazyMeta<D>) -> O,
    {
        let children = content(value, self.meta);
        match &self.options.on_render {
            Some(on_render) => on_render(RenderProps {
                meta: self.meta,
                children,
            }),
            None => children,
        }
    }

    fn rejected<F>(&self, rejection: &Rejection, content: &mut F) -> Result<O, LazyError>
    where
        F: FnMut(&D, &LazyMeta<D>) -> O,
    {
        if self.settings.distinguish_reload_error {
            if let (Some(on_reload_error), Some(last)) =
                (&self.options.on_reload_error, self.meta.last_value())
            {
                trace!(reason = %rejection.reason, "dispatch reload error over last value");
                let children = self.fulfilled(last, content);
                return Ok(on_reload_error(ReloadErrorProps {
                    reason: &rejection.reason,
                    retry: rejection.retry.clone(),
                    meta: self.meta,
                    children,
                }));
            }
        }
        match &self.options.on_error {
            Some(on_error) => Ok(on_error(ErrorProps {
                reason: &rejection.reason,
                retry: rejection.retry.clone(),
                meta: self.meta,
            })),
            None => Err(LazyError::Unhandled(rejection.reason.clone())),
        }
    }
}
