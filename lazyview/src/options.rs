use crate::render::{
    ErrorProps, LoadingProps, OnError, OnLoading, OnReloadError, OnReloading, OnRender,
    ReloadErrorProps, ReloadingProps, RenderProps,
};
use crate::LazyMeta;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_LOADING_DELAY: Duration = Duration::from_millis(10);
pub const DEFAULT_RELOADING_DELAY: Duration = Duration::from_millis(10);
pub const DEFAULT_STACK_LIMIT: usize = 10;

/// An option value given either literally or derived from the render-time meta.
pub enum Derived<T, D> {
    Value(T),
    Derive(Arc<dyn Fn(&LazyMeta<D>) -> T + Send + Sync>),
}

impl<T, D> Derived<T, D> {
    pub fn derive<F>(f: F) -> Self
    where
        F: Fn(&LazyMeta<D>) -> T + Send + Sync + 'static,
    {
        Derived::Derive(Arc::new(f))
    }
}

impl<T: Clone, D> Derived<T, D> {
    pub fn resolve(&self, meta: &LazyMeta<D>) -> T {
        match self {
            Derived::Value(value) => value.clone(),
            Derived::Derive(f) => f(meta),
        }
    }
}

impl<T: Clone, D> Clone for Derived<T, D> {
    fn clone(&self) -> Self {
        match self {
            Derived::Value(value) => Derived::Value(value.clone()),
            Derived::Derive(f) => Derived::Derive(f.clone()),
        }
    }
}

impl<T: fmt::Debug, D> fmt::Debug for Derived<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derived::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Derived::Derive(_) => f.write_str("Derive(..)"),
        }
    }
}

impl<T, D> From<T> for Derived<T, D> {
    fn from(value: T) -> Self {
        Derived::Value(value)
    }
}

impl<D> From<&str> for Derived<String, D> {
    fn from(value: &str) -> Self {
        Derived::Value(value.to_string())
    }
}

/// The effective configuration of one view: every key has a value.
///
/// Built from [`LazyOptions::default`] and layered [`LazyOverrides`] with
/// [`resolve`]. Handlers left as `None` fall back as follows: no `on_loading`
/// renders nothing, no `on_reloading` renders nothing but the stale content
/// (and disables the reloading view state), no `on_error` turns a rejection
/// into [`LazyError::Unhandled`](crate::LazyError::Unhandled), no
/// `on_reload_error` falls back to `on_error`, no `on_render` passes content
/// through.
pub struct LazyOptions<D, O> {
    pub on_loading: Option<OnLoading<D, O>>,
    pub on_reloading: Option<OnReloading<D, O>>,
    pub on_error: Option<OnError<D, O>>,
    pub on_reload_error: Option<OnReloadError<D, O>>,
    pub on_render: Option<OnRender<D, O>>,
    pub show_loading: Derived<bool, D>,
    pub show_reloading: Derived<bool, D>,
    pub distinguish_reloading: Derived<bool, D>,
    pub distinguish_reload_error: Derived<bool, D>,
    pub loading_delay: Derived<Duration, D>,
    pub reloading_delay: Derived<Duration, D>,
    pub loading_title: Option<Derived<String, D>>,
    pub reloading_title: Option<Derived<String, D>>,
    pub stack_limit: Option<usize>,
}

impl<D: 'static, O: 'static> Default for LazyOptions<D, O> {
    fn default() -> Self {
        let passthrough: OnReloading<D, O> =
            Arc::new(|props: ReloadingProps<'_, D, O>| props.children);
        LazyOptions {
            on_loading: None,
            on_reloading: Some(passthrough),
            on_error: None,
            on_reload_error: None,
            on_render: None,
            show_loading: Derived::Value(true),
            show_reloading: Derived::Value(true),
            distinguish_reloading: Derived::Value(true),
            distinguish_reload_error: Derived::Value(false),
            loading_delay: Derived::Value(DEFAULT_LOADING_DELAY),
            reloading_delay: Derived::Value(DEFAULT_RELOADING_DELAY),
            loading_title: None,
            reloading_title: None,
            stack_limit: Some(DEFAULT_STACK_LIMIT),
        }
    }
}

/// A partial layer of options. Keys left as `None` keep the lower layer's value.
pub struct LazyOverrides<D, O> {
    pub on_loading: Option<Option<OnLoading<D, O>>>,
    pub on_reloading: Option<Option<OnReloading<D, O>>>,
    pub on_error: Option<Option<OnError<D, O>>>,
    pub on_reload_error: Option<Option<OnReloadError<D, O>>>,
    pub on_render: Option<Option<OnRender<D, O>>>,
    pub show_loading: Option<Derived<bool, D>>,
    pub show_reloading: Option<Derived<bool, D>>,
    pub distinguish_reloading: Option<Derived<bool, D>>,
    pub distinguish_reload_error: Option<Derived<bool, D>>,
    pub loading_delay: Option<Derived<Duration, D>>,
    pub reloading_delay: Option<Derived<Duration, D>>,
    pub loading_title: Option<Option<Derived<String, D>>>,
    pub reloading_title: Option<Option<Derived<String, D>>>,
    pub stack_limit: Option<Option<usize>>,
}

impl<D, O> Default for LazyOverrides<D, O> {
    fn default() -> Self {
        LazyOverrides {
            on_loading: None,
            on_reloading: None,
            on_error: None,
            on_reload_error: None,
            on_render: None,
            show_loading: None,
            show_reloading: None,
            distinguish_reloading: None,
            distinguish_reload_error: None,
            loading_delay: None,
            reloading_delay: None,
            loading_title: None,
            reloading_title: None,
            stack_limit: None,
        }
    }
}

// Shallow, per-key copy of every key the upper layer sets.
macro_rules! merge_keys {
    ($target:expr, $layer:expr; $($key:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$layer.$key {
                $target.$key = value.clone();
            }
        )+
    };
}

macro_rules! clone_keys {
    ($source:expr, $ty:ident; $($key:ident),+ $(,)?) => {
        $ty {
            $($key: $source.$key.clone(),)+
        }
    };
}

impl<D, O> Clone for LazyOptions<D, O> {
    fn clone(&self) -> Self {
        clone_keys!(self, LazyOptions;
            on_loading, on_reloading, on_error, on_reload_error, on_render,
            show_loading, show_reloading, distinguish_reloading, distinguish_reload_error,
            loading_delay, reloading_delay, loading_title, reloading_title, stack_limit,
        )
    }
}

impl<D, O> Clone for LazyOverrides<D, O> {
    fn clone(&self) -> Self {
        clone_keys!(self, LazyOverrides;
            on_loading, on_reloading, on_error, on_reload_error, on_render,
            show_loading, show_reloading, distinguish_reloading, distinguish_reload_error,
            loading_delay, reloading_delay, loading_title, reloading_title, stack_limit,
        )
    }
}

impl<D, O> LazyOptions<D, O> {
    /// Applies one layer on top of these options.
    pub fn merge(mut self, layer: &LazyOverrides<D, O>) -> Self {
        merge_keys!(self, layer;
            on_loading, on_reloading, on_error, on_reload_error, on_render,
            show_loading, show_reloading, distinguish_reloading, distinguish_reload_error,
            loading_delay, reloading_delay, loading_title, reloading_title, stack_limit,
        );
        self
    }

    /// Resolves every derived key against `meta`. Done once per render.
    pub fn settle(&self, meta: &LazyMeta<D>) -> Settings {
        Settings {
            show_loading: self.show_loading.resolve(meta),
            show_reloading: self.show_reloading.resolve(meta),
            distinguish_reloading: self.distinguish_reloading.resolve(meta),
            distinguish_reload_error: self.distinguish_reload_error.resolve(meta),
            loading_delay: self.loading_delay.resolve(meta),
            reloading_delay: self.reloading_delay.resolve(meta),
            loading_title: self.loading_title.as_ref().map(|title| title.resolve(meta)),
            reloading_title: self.reloading_title.as_ref().map(|title| title.resolve(meta)),
            reloading_view: self.on_reloading.is_some(),
            stack_limit: self.stack_limit,
        }
    }
}

impl<D: 'static, O: 'static> LazyOverrides<D, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_loading<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(LoadingProps<'a, D>) -> O + Send + Sync + 'static,
    {
        self.on_loading = Some(Some(Arc::new(f)));
        self
    }

    pub fn on_reloading<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(ReloadingProps<'a, D, O>) -> O + Send + Sync + 'static,
    {
        self.on_reloading = Some(Some(Arc::new(f)));
        self
    }

    /// Removes the reloading view, so reloads render like a first load.
    pub fn without_reloading_view(mut self) -> Self {
        self.on_reloading = Some(None);
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(ErrorProps<'a, D>) -> O + Send + Sync + 'static,
    {
        self.on_error = Some(Some(Arc::new(f)));
        self
    }

    /// Removes the error view, so rejections surface as errors again.
    pub fn without_error_view(mut self) -> Self {
        self.on_error = Some(None);
        self
    }

    pub fn on_reload_error<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(ReloadErrorProps<'a, D, O>) -> O + Send + Sync + 'static,
    {
        self.on_reload_error = Some(Some(Arc::new(f)));
        self
    }

    pub fn on_render<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(RenderProps<'a, D, O>) -> O + Send + Sync + 'static,
    {
        self.on_render = Some(Some(Arc::new(f)));
        self
    }

    pub fn show_loading(mut self, value: impl Into<Derived<bool, D>>) -> Self {
        self.show_loading = Some(value.into());
        self
    }

    pub fn show_reloading(mut self, value: impl Into<Derived<bool, D>>) -> Self {
        self.show_reloading = Some(value.into());
        self
    }

    pub fn distinguish_reloading(mut self, value: impl Into<Derived<bool, D>>) -> Self {
        self.distinguish_reloading = Some(value.into());
        self
    }

    pub fn distinguish_reload_error(mut self, value: impl Into<Derived<bool, D>>) -> Self {
        self.distinguish_reload_error = Some(value.into());
        self
    }

    pub fn loading_delay(mut self, value: impl Into<Derived<Duration, D>>) -> Self {
        self.loading_delay = Some(value.into());
        self
    }

    pub fn reloading_delay(mut self, value: impl Into<Derived<Duration, D>>) -> Self {
        self.reloading_delay = Some(value.into());
        self
    }

    pub fn loading_title(mut self, value: impl Into<Derived<String, D>>) -> Self {
        self.loading_title = Some(Some(value.into()));
        self
    }

    pub fn reloading_title(mut self, value: impl Into<Derived<String, D>>) -> Self {
        self.reloading_title = Some(Some(value.into()));
        self
    }

    pub fn stack_limit(mut self, limit: Option<usize>) -> Self {
        self.stack_limit = Some(limit);
        self
    }
}

/// Every derived option resolved for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub show_loading: bool,
    pub show_reloading: bool,
    pub distinguish_reloading: bool,
    pub distinguish_reload_error: bool,
    pub loading_delay: Duration,
    pub reloading_delay: Duration,
    pub loading_title: Option<String>,
    pub reloading_title: Option<String>,
    /// Whether a reloading view is configured at all.
    pub reloading_view: bool,
    pub stack_limit: Option<usize>,
}

/// Merges `defaults < contextual < overrides[0] < overrides[1] < ...`.
pub fn resolve<D, O>(
    defaults: &LazyOptions<D, O>,
    contextual: &LazyOverrides<D, O>,
    overrides: &[LazyOverrides<D, O>],
) -> LazyOptions<D, O> {
    overrides
        .iter()
        .fold(defaults.clone().merge(contextual), |options, layer| {
            options.merge(layer)
        })
}
