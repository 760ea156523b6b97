use crate::{LazyEvent, LazyMeta, Readiness, Settings, Settled};
use tracing::debug;

/// What a view should show for the current event.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<D> {
    /// Nothing yet: a first load is still inside its delay window or hidden.
    Invisible,
    /// A first load (or an undistinguished reload) past its delay window.
    Loading,
    /// A load is in flight; the last settled outcome stays on screen.
    Reloading(Settled<D>),
    Settled(Settled<D>),
}

impl<D> ViewState<D> {
    pub fn is_invisible(&self) -> bool {
        matches!(self, ViewState::Invisible)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self, ViewState::Reloading(_))
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, ViewState::Settled(_))
    }

    /// The settled outcome on screen, stale or current.
    pub fn settled(&self) -> Option<&Settled<D>> {
        match self {
            ViewState::Reloading(settled) | ViewState::Settled(settled) => Some(settled),
            _ => None,
        }
    }
}

/// Derives the view state from the current event and the latched settled one.
///
/// A loading event only becomes [`ViewState::Reloading`] when something has
/// settled before, reloads are distinguished and a reloading view exists.
pub fn reduce<D: Clone>(
    event: &LazyEvent<D>,
    prior: Option<&Settled<D>>,
    settings: &Settings,
) -> ViewState<D> {
    match event {
        LazyEvent::Loading => match prior {
            Some(settled) if settings.distinguish_reloading && settings.reloading_view => {
                ViewState::Reloading(settled.clone())
            }
            _ => ViewState::Loading,
        },
        LazyEvent::Fulfilled(value) => ViewState::Settled(Settled::Fulfilled(value.clone())),
        LazyEvent::Rejected(rejection) => ViewState::Settled(Settled::Rejected(rejection.clone())),
    }
}

/// Hides a loading state that is switched off or still inside its delay window.
pub fn gate<D>(view: ViewState<D>, settings: &Settings, readiness: Readiness) -> ViewState<D> {
    match view {
        ViewState::Loading if !settings.show_loading || !readiness.loading => ViewState::Invisible,
        other => other,
    }
}

/// The per-element reducer state: current event, latched settled outcome, meta.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyReducer<D> {
    current: LazyEvent<D>,
    prior: Option<Settled<D>>,
    meta: LazyMeta<D>,
}

impl<D: Clone> LazyReducer<D> {
    /// Starts from `initial`, recorded once.
    pub fn new(initial: LazyEvent<D>, stack_limit: Option<usize>) -> Self {
        let meta = LazyMeta::new().record(&initial, stack_limit);
        LazyReducer {
            prior: initial.as_settled(),
            current: initial,
            meta,
        }
    }

    /// Applies the next event in arrival order.
    ///
    /// Settled events replace the latched outcome; loading events never clear it.
    pub fn apply(&mut self, event: LazyEvent<D>, stack_limit: Option<usize>) {
        let meta = std::mem::take(&mut self.meta);
        self.meta = meta.record(&event, stack_limit);
        if let Some(settled) = event.as_settled() {
            self.prior = Some(settled);
        }
        debug!(
            loading = event.is_loading(),
            fulfilled = event.is_fulfilled(),
            rejected = event.is_rejected(),
            "lazy event applied"
        );
        self.current = event;
    }

    /// Replaces the current event without touching history.
    pub fn revert(&mut self, event: LazyEvent<D>) {
        if let Some(settled) = event.as_settled() {
            self.prior = Some(settled);
        }
        self.current = event;
    }

    pub fn view(&self, settings: &Settings) -> ViewState<D> {
        reduce(&self.current, self.prior.as_ref(), settings)
    }

    pub fn current(&self) -> &LazyEvent<D> {
        &self.current
    }

    pub fn prior(&self) -> Option<&Settled<D>> {
        self.prior.as_ref()
    }

    pub fn meta(&self) -> &LazyMeta<D> {
        &self.meta
    }
}
