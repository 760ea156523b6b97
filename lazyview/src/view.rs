use crate::reducer::{gate, reduce};
use crate::{
    DelayGate, Dispatcher, Events, LazyError, LazyEvent, LazyMeta, LazyOptions, LazyReducer,
    LazySource, Readiness, Settings, ViewState,
};
use futures_signals::map_ref;
use futures_signals::signal::Signal;
use std::time::Duration;
use tracing::debug;

/// One UI element showing an asynchronous value.
///
/// Owns the reducer state and both delay gates for as long as the element
/// lives. Feed it events with [`push`](LazyView::push) in arrival order and
/// call [`render`](LazyView::render) whenever the host redraws; subscribe to
/// [`readiness`](LazyView::readiness) to learn when a delay window closes.
/// Dropping the view, or [`teardown`](LazyView::teardown), cancels pending
/// timers.
pub struct LazyView<D, O> {
    options: LazyOptions<D, O>,
    reducer: LazyReducer<D>,
    loading_gate: DelayGate,
    reloading_gate: DelayGate,
    torn_down: bool,
}

impl<D, O> LazyView<D, O>
where
    D: Clone + 'static,
    O: Default + 'static,
{
    pub fn new(initial: LazyEvent<D>, options: LazyOptions<D, O>) -> Self {
        let reducer = LazyReducer::new(initial, options.stack_limit);
        let mut view = LazyView {
            options,
            reducer,
            loading_gate: DelayGate::new(),
            reloading_gate: DelayGate::new(),
            torn_down: false,
        };
        view.sync();
        view
    }

    /// Applies the next event from the source.
    pub fn push(&mut self, event: LazyEvent<D>) -> Result<(), LazyError> {
        if self.torn_down {
            return Err(LazyError::TornDown);
        }
        self.reducer.apply(event, self.options.stack_limit);
        self.sync();
        Ok(())
    }

    /// Replaces the current event without recording it.
    pub fn revert(&mut self, event: LazyEvent<D>) -> Result<(), LazyError> {
        if self.torn_down {
            return Err(LazyError::TornDown);
        }
        self.reducer.revert(event);
        self.sync();
        Ok(())
    }

    pub fn set_options(&mut self, options: LazyOptions<D, O>) {
        self.options = options;
        if !self.torn_down {
            self.sync();
        }
    }

    /// The gated view state for this instant.
    pub fn view_state(&mut self) -> ViewState<D> {
        let settings = self.sync();
        gate(self.reducer.view(&settings), &settings, self.readiness_now())
    }

    /// Renders the current state, calling `content` for fulfilled values.
    pub fn render<F>(&mut self, content: F) -> Result<O, LazyError>
    where
        F: FnMut(&D, &LazyMeta<D>) -> O,
    {
        let settings = self.sync();
        let readiness = self.readiness_now();
        let view = gate(self.reducer.view(&settings), &settings, readiness);
        Dispatcher::new(&self.options, &settings, readiness, self.reducer.meta())
            .dispatch(&view, content)
    }

    /// Gate readiness as a signal of `(loading, reloading)`.
    pub fn readiness(&self) -> impl Signal<Item = Readiness> {
        map_ref! {
            let loading = self.loading_gate.signal(),
            let reloading = self.reloading_gate.signal() =>
            Readiness { loading: *loading, reloading: *reloading }
        }
    }

    /// Cancels pending timers and stops accepting events.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.loading_gate.cancel();
        self.reloading_gate.cancel();
        debug!("lazy view torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn current(&self) -> &LazyEvent<D> {
        self.reducer.current()
    }

    pub fn meta(&self) -> &LazyMeta<D> {
        self.reducer.meta()
    }

    pub fn options(&self) -> &LazyOptions<D, O> {
        &self.options
    }

    fn readiness_now(&self) -> Readiness {
        Readiness {
            loading: self.loading_gate.is_ready(),
            reloading: self.reloading_gate.is_ready(),
        }
    }

    // Resolves the options and re-polls both gates with the delays that
    // apply right now. A gate restarts whenever its delay changes.
    fn sync(&mut self) -> Settings {
        let settings = self.options.settle(self.reducer.meta());
        if self.torn_down {
            return settings;
        }
        let view = reduce(self.reducer.current(), self.reducer.prior(), &settings);
        let loading_delay = if view.is_loading() && settings.show_loading {
            settings.loading_delay
        } else {
            Duration::ZERO
        };
        let reloading_delay = if self.reducer.current().is_loading() && settings.show_reloading {
            settings.reloading_delay
        } else {
            Duration::ZERO
        };
        self.loading_gate.poll(loading_delay);
        self.reloading_gate.poll(reloading_delay);
        settings
    }
}

impl<D, O> LazyView<D, O>
where
    D: Clone + Send + Sync + 'static,
    O: Default + 'static,
{
    /// A view seeded with the source's current event, plus every later event.
    ///
    /// Push each item of the returned stream into the view. The seed is
    /// recorded once and never shows up again in the stream.
    pub fn follow(source: &LazySource<D>, options: LazyOptions<D, O>) -> (Self, Events<D>) {
        let (current, events) = source.snapshot();
        (LazyView::new(current, options), events)
    }
}
