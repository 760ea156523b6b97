#![allow(dead_code)]

use lazyview::{resolve, LazyMeta, LazyOptions, LazyOverrides};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const MS: Duration = Duration::from_millis(1);

/// Counts how often each view callback ran.
#[derive(Clone, Default)]
pub struct Calls {
    pub loading: Arc<AtomicUsize>,
    pub reloading: Arc<AtomicUsize>,
    pub error: Arc<AtomicUsize>,
}

impl Calls {
    pub fn loading(&self) -> usize {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn reloading(&self) -> usize {
        self.reloading.load(Ordering::SeqCst)
    }

    pub fn error(&self) -> usize {
        self.error.load(Ordering::SeqCst)
    }
}

/// Options rendering each view as a tagged string and counting callbacks.
pub fn tagged(calls: &Calls, loading_delay: Duration) -> LazyOptions<i32, String> {
    let (loading, reloading, error) = (
        calls.loading.clone(),
        calls.reloading.clone(),
        calls.error.clone(),
    );
    let overrides = LazyOverrides::new()
        .loading_delay(loading_delay)
        .reloading_delay(Duration::ZERO)
        .on_loading(move |_| {
            loading.fetch_add(1, Ordering::SeqCst);
            "loading".to_string()
        })
        .on_reloading(move |props| {
            reloading.fetch_add(1, Ordering::SeqCst);
            format!("reloading[{}]({})", props.reloading, props.children)
        })
        .on_error(move |props| {
            error.fetch_add(1, Ordering::SeqCst);
            format!("error({})", props.reason)
        });
    resolve(&LazyOptions::default(), &LazyOverrides::new(), &[overrides])
}

pub fn content(value: &i32, _meta: &LazyMeta<i32>) -> String {
    format!("value({value})")
}
