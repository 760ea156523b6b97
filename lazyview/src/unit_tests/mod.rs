use crate::{resolve, LazyOptions, LazyOverrides};
use std::time::Duration;

mod error_test;
mod event_test;
mod history_test;
mod view_test;

/// Options rendering every view as a tagged string, with no delays.
pub fn string_options() -> LazyOptions<i32, String> {
    resolve(
        &LazyOptions::default(),
        &LazyOverrides::new(),
        &[string_overrides()],
    )
}

pub fn string_overrides() -> LazyOverrides<i32, String> {
    LazyOverrides::new()
        .loading_delay(Duration::ZERO)
        .reloading_delay(Duration::ZERO)
        .on_loading(|props| format!("loading({})", props.title.unwrap_or_default()))
        .on_reloading(|props| format!("reloading[{}]({})", props.reloading, props.children))
        .on_error(|props| format!("error({})", props.reason))
}

pub fn content(value: &i32, _meta: &crate::LazyMeta<i32>) -> String {
    format!("value({value})")
}
