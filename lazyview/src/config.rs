#[cfg(feature = "serde")]
use crate::LazyError;
use crate::LazyOverrides;
use std::time::Duration;

/// Contextual options as plain data, e.g. read from an application config file.
///
/// Only the keys that can be written down as values are here; view callbacks
/// are layered on in code. Delays are in milliseconds. Every key is optional
/// and unset keys leave the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default, deny_unknown_fields)
)]
pub struct LazyConfig {
    pub show_loading: Option<bool>,
    pub show_reloading: Option<bool>,
    pub distinguish_reloading: Option<bool>,
    pub distinguish_reload_error: Option<bool>,
    pub loading_delay: Option<u64>,
    pub reloading_delay: Option<u64>,
    pub loading_title: Option<String>,
    pub reloading_title: Option<String>,
    pub stack_limit: Option<usize>,
}

impl LazyConfig {
    /// Parses a JSON object such as `{"loadingDelay": 250, "showReloading": false}`.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, LazyError> {
        serde_json::from_str(json).map_err(|error| LazyError::Config(error.to_string()))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, LazyError> {
        serde_json::to_string(self).map_err(|error| LazyError::Config(error.to_string()))
    }

    pub fn into_overrides<D: 'static, O: 'static>(self) -> LazyOverrides<D, O> {
        let mut overrides = LazyOverrides::new();
        if let Some(show) = self.show_loading {
            overrides = overrides.show_loading(show);
        }
        if let Some(show) = self.show_reloading {
            overrides = overrides.show_reloading(show);
        }
        if let Some(distinguish) = self.distinguish_reloading {
            overrides = overrides.distinguish_reloading(distinguish);
        }
        if let Some(distinguish) = self.distinguish_reload_error {
            overrides = overrides.distinguish_reload_error(distinguish);
        }
        if let Some(ms) = self.loading_delay {
            overrides = overrides.loading_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = self.reloading_delay {
            overrides = overrides.reloading_delay(Duration::from_millis(ms));
        }
        if let Some(title) = self.loading_title {
            overrides = overrides.loading_title(title);
        }
        if let Some(title) = self.reloading_title {
            overrides = overrides.reloading_title(title);
        }
        if let Some(limit) = self.stack_limit {
            overrides = overrides.stack_limit(Some(limit));
        }
        overrides
    }
}
