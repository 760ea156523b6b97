//! Loading, reloading and error views for asynchronous values.
//!
//! A [`LazySource`] turns futures and streams into [`LazyEvent`]s. A
//! [`LazyView`] reduces those events into a [`ViewState`], holds back loading
//! indicators with [`DelayGate`]s to avoid flicker, and renders through the
//! callbacks configured in [`LazyOptions`]. The output type is up to the host.
//!
//! ```
//! use lazyview::{LazyEvent, LazyOptions, LazyOverrides, LazyView, resolve};
//!
//! let overrides = LazyOverrides::new()
//!     .loading_delay(std::time::Duration::ZERO)
//!     .on_loading(|_| "loading".to_string())
//!     .on_error(|props| format!("failed: {}", props.reason));
//! let options = resolve(&LazyOptions::default(), &LazyOverrides::new(), &[overrides]);
//!
//! let mut view = LazyView::new(LazyEvent::Loading, options);
//! assert_eq!(view.render(|n: &u32, _| n.to_string()).unwrap(), "loading");
//!
//! view.push(LazyEvent::Fulfilled(7)).unwrap();
//! assert_eq!(view.render(|n, _| n.to_string()).unwrap(), "7");
//! ```

mod config;
mod delay;
mod error;
mod event;
mod history;
mod into_event;
mod options;
mod reducer;
mod render;
mod source;
mod stream_ext;
mod view;

#[cfg(test)]
mod unit_tests;

pub use config::*;
pub use delay::*;
pub use error::*;
pub use event::*;
pub use history::*;
pub use into_event::*;
pub use options::*;
pub use reducer::*;
pub use render::*;
pub use source::*;
pub use stream_ext::*;
pub use view::*;
