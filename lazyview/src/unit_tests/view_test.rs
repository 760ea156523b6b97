use crate::unit_tests::{content, string_options, string_overrides};
use crate::{
    resolve, LazyError, LazyEvent, LazyOptions, LazyOverrides, LazyView, Readiness, Reason,
    ViewState,
};
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use std::time::Duration;
use tokio::time::sleep;

const MS: Duration = Duration::from_millis(1);

fn delayed(loading: Duration, reloading: Duration) -> LazyOptions<i32, String> {
    let overrides = LazyOverrides::new()
        .loading_delay(loading)
        .reloading_delay(reloading);
    resolve(&LazyOptions::default(), &string_overrides(), &[overrides])
}

#[test]
fn test_renders_through_the_lifecycle() {
    let mut view = LazyView::new(LazyEvent::Loading, string_options());
    assert_eq!(view.render(content), Ok("loading()".to_string()));

    view.push(LazyEvent::Fulfilled(1)).unwrap();
    assert_eq!(view.render(content), Ok("value(1)".to_string()));

    view.push(LazyEvent::Loading).unwrap();
    assert_eq!(view.render(content), Ok("reloading[true](value(1))".to_string()));

    view.push(LazyEvent::rejected(Reason::error("x"))).unwrap();
    assert_eq!(view.render(content), Ok("error(x)".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_loading_waits_for_its_delay() {
    let mut view = LazyView::new(LazyEvent::Loading, delayed(10 * MS, 10 * MS));
    assert_eq!(view.view_state(), ViewState::Invisible);
    assert_eq!(view.render(content), Ok(String::new()));

    sleep(11 * MS).await;
    assert_eq!(view.view_state(), ViewState::Loading);
    assert_eq!(view.render(content), Ok("loading()".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_reloading_flag_waits_for_its_delay() {
    let mut view = LazyView::new(LazyEvent::Fulfilled(5), delayed(10 * MS, 10 * MS));
    view.push(LazyEvent::Loading).unwrap();
    assert_eq!(
        view.render(content),
        Ok("reloading[false](value(5))".to_string())
    );

    sleep(11 * MS).await;
    assert_eq!(
        view.render(content),
        Ok("reloading[true](value(5))".to_string())
    );

    // A retry restarts the reload delay.
    view.push(LazyEvent::rejected(Reason::Timeout)).unwrap();
    view.push(LazyEvent::Loading).unwrap();
    assert_eq!(
        view.render(content),
        Ok("reloading[false](error(deadline has elapsed!))".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_undistinguished_reload_is_a_delayed_load() {
    let options = resolve(
        &delayed(10 * MS, 0 * MS),
        &LazyOverrides::new(),
        &[LazyOverrides::new().distinguish_reloading(false)],
    );
    let mut view = LazyView::new(LazyEvent::Fulfilled(5), options);
    view.push(LazyEvent::Loading).unwrap();
    assert_eq!(view.view_state(), ViewState::Invisible);

    sleep(11 * MS).await;
    assert_eq!(view.render(content), Ok("loading()".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_readiness_signal_follows_gates() {
    let mut view = LazyView::new(LazyEvent::Loading, delayed(10 * MS, 0 * MS));
    let mut readiness = Box::pin(view.readiness().to_stream());
    assert_eq!(
        readiness.next().await,
        Some(Readiness {
            loading: false,
            reloading: true,
        })
    );
    assert_eq!(readiness.next().await, Some(Readiness::ready()));
    assert_eq!(view.render(content), Ok("loading()".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_and_rejects_events() {
    let mut view = LazyView::new(LazyEvent::Loading, delayed(10 * MS, 10 * MS));
    view.teardown();
    assert!(view.is_torn_down());

    sleep(20 * MS).await;
    assert_eq!(view.view_state(), ViewState::Invisible);
    assert_eq!(view.push(LazyEvent::Fulfilled(1)), Err(LazyError::TornDown));
    assert_eq!(view.revert(LazyEvent::Fulfilled(1)), Err(LazyError::TornDown));
    assert_eq!(view.current(), &LazyEvent::Loading);
}

#[test]
fn test_revert_renders_without_recording() {
    let mut view = LazyView::new(LazyEvent::Fulfilled(1), string_options());
    view.revert(LazyEvent::Fulfilled(2)).unwrap();
    assert_eq!(view.render(content), Ok("value(2)".to_string()));
    assert_eq!(view.meta().fulfilled_count(), 1);
}

#[test]
fn test_set_options_applies_on_next_render() {
    let mut view = LazyView::new(LazyEvent::rejected(Reason::error("x")), string_options());
    assert_eq!(view.render(content), Ok("error(x)".to_string()));

    let bare = resolve(
        view.options(),
        &LazyOverrides::new(),
        &[LazyOverrides::new().without_error_view()],
    );
    view.set_options(bare);
    assert_eq!(
        view.render(content),
        Err(LazyError::Unhandled(Reason::error("x")))
    );
}

#[test]
fn test_stack_limit_option_bounds_history() {
    let options = resolve(
        &string_options(),
        &LazyOverrides::new(),
        &[LazyOverrides::new().stack_limit(Some(1))],
    );
    let mut view = LazyView::new(LazyEvent::Loading, options);
    for n in 0..10 {
        view.push(LazyEvent::Fulfilled(n)).unwrap();
    }
    assert_eq!(view.meta().history.fulfilled.count(), 10);
    assert_eq!(view.meta().history.fulfilled.retained(), 3);
}
