use crate::tracing_setup::tracing_init;
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use lazyview::{resolve, LazyEvent, LazyMeta, LazyOptions, LazyOverrides, LazyView, Reason};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
mod tracing_setup;

fn options() -> LazyOptions<u64, String> {
    let app = LazyOverrides::new()
        .loading_delay(Duration::from_millis(100))
        .reloading_delay(Duration::from_millis(50))
        .on_loading(|props| {
            let title = props.title.unwrap_or_else(|| "...".to_string());
            format!("<spinner {title}>")
        })
        .on_reloading(|props| {
            if props.reloading {
                format!("<dimmed {}>", props.children)
            } else {
                props.children
            }
        })
        .on_error(|props| format!("<error '{}'>", props.reason));
    let call_site = LazyOverrides::new().loading_title("counter");
    resolve(&LazyOptions::default(), &app, &[call_site])
}

fn content(value: &u64, meta: &LazyMeta<u64>) -> String {
    format!("<count {} (#{})>", value, meta.fulfilled_count())
}

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("A. A fast result never shows the spinner");

    let mut view = LazyView::new(LazyEvent::Loading, options());
    info!("  Main | render: {:?}", view.render(content));
    sleep(Duration::from_millis(30)).await;
    view.push(LazyEvent::Fulfilled(1)).ok();
    info!("  Main | render: {:?}", view.render(content));

    info!("==========================================");
    warn!("B. A slow result shows the spinner once the delay has passed");

    let mut view = LazyView::new(LazyEvent::Loading, options());
    let mut readiness = Box::pin(view.readiness().to_stream());
    while let Some(ready) = readiness.next().await {
        info!("  Main | readiness {:?} render: {:?}", ready, view.render(content));
        if ready.loading {
            break;
        }
    }
    sleep(Duration::from_millis(200)).await;
    view.push(LazyEvent::Fulfilled(2)).ok();
    info!("  Main | render: {:?}", view.render(content));

    info!("==========================================");
    warn!("C. Reloading keeps the stale value on screen");

    view.push(LazyEvent::Loading).ok();
    info!("  Main | render: {:?}", view.render(content));
    sleep(Duration::from_millis(60)).await;
    info!("  Main | render: {:?}", view.render(content));
    view.push(LazyEvent::Fulfilled(3)).ok();
    info!("  Main | render: {:?}", view.render(content));

    info!("==========================================");
    warn!("D. Errors go to the error view, or fail the render without one");

    view.push(LazyEvent::rejected(Reason::error("backend unavailable"))).ok();
    info!("  Main | render: {:?}", view.render(content));

    let bare = resolve(
        view.options(),
        &LazyOverrides::new(),
        &[LazyOverrides::new().without_error_view()],
    );
    view.set_options(bare);
    if let Err(error) = view.render(content) {
        warn!("  Main | render failed: {}", error);
    }

    view.teardown();
    info!("==========================================");
    info!("  Main | Finish");
}
