use crate::tracing_setup::tracing_init;
use futures::StreamExt;
use lazyview::{
    resolve, LazyConfig, LazyError, LazyEvent, LazyMeta, LazyOptions, LazyOverrides,
    LazySource, LazyStreamExt, LazyView,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
mod tracing_setup;

const CONFIG: &str = r#"{
    "loadingDelay": 50,
    "reloadingDelay": 0,
    "loadingTitle": "prices",
    "stackLimit": 3
}"#;

fn options(config: LazyConfig) -> LazyOptions<f64, String> {
    let views = LazyOverrides::new()
        .on_loading(|props| format!("<loading {}>", props.title.unwrap_or_default()))
        .on_reloading(|props| format!("<refreshing {}>", props.children))
        .on_error(|props| {
            let hint = if props.retry.is_some() { " (retry)" } else { "" };
            format!("<error '{}'{}>", props.reason, hint)
        });
    resolve(&LazyOptions::default(), &config.into_overrides(), &[views])
}

fn content(price: &f64, meta: &LazyMeta<f64>) -> String {
    format!("<price {:.2}, seen {}>", price, meta.fulfilled_count())
}

#[tokio::main]
async fn main() -> Result<(), LazyError> {
    tracing_init();
    let config = LazyConfig::from_json(CONFIG)?;
    debug!("  Main | config: {:?}", config);

    info!("==========================================");
    warn!("A. A flaky request fails once and is retried");

    let attempts = Arc::new(AtomicU32::new(0));
    let source: LazySource<f64> = LazySource::new();
    let (mut view, mut events) = LazyView::follow(&source, options(config.clone()));

    let counter = attempts.clone();
    source.async_execute_with_timeout(
        move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                sleep(Duration::from_millis(80)).await;
                if attempt == 0 {
                    Err("connection reset")
                } else {
                    Ok(101.25)
                }
            }
        },
        Duration::from_millis(500),
    );

    let mut retried = false;
    while let Some(event) = events.next().await {
        view.push(event.clone())?;
        info!("  Main | render: {}", view.render(content)?);
        if let Some(rejection) = event.rejection() {
            if !retried {
                retried = rejection.try_retry();
                continue;
            }
        }
        if event.is_fulfilled() {
            break;
        }
    }
    info!("  Main | attempts: {}", attempts.load(Ordering::SeqCst));

    info!("==========================================");
    warn!("B. A slow request times out");

    let source: LazySource<f64> = LazySource::new();
    let (mut view, events) = LazyView::follow(&source, options(config.clone()));
    source.async_execute_with_timeout(
        || async {
            sleep(Duration::from_secs(5)).await;
            Some(99.0)
        },
        Duration::from_millis(100),
    );
    let mut events = events.stop_if(LazyEvent::is_settled);
    while let Some(event) = events.next().await {
        view.push(event)?;
        info!("  Main | render: {}", view.render(content)?);
    }

    info!("==========================================");
    warn!("C. A price feed drives the view until unsubscribed");

    let source = LazySource::with_initial(100.0);
    let (mut view, mut events) = LazyView::follow(&source, options(config));
    let feed = futures::stream::iter(vec![
        Ok(100.5),
        Ok(101.0),
        Err("feed stalled"),
        Ok(102.0),
    ])
    .then(|tick| async move {
        sleep(Duration::from_millis(30)).await;
        tick
    });
    let subscription = source.observe(feed);

    while let Some(event) = events.next().await {
        view.push(event.clone())?;
        info!("  Main | render: {}", view.render(content)?);
        if event.value_ref() == Some(&102.0) {
            break;
        }
    }
    subscription.unsubscribe();
    let history = &view.meta().history;
    info!(
        "  Main | fulfilled {} times, {} retained, {} rejections",
        history.fulfilled.count(),
        history.fulfilled.retained(),
        history.rejected.count()
    );

    view.teardown();
    source.close();
    info!("==========================================");
    info!("  Main | Finish");
    Ok(())
}
