use lazy_static::lazy_static;
use std::{env, io};
use tokio::task::JoinHandle;
use tracing::{info, warn, Level};
use tracing_loki::url::Url;
use tracing_loki::{BackgroundTask, BackgroundTaskController};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};

lazy_static! {
    static ref LOKI_URL: Option<String> = env::var("LOKI_URL").ok();
}

fn build_loki_layer(
    base_url: Url,
) -> Result<(tracing_loki::Layer, BackgroundTaskController, BackgroundTask), tracing_loki::Error>
{
    tracing_loki::builder()
        .label("service", "calendario-eventi")?
        .build_controller_url(base_url)
}

/**
   Logs to stderr (stdout carries the calendar itself) and, when `LOKI_URL` is set and reachable, to Loki.
   * verbose: log everything from this crate instead of only its warnings
*/
pub async fn setup_tracing(verbose: bool) -> Option<(BackgroundTaskController, JoinHandle<()>)> {
    let own_level = if verbose { Level::TRACE } else { Level::WARN };
    let filter = filter::Targets::new()
        .with_target("calendario_eventi", own_level)
        .with_default(Level::WARN);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr));

    let Some(base_url) = LOKI_URL.as_ref() else {
        registry.init();
        warn!("Loki URL not provided. Continuing without it.");
        return None;
    };

    let loki = match base_url.parse::<Url>() {
        Ok(base_url) => match reqwest::get(base_url.clone()).await {
            Ok(_) => build_loki_layer(base_url).ok(),
            Err(_) => None,
        },
        Err(_) => None,
    };

    match loki {
        Some((layer, controller, task)) => {
            registry.with(layer).init();
            let handle = tokio::spawn(task);

            info!("Loki initialized");

            Some((controller, handle))
        }
        None => {
            registry.init();
            warn!("Couldn't connect to Loki at '{}'. Continuing without it.", base_url);
            None
        }
    }
}
