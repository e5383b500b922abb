// src/main.rs
//
// mediasession [search text]
//
// Loads the server config, opens the timeline (or a smart search when text is
// given), pages through it and logs the resulting session view.

use std::sync::Arc;

use anyhow::Context;
use log::info;

use mediasession::{
    create_event_bus, AssetSource, HttpCatalogClient, ModeChanged, PageMerged, SearchContext,
    SearchFilters, ServerConfig, SessionController, SessionRuntime, UserAction,
};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn source_from_args(args: Vec<String>) -> AssetSource {
    if args.is_empty() {
        AssetSource::Timeline {
            filters: SearchFilters::default(),
        }
    } else {
        AssetSource::TextSearch {
            query: args.join(" "),
            context: SearchContext::Smart,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    // 1. CONFIG
    let config = ServerConfig::load().context("loading server configuration")?;
    info!("Using catalog at {}", config.base_url());

    // 2. TRANSPORT + OBSERVERS
    let client = HttpCatalogClient::new(&config).context("building HTTP client")?;
    let bus = create_event_bus();
    bus.subscribe::<ModeChanged, _>(|event| info!("Mode {} -> {}", event.from, event.to));
    bus.subscribe::<PageMerged, _>(|event| {
        info!(
            "Page {} merged: {}/{} assets",
            event.page, event.loaded_assets, event.total_assets
        )
    });

    // 3. SESSION
    let controller = SessionController::new(config.session.clone());
    let mut runtime = SessionRuntime::new(controller, Arc::new(client), bus);
    runtime.start().await;

    let source = source_from_args(std::env::args().skip(1).collect());
    runtime.dispatch(UserAction::SelectSource { source }).await;

    let view = runtime.view();
    info!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
