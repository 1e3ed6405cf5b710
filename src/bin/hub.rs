use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast;
use tracing::{debug, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};
use uptime_monitoring::{
    actors::{MonitorHandle, SnapshotEvent},
    api::{spawn_api_server, ApiConfig, ApiState},
    config::{read_config_file, Config},
    notify::{NoopNotifier, Notifier, WebhookNotifier},
    store::{MemoryStore, TargetStore},
    TargetKind,
};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short)]
    file: String,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("uptime_monitoring", LevelFilter::TRACE),
        ("hub", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;

    let store = seed_store(&config).await?;
    let notifier = build_notifier(&config);
    let monitoring = config.monitoring.clone().unwrap_or_default();

    let (snapshot_tx, _) = broadcast::channel::<SnapshotEvent>(32);

    let server_monitor = MonitorHandle::spawn(
        TargetKind::Server,
        &monitoring,
        store.clone(),
        notifier.clone(),
        snapshot_tx.clone(),
    );
    let website_monitor = MonitorHandle::spawn(
        TargetKind::Website,
        &monitoring,
        store.clone(),
        notifier,
        snapshot_tx.clone(),
    );

    info!(
        "monitoring every {}s (confirmation windows: servers {}ms, websites {}ms)",
        monitoring.interval_secs,
        monitoring.server_confirmation_ms,
        monitoring.website_confirmation_ms
    );

    let api_settings = config.api.clone().unwrap_or_default();
    let api_state = ApiState::new(store, server_monitor, website_monitor, snapshot_tx);
    let addr = spawn_api_server(
        ApiConfig {
            bind_addr: api_settings.bind,
            auth_token: api_settings.token,
            enable_cors: true,
        },
        api_state,
    )
    .await?;

    info!("hub ready, API on {addr}");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    Ok(())
}

async fn seed_store(config: &Config) -> anyhow::Result<Arc<dyn TargetStore>> {
    let store = MemoryStore::new();

    if let Some(servers) = &config.servers {
        for seed in servers {
            let record = store.insert_server(seed.clone().into_record()).await?;
            debug!("registered server {} ({})", record.name, record.address());
        }
    }

    if let Some(websites) = &config.websites {
        for seed in websites {
            let record = store.insert_website(seed.clone().into_record()).await?;
            debug!("registered website {}", record.url);
        }
    }

    Ok(Arc::new(store))
}

fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    let webhook = config.alert.as_ref().and_then(|alert| alert.webhook.clone());

    match webhook {
        Some(url) => {
            debug!("down-alerts go to webhook {url}");
            Arc::new(WebhookNotifier::new(url))
        }
        None => {
            debug!("no alert webhook configured");
            Arc::new(NoopNotifier)
        }
    }
}
