//! # pinfoldctl
//!
//! Command-line driver for the Pinfold engine: drops a pin at the given
//! coordinates, acquires a photo album for it from Flickr, streams album
//! events to the log, and optionally writes the downloaded photos to disk.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pinfold_config::ConfigLoader;
use pinfold_core::coordinator::AlbumCoordinator;
use pinfold_core::events::InProcAlbumEventBus;
use pinfold_core::fetch::HttpImageFetcher;
use pinfold_core::geocode::NullGeocoder;
use pinfold_core::search::FlickrSearchClient;
use pinfold_core::store::{InMemoryPinStore, PinStore};

#[derive(Parser, Debug)]
#[command(name = "pinfoldctl", about, version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop a pin and acquire a photo album for it.
    Fetch {
        /// Pin latitude in degrees, [-90, 90].
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Pin longitude in degrees, [-180, 180].
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Directory to write the downloaded photos into.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Discard the first album and fetch a fresh one before writing.
        #[arg(long)]
        reload: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Fetch {
            lat,
            lon,
            out,
            reload,
        } => fetch(lat, lon, out, reload).await,
    }
}

async fn fetch(
    lat: f64,
    lon: f64,
    out: Option<PathBuf>,
    reload: bool,
) -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("loading configuration")?;
    let timeout = Duration::from_secs(config.http.timeout_secs);

    let store = Arc::new(InMemoryPinStore::new());
    let bus = Arc::new(InProcAlbumEventBus::new(64));
    let coordinator = AlbumCoordinator::new(
        Arc::new(FlickrSearchClient::new(
            config.search.api_key.clone(),
            config.search.endpoint.clone(),
            timeout,
        )),
        Arc::new(HttpImageFetcher::new(timeout)),
        store.clone(),
        Arc::new(NullGeocoder),
        bus.clone(),
        config.search.per_page,
    );

    let mut events = bus.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(?event, "album changed");
        }
    });

    let pin = coordinator.place_pin(lat, lon).await?;
    coordinator.load_photos(pin.id).await?;
    if reload {
        info!("fetching a new collection");
        coordinator.reload_photos(pin.id).await?;
    }

    let photos = store.photos(pin.id).await?;
    let filled = photos.iter().filter(|p| !p.is_placeholder()).count();
    info!(
        total = photos.len(),
        filled,
        placeholders = photos.len() - filled,
        "album acquired"
    );

    if let Some(dir) = out {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
        for photo in &photos {
            if photo.is_placeholder() {
                warn!(index = photo.index, "skipping unfilled photo");
                continue;
            }
            let path = dir.join(format!("{:03}.jpg", photo.index));
            tokio::fs::write(&path, &photo.image)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                path = %path.display(),
                caption = %photo.caption,
                "wrote photo"
            );
        }
    }

    printer.abort();
    Ok(())
}
