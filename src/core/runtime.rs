//! The periodic driver loop tying the pipeline together.
//!
//! One interval tick performs, in order: hardware refresh + resolution,
//! scheduler advance check, formatting, and a hand-off to the delivery
//! task. Delivery can block for a network round trip plus retries, so it
//! runs on its own task behind a capacity-1 channel: a tick that fires
//! while the previous frame is still in flight simply drops its frame
//! instead of piling up.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::config::Settings;
use crate::core::frame::{format_frame, Frame};
use crate::core::page::PageScheduler;
use crate::core::resolver::SensorResolver;
use crate::core::selection::assign_frame_keys;
use crate::error::Result;
use crate::gamesense::GameSenseClient;
use crate::platform::{export_sensors, HardwareProvider};

/// Event name for the page at `index` (zero-based). Each page maps to its
/// own event so ordering only matters within a page.
pub fn page_event_name(index: usize) -> String {
    format!("PAGE{}", index + 1)
}

struct DeliveryJob {
    event: String,
    frame: Frame,
}

/// Run the daemon until Ctrl-C.
pub async fn run(
    settings: &Settings,
    mut provider: Box<dyn HardwareProvider>,
    client: GameSenseClient,
    export_path: Option<&Path>,
) -> Result<()> {
    let page_set = settings.page_set()?;

    // Key assignment is per page: pages are resolved independently.
    let page_keys: Vec<Vec<String>> = page_set
        .iter()
        .map(|page| assign_frame_keys(&page.sensors))
        .collect();

    if let Some(path) = export_path {
        if let Err(e) = export_sensors(provider.as_ref(), path) {
            log::warn!("sensor export to {} failed: {}", path.display(), e);
        }
    }

    let client = Arc::new(client);
    client.register_game_metadata().await;
    for (i, page) in page_set.iter().enumerate() {
        client.register_oled_event(&page_event_name(i), page.icon_id).await;
    }
    log::info!(
        "registered {} display pages with GameSense",
        page_set.len()
    );

    // Capacity 1: at most one in-flight delivery, later frames are dropped.
    let (frame_tx, mut frame_rx) = mpsc::channel::<DeliveryJob>(1);
    let delivery_client = client.clone();
    let delivery = tokio::spawn(async move {
        while let Some(job) = frame_rx.recv().await {
            delivery_client.send_frame(&job.event, &job.frame).await;
        }
    });

    let mut scheduler = PageScheduler::new(page_set);
    let mut resolver = SensorResolver::new();
    let mut ticker = interval(Duration::from_millis(settings.update_interval_ms()));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let index = scheduler.active_index();
                let page = scheduler.active().clone();
                let keys = &page_keys[index];

                let values = resolver.resolve(provider.as_mut(), &page.sensors, keys);
                scheduler.advance_if_due(Instant::now());
                let frame = format_frame(&page, keys, &values);

                match frame_tx.try_send(DeliveryJob {
                    event: page_event_name(index),
                    frame,
                }) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        log::debug!("previous delivery still in flight, dropping frame");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("shutting down");
                break;
            }
        }
    }

    drop(frame_tx);
    let _ = delivery.await;
    Ok(())
}
