//! Delivery client for the GameSense service.
//!
//! Transient failure is the normal operating condition here: the engine may
//! be down, restarting, or listening on a new port at any moment. Every
//! operation therefore runs inside one shared retry wrapper that re-reads
//! the descriptor file for a fresh address before each attempt and retries
//! forever with a fixed delay. Losing a frame is cosmetic; giving up is not.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Mutex;

use super::address::CorePropsLocator;
use super::payload::{BindEventPayload, EventPayload, HeartbeatPayload, MetadataPayload};
use crate::core::config::{DEFAULT_HEARTBEAT_INTERVAL_MS, DEFAULT_RETRY_INTERVAL_MS};
use crate::core::frame::Frame;
use crate::error::{OledSenseError, Result};

const DEVELOPER: &str = "OledSense Contributors";

pub struct GameSenseClient {
    http: reqwest::Client,
    game: String,
    game_display_name: String,
    locator: CorePropsLocator,
    /// Guards "read-or-refresh the address" so concurrent operations never
    /// race on the descriptor file.
    address: Mutex<String>,
    retry_interval: Duration,
    heartbeat_interval: Duration,
    /// Instant of the last successful send or heartbeat.
    last_activity: parking_lot::Mutex<Option<Instant>>,
}

impl GameSenseClient {
    pub fn new(game: &str, game_display_name: &str, locator: CorePropsLocator) -> Self {
        Self {
            http: reqwest::Client::new(),
            game: game.to_string(),
            game_display_name: game_display_name.to_string(),
            locator,
            address: Mutex::new(String::new()),
            retry_interval: Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS),
            heartbeat_interval: Duration::from_millis(DEFAULT_HEARTBEAT_INTERVAL_MS),
            last_activity: parking_lot::Mutex::new(None),
        }
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn developer(&self) -> &str {
        DEVELOPER
    }

    /// Non-positive values fall back to the 5 s default.
    pub fn set_retry_interval(&mut self, ms: i64) {
        let ms = if ms > 0 {
            ms as u64
        } else {
            DEFAULT_RETRY_INTERVAL_MS
        };
        self.retry_interval = Duration::from_millis(ms);
    }

    /// Non-positive values fall back to the 10 s default.
    pub fn set_heartbeat_interval(&mut self, ms: i64) {
        let ms = if ms > 0 {
            ms as u64
        } else {
            DEFAULT_HEARTBEAT_INTERVAL_MS
        };
        self.heartbeat_interval = Duration::from_millis(ms);
    }

    /// Register the two-line screen handler for one event. Idempotent on
    /// the engine side; called once per page at startup.
    pub async fn register_oled_event(&self, event: &str, icon_id: u32) {
        let payload = BindEventPayload::two_line_screen(&self.game, event, icon_id);
        self.retry_call("register_oled_event", |base| {
            let payload = &payload;
            async move { self.post_json(&base, "bind_game_event", payload).await }
        })
        .await;
    }

    /// Announce the integration's identity. Called once per process.
    pub async fn register_game_metadata(&self) {
        let payload = MetadataPayload {
            game: self.game.clone(),
            game_display_name: self.game_display_name.clone(),
            developer: DEVELOPER.to_string(),
        };
        self.retry_call("register_game_metadata", |base| {
            let payload = &payload;
            async move { self.post_json(&base, "game_metadata", payload).await }
        })
        .await;
    }

    /// Push one display frame, preceded by a heartbeat when the integration
    /// has been quiet past the heartbeat interval.
    pub async fn send_frame(&self, event: &str, frame: &Frame) {
        self.heartbeat_if_needed().await;
        let payload = EventPayload::new(&self.game, event, frame);
        self.retry_call("send_frame", |base| {
            let payload = &payload;
            async move { self.post_json(&base, "game_event", payload).await }
        })
        .await;
        self.mark_activity();
    }

    async fn heartbeat_if_needed(&self) {
        let due = match *self.last_activity.lock() {
            Some(at) => at.elapsed() >= self.heartbeat_interval,
            None => true,
        };
        if !due {
            return;
        }
        let payload = HeartbeatPayload {
            game: self.game.clone(),
        };
        self.retry_call("heartbeat", |base| {
            let payload = &payload;
            async move { self.post_json(&base, "game_heartbeat", payload).await }
        })
        .await;
        self.mark_activity();
    }

    fn mark_activity(&self) {
        *self.last_activity.lock() = Some(Instant::now());
    }

    /// Always reload the descriptor in case the port changed or the last
    /// attempt failed. Serialized so only one resolution runs at a time.
    async fn refresh_address(&self) -> Result<String> {
        let mut guard = self.address.lock().await;
        let address = self.locator.resolve()?;
        *guard = address.clone();
        Ok(address)
    }

    /// Run `call` against a freshly resolved address, retrying forever on
    /// any failure with a fixed delay. No retry cap, no circuit breaker.
    async fn retry_call<T, F, Fut>(&self, operation: &str, mut call: F) -> T
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        loop {
            let attempt = async {
                let address = self.refresh_address().await?;
                log::debug!("[HTTP] {} using {}", operation, address);
                call(address).await
            };
            match attempt.await {
                Ok(value) => return value,
                Err(e) => {
                    log::warn!(
                        "GameSense {} failed: {}. Retrying in {:.1}s ...",
                        operation,
                        e,
                        self.retry_interval.as_secs_f64()
                    );
                    tokio::time::sleep(self.retry_interval).await;
                }
            }
        }
    }

    async fn post_json<B: Serialize>(&self, base: &str, endpoint: &str, body: &B) -> Result<()> {
        let url = format!("{}/{}", base, endpoint);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| OledSenseError::delivery(format!("{}: {}", endpoint, e)))?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        log::debug!("[HTTP] POST {} -> {} {}", url, status, text);
        if !status.is_success() {
            return Err(OledSenseError::delivery(format!(
                "{}: {} {}",
                endpoint, status, text
            )));
        }
        Ok(())
    }
}
