//! Display pages and the rotation scheduler.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::selection::SensorSelection;
use crate::error::{OledSenseError, Result};

/// One timed slide of up to two sensor readings.
///
/// Lines past the second are ignored at format time; `icon_id` is only used
/// when the page's event is registered with the display service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OledPage {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub icon_id: u32,
    #[serde(default)]
    pub sensors: Vec<SensorSelection>,
}

fn default_duration_ms() -> u64 {
    5000
}

impl OledPage {
    pub fn new(duration_ms: u64, icon_id: u32, sensors: Vec<SensorSelection>) -> Self {
        Self {
            duration_ms,
            icon_id,
            sensors,
        }
    }
}

/// Ordered, non-empty sequence of pages; rotation wraps after the last.
#[derive(Debug, Clone)]
pub struct PageSet {
    pages: Vec<OledPage>,
}

impl PageSet {
    /// Build a page set, rejecting configurations the scheduler cannot run.
    pub fn new(pages: Vec<OledPage>) -> Result<Self> {
        if pages.is_empty() {
            return Err(OledSenseError::config(
                "at least one display page must be configured",
            ));
        }
        if let Some(bad) = pages.iter().position(|p| p.duration_ms == 0) {
            return Err(OledSenseError::config(format!(
                "page {} has a zero duration",
                bad + 1
            )));
        }
        Ok(Self { pages })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> &OledPage {
        &self.pages[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OledPage> {
        self.pages.iter()
    }
}

/// Rotates through a [`PageSet`] on each page's own timer.
///
/// Advances strictly one page per check, even when more than one duration
/// has elapsed, so a stalled host never skips visible frames.
pub struct PageScheduler {
    pages: PageSet,
    index: usize,
    activated_at: Instant,
}

impl PageScheduler {
    /// Start on the first page, active as of now.
    pub fn new(pages: PageSet) -> Self {
        Self {
            pages,
            index: 0,
            activated_at: Instant::now(),
        }
    }

    /// The page currently shown. No side effects.
    pub fn active(&self) -> &OledPage {
        self.pages.get(self.index)
    }

    pub fn active_index(&self) -> usize {
        self.index
    }

    /// Advance to the next page if the active page's duration has elapsed at
    /// `now`. Returns true when a rotation happened.
    pub fn advance_if_due(&mut self, now: Instant) -> bool {
        if self.pages.len() == 1 {
            return false;
        }
        let duration = Duration::from_millis(self.active().duration_ms);
        if now.duration_since(self.activated_at) < duration {
            return false;
        }
        self.index = (self.index + 1) % self.pages.len();
        self.activated_at = now;
        true
    }
}
