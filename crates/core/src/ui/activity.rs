//! # Activity Indicator
//!
//! The busy signal: a progress bar width and a cursor, driven by request
//! events. Last writer wins when calls overlap.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::api::instrument::{RequestEvent, RequestEventKind, RequestObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    Default,
    Progress,
}

#[derive(Debug)]
pub struct ActivityIndicator {
    percent: AtomicU8,
    busy: AtomicBool,
}

impl Default for ActivityIndicator {
    fn default() -> Self {
        Self {
            percent: AtomicU8::new(0),
            busy: AtomicBool::new(false),
        }
    }
}

impl ActivityIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent.load(Ordering::Relaxed)
    }

    /// Progress bar width, e.g. `"42%"`
    pub fn width(&self) -> String {
        format!("{}%", self.percent())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }

    pub fn cursor(&self) -> Cursor {
        if self.is_busy() {
            Cursor::Progress
        } else {
            Cursor::Default
        }
    }

    fn set_percent(&self, percent: u8) {
        self.percent.store(percent.min(100), Ordering::Relaxed);
    }
}

impl RequestObserver for ActivityIndicator {
    fn on_event(&self, event: &RequestEvent) {
        match &event.kind {
            RequestEventKind::Started { .. } => {
                self.set_percent(0);
                self.busy.store(true, Ordering::Relaxed);
            }
            RequestEventKind::Progress { percent } => self.set_percent(*percent),
            RequestEventKind::Finished { .. } => {
                self.busy.store(false, Ordering::Relaxed);
                self.set_percent(100);
            }
            // Width stays where the failed download left it
            RequestEventKind::Failed { .. } => self.busy.store(false, Ordering::Relaxed),
        }
    }
}
