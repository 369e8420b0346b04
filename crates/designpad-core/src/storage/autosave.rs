//! Periodic local auto-save.
//!
//! Writes the whole design to a local backend under a fixed key on every
//! tick, changed or not. The remote store is never involved.

use super::{DesignBackend, PersistenceError, PersistenceResult};
use crate::design::Design;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key the auto-saved design is stored under.
pub const AUTOSAVE_KEY: &str = "__autosave__";

/// Ticks a design into local storage on a fixed interval.
pub struct AutoSaveManager<S: DesignBackend> {
    storage: Arc<S>,
    interval: Duration,
    last_tick: Instant,
}

impl<S: DesignBackend> AutoSaveManager<S> {
    /// Create a manager with the default 30 s interval. The first tick is due
    /// one interval from now.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_tick: Instant::now(),
        }
    }

    pub fn with_interval(storage: Arc<S>, interval: Duration) -> Self {
        let mut manager = Self::new(storage);
        manager.set_interval(interval);
        manager
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Check if the interval has elapsed since the last tick.
    pub fn should_tick(&self) -> bool {
        self.last_tick.elapsed() >= self.interval
    }

    /// Write the design now, regardless of the timer.
    pub async fn tick(&mut self, design: &Design) -> PersistenceResult<()> {
        let payload = design
            .to_json()
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        // The timer restarts even when the write fails.
        self.last_tick = Instant::now();
        self.storage.save_design(AUTOSAVE_KEY, &payload).await?;
        log::debug!("Auto-saved design ({} bytes)", payload.len());
        Ok(())
    }

    /// Tick if the interval has elapsed. Returns true if a write happened.
    pub async fn maybe_tick(&mut self, design: &Design) -> PersistenceResult<bool> {
        if !self.should_tick() {
            return Ok(false);
        }
        self.tick(design).await?;
        Ok(true)
    }

    /// Read back the auto-saved design, if there is one.
    pub async fn restore(&self) -> PersistenceResult<Option<Design>> {
        let Some(payload) = self.storage.load_design(AUTOSAVE_KEY).await? else {
            return Ok(None);
        };
        let design = Design::from_json(&payload)
            .map_err(|e| PersistenceError::Serialization(format!("Corrupt auto-save: {}", e)))?;
        log::info!("Restored auto-saved design");
        Ok(Some(design))
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Auto-save manager backed by the local file store.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformAutoSaveManager = AutoSaveManager<super::FileBackend>;

/// Create an auto-save manager writing to `<data_local_dir>/designpad/autosave`.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_autosave_manager(interval_secs: u64) -> PersistenceResult<PlatformAutoSaveManager> {
    let storage = super::FileBackend::new(super::file::data_dir()?.join("autosave"))?;
    Ok(AutoSaveManager::with_interval(Arc::new(storage), Duration::from_secs(interval_secs)))
}
