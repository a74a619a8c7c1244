//! In-memory pin collection.
//!
//! The collection is held behind an `Arc` and replaced copy-on-write, so a
//! snapshot taken by a renderer is never observed half-updated.

use std::sync::Arc;

use shared::domain::{Pin, PinId};
use thiserror::Error;
use tracing::{info, warn};

use crate::pins_api::PinsApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotStarted,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Error)]
#[error("failed to load pins: {0}")]
pub struct LoadError(#[from] pub PinsApiError);

#[derive(Debug, Default)]
pub struct PinStore {
    pins: Arc<Vec<Pin>>,
    load_state: LoadState,
}

impl PinStore {
    pub fn snapshot(&self) -> Arc<Vec<Pin>> {
        Arc::clone(&self.pins)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn get(&self, id: &PinId) -> Option<&Pin> {
        self.pins.iter().find(|pin| &pin.id == id)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Marks the one-time load as started. Returns false if a load was
    /// already attempted.
    pub fn begin_load(&mut self) -> bool {
        if self.load_state != LoadState::NotStarted {
            return false;
        }
        self.load_state = LoadState::Loading;
        true
    }

    /// Applies the outcome of `GET /pins`.
    ///
    /// Pins appended while the load was in flight are kept after the fetched
    /// ones unless the fetch already contains them.
    pub fn finish_load(&mut self, result: Result<Vec<Pin>, PinsApiError>) -> Result<usize, LoadError> {
        match result {
            Ok(mut fetched) => {
                for pin in self.pins.iter() {
                    if !fetched.iter().any(|existing| existing.id == pin.id) {
                        fetched.push(pin.clone());
                    }
                }
                let count = fetched.len();
                self.pins = Arc::new(fetched);
                self.load_state = LoadState::Loaded;
                info!(count, "pins: loaded");
                Ok(count)
            }
            Err(err) => {
                self.load_state = LoadState::Failed;
                warn!("pins: load failed, keeping collection as is: {err}");
                Err(LoadError(err))
            }
        }
    }

    pub fn append(&mut self, pin: Pin) {
        info!(pin_id = %pin.id, "pins: appended");
        Arc::make_mut(&mut self.pins).push(pin);
    }
}
