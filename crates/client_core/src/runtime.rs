//! Executes controller effects and feeds their completions back as events.
//!
//! Network effects run on spawned tasks, so an in-flight submission never
//! blocks further events; identity writes are local and awaited in order.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    controller::{Effect, InteractionController, InteractionEvent},
    identity::IdentityStore,
    pins_api::{PinsApi, PinsApiError},
    scene::Scene,
    viewport::Viewport,
};

pub struct Runtime {
    controller: InteractionController,
    pins_api: Arc<dyn PinsApi>,
    identity: Arc<dyn IdentityStore>,
    completions_tx: mpsc::UnboundedSender<InteractionEvent>,
    completions_rx: mpsc::UnboundedReceiver<InteractionEvent>,
    in_flight: usize,
}

impl Runtime {
    /// Seeds the session from the identity store. A store that cannot be read
    /// yields an anonymous session.
    pub async fn start(
        pins_api: Arc<dyn PinsApi>,
        identity: Arc<dyn IdentityStore>,
        viewport: Viewport,
    ) -> Self {
        let persisted = match identity.load().await {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!("runtime: failed to read persisted identity: {err:#}");
                None
            }
        };
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            controller: InteractionController::new(persisted, viewport),
            pins_api,
            identity,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn scene(&self) -> Scene {
        self.controller.scene(Utc::now())
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Requests the initial pin load.
    pub async fn mount(&mut self) -> Result<()> {
        self.dispatch(InteractionEvent::Mounted).await
    }

    pub async fn dispatch(&mut self, event: InteractionEvent) -> Result<()> {
        match self.controller.handle(event) {
            Some(effect) => self.run(effect).await,
            None => Ok(()),
        }
    }

    async fn run(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::LoadPins => {
                debug!("runtime: spawning pin load");
                let api = Arc::clone(&self.pins_api);
                self.spawn(
                    async move { InteractionEvent::PinsLoaded(api.list_pins().await) },
                    |err| InteractionEvent::PinsLoaded(Err(err)),
                );
            }
            Effect::SubmitPin(pending) => {
                debug!(draft_id = pending.draft_id.0, "runtime: spawning pin submission");
                let api = Arc::clone(&self.pins_api);
                let draft_id = pending.draft_id;
                self.spawn(
                    async move {
                        let result = api.create_pin(&pending.request).await;
                        InteractionEvent::SubmitCompleted { draft_id, result }
                    },
                    move |err| InteractionEvent::SubmitCompleted {
                        draft_id,
                        result: Err(err),
                    },
                );
            }
            Effect::PersistIdentity(username) => self.identity.save(&username).await?,
            Effect::ClearIdentity => self.identity.clear().await?,
        }
        Ok(())
    }

    /// Every spawned effect reports exactly one completion. A task that
    /// panics or is cancelled reports `on_abort` instead.
    fn spawn<F, A>(&mut self, task: F, on_abort: A)
    where
        F: std::future::Future<Output = InteractionEvent> + Send + 'static,
        A: FnOnce(PinsApiError) -> InteractionEvent + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        let handle = tokio::spawn(task);
        tokio::spawn(async move {
            let event = match handle.await {
                Ok(event) => event,
                Err(err) => {
                    warn!("runtime: effect task aborted: {err}");
                    on_abort(PinsApiError::Transport(format!("effect task aborted: {err}")))
                }
            };
            let _ = tx.send(event);
        });
    }

    /// Applies the next finished network effect. Returns false when nothing
    /// is in flight.
    pub async fn apply_next_completion(&mut self) -> Result<bool> {
        if self.in_flight == 0 {
            return Ok(false);
        }
        let Some(event) = self.completions_rx.recv().await else {
            return Ok(false);
        };
        self.in_flight -= 1;
        self.dispatch(event).await?;
        Ok(true)
    }

    /// Applies completions until no network effect is in flight.
    pub async fn settle(&mut self) -> Result<()> {
        while self.apply_next_completion().await? {}
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
