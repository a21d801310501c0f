//! Reference-counted model residency
//!
//! Each provider call site takes a lease on its model before use and gives it
//! back afterwards. The first lease loads the model on the server, the last
//! release unloads it. Leases are counted per model name, so roles that share
//! a model keep it resident until both are done.
//!
//! Each model also has a gate (an async mutex) that serializes generate calls
//! from concurrent sessions.

use super::client::ModelRuntime;
use super::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Default)]
struct Slot {
    leases: usize,
    /// Held across load and unload of this model
    transition: Arc<Mutex<()>>,
    gate: Arc<Mutex<()>>,
}

/// Lease table for models held by the inference server
///
/// The table lock only guards the counters. Server calls run under the
/// model's own transition lock, so a slow load never blocks other models.
pub struct ModelResidency {
    runtime: Arc<dyn ModelRuntime>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl ModelResidency {
    pub fn new(runtime: Arc<dyn ModelRuntime>) -> Self {
        Self {
            runtime,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Take a lease, loading the model if nobody holds one.
    pub async fn acquire(&self, model: &str) -> Result<()> {
        let transition = self.transition(model).await;
        let _held = transition.lock().await;

        if self.leases(model).await == 0 {
            info!(model, "Loading model");
            self.runtime.load(model).await?;
        }

        let mut slots = self.slots.lock().await;
        let slot = slots.entry(model.to_string()).or_default();
        slot.leases += 1;
        debug!(model, leases = slot.leases, "Model lease acquired");
        Ok(())
    }

    /// Give back a lease, unloading the model when it was the last one.
    ///
    /// Unload failures are logged; the model then stays resident until the
    /// server's own keep-alive expires.
    pub async fn release(&self, model: &str) {
        let transition = self.transition(model).await;
        let _held = transition.lock().await;

        {
            let mut slots = self.slots.lock().await;
            let Some(slot) = slots.get_mut(model).filter(|slot| slot.leases > 0) else {
                warn!(model, "Release without a lease");
                return;
            };
            slot.leases -= 1;
            debug!(model, leases = slot.leases, "Model lease released");
            if slot.leases > 0 {
                return;
            }
        }

        info!(model, "Unloading model");
        if let Err(e) = self.runtime.unload(model).await {
            warn!(model, error = %e, "Failed to unload model");
        }
    }

    async fn transition(&self, model: &str) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().await;
        Arc::clone(&slots.entry(model.to_string()).or_default().transition)
    }

    /// Gate serializing inference calls on `model`
    pub async fn gate(&self, model: &str) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().await;
        Arc::clone(&slots.entry(model.to_string()).or_default().gate)
    }

    /// Number of leases currently held on `model`
    pub async fn leases(&self, model: &str) -> usize {
        self.slots
            .lock()
            .await
            .get(model)
            .map_or(0, |slot| slot.leases)
    }
}
