//! Append-only probe registry

use crate::error::{AppError, Result};
use crate::health::probe::Probe;
use std::sync::Arc;

/// The fixed collection of probes known to the service. Populated during
/// startup, then shared read-only behind an `Arc`; there is no removal.
#[derive(Default)]
pub struct Registry {
    probes: Vec<Arc<dyn Probe>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: Probe + 'static>(&mut self, probe: P) -> Result<()> {
        self.register_arc(Arc::new(probe))
    }

    pub fn register_arc(&mut self, probe: Arc<dyn Probe>) -> Result<()> {
        if self.probes.iter().any(|p| p.name() == probe.name()) {
            return Err(AppError::DuplicateProbe(probe.name().to_string()));
        }
        self.probes.push(probe);
        Ok(())
    }

    /// Registered probes in registration order.
    pub fn list(&self) -> &[Arc<dyn Probe>] {
        &self.probes
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Probe>> {
        self.probes.iter().find(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
