//! Ready-made broadcast context over the simulated manager.

use std::sync::Arc;

use super::SimNsdManager;
use crate::{Capabilities, TBroadcastContext, TNsdManager};

/// A [`TBroadcastContext`] backed by a [`SimNsdManager`].
///
/// [`TBroadcastContext`]: ../trait.TBroadcastContext.html
/// [`SimNsdManager`]: struct.SimNsdManager.html
pub struct SimContext {
    manager: Arc<SimNsdManager>,
}

impl SimContext {
    /// Creates a new `SimContext` with a fresh manager at the specified
    /// capability level.
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            manager: Arc::new(SimNsdManager::new(capabilities)),
        }
    }

    /// The underlying simulated manager.
    pub fn manager(&self) -> &Arc<SimNsdManager> {
        &self.manager
    }
}

impl TBroadcastContext for SimContext {
    fn nsd_manager(&self) -> Arc<dyn TNsdManager> {
        self.manager.clone()
    }
}
