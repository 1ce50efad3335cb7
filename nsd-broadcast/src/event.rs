//! Lifecycle events emitted by a broadcast session

use crate::ServiceDescriptor;

/// A registration lifecycle event for a broadcast service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BroadcastEvent {
    /// The service has been published by the platform. Carries the descriptor
    /// as it was submitted.
    Added(ServiceDescriptor),
    /// The service has been withdrawn. Carries a descriptor rebuilt from the
    /// platform's registration info, which may have fewer TXT attributes
    /// depending on platform capability.
    Removed(ServiceDescriptor),
}

impl BroadcastEvent {
    /// The descriptor this event refers to.
    pub fn descriptor(&self) -> &ServiceDescriptor {
        match self {
            BroadcastEvent::Added(descriptor) | BroadcastEvent::Removed(descriptor) => descriptor,
        }
    }

    /// Returns true for `Added` events.
    pub fn is_added(&self) -> bool {
        matches!(self, BroadcastEvent::Added(_))
    }

    /// Returns true for `Removed` events.
    pub fn is_removed(&self) -> bool {
        matches!(self, BroadcastEvent::Removed(_))
    }
}
