//! Trait definitions for the platform discovery manager

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use crate::Result;

/// Capability level of the platform NSD implementation.
///
/// When `txt_records` is false, TXT data is silently omitted from the
/// outgoing advertisement and from `Removed`-event reconstruction.
#[derive(Clone, Copy, Debug, Default, Getters, PartialEq, Eq, new)]
pub struct Capabilities {
    /// Whether the platform supports keyed TXT attributes on registrations.
    txt_records: bool,
}

/// Protocol identifier passed to [`TNsdManager::register_service`].
///
/// [`TNsdManager::register_service`]: trait.TNsdManager.html#tymethod.register_service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    /// DNS-based service discovery.
    DnsSd,
}

/// Platform-native service representation handed to the discovery manager.
///
/// TXT attributes are raw bytes here; decoding back to strings happens during
/// `Removed`-event reconstruction.
#[derive(Builder, BuilderDelegate, Clone, Debug, Getters, PartialEq, Eq)]
pub struct NsdServiceInfo {
    name: String,
    kind: String,
    host: IpAddr,
    port: u16,
    #[builder(default)]
    attributes: HashMap<String, Vec<u8>>,
}

/// Callback set a platform uses to report asynchronous registration and
/// unregistration outcomes.
///
/// Callbacks may fire from the platform's own delivery thread, never
/// synchronously with the call that triggered them from the caller's point of
/// view. The platform serializes callbacks per listener.
pub trait TRegistrationListener: Send + Sync {
    /// The service has been published. `info` is the registration as the
    /// platform sees it, including any conflict-resolving rename.
    fn on_service_registered(&self, info: NsdServiceInfo);

    /// Registration failed with a platform error code. No unregistration
    /// callback follows a failed registration.
    fn on_registration_failed(&self, info: NsdServiceInfo, code: i32);

    /// The service has been withdrawn after an unregistration request.
    fn on_service_unregistered(&self, info: NsdServiceInfo);

    /// Unregistration failed with a platform error code.
    fn on_unregistration_failed(&self, info: NsdServiceInfo, code: i32);
}

/// Interface for interacting with the underlying NSD registration
/// capabilities.
pub trait TNsdManager: Send + Sync {
    /// The capability level of this platform.
    fn capabilities(&self) -> Capabilities;

    /// Asks the platform to publish `info`, reporting the outcome through
    /// `listener`. `Ok` means the request was accepted; success or failure of
    /// the registration itself arrives through the listener.
    fn register_service(
        &self,
        info: NsdServiceInfo,
        protocol: Protocol,
        listener: Arc<dyn TRegistrationListener>,
    ) -> Result<()>;

    /// Withdraws the registration associated with `listener`.
    ///
    /// Callable from any thread; implementations marshal listener mutation
    /// onto their own delivery context. Errors if the listener is not
    /// currently registered.
    fn unregister_service(&self, listener: &Arc<dyn TRegistrationListener>) -> Result<()>;
}

/// Execution-environment handle supplied by the caller, used only to obtain
/// the discovery manager.
///
/// Broadcast sessions hold a `Weak` reference to the context and never extend
/// its lifetime.
pub trait TBroadcastContext: Send + Sync {
    /// The platform discovery manager for this environment.
    fn nsd_manager(&self) -> Arc<dyn TNsdManager>;
}
