//! Simulated NSD manager implementation.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::prelude::*;
use crate::{Capabilities, NsdServiceInfo, Protocol, Result, error::Error};

enum Deliver {
    Call(Box<dyn FnOnce() + Send>),
    Shutdown,
}

#[derive(new)]
struct Registration {
    listener: Arc<dyn TRegistrationListener>,
    info: NsdServiceInfo,
}

/// An in-memory [`TNsdManager`] with a dedicated delivery thread.
///
/// Listener mutation (register/unregister) is accepted from any thread and
/// applied to the registry synchronously; the resulting callbacks are
/// marshaled onto the delivery thread, which serializes them in submission
/// order.
///
/// [`TNsdManager`]: ../trait.TNsdManager.html
pub struct SimNsdManager {
    capabilities: Capabilities,
    registry: Mutex<Vec<Registration>>,
    fail_next: Mutex<Option<i32>>,
    tx: flume::Sender<Deliver>,
    delivery: Mutex<Option<JoinHandle<()>>>,
}

impl SimNsdManager {
    /// Creates a new `SimNsdManager` with the specified capability level and
    /// spawns its delivery thread.
    pub fn new(capabilities: Capabilities) -> Self {
        let (tx, rx) = flume::unbounded();

        let delivery = thread::spawn(move || {
            while let Ok(Deliver::Call(callback)) = rx.recv() {
                callback();
            }
        });

        Self {
            capabilities,
            registry: Mutex::new(vec![]),
            fail_next: Mutex::new(None),
            tx,
            delivery: Mutex::new(Some(delivery)),
        }
    }

    /// Makes the next `register_service` call report failure with `code`
    /// instead of publishing.
    pub fn inject_registration_failure(&self, code: i32) {
        *self.fail_next.lock().unwrap() = Some(code);
    }

    fn dispatch(&self, callback: impl FnOnce() + Send + 'static) {
        if self.tx.send(Deliver::Call(Box::new(callback))).is_err() {
            warn!("delivery thread is gone, dropping callback");
        }
    }

    /// Resolves a name conflict the way mDNS responders do, by appending a
    /// counter to the requested name.
    fn unique_name(registry: &[Registration], requested: &str, kind: &str) -> String {
        let taken = |candidate: &str| {
            registry
                .iter()
                .any(|r| r.info.name() == candidate && r.info.kind() == kind)
        };

        if !taken(requested) {
            return requested.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{requested} ({n})");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl TNsdManager for SimNsdManager {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn register_service(
        &self,
        info: NsdServiceInfo,
        _protocol: Protocol,
        listener: Arc<dyn TRegistrationListener>,
    ) -> Result<()> {
        if let Some(code) = self.fail_next.lock().unwrap().take() {
            debug!("failing registration of `{}` (code: {})", info.name(), code);
            self.dispatch(move || listener.on_registration_failed(info, code));
            return Ok(());
        }

        let mut registry = self.registry.lock().unwrap();
        let name = Self::unique_name(&registry, info.name(), info.kind());

        let info = if &name != info.name() {
            debug!("renaming `{}` to `{}`", info.name(), name);
            NsdServiceInfo::builder()
                .name(name)
                .kind(info.kind().clone())
                .host(*info.host())
                .port(*info.port())
                .attributes(info.attributes().clone())
                .build()
                .expect("could not build NsdServiceInfo")
        } else {
            info
        };

        registry.push(Registration::new(listener.clone(), info.clone()));
        drop(registry);

        self.dispatch(move || listener.on_service_registered(info));
        Ok(())
    }

    fn unregister_service(&self, listener: &Arc<dyn TRegistrationListener>) -> Result<()> {
        let mut registry = self.registry.lock().unwrap();
        let position = registry
            .iter()
            .position(|r| Arc::ptr_eq(&r.listener, listener));

        let Some(position) = position else {
            return Err(Error::ServiceError("listener is not registered".to_string()));
        };

        let registration = registry.remove(position);
        drop(registry);

        self.dispatch(move || {
            registration
                .listener
                .on_service_unregistered(registration.info);
        });
        Ok(())
    }
}

impl Drop for SimNsdManager {
    fn drop(&mut self) {
        let _ = self.tx.send(Deliver::Shutdown);
        if let Some(delivery) = self.delivery.lock().unwrap().take() {
            let _ = delivery.join();
        }
    }
}
