use std::sync::{Arc, Mutex, Once};

use crate::prelude::*;
use crate::{Capabilities, NsdServiceInfo, Protocol, Result, error::Error};

static INIT: Once = Once::new();

pub(crate) fn setup() {
    INIT.call_once(env_logger::init);
}

mod sim_test;

/// What a `SpyNsdManager` does with a registration request.
#[derive(Clone, Copy, Debug)]
pub(crate) enum RegisterOutcome {
    /// Fire `on_service_registered` with the submitted info.
    Succeed,
    /// Fire `on_registration_failed` with this code.
    Fail(i32),
}

/// What a `SpyNsdManager` does with an unregistration request.
#[derive(Clone, Copy, Debug)]
pub(crate) enum UnregisterOutcome {
    /// Fire `on_service_unregistered` with the registered info.
    Succeed,
    /// Fire `on_unregistration_failed` with this code.
    Fail(i32),
    /// Reject the call itself, as a platform does when the listener is
    /// already absent.
    Refuse,
}

/// Scripted stand-in for the platform manager. Fires callbacks inline, which
/// is legal for a platform (callers may not assume asynchrony) and keeps the
/// tests deterministic.
pub(crate) struct SpyNsdManager {
    capabilities: Capabilities,
    register_outcome: RegisterOutcome,
    unregister_outcome: UnregisterOutcome,
    sessions: Mutex<Vec<(Arc<dyn TRegistrationListener>, NsdServiceInfo)>>,
    register_calls: Mutex<usize>,
    unregister_calls: Mutex<usize>,
}

impl SpyNsdManager {
    pub(crate) fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            register_outcome: RegisterOutcome::Succeed,
            unregister_outcome: UnregisterOutcome::Succeed,
            sessions: Mutex::new(vec![]),
            register_calls: Mutex::new(0),
            unregister_calls: Mutex::new(0),
        }
    }

    pub(crate) fn with_register_outcome(mut self, outcome: RegisterOutcome) -> Self {
        self.register_outcome = outcome;
        self
    }

    pub(crate) fn with_unregister_outcome(mut self, outcome: UnregisterOutcome) -> Self {
        self.unregister_outcome = outcome;
        self
    }

    pub(crate) fn register_calls(&self) -> usize {
        *self.register_calls.lock().unwrap()
    }

    pub(crate) fn unregister_calls(&self) -> usize {
        *self.unregister_calls.lock().unwrap()
    }

    pub(crate) fn last_info(&self) -> Option<NsdServiceInfo> {
        self.sessions
            .lock()
            .unwrap()
            .last()
            .map(|(_, info)| info.clone())
    }
}

impl TNsdManager for SpyNsdManager {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn register_service(
        &self,
        info: NsdServiceInfo,
        _protocol: Protocol,
        listener: Arc<dyn TRegistrationListener>,
    ) -> Result<()> {
        *self.register_calls.lock().unwrap() += 1;
        self.sessions
            .lock()
            .unwrap()
            .push((listener.clone(), info.clone()));

        match self.register_outcome {
            RegisterOutcome::Succeed => listener.on_service_registered(info),
            RegisterOutcome::Fail(code) => listener.on_registration_failed(info, code),
        }
        Ok(())
    }

    fn unregister_service(&self, listener: &Arc<dyn TRegistrationListener>) -> Result<()> {
        *self.unregister_calls.lock().unwrap() += 1;

        if let UnregisterOutcome::Refuse = self.unregister_outcome {
            return Err(Error::ServiceError("listener is not registered".to_string()));
        }

        let info = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|(l, _)| Arc::ptr_eq(l, listener))
            .map(|(_, info)| info.clone());
        let Some(info) = info else {
            return Err(Error::ServiceError("listener is not registered".to_string()));
        };

        match self.unregister_outcome {
            UnregisterOutcome::Succeed => listener.on_service_unregistered(info),
            UnregisterOutcome::Fail(code) => listener.on_unregistration_failed(info, code),
            UnregisterOutcome::Refuse => unreachable!(),
        }
        Ok(())
    }
}

/// Minimal context over a spy manager.
pub(crate) struct SpyContext {
    manager: Arc<SpyNsdManager>,
}

impl SpyContext {
    pub(crate) fn new(manager: Arc<SpyNsdManager>) -> Arc<Self> {
        Arc::new(Self { manager })
    }
}

impl TBroadcastContext for SpyContext {
    fn nsd_manager(&self) -> Arc<dyn TNsdManager> {
        self.manager.clone()
    }
}
