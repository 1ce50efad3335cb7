//! Cold, cancellable stream of broadcast events

use std::fmt;
use std::sync::{Arc, Weak};

use crate::bridge::ListenerBridge;
use crate::broadcast::COMPONENT;
use crate::{
    Broadcast, BroadcastEvent, Protocol, Result, TBroadcastContext, TNsdManager,
    TRegistrationListener, error::Error, mapping,
};

/// A push-based stream of [`BroadcastEvent`] values tied to one platform
/// registration.
///
/// The stream is cold: the registration side effect is deferred until the
/// first receive. Each stream yields either exactly one terminal `Err` item,
/// or zero or more `Ok` items followed by completion (`None`). Nothing is
/// yielded after completion.
///
/// Dropping the stream, or calling [`cancel`], requests platform
/// unregistration exactly once; platform errors at that point are logged and
/// swallowed, since the registration may already be gone.
///
/// [`BroadcastEvent`]: enum.BroadcastEvent.html
/// [`cancel`]: #method.cancel
pub struct BroadcastStream {
    state: StreamState,
}

enum StreamState {
    Idle {
        config: Broadcast,
        context: Weak<dyn TBroadcastContext>,
    },
    Active(ActiveSession),
    Done,
}

struct ActiveSession {
    manager: Arc<dyn TNsdManager>,
    listener: Arc<ListenerBridge>,
    rx: flume::Receiver<Result<BroadcastEvent>>,
    cancelled: bool,
}

impl BroadcastStream {
    pub(crate) fn new(config: Broadcast, context: Weak<dyn TBroadcastContext>) -> Self {
        Self {
            state: StreamState::Idle { config, context },
        }
    }

    /// Receives the next item, registering the service with the platform if
    /// this is the first receive. Blocks until an event arrives; returns
    /// `None` once the stream has completed.
    pub fn recv(&mut self) -> Option<Result<BroadcastEvent>> {
        if let Err(e) = self.subscribe() {
            return Some(Err(e));
        }
        let StreamState::Active(session) = &mut self.state else {
            return None;
        };
        match session.rx.recv() {
            Ok(Ok(event)) => Some(Ok(event)),
            Ok(Err(e)) => {
                self.state = StreamState::Done;
                Some(Err(e))
            }
            Err(flume::RecvError::Disconnected) => {
                self.state = StreamState::Done;
                None
            }
        }
    }

    /// Asynchronous version of [`recv`] for async consumers.
    ///
    /// [`recv`]: #method.recv
    pub async fn recv_async(&mut self) -> Option<Result<BroadcastEvent>> {
        if let Err(e) = self.subscribe() {
            return Some(Err(e));
        }
        let StreamState::Active(session) = &mut self.state else {
            return None;
        };
        match session.rx.recv_async().await {
            Ok(Ok(event)) => Some(Ok(event)),
            Ok(Err(e)) => {
                self.state = StreamState::Done;
                Some(Err(e))
            }
            Err(flume::RecvError::Disconnected) => {
                self.state = StreamState::Done;
                None
            }
        }
    }

    /// Requests platform unregistration of this session. Idempotent: only the
    /// first call reaches the platform. The stream remains receivable so the
    /// final `Removed` event can be drained.
    ///
    /// Cancelling a stream that was never received from tears it down without
    /// any platform call, since no registration ever happened.
    pub fn cancel(&mut self) {
        match &mut self.state {
            StreamState::Idle { .. } => self.state = StreamState::Done,
            StreamState::Active(session) => session.cancel(),
            StreamState::Done => {}
        }
    }

    /// Performs the registration side effect if it has not happened yet.
    fn subscribe(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, StreamState::Done) {
            StreamState::Idle { config, context } => {
                let session = ActiveSession::open(&config, context)?;
                self.state = StreamState::Active(session);
                Ok(())
            }
            other => {
                self.state = other;
                Ok(())
            }
        }
    }
}

impl Iterator for BroadcastStream {
    type Item = Result<BroadcastEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl fmt::Debug for BroadcastStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            StreamState::Idle { .. } => "Idle",
            StreamState::Active(_) => "Active",
            StreamState::Done => "Done",
        };
        f.debug_struct("BroadcastStream").field("state", &state).finish()
    }
}

impl ActiveSession {
    fn open(config: &Broadcast, context: Weak<dyn TBroadcastContext>) -> Result<Self> {
        let context = context.upgrade().ok_or(Error::StaleContext)?;
        let manager = context.nsd_manager();
        let capabilities = manager.capabilities();

        let descriptor = config.to_descriptor()?;
        let service_name = descriptor.name().clone();
        let info = mapping::to_service_info(&descriptor, capabilities)?;

        let (tx, rx) = flume::unbounded();
        let listener = Arc::new(ListenerBridge::new(descriptor, capabilities, tx));

        debug!("registering service: {:?}", info);
        manager
            .register_service(info, Protocol::DnsSd, listener.clone())
            .map_err(|e| {
                warn!("register_service for `{}` was rejected: {}", service_name, e);
                Error::BroadcastFailed {
                    component: COMPONENT,
                    service_name,
                    code: None,
                }
            })?;

        Ok(Self {
            manager,
            listener,
            rx,
            cancelled: false,
        })
    }

    fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.listener.begin_teardown();

        let listener: Arc<dyn TRegistrationListener> = self.listener.clone();
        if let Err(e) = self.manager.unregister_service(&listener) {
            // the registration may already be absent, which is not an error
            // from the caller's perspective; no callback will arrive, so the
            // stream completes here
            debug!("unregister_service: {}", e);
            self.listener.close();
        }
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
