//! Callback-to-stream bridge for broadcast sessions

use std::sync::Mutex;

use crate::broadcast::COMPONENT;
use crate::{
    BroadcastEvent, Capabilities, NsdServiceInfo, Result, ServiceDescriptor,
    TRegistrationListener, error::Error, mapping,
};

/// Lifecycle of one platform registration. `Unregistered` and `Failed` are
/// terminal; nothing is emitted once either is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    Registering,
    Registered,
    Unregistering,
    Unregistered,
    Failed,
}

/// Bridges platform registration callbacks into the session's event channel.
///
/// The bridge, not the platform, enforces the stream contract: `Added`
/// precedes `Removed`, at most one terminal error is emitted, and the channel
/// closes once a terminal state is reached. The platform serializes callbacks
/// per listener, so the inner lock is uncontended.
pub(crate) struct ListenerBridge {
    descriptor: ServiceDescriptor,
    capabilities: Capabilities,
    inner: Mutex<Inner>,
}

struct Inner {
    state: SessionState,
    announced: bool,
    tx: Option<flume::Sender<Result<BroadcastEvent>>>,
}

impl ListenerBridge {
    pub(crate) fn new(
        descriptor: ServiceDescriptor,
        capabilities: Capabilities,
        tx: flume::Sender<Result<BroadcastEvent>>,
    ) -> Self {
        Self {
            descriptor,
            capabilities,
            inner: Mutex::new(Inner {
                state: SessionState::Registering,
                announced: false,
                tx: Some(tx),
            }),
        }
    }

    /// Marks the session as tearing down so a subsequent unregistration
    /// callback is expected rather than spurious.
    pub(crate) fn begin_teardown(&self) {
        let mut inner = self.inner.lock().unwrap();
        if matches!(
            inner.state,
            SessionState::Registering | SessionState::Registered
        ) {
            inner.state = SessionState::Unregistering;
        }
    }

    /// Closes the channel without emitting anything further, for teardown
    /// paths where no platform callback will arrive.
    pub(crate) fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.state = SessionState::Unregistered;
        inner.tx = None;
    }

    fn send(inner: &mut Inner, item: Result<BroadcastEvent>) {
        if let Some(tx) = &inner.tx {
            if tx.send(item).is_err() {
                debug!("broadcast consumer is gone, dropping event");
            }
        }
    }
}

impl TRegistrationListener for ListenerBridge {
    fn on_service_registered(&self, info: NsdServiceInfo) {
        let mut inner = self.inner.lock().unwrap();
        if !matches!(
            inner.state,
            SessionState::Registering | SessionState::Unregistering
        ) {
            warn!(
                "ignoring registration of `{}` in state {:?}",
                info.name(),
                inner.state
            );
            return;
        }
        if inner.state == SessionState::Registering {
            inner.state = SessionState::Registered;
        }
        inner.announced = true;
        Self::send(
            &mut inner,
            Ok(BroadcastEvent::Added(self.descriptor.clone())),
        );
    }

    fn on_registration_failed(&self, _info: NsdServiceInfo, code: i32) {
        let mut inner = self.inner.lock().unwrap();
        if matches!(
            inner.state,
            SessionState::Failed | SessionState::Unregistered
        ) {
            return;
        }
        inner.state = SessionState::Failed;
        Self::send(
            &mut inner,
            Err(Error::BroadcastFailed {
                component: COMPONENT,
                service_name: self.descriptor.name().clone(),
                code: Some(code),
            }),
        );
        inner.tx = None;
    }

    fn on_service_unregistered(&self, info: NsdServiceInfo) {
        let mut inner = self.inner.lock().unwrap();
        if matches!(
            inner.state,
            SessionState::Failed | SessionState::Unregistered
        ) {
            return;
        }
        inner.state = SessionState::Unregistered;
        if inner.announced {
            match mapping::from_registration_info(&info, self.capabilities) {
                Ok(descriptor) => {
                    Self::send(&mut inner, Ok(BroadcastEvent::Removed(descriptor)));
                }
                Err(e) => warn!("could not rebuild descriptor for `{}`: {}", info.name(), e),
            }
        }
        inner.tx = None;
    }

    fn on_unregistration_failed(&self, info: NsdServiceInfo, code: i32) {
        // teardown failures are not actionable for a consumer that has
        // already unsubscribed; log and close
        warn!("unregistration of `{}` failed (code: {})", info.name(), code);
        let mut inner = self.inner.lock().unwrap();
        inner.state = SessionState::Unregistered;
        inner.tx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::ServiceType;
    use std::net::IpAddr;

    fn descriptor() -> ServiceDescriptor {
        ServiceDescriptor::builder()
            .name("foo".to_string())
            .service_type(ServiceType::new("http", "tcp").unwrap())
            .addresses(vec!["192.168.1.2".parse::<IpAddr>().unwrap()])
            .port(8080)
            .build()
            .unwrap()
    }

    fn info() -> NsdServiceInfo {
        NsdServiceInfo::builder()
            .name("foo".to_string())
            .kind("_http._tcp".to_string())
            .host("192.168.1.2".parse::<IpAddr>().unwrap())
            .port(8080)
            .build()
            .unwrap()
    }

    fn bridge() -> (ListenerBridge, flume::Receiver<Result<BroadcastEvent>>) {
        let (tx, rx) = flume::unbounded();
        (
            ListenerBridge::new(descriptor(), Capabilities::new(true), tx),
            rx,
        )
    }

    #[test]
    fn registered_then_unregistered_emits_added_then_removed() {
        let (bridge, rx) = bridge();

        bridge.on_service_registered(info());
        bridge.begin_teardown();
        bridge.on_service_unregistered(info());

        assert!(rx.recv().unwrap().unwrap().is_added());
        assert!(rx.recv().unwrap().unwrap().is_removed());
        rx.recv().unwrap_err();
    }

    #[test]
    fn failure_is_the_single_terminal_item() {
        let (bridge, rx) = bridge();

        bridge.on_registration_failed(info(), 42);
        bridge.on_service_registered(info());
        bridge.on_service_unregistered(info());
        bridge.on_registration_failed(info(), 43);

        assert_eq!(
            rx.recv().unwrap().unwrap_err(),
            Error::BroadcastFailed {
                component: COMPONENT,
                service_name: "foo".to_string(),
                code: Some(42),
            }
        );
        rx.recv().unwrap_err();
    }

    #[test]
    fn removed_is_suppressed_without_a_preceding_added() {
        let (bridge, rx) = bridge();

        bridge.begin_teardown();
        bridge.on_service_unregistered(info());

        // channel closes without any event
        rx.recv().unwrap_err();
    }

    #[test]
    fn unregistration_failure_closes_without_an_error_item() {
        let (bridge, rx) = bridge();

        bridge.on_service_registered(info());
        bridge.begin_teardown();
        bridge.on_unregistration_failed(info(), 7);

        assert!(rx.recv().unwrap().unwrap().is_added());
        rx.recv().unwrap_err();
    }
}
