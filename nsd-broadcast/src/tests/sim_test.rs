use std::sync::Arc;

use crate::error::Error;
use crate::sim::SimContext;
use crate::{Broadcast, BroadcastEvent, Capabilities, ServiceType, TxtRecord};

fn broadcast(name: &str) -> Broadcast {
    let mut broadcast = Broadcast::new(ServiceType::new("http", "tcp").unwrap(), 8080);
    broadcast.set_name(name);
    broadcast.add_address("192.168.1.2".parse().unwrap());
    broadcast
}

#[test]
fn sim_delivers_added_then_removed_in_order() {
    super::setup();

    let context = Arc::new(SimContext::new(Capabilities::new(true)));
    let mut stream = broadcast("sim_service").start(&context);

    let added = stream.recv().unwrap().unwrap();
    assert!(added.is_added());
    assert_eq!(added.descriptor().name(), "sim_service");

    stream.cancel();

    let removed = stream.recv().unwrap().unwrap();
    assert!(removed.is_removed());
    assert_eq!(removed.descriptor().name(), "sim_service");

    assert!(stream.recv().is_none());
}

#[test]
fn sim_preserves_txt_records_when_supported() {
    super::setup();

    let mut txt_record = TxtRecord::new();
    txt_record.insert("a", "1").unwrap();

    let mut broadcast = broadcast("sim_txt");
    broadcast.set_txt_record(txt_record);

    let context = Arc::new(SimContext::new(Capabilities::new(true)));
    let mut stream = broadcast.start(&context);

    stream.recv().unwrap().unwrap();
    stream.cancel();

    match stream.recv() {
        Some(Ok(BroadcastEvent::Removed(descriptor))) => {
            assert_eq!(descriptor.txt_record().get("a"), Some("1"));
        }
        other => panic!("expected Removed, got {:?}", other),
    }
}

#[test]
fn sim_renames_conflicting_registrations() {
    super::setup();

    let context = Arc::new(SimContext::new(Capabilities::new(true)));
    let config = broadcast("clash");

    let mut first = config.start(&context);
    first.recv().unwrap().unwrap();

    let mut second = config.start(&context);
    second.recv().unwrap().unwrap();

    // the rename surfaces in the reconstructed descriptor on teardown
    second.cancel();
    match second.recv() {
        Some(Ok(BroadcastEvent::Removed(descriptor))) => {
            assert_eq!(descriptor.name(), "clash (2)");
        }
        other => panic!("expected Removed, got {:?}", other),
    }

    first.cancel();
    match first.recv() {
        Some(Ok(BroadcastEvent::Removed(descriptor))) => {
            assert_eq!(descriptor.name(), "clash");
        }
        other => panic!("expected Removed, got {:?}", other),
    }
}

#[test]
fn sim_reports_injected_registration_failure() {
    super::setup();

    let context = Arc::new(SimContext::new(Capabilities::new(true)));
    context.manager().inject_registration_failure(5);

    let mut stream = broadcast("doomed").start(&context);

    match stream.recv() {
        Some(Err(Error::BroadcastFailed {
            service_name, code, ..
        })) => {
            assert_eq!(service_name, "doomed");
            assert_eq!(code, Some(5));
        }
        other => panic!("expected BroadcastFailed, got {:?}", other),
    }
    assert!(stream.recv().is_none());
}

#[tokio::test]
async fn sim_streams_receive_asynchronously() {
    super::setup();

    let context = Arc::new(SimContext::new(Capabilities::new(true)));
    let mut stream = broadcast("sim_async").start(&context);

    let added = stream.recv_async().await.unwrap().unwrap();
    assert!(added.is_added());

    stream.cancel();

    let removed = stream.recv_async().await.unwrap().unwrap();
    assert!(removed.is_removed());

    assert!(stream.recv_async().await.is_none());
}
