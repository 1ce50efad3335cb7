//! `nsd-broadcast` adapts a platform-provided network service discovery (NSD)
//! manager into a cold, cancellable stream of service broadcast events.
//!
//! The platform, injected through the [`TNsdManager`] trait, owns the actual
//! DNS-SD machinery (record construction, probing, announcing, conflict
//! resolution). This crate only manages the registration lifecycle: it builds
//! a [`ServiceDescriptor`] from caller-supplied parameters, asks the platform
//! to publish it, and translates the platform's registration callbacks into
//! [`BroadcastEvent`] values delivered through a [`BroadcastStream`].
//!
//! A [`BroadcastStream`] is *cold*: [`Broadcast::start`] performs no side
//! effects. Registration happens on the first receive, and the stream holds
//! only a weak reference to the caller's context, so a context that has been
//! dropped in the meantime terminates the stream with
//! [`Error::StaleContext`] instead of being kept alive.
//!
//! # Examples
//!
//! ## Broadcast a service
//!
//! ```
//! use nsd_broadcast::sim::SimContext;
//! use nsd_broadcast::{Broadcast, BroadcastEvent, Capabilities, ServiceType};
//! use std::sync::Arc;
//!
//! fn main() -> nsd_broadcast::Result<()> {
//!     let context = Arc::new(SimContext::new(Capabilities::new(true)));
//!
//!     let mut broadcast = Broadcast::new(ServiceType::new("http", "tcp")?, 8080);
//!     broadcast.set_name("my-service");
//!     broadcast.add_address("192.168.1.2".parse().unwrap());
//!
//!     // cold: the service is registered on the first receive, not here
//!     let mut stream = broadcast.start(&context);
//!
//!     match stream.recv() {
//!         Some(Ok(BroadcastEvent::Added(descriptor))) => {
//!             println!("Service published: {:?}", descriptor);
//!         }
//!         other => panic!("unexpected item: {:?}", other),
//!     }
//!
//!     // requests unregistration exactly once; the final `Removed` event can
//!     // still be drained afterwards
//!     stream.cancel();
//!
//!     while let Some(event) = stream.recv() {
//!         println!("Broadcast event: {:?}", event?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! [`TNsdManager`]: trait.TNsdManager.html
//! [`ServiceDescriptor`]: struct.ServiceDescriptor.html
//! [`BroadcastEvent`]: enum.BroadcastEvent.html
//! [`BroadcastStream`]: struct.BroadcastStream.html
//! [`Broadcast::start`]: struct.Broadcast.html#method.start
//! [`Error::StaleContext`]: error/enum.Error.html#variant.StaleContext

#![allow(clippy::needless_doctest_main)]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate nsd_broadcast_macros;
#[macro_use]
extern crate derive_getters;
#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_new;

mod bridge;
mod broadcast;
mod descriptor;
mod event;
mod platform;
mod service_type;
mod stream;
mod txt_record;

pub mod error;
pub mod mapping;
pub mod net;
pub mod prelude;
pub mod sim;

pub use broadcast::Broadcast;
pub use descriptor::*;
pub use error::{Error, Result};
pub use event::*;
pub use platform::*;
pub use service_type::ServiceType;
pub use stream::BroadcastStream;
pub use txt_record::TxtRecord;

#[cfg(test)]
mod tests;
