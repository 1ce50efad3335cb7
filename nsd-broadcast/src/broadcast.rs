//! Broadcast configuration and entry point

use std::net::IpAddr;
use std::sync::{Arc, Weak};

use crate::prelude::*;
use crate::{
    BroadcastStream, Result, ServiceDescriptor, ServiceType, TBroadcastContext, TxtRecord,
    error::Error, net,
};

/// Component name carried by broadcast failure errors for diagnostics.
pub(crate) const COMPONENT: &str = "Broadcast";

/// Accumulating configuration for a service broadcast.
///
/// Collects the name, addresses, and TXT metadata to advertise, then
/// [`start`] ties the configuration to a caller-supplied context and returns
/// a cold [`BroadcastStream`]. One `Broadcast` can be started any number of
/// times; each start produces an independent session.
///
/// [`start`]: #method.start
/// [`BroadcastStream`]: struct.BroadcastStream.html
#[derive(Clone, Debug, Getters)]
pub struct Broadcast {
    service_type: ServiceType,
    port: u16,
    name: Option<String>,
    addresses: Vec<IpAddr>,
    txt_record: Option<TxtRecord>,
}

impl Broadcast {
    /// Creates a new `Broadcast` for the specified service type and port.
    pub fn new(service_type: ServiceType, port: u16) -> Self {
        Self {
            service_type,
            port,
            name: None,
            addresses: vec![],
            txt_record: None,
        }
    }

    /// Sets the name to advertise this service under. If no name is set, one
    /// is derived from the service type.
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Adds an address to advertise. The first added address is the host;
    /// when none is added, a local address is resolved at subscription time.
    pub fn add_address(&mut self, address: IpAddr) {
        self.addresses.push(address);
    }

    /// Sets the optional `TxtRecord` to advertise this service with.
    pub fn set_txt_record(&mut self, txt_record: TxtRecord) {
        self.txt_record = Some(txt_record);
    }

    /// Returns a cold stream of broadcast events for this configuration.
    ///
    /// No side effect happens here: the service is registered with the
    /// platform on the stream's first receive. Only a weak reference to
    /// `context` is held, so the stream never extends the context's lifetime;
    /// a context dropped before the first receive terminates the stream with
    /// [`Error::StaleContext`].
    ///
    /// [`Error::StaleContext`]: error/enum.Error.html#variant.StaleContext
    pub fn start<C>(&self, context: &Arc<C>) -> BroadcastStream
    where
        C: TBroadcastContext + 'static,
    {
        let context: Arc<dyn TBroadcastContext> = context.clone();
        let context: Weak<dyn TBroadcastContext> = Arc::downgrade(&context);
        BroadcastStream::new(self.clone(), context)
    }

    /// Finalizes the accumulated configuration into a descriptor, resolving
    /// a local address when none was supplied.
    pub(crate) fn to_descriptor(&self) -> Result<ServiceDescriptor> {
        let mut addresses = self.addresses.clone();
        if addresses.is_empty() {
            let address = net::local_address().map_err(|e| {
                warn!("could not resolve a local address: {}", e);
                Error::BroadcastFailed {
                    component: COMPONENT,
                    service_name: self.service_type.to_string(),
                    code: None,
                }
            })?;
            addresses.push(address);
        }

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| self.service_type.name().clone());

        Ok(ServiceDescriptor::builder()
            .name(name)
            .service_type(self.service_type.clone())
            .addresses(addresses)
            .port(self.port)
            .txt_record(self.txt_record.clone().unwrap_or_default())
            .build()
            .expect("could not build ServiceDescriptor"))
    }
}
