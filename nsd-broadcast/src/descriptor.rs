//! Logical description of a broadcastable service

use std::net::IpAddr;

use crate::{ServiceType, TxtRecord};

/// Immutable description of a service to broadcast: instance name, DNS-SD
/// type, addresses, port, and TXT metadata.
///
/// The first address is the advertised host. `Added` events carry the
/// descriptor as it was submitted; `Removed` events carry a descriptor
/// rebuilt from whatever fields the platform returned.
#[derive(Builder, BuilderDelegate, Clone, Debug, Getters, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    service_type: ServiceType,
    addresses: Vec<IpAddr>,
    port: u16,
    #[builder(default)]
    txt_record: TxtRecord,
}

impl ServiceDescriptor {
    /// The primary address this service is advertised under.
    pub fn host(&self) -> Option<&IpAddr> {
        self.addresses.first()
    }
}
