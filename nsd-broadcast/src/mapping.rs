//! Translation between logical descriptors and platform service info

use std::str::FromStr;

use crate::prelude::*;
use crate::{
    Capabilities, NsdServiceInfo, Result, ServiceDescriptor, ServiceType, TxtRecord, error::Error,
};

/// Translates a descriptor into the platform's native representation.
///
/// TXT records are attached only when the platform capability check passes.
/// Errors if the descriptor carries no address to advertise.
pub fn to_service_info(
    descriptor: &ServiceDescriptor,
    capabilities: Capabilities,
) -> Result<NsdServiceInfo> {
    let host = *descriptor.host().ok_or_else(|| {
        Error::ServiceError(format!("descriptor for `{}` has no address", descriptor.name()))
    })?;

    let mut info = NsdServiceInfo::builder();
    info.name(descriptor.name().clone())
        .kind(descriptor.service_type().to_string())
        .host(host)
        .port(*descriptor.port());

    if *capabilities.txt_records() {
        info.attributes(
            descriptor
                .txt_record()
                .iter()
                .map(|(key, value)| (key.to_string(), value.as_bytes().to_vec()))
                .collect(),
        );
    }

    Ok(info.build().expect("could not build NsdServiceInfo"))
}

/// Rebuilds a descriptor from raw platform registration info.
///
/// Attribute values are decoded from raw bytes to UTF-8 strings, one per key,
/// only when the platform capability check passes; otherwise the descriptor
/// carries an empty TXT map.
pub fn from_registration_info(
    info: &NsdServiceInfo,
    capabilities: Capabilities,
) -> Result<ServiceDescriptor> {
    let service_type = ServiceType::from_str(info.kind())?;

    let mut txt_record = TxtRecord::new();
    if *capabilities.txt_records() {
        for (key, value) in info.attributes() {
            txt_record.insert(key, &String::from_utf8_lossy(value))?;
        }
    }

    Ok(ServiceDescriptor::builder()
        .name(info.name().clone())
        .service_type(service_type)
        .addresses(vec![*info.host()])
        .port(*info.port())
        .txt_record(txt_record)
        .build()
        .expect("could not build ServiceDescriptor"))
}
