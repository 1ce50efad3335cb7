//! Local address resolution for outgoing advertisements

use std::io;
use std::net::{IpAddr, UdpSocket};

/// Resolves the local address a broadcast should advertise when the caller
/// supplied none.
///
/// Opens a UDP socket and asks the OS to route it toward a public address;
/// no packets are sent. Fails when the host has no usable route, in which
/// case the caller must supply an address explicitly.
pub fn local_address() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(("8.8.8.8", 53))?;
    Ok(socket.local_addr()?.ip())
}
