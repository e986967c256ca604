//! # Destination parsing
//!
//! Turns user input into the IPv4 address probes are sent to. Accepts:
//! * An IPv4 literal (e.g., `10.0.0.5`).
//! * A host name, resolved through the system resolver. The first IPv4
//!   answer wins; IPv6-only names are rejected since probes are IPv4.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};

use tracing::debug;

use crate::error::ValidationError;

pub fn resolve_destination(input: &str) -> Result<Ipv4Addr, ValidationError> {
    let input: &str = input.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyDestination);
    }

    if let Ok(addr) = input.parse::<Ipv4Addr>() {
        return Ok(addr);
    }

    if input.parse::<IpAddr>().is_ok() {
        return Err(ValidationError::UnresolvableDestination(input.to_string()));
    }

    let resolved: Option<Ipv4Addr> = (input, 0)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| {
            addrs.find_map(|addr| match addr {
                SocketAddr::V4(v4) => Some(*v4.ip()),
                SocketAddr::V6(_) => None,
            })
        });

    match resolved {
        Some(addr) => {
            debug!("resolved {input} to {addr}");
            Ok(addr)
        }
        None => Err(ValidationError::UnresolvableDestination(input.to_string())),
    }
}
