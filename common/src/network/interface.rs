use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use anyhow::Context;
use pnet::datalink::{self, NetworkInterface};
#[cfg(target_os = "linux")]
use linux_impl::is_wired;
#[cfg(not(target_os = "linux"))]
use fallback_impl::is_wired;
use tracing::debug;

use crate::utils::interface::NetworkInterfaceExtension;

/// Port used when routing the probe socket. Nothing is ever sent to it.
const ROUTE_PROBE_PORT: u16 = 53;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// Loopback addresses never leave the host.
    IsLoopback,
    /// The interface has no usable (non-loopback, non-unspecified) IPv4 address.
    NoIpv4Address,
}

/// Returns the address the kernel would use as source when sending to `target`.
///
/// Asks the routing table first by connecting a UDP socket. When that fails
/// (no route, sandboxed host) the best up, non-loopback interface with an
/// IPv4 address is used instead.
pub fn outbound_ipv4(target: Ipv4Addr) -> anyhow::Result<Ipv4Addr> {
    if let Some(source) = resolve_route_source_ip(target) {
        debug!("kernel routes {target} via {source}");
        return Ok(source);
    }

    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    let interface: NetworkInterface = select_source_interface(interfaces, is_wired)
        .context("no up, non-loopback interface with an IPv4 address")?;

    let source: Ipv4Addr = interface
        .get_ipv4_source()
        .context(format!("interface {} lost its IPv4 address", interface.name))?;

    debug!("falling back to {source} on {}", interface.name);
    Ok(source)
}

fn resolve_route_source_ip(target: Ipv4Addr) -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect((target, ROUTE_PROBE_PORT)).ok()?;

    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(v4) if !v4.is_unspecified() => Some(v4),
        _ => None,
    }
}

fn is_viable_source_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.get_ipv4_source().is_none() {
        return Err(ViabilityError::NoIpv4Address);
    }

    Ok(())
}

fn select_source_interface(
    interfaces: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<NetworkInterface> {
    let mut viable: Vec<NetworkInterface> = interfaces
        .into_iter()
        .filter(|interface| is_viable_source_interface(interface).is_ok())
        .collect();

    match viable.iter().position(|interface| is_wired(interface)) {
        Some(idx) => Some(viable.swap_remove(idx)),
        None => viable.into_iter().next(),
    }
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }

    pub fn is_wired(interface: &NetworkInterface) -> bool {
        is_physical(interface) && !is_wireless(interface)
    }
}

#[cfg(not(target_os = "linux"))]
mod fallback_impl {
    use super::*;

    // Without sysfs the name is the only hint we have.
    pub fn is_wired(interface: &NetworkInterface) -> bool {
        interface.name.starts_with("en") || interface.name.starts_with("eth")
    }
}
