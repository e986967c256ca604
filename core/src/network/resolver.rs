use std::net::Ipv4Addr;

use icmpgen_common::network::interface;

use crate::emitter::InterfaceResolver;

/// Resolves the local source address from the routing table.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutboundInterface;

impl InterfaceResolver for OutboundInterface {
    fn resolve(&mut self, destination: Ipv4Addr) -> anyhow::Result<Ipv4Addr> {
        interface::outbound_ipv4(destination)
    }
}
