use std::net::Ipv4Addr;

use anyhow::Context;
use pnet::packet::Packet;
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::{Ipv4Packet, MutableIpv4Packet, checksum};

use crate::IP_V4_HDR_LEN;

/// Don't fragment (010).
const FLAG_DF: u8 = 2;

pub fn create_ipv4_header(
    buf: &mut [u8],
    total_length: u16,
    ttl: u8,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> anyhow::Result<()> {
    let mut ipv4 = MutableIpv4Packet::new(&mut buf[..IP_V4_HDR_LEN]).context("creating ipv4 packet")?;
    ipv4.set_version(4);
    ipv4.set_header_length(5); // 5 x 32 bits, no options
    ipv4.set_dscp(0);
    ipv4.set_ecn(0);
    ipv4.set_total_length(total_length);
    ipv4.set_identification(rand::random());
    ipv4.set_flags(FLAG_DF);
    ipv4.set_fragment_offset(0);
    ipv4.set_ttl(ttl);
    ipv4.set_next_level_protocol(IpNextHeaderProtocols::Icmp);
    ipv4.set_source(src_addr);
    ipv4.set_destination(dst_addr);

    ipv4.set_checksum(0);
    let ipv4_imm = ipv4.to_immutable();
    let ipv4_pkt = Ipv4Packet::new(ipv4_imm.packet()).context("transforming ipv4 to packet")?;
    let csm = checksum(&ipv4_pkt);
    ipv4.set_checksum(csm);
    Ok(())
}
