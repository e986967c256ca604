use anyhow::Context;
use icmpgen_common::emission::ProbeKind;
use pnet::packet::Packet;
use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use pnet::packet::icmp::{IcmpCode, IcmpPacket, IcmpType, checksum};

/// Writes an ICMP echo message into `buf`, which must span the whole ICMP
/// message (header plus payload). The payload is left as zeros.
///
/// Echo request and echo reply share the same layout, only the type differs,
/// so the request builder is used for both.
pub fn create_echo(buf: &mut [u8], kind: ProbeKind, identifier: u16, sequence: u16) -> anyhow::Result<()> {
    let mut icmp = MutableEchoRequestPacket::new(buf).context("failed to create echo packet")?;

    icmp.set_icmp_type(IcmpType(kind.icmp_type()));
    icmp.set_icmp_code(IcmpCode(0));
    icmp.set_identifier(identifier);
    icmp.set_sequence_number(sequence);

    icmp.set_checksum(0);
    let icmp_imm = icmp.to_immutable();
    let icmp_pkt = IcmpPacket::new(icmp_imm.packet()).context("failed to create ICMP packet")?;
    let csm = checksum(&icmp_pkt);
    icmp.set_checksum(csm);
    Ok(())
}
