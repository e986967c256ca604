//! Wire encoding for the probes the emitter sends.

pub mod icmp;
pub mod ip;

use anyhow::Context;
use icmpgen_common::config::ProbeConfig;
use icmpgen_common::emission::Probe;

pub const IP_V4_HDR_LEN: usize = 20;
pub const ICMP_ECHO_HDR_LEN: usize = 8;

/// Builds a complete IPv4 datagram (header included) carrying the probe's
/// ICMP echo message. The result can go straight onto a layer 3 raw socket.
pub fn create_probe_packet(probe: &Probe, cfg: &ProbeConfig) -> anyhow::Result<Vec<u8>> {
    let icmp_len: usize = ICMP_ECHO_HDR_LEN + cfg.payload_len;
    let total_len: usize = IP_V4_HDR_LEN + icmp_len;
    let total_len_u16: u16 = u16::try_from(total_len).context("probe exceeds IPv4 length")?;

    let mut pkt: Vec<u8> = vec![0u8; total_len];
    ip::create_ipv4_header(&mut pkt, total_len_u16, cfg.ttl, probe.source, probe.destination)?;
    icmp::create_echo(
        &mut pkt[IP_V4_HDR_LEN..],
        probe.kind,
        cfg.identifier,
        probe.sequence,
    )?;
    Ok(pkt)
}
