use std::net::IpAddr;

use anyhow::Context;
use icmpgen_common::config::ProbeConfig;
use icmpgen_common::emission::Probe;
use icmpgen_common::error::TransmissionError;
use icmpgen_protocols as protocol;
use pnet::{
    packet::{ip::IpNextHeaderProtocols, ipv4::Ipv4Packet},
    transport::{self, TransportChannelType, TransportSender},
};
use tracing::debug;

use crate::emitter::ProbeTransmitter;

const TRANSPORT_BUFFER_SIZE: usize = 4096;
/// Layer 3 so we write the IPv4 header ourselves (IP_HDRINCL), which is what
/// lets a probe carry an arbitrary source address.
const CHANNEL_TYPE_ICMP: TransportChannelType =
    TransportChannelType::Layer3(IpNextHeaderProtocols::Icmp);

/// Sends probes through a raw IPv4 socket. Needs root or CAP_NET_RAW.
pub struct RawTransmitter {
    tx: TransportSender,
    cfg: ProbeConfig,
}

impl RawTransmitter {
    pub fn open(cfg: ProbeConfig) -> anyhow::Result<Self> {
        // Nothing is read back, the receiving half is dropped right away.
        let (tx, _rx) = transport::transport_channel(TRANSPORT_BUFFER_SIZE, CHANNEL_TYPE_ICMP)
            .context("failed to open raw ICMP socket")?;
        debug!(ttl = cfg.ttl, payload_len = cfg.payload_len, "raw ICMP socket open");
        Ok(Self { tx, cfg })
    }
}

impl ProbeTransmitter for RawTransmitter {
    fn transmit(&mut self, probe: &Probe) -> Result<usize, TransmissionError> {
        let bytes: Vec<u8> = protocol::create_probe_packet(probe, &self.cfg)
            .map_err(|e| TransmissionError::Encode(format!("{e:#}")))?;
        let packet: Ipv4Packet = Ipv4Packet::new(&bytes)
            .ok_or_else(|| TransmissionError::Encode("truncated IPv4 packet".to_string()))?;

        let sent: usize = self.tx.send_to(packet, IpAddr::V4(probe.destination))?;
        Ok(sent)
    }
}
