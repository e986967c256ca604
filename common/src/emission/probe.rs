use std::fmt;
use std::net::Ipv4Addr;

/// ICMP echo message flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeKind {
    #[default]
    EchoRequest,
    EchoReply,
}

impl ProbeKind {
    /// The ICMP type number carried on the wire.
    pub fn icmp_type(self) -> u8 {
        match self {
            ProbeKind::EchoRequest => 8,
            ProbeKind::EchoReply => 0,
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeKind::EchoRequest => write!(f, "echo request"),
            ProbeKind::EchoReply => write!(f, "echo reply"),
        }
    }
}

/// A single constructed echo message, ready for a transmitter to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub kind: ProbeKind,
    /// Zero-based attempt index within the run.
    pub sequence: u16,
}
