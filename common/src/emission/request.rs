use std::net::Ipv4Addr;
use std::time::Duration;

use crate::emission::probe::ProbeKind;
use crate::error::ValidationError;
use crate::network::target;

/// Longest accepted pause between two probes.
pub const MAX_INTERVAL_SECS: u64 = 3600;

/// Where the probes appear to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// The address of the outbound interface, resolved once per run.
    #[default]
    Local,
    /// A fresh pseudo-random address for every attempt.
    Randomized,
}

/// Everything one emission run needs. Immutable once built; every
/// constructor validates its input so a worker never sees a bad request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionRequest {
    destination: Ipv4Addr,
    count: u32,
    interval: Duration,
    source_mode: SourceMode,
    probe_kind: ProbeKind,
}

impl EmissionRequest {
    /// Validates the destination and count. The destination may be an IPv4
    /// literal or a host name that resolves to one.
    pub fn new(destination: &str, count: u32) -> Result<Self, ValidationError> {
        let destination: Ipv4Addr = target::resolve_destination(destination)?;
        Self::for_addr(destination, count)
    }

    pub fn for_addr(destination: Ipv4Addr, count: u32) -> Result<Self, ValidationError> {
        if count == 0 {
            return Err(ValidationError::ZeroCount);
        }

        Ok(Self {
            destination,
            count,
            interval: Duration::ZERO,
            source_mode: SourceMode::default(),
            probe_kind: ProbeKind::default(),
        })
    }

    pub fn with_interval_secs(mut self, secs: u64) -> Result<Self, ValidationError> {
        if secs > MAX_INTERVAL_SECS {
            return Err(ValidationError::IntervalTooLong {
                max: MAX_INTERVAL_SECS,
                got: secs,
            });
        }
        self.interval = Duration::from_secs(secs);
        Ok(self)
    }

    pub fn with_source_mode(mut self, source_mode: SourceMode) -> Self {
        self.source_mode = source_mode;
        self
    }

    pub fn with_probe_kind(mut self, probe_kind: ProbeKind) -> Self {
        self.probe_kind = probe_kind;
        self
    }

    pub fn destination(&self) -> Ipv4Addr {
        self.destination
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn source_mode(&self) -> SourceMode {
        self.source_mode
    }

    pub fn probe_kind(&self) -> ProbeKind {
        self.probe_kind
    }
}
