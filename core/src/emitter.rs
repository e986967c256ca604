//! The central **abstraction** for probe emission.
//!
//! This module defines the collaborators the emission worker talks to: an
//! [`InterfaceResolver`] for the local source address, a [`ProbeTransmitter`]
//! that puts probes on the wire, and a [`ProgressSink`] that receives
//! progress events. The worker itself lives in [`worker`].
//!
//! **Architectural Note:**
//! The worker only depends on these traits. The raw socket transmitter and the
//! routing-table resolver in [`crate::network`] are one implementation; tests
//! and other front ends plug in their own.

use std::net::Ipv4Addr;

use icmpgen_common::emission::{Probe, ProgressEvent};
use icmpgen_common::error::TransmissionError;

mod source;
mod stop;
mod worker;

pub use source::{SourceSelector, random_source};
pub use stop::StopHandle;
pub use worker::{Emission, EmissionWorker, WorkerHandle};

/// Provides the host's outbound address for [`SourceMode::Local`] runs.
///
/// [`SourceMode::Local`]: icmpgen_common::emission::SourceMode::Local
pub trait InterfaceResolver {
    /// Returns the address of the interface used to reach `destination`.
    fn resolve(&mut self, destination: Ipv4Addr) -> anyhow::Result<Ipv4Addr>;
}

impl<F> InterfaceResolver for F
where
    F: FnMut(Ipv4Addr) -> anyhow::Result<Ipv4Addr>,
{
    fn resolve(&mut self, destination: Ipv4Addr) -> anyhow::Result<Ipv4Addr> {
        self(destination)
    }
}

/// Delivers a single probe. The on-wire encoding is the transmitter's business.
pub trait ProbeTransmitter {
    /// Returns the number of bytes handed to the network.
    fn transmit(&mut self, probe: &Probe) -> Result<usize, TransmissionError>;
}

impl<F> ProbeTransmitter for F
where
    F: FnMut(&Probe) -> Result<usize, TransmissionError>,
{
    fn transmit(&mut self, probe: &Probe) -> Result<usize, TransmissionError> {
        self(probe)
    }
}

/// Receives progress events. Fire-and-forget: a sink must not block the worker
/// for long and cannot push back.
pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent),
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}
