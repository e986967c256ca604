use std::net::Ipv4Addr;

use icmpgen_common::emission::SourceMode;
use icmpgen_common::error::TransmissionError;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use super::InterfaceResolver;

/// Picks the source address for each attempt of a run.
#[derive(Debug)]
pub enum SourceSelector {
    /// Resolved on the first successful lookup, then reused for the whole run.
    Local { resolved: Option<Ipv4Addr> },
    Randomized { rng: StdRng },
}

impl SourceSelector {
    pub fn new(mode: SourceMode, rng: StdRng) -> Self {
        match mode {
            SourceMode::Local => SourceSelector::Local { resolved: None },
            SourceMode::Randomized => SourceSelector::Randomized { rng },
        }
    }

    pub fn next_source<R: InterfaceResolver>(
        &mut self,
        resolver: &mut R,
        destination: Ipv4Addr,
    ) -> Result<Ipv4Addr, TransmissionError> {
        match self {
            SourceSelector::Local { resolved: Some(addr) } => Ok(*addr),
            SourceSelector::Local { resolved } => {
                let addr: Ipv4Addr = resolver
                    .resolve(destination)
                    .map_err(|e| TransmissionError::SourceUnavailable(format!("{e:#}")))?;
                debug!("using local source address {addr}");
                *resolved = Some(addr);
                Ok(addr)
            }
            SourceSelector::Randomized { rng } => Ok(random_source(rng)),
        }
    }
}

/// A dotted quad with every octet drawn uniformly from 1..=254, so it is
/// never a network, broadcast or zero address.
pub fn random_source<R: Rng>(rng: &mut R) -> Ipv4Addr {
    Ipv4Addr::new(
        rng.random_range(1..=254),
        rng.random_range(1..=254),
        rng.random_range(1..=254),
        rng.random_range(1..=254),
    )
}
