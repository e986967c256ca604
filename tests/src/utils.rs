use std::collections::HashSet;
use std::io;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use icmpgen_common::emission::{Probe, ProgressEvent};
use icmpgen_common::error::TransmissionError;
use icmpgen_core::emitter::{ProbeTransmitter, ProgressSink};

/// Transmitter that fails on the listed (1-based) attempts and records every
/// probe it was handed.
#[derive(Clone, Default)]
pub struct ScriptedTransmitter {
    failing_attempts: HashSet<usize>,
    sent: Arc<Mutex<Vec<Probe>>>,
}

impl ScriptedTransmitter {
    pub fn failing_on(attempts: &[usize]) -> Self {
        Self {
            failing_attempts: attempts.iter().copied().collect(),
            sent: Arc::default(),
        }
    }

    pub fn probes(&self) -> Vec<Probe> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl ProbeTransmitter for ScriptedTransmitter {
    fn transmit(&mut self, probe: &Probe) -> Result<usize, TransmissionError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| TransmissionError::Io(io::Error::other("poisoned")))?;
        sent.push(*probe);

        if self.failing_attempts.contains(&sent.len()) {
            return Err(TransmissionError::Io(io::Error::other("scripted failure")));
        }
        Ok(28)
    }
}

/// Sink that keeps every event for later inspection.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

pub const LOCAL_ADDR: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 32);

pub fn fixed_local(_: Ipv4Addr) -> anyhow::Result<Ipv4Addr> {
    Ok(LOCAL_ADDR)
}

pub fn counts(events: &[ProgressEvent]) -> Vec<(u32, u32)> {
    events.iter().map(|e| (e.attempted, e.succeeded)).collect()
}
