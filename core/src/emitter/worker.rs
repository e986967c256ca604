//! The **emission worker**: a bounded, cancellable send loop.
//!
//! A worker owns one [`EmissionRequest`] and runs it exactly once, either
//! lazily through [`EmissionWorker::run`] (an iterator of progress events) or
//! on its own thread through [`EmissionWorker::spawn`]. Transmission failures
//! never end a run early; only a stop request does.

use std::thread::{self, JoinHandle};

use anyhow::{Context, anyhow};
use icmpgen_common::emission::{EmissionRequest, Probe, ProgressEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Span, debug, info_span, trace, warn};

use super::source::SourceSelector;
use super::stop::{self, StopHandle, StopSignal};
use super::{InterfaceResolver, ProbeTransmitter, ProgressSink};

const WORKER_THREAD_NAME: &str = "emission-worker";

#[derive(Debug, Default)]
struct EmissionState {
    attempted: u32,
    succeeded: u32,
    cancelled: bool,
}

pub struct EmissionWorker<T, R> {
    request: EmissionRequest,
    transmitter: T,
    resolver: R,
    rng: Option<StdRng>,
    stop_handle: StopHandle,
    stop_signal: StopSignal,
}

impl<T, R> EmissionWorker<T, R>
where
    T: ProbeTransmitter,
    R: InterfaceResolver,
{
    pub fn new(request: EmissionRequest, transmitter: T, resolver: R) -> Self {
        let (stop_handle, stop_signal) = stop::stop_pair();
        Self {
            request,
            transmitter,
            resolver,
            rng: None,
            stop_handle,
            stop_signal,
        }
    }

    /// Makes randomized source addresses reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// A handle that stops this worker. Obtain it before calling [`run`],
    /// which consumes the worker.
    ///
    /// [`run`]: EmissionWorker::run
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    /// Consumes the worker and returns the lazy sequence of progress events.
    /// Each call to `next` performs at most one attempt.
    pub fn run(self) -> Emission<T, R> {
        let rng: StdRng = self.rng.unwrap_or_else(StdRng::from_os_rng);
        let source = SourceSelector::new(self.request.source_mode(), rng);
        let span: Span = info_span!(
            "emission",
            destination = %self.request.destination(),
            count = self.request.count()
        );

        Emission {
            request: self.request,
            transmitter: self.transmitter,
            resolver: self.resolver,
            source,
            stop: self.stop_signal,
            state: EmissionState::default(),
            finished: false,
            span,
        }
    }
}

impl<T, R> EmissionWorker<T, R>
where
    T: ProbeTransmitter + Send + 'static,
    R: InterfaceResolver + Send + 'static,
{
    /// Runs the worker on a dedicated thread, forwarding every event to `sink`.
    pub fn spawn<S>(self, sink: S) -> anyhow::Result<WorkerHandle>
    where
        S: ProgressSink + Send + 'static,
    {
        let stop: StopHandle = self.stop_handle();
        let thread: JoinHandle<ProgressEvent> = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run().forward_to(&sink))
            .context("failed to spawn emission worker thread")?;

        Ok(WorkerHandle { stop, thread })
    }
}

/// An emission run in progress. Finite and not restartable: once the final
/// event has been yielded the iterator only returns `None`.
pub struct Emission<T, R> {
    request: EmissionRequest,
    transmitter: T,
    resolver: R,
    source: SourceSelector,
    stop: StopSignal,
    state: EmissionState,
    finished: bool,
    span: Span,
}

impl<T, R> Emission<T, R>
where
    T: ProbeTransmitter,
    R: InterfaceResolver,
{
    /// Drains the run into `sink` and returns the final event.
    pub fn forward_to<S: ProgressSink + ?Sized>(mut self, sink: &S) -> ProgressEvent {
        for event in self.by_ref() {
            sink.emit(event);
        }
        self.summary()
    }

    fn attempt(&mut self) {
        let sequence: u16 = sequence_number(self.state.attempted);
        let destination = self.request.destination();

        let sent = self
            .source
            .next_source(&mut self.resolver, destination)
            .and_then(|source| {
                let probe = Probe {
                    source,
                    destination,
                    kind: self.request.probe_kind(),
                    sequence,
                };
                self.transmitter.transmit(&probe)
            });

        match sent {
            Ok(bytes) => {
                trace!("probe {sequence} sent ({bytes} bytes)");
                self.state.succeeded += 1;
            }
            Err(e) => warn!("Failed to send packet: {e}"),
        }
        self.state.attempted += 1;
    }

    fn pause_before_next(&mut self) {
        let interval = self.request.interval();
        let more_to_send: bool = self.state.attempted < self.request.count();

        if self.state.attempted > 0 && more_to_send && !interval.is_zero() && self.stop.wait(interval) {
            debug!("stopped during interval");
        }
    }

    fn progress(&self, is_final: bool) -> ProgressEvent {
        ProgressEvent {
            attempted: self.state.attempted,
            succeeded: self.state.succeeded,
            total: self.request.count(),
            is_final,
        }
    }

    fn summary(&self) -> ProgressEvent {
        self.progress(true)
    }
}

impl<T, R> Iterator for Emission<T, R>
where
    T: ProbeTransmitter,
    R: InterfaceResolver,
{
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<ProgressEvent> {
        if self.finished {
            return None;
        }

        let span = self.span.clone();
        let _guard = span.enter();

        self.pause_before_next();

        if self.stop.is_stopped() {
            self.state.cancelled = true;
        }

        if self.state.cancelled || self.state.attempted >= self.request.count() {
            self.finished = true;
            let summary: ProgressEvent = self.summary();
            debug!(
                cancelled = self.state.cancelled,
                "run finished: {}/{} succeeded",
                summary.succeeded,
                summary.attempted
            );
            return Some(summary);
        }

        self.attempt();
        Some(self.progress(false))
    }
}

/// ICMP sequence numbers are 16 bits; past 65535 attempts they wrap to 0.
fn sequence_number(attempted: u32) -> u16 {
    (attempted % (u32::from(u16::MAX) + 1)) as u16
}

/// Owner side of a spawned worker.
#[derive(Debug)]
pub struct WorkerHandle {
    stop: StopHandle,
    thread: JoinHandle<ProgressEvent>,
}

impl WorkerHandle {
    /// Requests cancellation. Takes effect before the next attempt and cuts
    /// short a pending interval.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the run to end and returns its final event.
    pub fn join(self) -> anyhow::Result<ProgressEvent> {
        self.thread
            .join()
            .map_err(|_| anyhow!("emission worker panicked"))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
