use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use colored::*;
use tracing::warn;

use icmpgen_common::config::{Config, DEFAULT_TTL, ProbeConfig};
use icmpgen_common::emission::{EmissionRequest, ProbeKind, ProgressEvent, SourceMode};
use icmpgen_common::error::ValidationError;
use icmpgen_core::emitter::{EmissionWorker, WorkerHandle};
use icmpgen_core::network::{resolver::OutboundInterface, transport::RawTransmitter};

use crate::terminal::{colors, format, input::InputHandle, print, progress};

#[derive(Args, Debug)]
pub struct SendArgs {
    /// IPv4 address or host name to send probes to
    pub destination: String,

    /// Number of probes to send
    #[arg(short, long, default_value_t = 1)]
    pub count: u32,

    /// Seconds to wait between probes (0-3600)
    #[arg(short, long, default_value_t = 0)]
    pub interval: u64,

    /// Use a random source address for every probe instead of the local one
    #[arg(short, long)]
    pub random_source: bool,

    /// Send echo replies instead of echo requests
    #[arg(long)]
    pub reply: bool,

    /// IPv4 time to live
    #[arg(long, default_value_t = DEFAULT_TTL)]
    pub ttl: u8,

    /// ICMP payload length in bytes
    #[arg(long, default_value_t = 0)]
    pub payload: usize,

    /// Seed for randomized source addresses
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fixed ICMP identifier for every probe (random per run by default)
    #[arg(long)]
    pub identifier: Option<u16>,
}

impl SendArgs {
    pub fn to_request(&self) -> Result<EmissionRequest, ValidationError> {
        let source_mode: SourceMode = if self.random_source {
            SourceMode::Randomized
        } else {
            SourceMode::Local
        };
        let probe_kind: ProbeKind = if self.reply {
            ProbeKind::EchoReply
        } else {
            ProbeKind::EchoRequest
        };

        Ok(EmissionRequest::new(&self.destination, self.count)?
            .with_interval_secs(self.interval)?
            .with_source_mode(source_mode)
            .with_probe_kind(probe_kind))
    }

    pub fn to_probe_config(&self) -> Result<ProbeConfig, ValidationError> {
        let mut probe_cfg: ProbeConfig = ProbeConfig::default()
            .with_ttl(self.ttl)
            .with_payload_len(self.payload)?;
        if let Some(identifier) = self.identifier {
            probe_cfg = probe_cfg.with_identifier(identifier);
        }
        Ok(probe_cfg)
    }
}

/// Validates the flags on a blocking thread, since host names go through the
/// system resolver.
async fn resolve_request(args: SendArgs) -> anyhow::Result<(SendArgs, EmissionRequest)> {
    let (args, request) = tokio::task::spawn_blocking(move || {
        let request = args.to_request();
        (args, request)
    })
    .await
    .context("destination lookup task failed")?;

    Ok((args, request.context("invalid input")?))
}

pub async fn send(args: SendArgs, cfg: &Config) -> anyhow::Result<()> {
    let (args, request) = resolve_request(args).await?;
    let probe_cfg: ProbeConfig = args.to_probe_config().context("invalid input")?;

    print_request(&request, cfg);

    if !is_root::is_root() {
        warn!("Raw sockets usually require root privileges (or CAP_NET_RAW)");
    }
    let transmitter: RawTransmitter = RawTransmitter::open(probe_cfg)?;

    let mut worker = EmissionWorker::new(request.clone(), transmitter, OutboundInterface);
    if let Some(seed) = args.seed {
        worker = worker.with_seed(seed);
    }

    print::header("sending probes", cfg.quiet);
    let start_time: Instant = Instant::now();
    let display = progress::start(request.count(), cfg.quiet);
    let handle: WorkerHandle = worker.spawn(display)?;

    let input: Option<InputHandle> =
        (!cfg.disable_input).then(|| InputHandle::start(handle.stop_handle()));

    let summary: ProgressEvent = wait_for_worker(handle).await?;

    drop(input);
    progress::finish();
    print_summary(&summary, start_time.elapsed(), cfg);
    Ok(())
}

/// Joins the worker without blocking the runtime; Ctrl-C stops the run.
async fn wait_for_worker(handle: WorkerHandle) -> anyhow::Result<ProgressEvent> {
    let stopper = handle.stop_handle();
    let mut join = tokio::task::spawn_blocking(move || handle.join());
    let mut listen_for_signal: bool = true;

    loop {
        tokio::select! {
            res = &mut join => {
                return res.context("emission worker task failed")?;
            }
            signal = tokio::signal::ctrl_c(), if listen_for_signal => {
                match signal {
                    Ok(()) => {
                        warn!("Interrupted; stopping...");
                        stopper.stop();
                    }
                    Err(e) => {
                        warn!("Ctrl-C handler unavailable: {e}");
                        listen_for_signal = false;
                    }
                }
            }
        }
    }
}

fn print_request(request: &EmissionRequest, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    print::aligned_line("Destination", format::ipv4(request.destination()));
    print::aligned_line("Probe", request.probe_kind().to_string());
    print::aligned_line("Count", request.count().to_string());
    print::aligned_line("Interval", format::interval(request.interval()));
    print::aligned_line("Source", format::source_mode(request.source_mode()));
}

fn print_summary(summary: &ProgressEvent, total_time: Duration, cfg: &Config) {
    let sent: ColoredString = format!("{} of {}", summary.succeeded, summary.attempted).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Completed: {sent} probes sent in {total_time}").color(colors::TEXT_DEFAULT);

    if summary.was_cancelled() {
        warn!("Stopped after {} of {} probes", summary.attempted, summary.total);
    }

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => print::print(&summary.to_string()),
    }
}
