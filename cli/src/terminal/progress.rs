use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use icmpgen_common::emission::ProgressEvent;
use icmpgen_core::emitter::ProgressSink;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str = "{spinner:.blue} [{bar:32.green/black}] {pos}/{len} {msg}";
const TICK_RATE: Duration = Duration::from_millis(100);

static PROGRESS: OnceLock<ProgressBar> = OnceLock::new();

/// The shared bar. Hidden until [`start`] shows it, so log lines written
/// before a run go straight to stderr.
pub fn get_progress() -> &'static ProgressBar {
    PROGRESS.get_or_init(|| ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden()))
}

/// Shows the bar for a run of `total` probes and returns the sink the worker
/// reports to. Quiet level 2 keeps the bar hidden.
pub fn start(total: u32, q_level: u8) -> ProgressDisplay {
    let pb: &ProgressBar = get_progress();
    pb.set_length(u64::from(total));
    pb.set_position(0);

    if q_level < 2 {
        let style: ProgressStyle = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.enable_steady_tick(TICK_RATE);
    }

    ProgressDisplay { pb: pb.clone() }
}

pub fn finish() {
    let pb: &ProgressBar = get_progress();
    pb.finish_and_clear();
    pb.set_draw_target(ProgressDrawTarget::hidden());
}

/// Mirrors worker progress onto the bar.
pub struct ProgressDisplay {
    pb: ProgressBar,
}

impl ProgressSink for ProgressDisplay {
    fn emit(&self, event: ProgressEvent) {
        self.pb.set_position(u64::from(event.attempted));

        let failed: u32 = event.failed();
        let msg: String = if failed > 0 {
            format!("{} {}", event, format!("({failed} failed)").red())
        } else {
            event.to_string()
        };
        self.pb.set_message(msg);
    }
}

/// Log writer that prints above the bar while it is visible.
pub struct ProgressWriter;

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let pb: &ProgressBar = get_progress();
        if pb.is_hidden() {
            return io::stderr().write_all(buf).map(|_| buf.len());
        }

        let msg = String::from_utf8_lossy(buf);
        pb.println(msg.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
