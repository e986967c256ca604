use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Owner side of a run's cancellation flag. Cheap to clone, safe to use from
/// any thread, and `stop` may be called any number of times.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
    wake: Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            // The worker may already be gone, that's fine.
            let _ = self.wake.send(());
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Worker side. Read-only: it can observe a stop but never request one.
#[derive(Debug)]
pub(crate) struct StopSignal {
    flag: Arc<AtomicBool>,
    wake: Receiver<()>,
}

impl StopSignal {
    pub(crate) fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleeps for `timeout` unless a stop arrives first.
    ///
    /// Returns `true` if the run was stopped.
    pub(crate) fn wait(&self, timeout: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }

        let deadline: Instant = Instant::now() + timeout;
        match self.wake.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => self.is_stopped(),
            Err(RecvTimeoutError::Disconnected) => {
                // Every handle is gone so nobody can stop us anymore.
                thread::sleep(deadline.saturating_duration_since(Instant::now()));
                self.is_stopped()
            }
        }
    }
}

pub(crate) fn stop_pair() -> (StopHandle, StopSignal) {
    let flag: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<()>();
    (
        StopHandle { flag: flag.clone(), wake: tx },
        StopSignal { flag, wake: rx },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let (handle, signal) = stop_pair();
        assert!(!signal.is_stopped());

        handle.stop();
        handle.stop();
        handle.clone().stop();

        assert!(handle.is_stopped());
        assert!(signal.is_stopped());
    }

    #[test]
    fn wait_times_out_without_stop() {
        let (_handle, signal) = stop_pair();
        let start = Instant::now();
        assert!(!signal.wait(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn wait_returns_early_on_stop() {
        let (handle, signal) = stop_pair();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            handle.stop();
        });

        let start = Instant::now();
        assert!(signal.wait(Duration::from_secs(30)));
        assert!(start.elapsed() < Duration::from_secs(10));
        stopper.join().unwrap();
    }

    #[test]
    fn wait_sleeps_when_all_handles_dropped() {
        let (handle, signal) = stop_pair();
        drop(handle);

        let start = Instant::now();
        assert!(!signal.wait(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
