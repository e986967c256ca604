use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use icmpgen_core::emitter::StopHandle;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Listens for 'q' or Ctrl-C while a run is active and stops it.
///
/// Raw mode is left again when the handle is dropped.
pub struct InputHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl InputHandle {
    pub fn start(stop: StopHandle) -> Self {
        let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
        let running_ref = running.clone();

        let thread = thread::spawn(move || {
            if let Err(e) = enable_raw_mode() {
                warn!("keyboard input disabled: {e}");
                return;
            }

            while running_ref.load(Ordering::Relaxed) && !stop.is_stopped() {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {
                        if let Ok(Event::Key(key_event)) = event::read() {
                            if is_stop_key(&key_event) {
                                debug!("stop requested from keyboard");
                                stop.stop();
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
            let _ = disable_raw_mode();
        });

        Self {
            running,
            thread: Some(thread),
        }
    }
}

fn is_stop_key(key_event: &KeyEvent) -> bool {
    let is_q = key_event.code == KeyCode::Char('q');
    let is_ctrl_c = key_event.code == KeyCode::Char('c')
        && key_event.modifiers.contains(KeyModifiers::CONTROL);

    (is_q || is_ctrl_c) && key_event.kind == KeyEventKind::Press
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        let _ = disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn q_and_ctrl_c_stop() {
        assert!(is_stop_key(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_stop_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn other_keys_do_not_stop() {
        assert!(!is_stop_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_stop_key(&key(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
