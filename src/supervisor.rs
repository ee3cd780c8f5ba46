//! Background timeout scan
//!
//! A dedicated thread wakes every sweep interval, ends whatever has stalled
//! and forwards each ending to the transport over a channel.

use crate::engine::Engine;
use crate::game::GameOver;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct TimeoutSupervisor {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TimeoutSupervisor {
    /// Start scanning `engine`. Endings are sent to `notify`; a closed
    /// receiver does not stop the scan.
    pub fn spawn(engine: Arc<Engine>, notify: Sender<GameOver>) -> Self {
        let interval = engine.config().sweep_interval;
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        // Spawn sweep thread
        let handle = thread::spawn(move || {
            sweep_loop(engine, interval, stop_rx, notify);
        });

        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the scan and wait for the thread to exit.
    pub fn stop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("timeout supervisor thread panicked");
            }
        }
    }
}

fn sweep_loop(
    engine: Arc<Engine>,
    interval: Duration,
    stop: Receiver<()>,
    notify: Sender<GameOver>,
) {
    info!(interval_ms = interval.as_millis() as u64, "timeout supervisor started");
    loop {
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        for over in engine.sweep_timeouts() {
            if notify.send(over).is_err() {
                debug!("nobody is listening for timeouts");
            }
        }
    }
    info!("timeout supervisor stopped");
}

impl Drop for TimeoutSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}
