//! Periodic sampling loop.
//!
//! One background thread per active loop: probe the source, parse, publish to
//! the display sink, then wait out the period. The wait doubles as the
//! cancellation point: `stop` sends on the channel the loop is parked on, so
//! cancellation is observed at the next iteration boundary without ever
//! interrupting an in-flight probe.

use crate::parse::{self, SENTINEL};
use crate::sink::{DisplaySink, Sample};
use crate::source::SampleSource;
use chrono::Utc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::warn;

/// Handle to one running sampling loop.
///
/// The lifecycle controller holds at most one of these; the single field is
/// what enforces "at most one loop".
pub(crate) struct SamplerHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl SamplerHandle {
    pub(crate) fn spawn(
        source: Arc<Mutex<dyn SampleSource>>,
        sink: DisplaySink,
        period: Duration,
    ) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel();
        let thread = thread::spawn(move || loop {
            tick(&source, &sink);
            match stop_rx.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Self {
            stop_tx,
            thread: Some(thread),
        }
    }

    /// Signals the loop and waits for the in-flight iteration to finish.
    pub(crate) fn stop(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn tick(source: &Arc<Mutex<dyn SampleSource>>, sink: &DisplaySink) {
    let raw = source
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .probe();
    let value = match raw {
        Ok(raw) => parse::parse_sample(&raw),
        Err(err) => {
            warn!(error = %err, "Probe failed; publishing sentinel value");
            SENTINEL
        }
    };
    sink.set_value(Sample {
        value,
        captured_at: Utc::now(),
    });
}
