//! Display sink: marshals overlay mutations onto a single UI thread.
//!
//! The surface host is single-threaded by contract, so every mutation is
//! expressed as a command and consumed in order by one dedicated dispatcher
//! thread, the only thread that ever calls into the [`SurfaceHost`]. The
//! dispatcher also tracks whether the overlay is mounted, which makes mount
//! and unmount idempotent and lets it drop text/position updates that arrive
//! while nothing is on screen.

use crate::parse::SampleValue;
use crate::surface::{OverlayDescriptor, SurfaceHost};
use chrono::{DateTime, Utc};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// One published observation of the counter.
#[derive(Debug, Clone)]
pub struct Sample {
    pub value: SampleValue,
    pub captured_at: DateTime<Utc>,
}

enum SinkCommand {
    Mount(OverlayDescriptor),
    Update(OverlayDescriptor),
    Unmount,
    SetValue(Sample),
    Shutdown,
}

/// Cheap-to-clone handle for publishing overlay mutations.
///
/// Commands are applied in send order. Senders never block; if the dispatcher
/// is gone the command is dropped with a warning.
#[derive(Clone)]
pub(crate) struct DisplaySink {
    tx: Sender<SinkCommand>,
    template: Arc<str>,
}

/// Owns the UI dispatcher thread. Joined at component shutdown.
pub(crate) struct UiDispatcher {
    thread: Option<JoinHandle<()>>,
}

impl DisplaySink {
    pub(crate) fn spawn(
        host: Arc<dyn SurfaceHost>,
        template: &str,
    ) -> (DisplaySink, UiDispatcher) {
        let (tx, rx) = mpsc::channel();
        let sink = DisplaySink {
            tx,
            template: Arc::from(template),
        };
        let dispatcher_template = Arc::clone(&sink.template);
        let thread = thread::spawn(move || {
            let mut mounted = false;
            while let Ok(command) = rx.recv() {
                match command {
                    SinkCommand::Mount(descriptor) => {
                        if mounted {
                            debug!("Overlay already mounted");
                        } else {
                            host.mount(&descriptor);
                            mounted = true;
                        }
                    }
                    SinkCommand::Update(descriptor) => {
                        if mounted {
                            host.update(&descriptor);
                        } else {
                            debug!("Dropping reposition; overlay not mounted");
                        }
                    }
                    SinkCommand::Unmount => {
                        if mounted {
                            host.unmount();
                            mounted = false;
                        } else {
                            debug!("Overlay already unmounted");
                        }
                    }
                    SinkCommand::SetValue(sample) => {
                        if mounted {
                            host.set_text(&render_template(&dispatcher_template, sample.value));
                        } else {
                            debug!(value = sample.value, "Dropping sample; overlay not mounted");
                        }
                    }
                    SinkCommand::Shutdown => break,
                }
            }
        });
        (sink, UiDispatcher { thread: Some(thread) })
    }

    pub(crate) fn mount(&self, descriptor: OverlayDescriptor) {
        self.send(SinkCommand::Mount(descriptor));
    }

    /// Repositions a mounted overlay; dropped if nothing is mounted.
    pub(crate) fn set_position(&self, descriptor: OverlayDescriptor) {
        self.send(SinkCommand::Update(descriptor));
    }

    pub(crate) fn unmount(&self) {
        self.send(SinkCommand::Unmount);
    }

    pub(crate) fn set_value(&self, sample: Sample) {
        self.send(SinkCommand::SetValue(sample));
    }

    /// Asks the dispatcher thread to exit after draining queued commands.
    pub(crate) fn shutdown_dispatcher(&self) {
        self.send(SinkCommand::Shutdown);
    }

    fn send(&self, command: SinkCommand) {
        if self.tx.send(command).is_err() {
            warn!("UI dispatcher gone; dropping overlay command");
        }
    }
}

impl UiDispatcher {
    pub(crate) fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn render_template(template: &str, value: SampleValue) -> String {
    template.replace("{fps}", &value.to_string())
}
