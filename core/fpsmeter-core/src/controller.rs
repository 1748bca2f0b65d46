//! Sampling lifecycle controller.
//!
//! The state machine that owns start/stop semantics. Two states, `Idle` and
//! `Active`; the interesting part is which edges touch the power
//! subscription. An explicit stop unsubscribes; going to sleep does not, so a
//! later wake resumes sampling without a fresh start request.
//!
//! Every entry point locks the one internal mutex, so calls arriving from the
//! host and from the notifier's delivery thread serialize, and every
//! transition is idempotent: the single `Option<SamplerHandle>` field is the
//! "at most one loop" guarantee, and the sink makes mount/unmount idempotent
//! on its own thread.

use crate::config::MeterConfig;
use crate::error::Result;
use crate::power::{PowerStateNotifier, PowerStateObserver, SubscriptionId};
use crate::sampler::SamplerHandle;
use crate::sink::{DisplaySink, UiDispatcher};
use crate::source::{FileSampleSource, SampleSource};
use crate::surface::{OverlayDescriptor, SurfaceHost};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingState {
    Idle,
    Active,
}

/// The overlay component. One instance per process.
///
/// Construction opens the sample resource and spawns the UI dispatcher;
/// nothing samples until [`start_reading`](FpsMeter::start_reading).
pub struct FpsMeter {
    inner: Arc<MeterInner>,
    dispatcher: Option<UiDispatcher>,
}

struct MeterInner {
    host: Arc<dyn SurfaceHost>,
    notifier: Arc<dyn PowerStateNotifier>,
    sink: DisplaySink,
    source: Arc<Mutex<dyn SampleSource>>,
    period: Duration,
    state: Mutex<MeterState>,
}

struct MeterState {
    sampling: SamplingState,
    sampler: Option<SamplerHandle>,
    subscription: Option<SubscriptionId>,
    descriptor: OverlayDescriptor,
}

impl FpsMeter {
    /// Opens the sample resource named by the config and assembles the
    /// component. Failure to open the resource is fatal; there is no retry.
    pub fn new(
        config: MeterConfig,
        host: Arc<dyn SurfaceHost>,
        notifier: Arc<dyn PowerStateNotifier>,
    ) -> Result<Self> {
        let source = FileSampleSource::open(&config.sample_path)?;
        Ok(Self::with_source(config, source, host, notifier))
    }

    /// Assembles the component around an already-open sample source, for
    /// hosts that obtain the counter through something other than a file.
    pub fn with_source<S: SampleSource + 'static>(
        config: MeterConfig,
        source: S,
        host: Arc<dyn SurfaceHost>,
        notifier: Arc<dyn PowerStateNotifier>,
    ) -> Self {
        let (sink, dispatcher) = DisplaySink::spawn(Arc::clone(&host), &config.text_template);
        let descriptor = OverlayDescriptor::new(host.current_top_inset(), config.theme);
        let inner = Arc::new(MeterInner {
            host,
            notifier,
            sink,
            source: Arc::new(Mutex::new(source)),
            period: Duration::from_millis(config.period_ms),
            state: Mutex::new(MeterState {
                sampling: SamplingState::Idle,
                sampler: None,
                subscription: None,
                descriptor,
            }),
        });
        Self {
            inner,
            dispatcher: Some(dispatcher),
        }
    }

    /// Registers with the power-state notifier and begins sampling.
    /// Idempotent: a second call while active changes nothing.
    pub fn start_reading(&self) {
        self.inner.start_reading();
    }

    /// Stops sampling, removes the overlay, and unregisters from the
    /// power-state notifier. Idempotent.
    pub fn stop_reading(&self) {
        self.inner.stop_reading();
    }

    pub fn is_reading(&self) -> bool {
        self.inner.lock_state().sampling == SamplingState::Active
    }

    /// Re-reads the host's top inset and repositions a mounted overlay.
    /// Call on rotation or any other screen layout change.
    pub fn configuration_changed(&self) {
        self.inner.configuration_changed();
    }

    /// Full teardown: stop sampling, then join the UI dispatcher. The sample
    /// resource handle is released when the component is dropped. Runs at
    /// most once; `Drop` calls it as a backstop.
    pub fn shutdown(&mut self) {
        let Some(dispatcher) = self.dispatcher.take() else {
            return;
        };
        self.inner.stop_reading();
        self.inner.sink.shutdown_dispatcher();
        dispatcher.join();
        info!("fpsmeter shut down");
    }
}

impl Drop for FpsMeter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl MeterInner {
    fn start_reading(self: &Arc<Self>) {
        let mut state = self.lock_state();
        if state.subscription.is_none() {
            let observer: Arc<dyn PowerStateObserver> = Arc::new(PowerObserverAdapter {
                inner: Arc::downgrade(self),
            });
            state.subscription = Some(self.notifier.subscribe(observer));
        }
        self.begin_sampling(&mut state);
    }

    fn stop_reading(&self) {
        let mut state = self.lock_state();
        self.end_sampling(&mut state);
        if let Some(id) = state.subscription.take() {
            self.notifier.unsubscribe(id);
        }
    }

    fn configuration_changed(&self) {
        let inset = self.host.current_top_inset();
        let mut state = self.lock_state();
        state.descriptor.top_offset_px = inset;
        debug!(inset, "Overlay offset recomputed");
        // The sink drops this if no overlay is mounted.
        self.sink.set_position(state.descriptor.clone());
    }

    /// Mounts the overlay and launches the sampling loop. No-op while a loop
    /// is already running.
    fn begin_sampling(&self, state: &mut MeterState) {
        if state.sampler.is_some() {
            debug!("Sampling already active");
            return;
        }
        self.sink.mount(state.descriptor.clone());
        state.sampler = Some(SamplerHandle::spawn(
            Arc::clone(&self.source),
            self.sink.clone(),
            self.period,
        ));
        state.sampling = SamplingState::Active;
        info!(period_ms = self.period.as_millis() as u64, "Sampling started");
    }

    /// Cancels the sampling loop and removes the overlay. No-op while idle.
    fn end_sampling(&self, state: &mut MeterState) {
        let Some(sampler) = state.sampler.take() else {
            debug!("Sampling already idle");
            return;
        };
        // Join first so every queued sample precedes the unmount command.
        sampler.stop();
        self.sink.unmount();
        state.sampling = SamplingState::Idle;
        info!("Sampling stopped");
    }

    fn handle_sleep(&self) {
        info!("Display going to sleep; suspending sampling");
        let mut state = self.lock_state();
        self.end_sampling(&mut state);
    }

    fn handle_wake(&self) {
        info!("Display finished waking; resuming sampling");
        let mut state = self.lock_state();
        self.begin_sampling(&mut state);
    }

    fn lock_state(&self) -> MutexGuard<'_, MeterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bridges notifier callbacks onto the controller without forming an `Arc`
/// cycle (the notifier holds the observer, the observer holds a `Weak`).
struct PowerObserverAdapter {
    inner: Weak<MeterInner>,
}

impl PowerStateObserver for PowerObserverAdapter {
    fn on_going_to_sleep(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.handle_sleep();
        }
    }

    fn on_finished_waking_up(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.handle_wake();
        }
    }
}
