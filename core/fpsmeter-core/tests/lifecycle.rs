//! Lifecycle tests against fake collaborators: a recording surface host, a
//! scripted sample source, and the real `PowerSignalHub`.

use fpsmeter_core::{
    FpsMeter, MeterConfig, MeterError, OverlayDescriptor, PowerSignalHub, Result, SampleSource,
    SurfaceHost,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PERIOD_MS: u64 = 20;
const EVENT_TIMEOUT: Duration = Duration::from_secs(2);
/// Long enough for several periods to elapse when asserting that nothing
/// further happens.
const QUIET: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostCall {
    Mount(i32),
    Update(i32),
    Unmount,
    SetText(String),
}

struct FakeSurfaceHost {
    inset: AtomicI32,
    calls: Mutex<Vec<HostCall>>,
    events: Mutex<Sender<HostCall>>,
}

impl FakeSurfaceHost {
    fn new(inset: i32) -> (Arc<Self>, Receiver<HostCall>) {
        let (tx, rx) = mpsc::channel();
        let host = Arc::new(Self {
            inset: AtomicI32::new(inset),
            calls: Mutex::new(Vec::new()),
            events: Mutex::new(tx),
        });
        (host, rx)
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().expect("calls lock").push(call.clone());
        let _ = self.events.lock().expect("events lock").send(call);
    }

    fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn set_inset(&self, px: i32) {
        self.inset.store(px, Ordering::SeqCst);
    }

    fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls().iter().filter(|call| pred(call)).count()
    }
}

impl SurfaceHost for FakeSurfaceHost {
    fn mount(&self, descriptor: &OverlayDescriptor) {
        self.record(HostCall::Mount(descriptor.top_offset_px));
    }

    fn update(&self, descriptor: &OverlayDescriptor) {
        self.record(HostCall::Update(descriptor.top_offset_px));
    }

    fn unmount(&self) {
        self.record(HostCall::Unmount);
    }

    fn set_text(&self, text: &str) {
        self.record(HostCall::SetText(text.to_string()));
    }

    fn current_top_inset(&self) -> i32 {
        self.inset.load(Ordering::SeqCst)
    }
}

/// Scripted source: pops one result per probe, then repeats the last
/// successful reading once the script runs dry.
struct FakeSampleSource {
    script: VecDeque<Result<String>>,
    probes: Arc<AtomicUsize>,
    last: String,
}

impl FakeSampleSource {
    fn new(script: Vec<Result<String>>) -> (Self, Arc<AtomicUsize>) {
        let probes = Arc::new(AtomicUsize::new(0));
        let source = Self {
            script: script.into_iter().collect(),
            probes: Arc::clone(&probes),
            last: "0".to_string(),
        };
        (source, probes)
    }

    fn steady(raw: &str) -> (Self, Arc<AtomicUsize>) {
        Self::new(vec![Ok(raw.to_string())])
    }
}

impl SampleSource for FakeSampleSource {
    fn probe(&mut self) -> Result<String> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front() {
            Some(result) => {
                if let Ok(raw) = &result {
                    self.last = raw.clone();
                }
                result
            }
            None => Ok(self.last.clone()),
        }
    }
}

fn probe_failure() -> MeterError {
    MeterError::Probe {
        source: std::io::Error::new(std::io::ErrorKind::Other, "scripted failure"),
    }
}

fn test_config() -> MeterConfig {
    MeterConfig {
        period_ms: PERIOD_MS,
        text_template: "{fps}".to_string(),
        ..MeterConfig::default()
    }
}

fn wait_for(rx: &Receiver<HostCall>, pred: impl Fn(&HostCall) -> bool) -> HostCall {
    loop {
        match rx.recv_timeout(EVENT_TIMEOUT) {
            Ok(call) if pred(&call) => return call,
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) => panic!("timed out waiting for host call"),
            Err(RecvTimeoutError::Disconnected) => panic!("host event channel closed"),
        }
    }
}

fn is_mount(call: &HostCall) -> bool {
    matches!(call, HostCall::Mount(_))
}

fn is_unmount(call: &HostCall) -> bool {
    matches!(call, HostCall::Unmount)
}

fn is_set_text(call: &HostCall) -> bool {
    matches!(call, HostCall::SetText(_))
}

#[test]
fn missing_resource_is_fatal_at_construction() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = MeterConfig {
        sample_path: dir.path().join("missing"),
        ..MeterConfig::default()
    };
    let (host, _events) = FakeSurfaceHost::new(0);
    let hub = Arc::new(PowerSignalHub::new());

    let err = FpsMeter::new(config, host, hub).err().expect("must fail");
    assert!(matches!(err, MeterError::ResourceUnavailable { .. }));
}

#[test]
fn idempotent_start_mounts_once_and_runs_one_loop() {
    let (host, events) = FakeSurfaceHost::new(40);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, probes) = FakeSampleSource::steady("60");
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub.clone());

    meter.start_reading();
    meter.start_reading();
    assert!(meter.is_reading());
    assert_eq!(hub.observer_count(), 1);

    // Flush the sink queue: a reposition lands after everything both starts
    // enqueued, so once we see it all earlier commands have been applied.
    wait_for(&events, is_set_text);
    meter.configuration_changed();
    wait_for(&events, |call| matches!(call, HostCall::Update(40)));

    assert_eq!(host.count(is_mount), 1);

    // Exactly one loop: stopping it stops all probing.
    meter.stop_reading();
    let after_stop = probes.load(Ordering::SeqCst);
    std::thread::sleep(QUIET);
    assert_eq!(probes.load(Ordering::SeqCst), after_stop);

    meter.shutdown();
}

#[test]
fn stop_while_idle_is_a_noop() {
    let (host, _events) = FakeSurfaceHost::new(0);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, probes) = FakeSampleSource::steady("60");
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub.clone());

    meter.stop_reading();
    std::thread::sleep(QUIET);

    assert!(!meter.is_reading());
    assert_eq!(hub.observer_count(), 0);
    assert_eq!(probes.load(Ordering::SeqCst), 0);
    assert!(host.calls().is_empty());

    meter.shutdown();
}

#[test]
fn sleep_then_wake_resumes_without_restart() {
    let (host, events) = FakeSurfaceHost::new(0);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, _probes) = FakeSampleSource::steady("60");
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub.clone());

    meter.start_reading();
    wait_for(&events, is_mount);

    hub.signal_sleep();
    wait_for(&events, is_unmount);
    assert!(!meter.is_reading());
    // Sleep suspends sampling but keeps the subscription registered.
    assert_eq!(hub.observer_count(), 1);

    hub.signal_wake();
    wait_for(&events, is_mount);
    assert!(meter.is_reading());
    assert_eq!(host.count(is_mount), 2);

    meter.shutdown();
}

#[test]
fn full_stop_unsubscribes_and_ignores_later_wake() {
    let (host, events) = FakeSurfaceHost::new(0);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, probes) = FakeSampleSource::steady("60");
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub.clone());

    meter.start_reading();
    wait_for(&events, is_mount);
    meter.stop_reading();
    wait_for(&events, is_unmount);
    assert_eq!(hub.observer_count(), 0);

    let before = probes.load(Ordering::SeqCst);
    hub.signal_wake();
    std::thread::sleep(QUIET);

    assert!(!meter.is_reading());
    assert_eq!(host.count(is_mount), 1);
    assert_eq!(probes.load(Ordering::SeqCst), before);

    meter.shutdown();
}

#[test]
fn inset_change_repositions_mounted_overlay_exactly_once() {
    let (host, events) = FakeSurfaceHost::new(40);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, _probes) = FakeSampleSource::steady("60");
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub);

    meter.start_reading();
    wait_for(&events, |call| matches!(call, HostCall::Mount(40)));

    host.set_inset(64);
    meter.configuration_changed();
    wait_for(&events, |call| matches!(call, HostCall::Update(64)));
    assert_eq!(host.count(|call| matches!(call, HostCall::Update(_))), 1);

    meter.shutdown();
}

#[test]
fn inset_change_while_unmounted_reaches_no_host() {
    let (host, _events) = FakeSurfaceHost::new(40);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, _probes) = FakeSampleSource::steady("60");
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub);

    host.set_inset(64);
    meter.configuration_changed();
    std::thread::sleep(QUIET);

    assert!(host.calls().is_empty());

    meter.shutdown();
}

#[test]
fn stop_cancels_loop_after_in_flight_iteration() {
    let (host, events) = FakeSurfaceHost::new(0);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, probes) = FakeSampleSource::steady("60");
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub);

    meter.start_reading();
    wait_for(&events, is_set_text);

    // stop_reading joins the sampler thread, so by the time it returns the
    // in-flight iteration has finished and no further probes may happen.
    meter.stop_reading();
    let after_stop = probes.load(Ordering::SeqCst);
    std::thread::sleep(QUIET);
    assert_eq!(probes.load(Ordering::SeqCst), after_stop);

    meter.shutdown();
}

#[test]
fn end_to_end_publishes_samples_in_order_then_stops() {
    let (host, events) = FakeSurfaceHost::new(0);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, _probes) = FakeSampleSource::new(vec![
        Ok("10".to_string()),
        Ok("bad".to_string()),
        Ok("12".to_string()),
    ]);
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub);

    meter.start_reading();

    let mut texts = Vec::new();
    while texts.len() < 3 {
        if let HostCall::SetText(text) = wait_for(&events, is_set_text) {
            texts.push(text);
        }
    }
    assert_eq!(texts, vec!["10", "0", "12"]);

    meter.stop_reading();
    // Every published sample precedes the unmount in the sink queue, so once
    // the unmount lands the set of rendered texts is final.
    wait_for(&events, is_unmount);
    let rendered = host.count(is_set_text);
    std::thread::sleep(QUIET);
    assert_eq!(host.count(is_set_text), rendered);

    meter.shutdown();
}

#[test]
fn probe_failures_render_as_sentinel_and_loop_survives() {
    let (host, events) = FakeSurfaceHost::new(0);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, _probes) = FakeSampleSource::new(vec![
        Err(probe_failure()),
        Ok("58".to_string()),
    ]);
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub);

    meter.start_reading();

    let mut texts = Vec::new();
    while texts.len() < 2 {
        if let HostCall::SetText(text) = wait_for(&events, is_set_text) {
            texts.push(text);
        }
    }
    assert_eq!(texts, vec!["0", "58"]);

    meter.shutdown();
}

#[test]
fn shutdown_is_idempotent_and_tears_down_while_active() {
    let (host, events) = FakeSurfaceHost::new(0);
    let hub = Arc::new(PowerSignalHub::new());
    let (source, _probes) = FakeSampleSource::steady("60");
    let mut meter = FpsMeter::with_source(test_config(), source, host.clone(), hub.clone());

    meter.start_reading();
    wait_for(&events, is_mount);

    meter.shutdown();
    meter.shutdown();

    assert!(!meter.is_reading());
    assert_eq!(hub.observer_count(), 0);
    assert_eq!(host.count(is_unmount), 1);
}
