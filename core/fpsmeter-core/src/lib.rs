//! # fpsmeter-core
//!
//! Core library for fpsmeter: an on-screen FPS overlay that samples an
//! external counter resource and renders the latest value over all other
//! screen content. This crate owns the sampling lifecycle; the host supplies
//! the windowing system and the wake/sleep signal source.
//!
//! ## Design principles
//!
//! - **Host-integrated**: not an application. The host implements
//!   [`SurfaceHost`] and wires its platform power events into a
//!   [`PowerStateNotifier`]; the component never talks to a display or power
//!   API directly.
//! - **Single UI thread**: every overlay mutation funnels through one
//!   dispatcher thread, so hosts never see concurrent calls.
//! - **Graceful degradation**: a failed or garbled probe renders as the
//!   sentinel value, never an error. Only a missing resource at construction
//!   is fatal.
//! - **Idempotent edges**: start, stop, sleep, and wake can arrive redundantly
//!   and out of order; redundant transitions are no-ops.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use fpsmeter_core::{FpsMeter, MeterConfig};
//!
//! let mut meter = FpsMeter::new(MeterConfig::default(), host, notifier)?;
//! meter.start_reading();
//! // ... on teardown:
//! meter.shutdown();
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod parse;
pub mod power;
pub mod source;
pub mod surface;

mod sampler;
mod sink;

pub use config::{load_config, MeterConfig, ThemeConfig};
pub use controller::{FpsMeter, SamplingState};
pub use error::{MeterError, Result};
pub use parse::{parse_sample, SampleValue, SENTINEL};
pub use power::{PowerSignalHub, PowerStateNotifier, PowerStateObserver, SubscriptionId};
pub use source::{FileSampleSource, SampleSource};
pub use surface::{OverlayDescriptor, SurfaceHost};
