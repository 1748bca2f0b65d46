//! Tracing-backed surface host.
//!
//! No real window system here: mounts, repositions, and text updates are
//! logged so the component's behavior can be watched from a terminal. The top
//! inset is settable to simulate layout changes.

use fpsmeter_core::{OverlayDescriptor, SurfaceHost};
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::info;

pub struct LogSurfaceHost {
    inset: AtomicI32,
}

impl LogSurfaceHost {
    pub fn new() -> Self {
        Self {
            inset: AtomicI32::new(0),
        }
    }

    pub fn set_inset(&self, px: i32) {
        self.inset.store(px, Ordering::SeqCst);
    }

    pub fn inset(&self) -> i32 {
        self.inset.load(Ordering::SeqCst)
    }
}

impl SurfaceHost for LogSurfaceHost {
    fn mount(&self, descriptor: &OverlayDescriptor) {
        info!(top_offset_px = descriptor.top_offset_px, "Overlay mounted");
    }

    fn update(&self, descriptor: &OverlayDescriptor) {
        info!(top_offset_px = descriptor.top_offset_px, "Overlay repositioned");
    }

    fn unmount(&self) {
        info!("Overlay unmounted");
    }

    fn set_text(&self, text: &str) {
        info!(text, "Overlay text");
    }

    fn current_top_inset(&self) -> i32 {
        self.inset()
    }
}
