//! Surface host boundary.
//!
//! The surface host is the external windowing system that actually places the
//! overlay on screen. The core never draws; it describes the overlay with an
//! [`OverlayDescriptor`] and asks the host to mount, reposition, or remove it.
//! All calls into a `SurfaceHost` are made from the single UI dispatcher
//! thread owned by the display sink.

use crate::config::ThemeConfig;

/// Immutable layout intent for the overlay.
///
/// The overlay sizes to its content and is anchored at the top-left corner,
/// pushed down by `top_offset_px` so it clears system status elements. Owned
/// by the lifecycle controller; only inset changes mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayDescriptor {
    /// Vertical offset in pixels, kept equal to the host's current top inset.
    pub top_offset_px: i32,
    pub interactive: bool,
    pub focusable: bool,
    pub translucent: bool,
    pub theme: ThemeConfig,
}

impl OverlayDescriptor {
    pub fn new(top_offset_px: i32, theme: ThemeConfig) -> Self {
        Self {
            top_offset_px,
            interactive: false,
            focusable: false,
            translucent: true,
            theme,
        }
    }
}

/// External windowing system consumed by the component.
///
/// `set_text` addresses the text element of the currently mounted overlay
/// view; the host owns the view, so the text seam lives here too.
/// Implementations must tolerate being called from a thread they did not
/// create (the core funnels every mutation through one dispatcher thread).
pub trait SurfaceHost: Send + Sync {
    fn mount(&self, descriptor: &OverlayDescriptor);
    fn update(&self, descriptor: &OverlayDescriptor);
    fn unmount(&self);
    fn set_text(&self, text: &str);
    fn current_top_inset(&self) -> i32;
}
