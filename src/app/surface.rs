//! The display-surface boundary
//!
//! Window creation, event delivery, and frame presentation live outside
//! this crate. The embedder wraps its windowing layer in [`Surface`] and
//! the render loop drives it through exactly these four operations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::render::error::SurfaceError;

/// Events the loop reacts to. Anything else the windowing layer produces
/// is the embedder's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    KeyPress(KeyCode),
    Resized { width: u32, height: u32 },
    /// The surface contents were damaged and need a redraw. Every tick
    /// redraws anyway, so this carries no payload.
    Damaged,
}

/// The small set of keys the tutorial scenes care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Escape,
    Enter,
    Space,
    Tab,
    Q,
    Other(u32),
}

/// Why a cooperative wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// An event arrived before the timeout.
    Event,
    /// The timeout elapsed.
    Timeout,
}

/// The display collaborator.
///
/// All methods are called from the render loop's thread only.
pub trait Surface {
    /// Non-blocking: the next queued event, if any.
    fn poll_event(&mut self) -> Option<SurfaceEvent>;

    /// Blocks until an event arrives or the timeout elapses, whichever is
    /// first. This is the loop's sole suspension point; implementations
    /// must not busy-spin.
    fn wait_for_event(&mut self, timeout: Duration) -> Wake;

    /// Swaps the displayed frame.
    fn present(&mut self) -> Result<(), SurfaceError>;

    /// Releases the surface. Called once during drain.
    fn close(&mut self);
}
