//! Application layer
//!
//! The render loop, its clock, configuration, and the surface boundary
//! the embedder implements.

pub mod clock;
pub mod config;
pub mod runner;
pub mod surface;

pub use clock::AnimationClock;
pub use config::{AppConfig, RuntimeConfig, WindowConfig};
pub use runner::{LoopState, RenderLoop, Viewport};
pub use surface::{KeyCode, Surface, SurfaceEvent, Wake};
