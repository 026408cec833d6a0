//! Rendering core
//!
//! ## Architecture
//!
//! - `api`: the graphics-binding boundary, a trait covering the handful of
//!   GL primitives the loop consumes
//! - `backend`: the production [`api::GraphicsApi`] implementation over a
//!   `glow` context supplied by the embedder
//! - `program`: shader program construction with structured errors
//! - `geometry`: vertex/index upload and per-frame rewrite
//! - `error`: the error taxonomy shared by all of the above

pub mod api;
pub mod backend;
pub mod error;
pub mod geometry;
pub mod program;

pub use error::{ReleaseError, RenderError, SurfaceError};
pub use program::Program;
