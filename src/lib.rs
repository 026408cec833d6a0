//! Prism
//!
//! A fixed-rate render loop for small animated OpenGL scenes, driven
//! through a pluggable graphics binding (`glow` in production) and a
//! surface trait the embedder implements over its windowing layer.

/// Render loop, clock, configuration, and the surface boundary
pub mod app;

/// Build-time information (timestamp, target, compiler version)
pub mod build_info;

/// Logging initialization
pub mod logging;

/// Projection and orbit math
pub mod math;

/// Shader programs, geometry upload, and the graphics-binding boundary
pub mod render;

/// The built-in scene catalog
pub mod scene;
