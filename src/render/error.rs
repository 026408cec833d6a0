//! Error taxonomy for program construction, frame production, and shutdown

use thiserror::Error;

use super::api::ShaderStage;

/// Errors surfaced by the rendering core.
///
/// Setup-time variants (`Compile`, `Link`, `Allocation`) are fatal to the
/// loop. `LocationNotFound` is recoverable: callers treat an absent optional
/// uniform as "feature not present" and skip the update.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{stage} shader failed to compile: {diagnostic}")]
    Compile {
        stage: ShaderStage,
        diagnostic: String,
    },

    #[error("shader program failed to link: {diagnostic}")]
    Link { diagnostic: String },

    #[error("no uniform or attribute named {name:?} in the linked program")]
    LocationNotFound { name: String },

    #[error("failed to allocate {what}: {detail}")]
    Allocation { what: &'static str, detail: String },

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Failures reported by the display surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A single presentation failed; the surface may recover next frame.
    #[error("presentation failed: {0}")]
    Present(String),

    /// The surface is no longer usable; the loop must shut down.
    #[error("surface lost")]
    Lost,
}

/// A resource that could not be released during drain. Collected and
/// reported after every release has been attempted; never fatal.
#[derive(Debug, Error)]
#[error("failed to release {resource}: {detail}")]
pub struct ReleaseError {
    pub resource: &'static str,
    pub detail: String,
}
