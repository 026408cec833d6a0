//! Pure projection and animation math
//!
//! Everything in here is side-effect free: matrices and orbit positions are
//! recomputed from absolute elapsed time on every call, never accumulated.

pub mod mat4;
pub mod motion;

pub use mat4::{Mat4, PerspectiveParams};
pub use motion::Motion;
