//! Scene descriptions
//!
//! A scene is a declarative bundle: shader sources, geometry, a projection
//! choice, and the objects to draw. The render loop interprets it; scenes
//! themselves hold no GPU state and issue no GL calls.

use std::time::Duration;

use crate::math::{Motion, PerspectiveParams};

pub mod catalog;

/// How camera-space coordinates become clip-space coordinates.
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    /// Vertices are already in clip space; no projection uniform is pushed.
    Clip,
    /// Perspective projection, re-pushed whenever the surface aspect
    /// ratio changes.
    Perspective(PerspectiveParams),
}

/// How an object's motion reaches the shader.
#[derive(Debug, Clone, Copy)]
pub enum Anchor {
    /// Position folded into a full model-to-camera matrix.
    ModelMatrix(Motion),
    /// Position pushed as a 2D offset uniform (z dropped).
    Offset2(Motion),
    /// Position pushed as a 3D offset uniform.
    Offset3(Motion),
}

/// One draw call.
#[derive(Debug, Clone, Copy)]
pub enum Draw {
    Arrays { first: i32, count: i32 },
    Elements { count: i32 },
}

/// An object in the scene: where it is and how to draw it.
#[derive(Debug, Clone, Copy)]
pub struct SceneObject {
    pub anchor: Anchor,
    pub draw: Draw,
}

/// Rewrites the vertex block from its base data for the given elapsed
/// time. `out` is pre-sized to the base length.
pub type RewriteFn = fn(base: &[f32], out: &mut [f32], elapsed: Duration);

/// Whether the vertex block is uploaded once or recomputed per frame.
#[derive(Debug, Clone, Copy)]
pub enum GeometryMode {
    Static,
    /// The CPU recomputes the whole block each frame and re-uploads it
    /// over the existing allocation.
    Rewrite(RewriteFn),
}

/// A uniform value set once after link.
#[derive(Debug, Clone, Copy)]
pub enum UniformValue {
    F1(f32),
    F2(f32, f32),
    F3(f32, f32, f32),
}

/// Everything the render loop needs to run one scene.
pub struct SceneSpec {
    pub name: &'static str,
    pub vertex_shader: &'static str,
    pub fragment_shader: &'static str,
    pub geometry: crate::render::geometry::GeometryData,
    pub geometry_mode: GeometryMode,
    pub projection: Projection,
    pub objects: Vec<SceneObject>,
    /// Uniforms pushed once during initialization, looked up by name.
    /// Absent names are skipped.
    pub init_uniforms: Vec<(&'static str, UniformValue)>,
    pub clear_color: [f32; 4],
    pub depth_test: bool,
    pub cull_back_faces: bool,
}
