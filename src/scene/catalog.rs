//! The built-in scenes
//!
//! Each entry reproduces one of the classic arcsynthesis tutorial
//! programs: a flat-shaded triangle or prism, animated by a uniform, a
//! model matrix, or a per-frame vertex rewrite. Geometry tables keep the
//! original layout: a packed block of positions followed by a packed
//! block of colors, indexed by byte offset.

use std::time::Duration;

use crate::math::{Motion, PerspectiveParams, motion};
use crate::render::geometry::{AttributeLayout, GeometryData};

use super::{Anchor, Draw, GeometryMode, Projection, SceneObject, SceneSpec, UniformValue};

/// Looks a scene up by its catalog name.
pub fn by_name(name: &str) -> Option<SceneSpec> {
    match name {
        "moving-triangle" => Some(moving_triangle()),
        "drifting-triangle" => Some(drifting_triangle()),
        "pulsing-triangle" => Some(pulsing_triangle()),
        "ortho-prism" => Some(ortho_prism()),
        "perspective-prism" => Some(perspective_prism()),
        "orbiting-prisms" => Some(orbiting_prisms()),
        _ => None,
    }
}

/// Every catalog name, for error messages and the demo listing.
pub fn names() -> &'static [&'static str] {
    &[
        "moving-triangle",
        "drifting-triangle",
        "pulsing-triangle",
        "ortho-prism",
        "perspective-prism",
        "orbiting-prisms",
    ]
}

const TRIANGLE_VERTICES: [f32; 6] = [0.0, 0.25, 0.25, -0.366, -0.25, -0.366];

fn triangle_geometry() -> GeometryData {
    GeometryData {
        vertices: TRIANGLE_VERTICES.to_vec(),
        attributes: vec![AttributeLayout {
            name: "position",
            components: 2,
            byte_offset: 0,
        }],
        indices: None,
    }
}

const FLAT_WHITE_FRAG: &str = "#version 150

out vec4 out_color;

void main() {
    out_color = vec4(1, 1, 1, 1);
}
";

/// A white triangle circling the origin, moved by a vec2 offset uniform
/// pushed every frame.
fn moving_triangle() -> SceneSpec {
    SceneSpec {
        name: "moving-triangle",
        vertex_shader: "#version 150

in vec2 position;
uniform vec2 offset;

void main() {
    gl_Position = vec4(position + offset, 0, 1);
}
",
        fragment_shader: FLAT_WHITE_FRAG,
        geometry: triangle_geometry(),
        geometry_mode: GeometryMode::Static,
        projection: Projection::Clip,
        objects: vec![SceneObject {
            anchor: Anchor::Offset2(Motion::EllipticalOrbit {
                period: Duration::from_secs(2),
                radius_x: 0.5,
                radius_y: 0.5,
                center_z: 0.0,
            }),
            draw: Draw::Arrays { first: 0, count: 3 },
        }],
        init_uniforms: vec![],
        clear_color: [0.0, 0.0, 0.0, 0.0],
        depth_test: false,
        cull_back_faces: false,
    }
}

fn drift(base: &[f32], out: &mut [f32], elapsed: Duration) {
    let theta = motion::phase(elapsed, Duration::from_secs(2));
    let dx = (theta.cos() / 2.0) as f32;
    let dy = (theta.sin() / 2.0) as f32;
    for (pair, src) in out.chunks_exact_mut(2).zip(base.chunks_exact(2)) {
        pair[0] = src[0] + dx;
        pair[1] = src[1] + dy;
    }
}

/// The same circling triangle, moved by rewriting the vertex buffer every
/// frame instead of through a uniform.
fn drifting_triangle() -> SceneSpec {
    SceneSpec {
        name: "drifting-triangle",
        vertex_shader: "#version 150

in vec2 position;

void main() {
    gl_Position = vec4(position, 0, 1);
}
",
        fragment_shader: FLAT_WHITE_FRAG,
        geometry: triangle_geometry(),
        geometry_mode: GeometryMode::Rewrite(drift),
        projection: Projection::Clip,
        objects: vec![SceneObject {
            anchor: Anchor::ModelMatrix(Motion::Stationary {
                translation: [0.0, 0.0, 0.0],
            }),
            draw: Draw::Arrays { first: 0, count: 3 },
        }],
        init_uniforms: vec![],
        clear_color: [0.0, 0.0, 0.0, 0.0],
        depth_test: false,
        cull_back_faces: false,
    }
}

/// A circling triangle whose motion and color both derive from a single
/// time uniform inside the shaders.
fn pulsing_triangle() -> SceneSpec {
    SceneSpec {
        name: "pulsing-triangle",
        vertex_shader: "#version 150

in vec2 position;
uniform float period;
uniform float time;

void main() {
    float scale = 3.14159 * 2 / period;
    float cur = mod(time, period);
    vec2 offset = vec2(cos(cur * scale) / 2, sin(cur * scale) / 2);
    gl_Position = vec4(position + offset, 0, 1);
}
",
        fragment_shader: "#version 150

out vec4 out_color;

uniform float frag_period;
uniform float time;

const vec4 first_color = vec4(1, 1, 1, 1);
const vec4 second_color = vec4(0, 1, 0, 1);

void main() {
    float cur = mod(time, frag_period);
    out_color = mix(first_color, second_color, cur / frag_period);
}
",
        geometry: triangle_geometry(),
        geometry_mode: GeometryMode::Static,
        projection: Projection::Clip,
        objects: vec![SceneObject {
            anchor: Anchor::ModelMatrix(Motion::Stationary {
                translation: [0.0, 0.0, 0.0],
            }),
            draw: Draw::Arrays { first: 0, count: 3 },
        }],
        init_uniforms: vec![
            ("period", UniformValue::F1(4.0)),
            ("frag_period", UniformValue::F1(2.0)),
        ],
        clear_color: [0.0, 0.0, 0.0, 0.0],
        depth_test: false,
        cull_back_faces: false,
    }
}

// 36 vec4 positions: a square prism reaching from z=-1.25 to z=-2.75,
// two triangles per face.
#[rustfmt::skip]
const PRISM_POSITIONS: [f32; 144] = [
     0.25,  0.25, -1.25, 1.0,
     0.25, -0.25, -1.25, 1.0,
    -0.25,  0.25, -1.25, 1.0,

     0.25, -0.25, -1.25, 1.0,
    -0.25, -0.25, -1.25, 1.0,
    -0.25,  0.25, -1.25, 1.0,

     0.25,  0.25, -2.75, 1.0,
    -0.25,  0.25, -2.75, 1.0,
     0.25, -0.25, -2.75, 1.0,

     0.25, -0.25, -2.75, 1.0,
    -0.25,  0.25, -2.75, 1.0,
    -0.25, -0.25, -2.75, 1.0,

    -0.25,  0.25, -1.25, 1.0,
    -0.25, -0.25, -1.25, 1.0,
    -0.25, -0.25, -2.75, 1.0,

    -0.25,  0.25, -1.25, 1.0,
    -0.25, -0.25, -2.75, 1.0,
    -0.25,  0.25, -2.75, 1.0,

     0.25,  0.25, -1.25, 1.0,
     0.25, -0.25, -2.75, 1.0,
     0.25, -0.25, -1.25, 1.0,

     0.25,  0.25, -1.25, 1.0,
     0.25,  0.25, -2.75, 1.0,
     0.25, -0.25, -2.75, 1.0,

     0.25,  0.25, -2.75, 1.0,
     0.25,  0.25, -1.25, 1.0,
    -0.25,  0.25, -1.25, 1.0,

     0.25,  0.25, -2.75, 1.0,
    -0.25,  0.25, -1.25, 1.0,
    -0.25,  0.25, -2.75, 1.0,

     0.25, -0.25, -2.75, 1.0,
    -0.25, -0.25, -1.25, 1.0,
     0.25, -0.25, -1.25, 1.0,

     0.25, -0.25, -2.75, 1.0,
    -0.25, -0.25, -2.75, 1.0,
    -0.25, -0.25, -1.25, 1.0,
];

// One flat color per face, six vertices each.
const PRISM_FACE_COLORS: [[f32; 4]; 6] = [
    [0.0, 0.0, 1.0, 1.0],
    [0.8, 0.8, 0.8, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.5, 0.5, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
];

fn prism_geometry() -> GeometryData {
    let mut vertices = PRISM_POSITIONS.to_vec();
    for color in &PRISM_FACE_COLORS {
        for _ in 0..6 {
            vertices.extend_from_slice(color);
        }
    }
    GeometryData {
        vertices,
        attributes: vec![
            AttributeLayout {
                name: "position",
                components: 4,
                byte_offset: 0,
            },
            AttributeLayout {
                name: "color",
                components: 4,
                byte_offset: PRISM_POSITIONS.len() * 4,
            },
        ],
        indices: None,
    }
}

const PRISM_FRAG: &str = "#version 150

smooth in vec4 the_color;
out vec4 out_color;

void main() {
    out_color = the_color;
}
";

/// The prism drawn with no projection at all, so its depth is flattened
/// away and it renders as a plain rectangle.
fn ortho_prism() -> SceneSpec {
    SceneSpec {
        name: "ortho-prism",
        vertex_shader: "#version 150

in vec4 position;
in vec4 color;

smooth out vec4 the_color;

uniform vec2 offset;

void main() {
    gl_Position = position + vec4(offset, 0, 0);
    the_color = color;
}
",
        fragment_shader: PRISM_FRAG,
        geometry: prism_geometry(),
        geometry_mode: GeometryMode::Static,
        projection: Projection::Clip,
        objects: vec![SceneObject {
            anchor: Anchor::Offset2(Motion::Stationary {
                translation: [0.5, 0.25, 0.0],
            }),
            draw: Draw::Arrays { first: 0, count: 36 },
        }],
        init_uniforms: vec![],
        clear_color: [0.0, 0.0, 0.0, 0.0],
        depth_test: false,
        cull_back_faces: true,
    }
}

/// The same prism pushed through a perspective matrix, so the far face
/// shrinks and the side faces become visible.
fn perspective_prism() -> SceneSpec {
    SceneSpec {
        name: "perspective-prism",
        vertex_shader: "#version 150

in vec4 position;
in vec4 color;

smooth out vec4 the_color;

uniform vec2 offset;
uniform mat4 camera_to_clip;

void main() {
    vec4 camera_pos = position + vec4(offset, 0, 0);
    gl_Position = camera_to_clip * camera_pos;
    the_color = color;
}
",
        fragment_shader: PRISM_FRAG,
        geometry: prism_geometry(),
        geometry_mode: GeometryMode::Static,
        projection: Projection::Perspective(PerspectiveParams::new(1.0, 1.0, 3.0)),
        objects: vec![SceneObject {
            anchor: Anchor::Offset2(Motion::Stationary {
                translation: [0.5, 0.5, 0.0],
            }),
            draw: Draw::Arrays { first: 0, count: 36 },
        }],
        init_uniforms: vec![],
        clear_color: [0.0, 0.0, 0.0, 0.0],
        depth_test: false,
        cull_back_faces: true,
    }
}

// Two interleaved tetrahedra sharing one 8-vertex hull.
#[rustfmt::skip]
const OCTAHEDRON_POSITIONS: [f32; 24] = [
     1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,
    -1.0,  1.0, -1.0,
     1.0, -1.0, -1.0,

    -1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
     1.0, -1.0,  1.0,
    -1.0,  1.0,  1.0,
];

const OCTAHEDRON_VERTEX_COLORS: [[f32; 4]; 4] = [
    [0.75, 0.75, 1.0, 1.0],
    [0.0, 0.5, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [0.5, 0.5, 0.0, 1.0],
];

#[rustfmt::skip]
const OCTAHEDRON_INDICES: [u16; 24] = [
    0, 1, 2,
    1, 0, 3,
    2, 3, 0,
    3, 2, 1,

    5, 4, 6,
    4, 5, 7,
    7, 6, 4,
    6, 7, 5,
];

fn octahedron_geometry() -> GeometryData {
    let mut vertices = OCTAHEDRON_POSITIONS.to_vec();
    // Both tetrahedra reuse the same four colors, one per vertex.
    for _ in 0..2 {
        for color in &OCTAHEDRON_VERTEX_COLORS {
            vertices.extend_from_slice(color);
        }
    }
    GeometryData {
        vertices,
        attributes: vec![
            AttributeLayout {
                name: "position",
                components: 3,
                byte_offset: 0,
            },
            AttributeLayout {
                name: "color",
                components: 4,
                byte_offset: OCTAHEDRON_POSITIONS.len() * 4,
            },
        ],
        indices: Some(OCTAHEDRON_INDICES.to_vec()),
    }
}

/// Three copies of the octahedron under perspective with depth testing:
/// one parked, one on a circular orbit, one on an elliptical orbit.
fn orbiting_prisms() -> SceneSpec {
    SceneSpec {
        name: "orbiting-prisms",
        vertex_shader: "#version 150

in vec3 position;
in vec4 color;

smooth out vec4 the_color;

uniform mat4 camera_to_clip;
uniform mat4 model_to_camera;

void main() {
    vec4 camera_pos = model_to_camera * vec4(position, 1);
    gl_Position = camera_to_clip * camera_pos;
    the_color = color;
}
",
        fragment_shader: PRISM_FRAG,
        geometry: octahedron_geometry(),
        geometry_mode: GeometryMode::Static,
        projection: Projection::Perspective(PerspectiveParams::from_fov_degrees(30.0, 1.0, 61.0)),
        objects: vec![
            SceneObject {
                anchor: Anchor::ModelMatrix(Motion::Stationary {
                    translation: [0.0, 0.0, -20.0],
                }),
                draw: Draw::Elements { count: 24 },
            },
            SceneObject {
                anchor: Anchor::ModelMatrix(Motion::CircularOrbit {
                    period: Duration::from_secs(12),
                    radius: 5.0,
                    height: -3.5,
                    center_z: -20.0,
                }),
                draw: Draw::Elements { count: 24 },
            },
            SceneObject {
                anchor: Anchor::ModelMatrix(Motion::EllipticalOrbit {
                    period: Duration::from_secs(3),
                    radius_x: 4.0,
                    radius_y: 6.0,
                    center_z: -20.0,
                }),
                draw: Draw::Elements { count: 24 },
            },
        ],
        init_uniforms: vec![],
        clear_color: [0.0, 0.0, 0.0, 0.0],
        depth_test: true,
        cull_back_faces: true,
    }
}
