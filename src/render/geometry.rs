//! Vertex data layout and GPU upload
//!
//! Geometry is a single packed `f32` block with named attribute views into
//! it, plus an optional `u16` index list. It is uploaded once; the
//! "rewrite" scenes push a freshly computed copy each frame through
//! [`GeometryBuffers::upload_vertices`].

use super::api::{BufferTarget, BufferUsage, GraphicsApi};
use super::error::{ReleaseError, RenderError};
use super::program::Program;

/// A named view into the packed vertex block. Attributes are tightly
/// packed (stride 0 in GL terms) at a byte offset, the way the scene
/// tables lay out a block of positions followed by a block of colors.
#[derive(Debug, Clone, Copy)]
pub struct AttributeLayout {
    pub name: &'static str,
    pub components: i32,
    pub byte_offset: usize,
}

/// CPU-side geometry: the packed vertex block, its attribute views, and
/// an optional index list.
#[derive(Debug, Clone)]
pub struct GeometryData {
    pub vertices: Vec<f32>,
    pub attributes: Vec<AttributeLayout>,
    pub indices: Option<Vec<u16>>,
}

/// GPU-side handles for one uploaded geometry.
pub struct GeometryBuffers<G: GraphicsApi> {
    pub vertex_array: G::VertexArray,
    pub vertex_buffer: G::Buffer,
    pub index_buffer: Option<G::Buffer>,
}

impl<G: GraphicsApi> GeometryBuffers<G> {
    /// Replaces the vertex block in place. Used by rewrite-mode scenes,
    /// which recompute vertices from their base data every frame.
    pub fn upload_vertices(&self, gl: &G, vertices: &[f32]) {
        gl.bind_vertex_array(Some(self.vertex_array));
        gl.bind_buffer(BufferTarget::Array, Some(self.vertex_buffer));
        gl.buffer_sub_data(BufferTarget::Array, 0, bytemuck::cast_slice(vertices));
    }

    /// Frees GPU-side buffer state in reverse acquisition order. Release
    /// failures do not stop the remaining releases; all of them are
    /// returned for aggregation.
    pub fn release(self, gl: &G) -> Vec<ReleaseError> {
        let mut failures = Vec::new();
        if let Some(index_buffer) = self.index_buffer {
            if let Err(detail) = gl.delete_buffer(index_buffer) {
                failures.push(ReleaseError {
                    resource: "index buffer",
                    detail,
                });
            }
        }
        if let Err(detail) = gl.delete_buffer(self.vertex_buffer) {
            failures.push(ReleaseError {
                resource: "vertex buffer",
                detail,
            });
        }
        if let Err(detail) = gl.delete_vertex_array(self.vertex_array) {
            failures.push(ReleaseError {
                resource: "vertex array",
                detail,
            });
        }
        failures
    }
}

/// Uploads geometry and wires its attributes to the program.
///
/// Attributes named in the layout but absent from the linked program are
/// skipped. On a partial failure everything allocated so far is released
/// before the error is returned.
pub fn upload<G: GraphicsApi>(
    gl: &G,
    program: &Program<G>,
    data: &GeometryData,
    usage: BufferUsage,
) -> Result<GeometryBuffers<G>, RenderError> {
    let vertex_array = gl
        .create_vertex_array()
        .map_err(|detail| RenderError::Allocation {
            what: "vertex array",
            detail,
        })?;
    gl.bind_vertex_array(Some(vertex_array));

    let vertex_buffer = match gl.create_buffer() {
        Ok(buffer) => buffer,
        Err(detail) => {
            let _ = gl.delete_vertex_array(vertex_array);
            return Err(RenderError::Allocation {
                what: "vertex buffer",
                detail,
            });
        }
    };
    gl.bind_buffer(BufferTarget::Array, Some(vertex_buffer));
    gl.buffer_data(
        BufferTarget::Array,
        bytemuck::cast_slice(&data.vertices),
        usage,
    );

    for attribute in &data.attributes {
        if let Some(index) = program.optional_attrib(gl, attribute.name) {
            gl.enable_vertex_attrib(index);
            gl.vertex_attrib_pointer(index, attribute.components, attribute.byte_offset as i32);
        }
    }

    let index_buffer = match &data.indices {
        Some(indices) => match gl.create_buffer() {
            Ok(buffer) => {
                gl.bind_buffer(BufferTarget::ElementArray, Some(buffer));
                gl.buffer_data(
                    BufferTarget::ElementArray,
                    bytemuck::cast_slice(indices),
                    usage,
                );
                Some(buffer)
            }
            Err(detail) => {
                let _ = gl.delete_buffer(vertex_buffer);
                let _ = gl.delete_vertex_array(vertex_array);
                return Err(RenderError::Allocation {
                    what: "index buffer",
                    detail,
                });
            }
        },
        None => None,
    };

    Ok(GeometryBuffers {
        vertex_array,
        vertex_buffer,
        index_buffer,
    })
}
