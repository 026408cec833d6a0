//! Shader program construction
//!
//! Building is atomic: the result is either a fully linked program or an
//! error, never a handle to a partially linked one. Stage objects are
//! transient; they are deleted on every path out of [`Program::build`].

use tracing::debug;

use super::api::{GraphicsApi, ShaderStage};
use super::error::{ReleaseError, RenderError};

/// A linked GPU program plus name-based location lookup.
///
/// The handle is owned by whoever holds this struct; GPU-side state is
/// freed by [`release`](Self::release).
pub struct Program<G: GraphicsApi> {
    handle: G::Program,
}

impl<G: GraphicsApi> Program<G> {
    /// Compiles both stages and links them.
    ///
    /// A compile failure in either stage returns
    /// [`RenderError::Compile`] without attempting a link. Stage objects
    /// are detached and deleted after a successful link; they are not
    /// needed once the program exists.
    pub fn build(gl: &G, vertex_source: &str, fragment_source: &str) -> Result<Self, RenderError> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
        let fragment = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let handle = match gl.create_program() {
            Ok(handle) => handle,
            Err(detail) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(RenderError::Allocation {
                    what: "shader program",
                    detail,
                });
            }
        };

        gl.attach_shader(handle, vertex);
        gl.attach_shader(handle, fragment);
        let linked = gl.link_program(handle);
        gl.detach_shader(handle, vertex);
        gl.detach_shader(handle, fragment);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !linked {
            let diagnostic = gl.program_info_log(handle);
            let _ = gl.delete_program(handle);
            return Err(RenderError::Link { diagnostic });
        }

        debug!("shader program linked");
        Ok(Self { handle })
    }

    pub fn handle(&self) -> G::Program {
        self.handle
    }

    /// Location of a uniform that the caller requires.
    pub fn uniform(&self, gl: &G, name: &str) -> Result<G::UniformLocation, RenderError> {
        gl.uniform_location(self.handle, name)
            .ok_or_else(|| RenderError::LocationNotFound {
                name: name.to_string(),
            })
    }

    /// Location of a uniform the scene may or may not use. Absence is not
    /// an error; the corresponding per-frame update is simply skipped.
    pub fn optional_uniform(&self, gl: &G, name: &str) -> Option<G::UniformLocation> {
        let location = gl.uniform_location(self.handle, name);
        if location.is_none() {
            debug!(uniform = name, "uniform not present in program, skipping");
        }
        location
    }

    /// Index of a vertex attribute, if the linker kept it.
    pub fn optional_attrib(&self, gl: &G, name: &str) -> Option<u32> {
        let index = gl.attrib_location(self.handle, name);
        if index.is_none() {
            debug!(attribute = name, "attribute not present in program, skipping");
        }
        index
    }

    /// Frees the GPU-side program state.
    pub fn release(self, gl: &G) -> Result<(), ReleaseError> {
        gl.delete_program(self.handle)
            .map_err(|detail| ReleaseError {
                resource: "program",
                detail,
            })
    }
}

fn compile_stage<G: GraphicsApi>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, RenderError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|detail| RenderError::Allocation {
            what: "shader object",
            detail,
        })?;

    gl.shader_source(shader, source);
    if gl.compile_shader(shader) {
        Ok(shader)
    } else {
        let diagnostic = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        Err(RenderError::Compile { stage, diagnostic })
    }
}
