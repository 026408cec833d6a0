//! The graphics-binding boundary
//!
//! The render loop never talks to a GL context directly; it goes through
//! this trait. The production implementation lives in
//! [`backend`](crate::render::backend); tests substitute a recording fake.
//!
//! The surface is intentionally small: exactly the primitives the tutorial
//! scenes consume, nothing more.

use std::fmt;

/// The two shader stages a program is linked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Buffer binding points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

/// Upload frequency hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times.
    Static,
    /// Rewritten every frame.
    Dynamic,
}

/// The graphics primitives the render loop consumes.
///
/// Handle types are opaque and owned by the caller; the implementation must
/// not free anything behind the caller's back. `delete_*` methods on the
/// long-lived resources return a diagnostic on failure so shutdown can
/// aggregate release errors instead of aborting midway.
pub trait GraphicsApi {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type VertexArray: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    // Shader stages.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    /// Compiles and reports success. The diagnostic for a failed compile is
    /// fetched separately via [`shader_info_log`](Self::shader_info_log).
    fn compile_shader(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    // Programs.
    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program) -> Result<(), String>;

    // Location lookup. `None` means the name does not exist in the linked
    // program (which callers may treat as "feature absent").
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    // Buffers.
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    /// Partial upload into the currently bound buffer.
    fn buffer_sub_data(&self, target: BufferTarget, offset: i32, data: &[u8]);
    fn delete_buffer(&self, buffer: Self::Buffer) -> Result<(), String>;

    // Vertex arrays.
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) -> Result<(), String>;
    fn enable_vertex_attrib(&self, index: u32);
    /// Tightly packed float attribute at a byte offset into the bound buffer.
    fn vertex_attrib_pointer(&self, index: u32, components: i32, byte_offset: i32);

    // Uniforms. Matrices are column-major.
    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32);
    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32);
    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_matrix_4(&self, location: &Self::UniformLocation, data: &[f32; 16]);

    // Frame state.
    fn set_viewport(&self, width: i32, height: i32);
    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn enable_depth_test(&self);
    /// Back-face culling with clockwise front faces, matching the winding
    /// of the built-in scene geometry.
    fn enable_backface_culling(&self);
    /// Clears the color buffer, and the depth buffer too when asked.
    fn clear(&self, depth: bool);

    // Draws. Triangles only; indices are u16 starting at the front of the
    // bound element buffer.
    fn draw_arrays(&self, first: i32, count: i32);
    fn draw_elements(&self, count: i32);
}
