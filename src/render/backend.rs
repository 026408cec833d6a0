//! `glow`-backed implementation of the graphics-binding boundary
//!
//! The embedder creates the `glow::Context` (from a native loader or a
//! WebGL2 canvas) and hands it over; everything here is a thin translation
//! of [`GraphicsApi`](super::api::GraphicsApi) calls onto it.

use glow::HasContext;

use super::api::{BufferTarget, BufferUsage, GraphicsApi, ShaderStage};

pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Direct access for embedders that need GL state this boundary does
    /// not cover.
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

fn stage_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn target_kind(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn usage_kind(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
    }
}

impl GraphicsApi for GlowBackend {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(stage_kind(stage)) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) -> bool {
        unsafe {
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) -> bool {
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) -> Result<(), String> {
        unsafe { self.gl.delete_program(program) };
        Ok(())
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(target_kind(target), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(target_kind(target), data, usage_kind(usage))
        }
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: i32, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_sub_data_u8_slice(target_kind(target), offset, data)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) -> Result<(), String> {
        unsafe { self.gl.delete_buffer(buffer) };
        Ok(())
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) -> Result<(), String> {
        unsafe { self.gl.delete_vertex_array(vertex_array) };
        Ok(())
    }

    fn enable_vertex_attrib(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer(&self, index: u32, components: i32, byte_offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, components, glow::FLOAT, false, 0, byte_offset)
        }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), x) }
    }

    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(Some(location), x, y) }
    }

    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { self.gl.uniform_3_f32(Some(location), x, y, z) }
    }

    fn uniform_matrix_4(&self, location: &Self::UniformLocation, data: &[f32; 16]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, data)
        }
    }

    fn set_viewport(&self, width: i32, height: i32) {
        unsafe { self.gl.viewport(0, 0, width, height) }
    }

    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn enable_depth_test(&self) {
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(glow::LEQUAL);
            self.gl.depth_mask(true);
        }
    }

    fn enable_backface_culling(&self) {
        unsafe {
            self.gl.enable(glow::CULL_FACE);
            self.gl.cull_face(glow::BACK);
            self.gl.front_face(glow::CW);
        }
    }

    fn clear(&self, depth: bool) {
        let mut mask = glow::COLOR_BUFFER_BIT;
        if depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe { self.gl.clear(mask) }
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) }
    }

    fn draw_elements(&self, count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_SHORT, 0)
        }
    }
}
