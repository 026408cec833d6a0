//! Test doubles for the graphics binding and the display surface
//!
//! The fake graphics binding hands out integer handles, records every
//! call, and can be told to fail specific operations. The fake surface
//! replays a scripted event stream and counts presents and closes.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use prism::app::surface::{KeyCode, Surface, SurfaceEvent, Wake};
use prism::render::api::{BufferTarget, BufferUsage, GraphicsApi, ShaderStage};
use prism::render::error::SurfaceError;

/// Everything the loop asked the binding to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CompileShader(ShaderStage),
    DeleteShader(u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    BufferData { target: BufferTarget, len: usize },
    BufferSubData { target: BufferTarget, len: usize },
    DeleteBuffer(u32),
    DeleteVertexArray(u32),
    Uniform1(String, f32),
    Uniform2(String, f32, f32),
    Uniform3(String, f32, f32, f32),
    UniformMatrix(String, [f32; 16]),
    SetViewport(i32, i32),
    Clear { depth: bool },
    DrawArrays { first: i32, count: i32 },
    DrawElements { count: i32 },
}

/// A recording in-memory graphics binding.
#[derive(Default)]
pub struct FakeApi {
    next_handle: Cell<u32>,
    live: RefCell<HashSet<u32>>,
    pub calls: RefCell<Vec<Call>>,
    pub double_free: Cell<bool>,

    pub fail_compile_vertex: Cell<bool>,
    pub fail_compile_fragment: Cell<bool>,
    pub fail_link: Cell<bool>,
    pub fail_create_buffer: Cell<bool>,
    pub fail_delete_buffers: Cell<bool>,
    pub fail_delete_vertex_array: Cell<bool>,
    pub fail_delete_program: Cell<bool>,
    /// Uniform names that should resolve to no location.
    pub missing_uniforms: RefCell<HashSet<String>>,

    shader_stages: RefCell<Vec<(u32, ShaderStage)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> u32 {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.live.borrow_mut().insert(handle);
        handle
    }

    fn free(&self, handle: u32) {
        if !self.live.borrow_mut().remove(&handle) {
            self.double_free.set(true);
        }
    }

    /// Handles allocated but not yet freed.
    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn count_calls(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }
}

impl GraphicsApi for FakeApi {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    // The uniform's own name: tests can assert which uniform got which
    // value without tracking location handles.
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let handle = self.allocate();
        self.shader_stages.borrow_mut().push((handle, stage));
        Ok(handle)
    }

    fn shader_source(&self, _shader: u32, _source: &str) {}

    fn compile_shader(&self, shader: u32) -> bool {
        let stage = self
            .shader_stages
            .borrow()
            .iter()
            .find(|(h, _)| *h == shader)
            .map(|(_, s)| *s);
        if let Some(stage) = stage {
            self.record(Call::CompileShader(stage));
            match stage {
                ShaderStage::Vertex => !self.fail_compile_vertex.get(),
                ShaderStage::Fragment => !self.fail_compile_fragment.get(),
            }
        } else {
            false
        }
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "0:1: synthetic diagnostic".to_string()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
        self.free(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        Ok(self.allocate())
    }

    fn attach_shader(&self, _program: u32, _shader: u32) {}

    fn detach_shader(&self, _program: u32, _shader: u32) {}

    fn link_program(&self, program: u32) -> bool {
        self.record(Call::LinkProgram(program));
        !self.fail_link.get()
    }

    fn program_info_log(&self, _program: u32) -> String {
        "error: synthetic link failure".to_string()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) -> Result<(), String> {
        self.record(Call::DeleteProgram(program));
        self.free(program);
        if self.fail_delete_program.get() {
            Err("context gone".to_string())
        } else {
            Ok(())
        }
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        if self.missing_uniforms.borrow().contains(name) {
            None
        } else {
            Some(name.to_string())
        }
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        match name {
            "position" => Some(0),
            "color" => Some(1),
            _ => None,
        }
    }

    fn create_buffer(&self) -> Result<u32, String> {
        if self.fail_create_buffer.get() {
            return Err("out of memory".to_string());
        }
        Ok(self.allocate())
    }

    fn bind_buffer(&self, _target: BufferTarget, _buffer: Option<u32>) {}

    fn buffer_data(&self, target: BufferTarget, data: &[u8], _usage: BufferUsage) {
        self.record(Call::BufferData {
            target,
            len: data.len(),
        });
    }

    fn buffer_sub_data(&self, target: BufferTarget, _offset: i32, data: &[u8]) {
        self.record(Call::BufferSubData {
            target,
            len: data.len(),
        });
    }

    fn delete_buffer(&self, buffer: u32) -> Result<(), String> {
        self.record(Call::DeleteBuffer(buffer));
        self.free(buffer);
        if self.fail_delete_buffers.get() {
            Err("context gone".to_string())
        } else {
            Ok(())
        }
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        Ok(self.allocate())
    }

    fn bind_vertex_array(&self, _vertex_array: Option<u32>) {}

    fn delete_vertex_array(&self, vertex_array: u32) -> Result<(), String> {
        self.record(Call::DeleteVertexArray(vertex_array));
        self.free(vertex_array);
        if self.fail_delete_vertex_array.get() {
            Err("context gone".to_string())
        } else {
            Ok(())
        }
    }

    fn enable_vertex_attrib(&self, _index: u32) {}

    fn vertex_attrib_pointer(&self, _index: u32, _components: i32, _byte_offset: i32) {}

    fn uniform_1_f32(&self, location: &String, x: f32) {
        self.record(Call::Uniform1(location.clone(), x));
    }

    fn uniform_2_f32(&self, location: &String, x: f32, y: f32) {
        self.record(Call::Uniform2(location.clone(), x, y));
    }

    fn uniform_3_f32(&self, location: &String, x: f32, y: f32, z: f32) {
        self.record(Call::Uniform3(location.clone(), x, y, z));
    }

    fn uniform_matrix_4(&self, location: &String, data: &[f32; 16]) {
        self.record(Call::UniformMatrix(location.clone(), *data));
    }

    fn set_viewport(&self, width: i32, height: i32) {
        self.record(Call::SetViewport(width, height));
    }

    fn set_clear_color(&self, _r: f32, _g: f32, _b: f32, _a: f32) {}

    fn enable_depth_test(&self) {}

    fn enable_backface_culling(&self) {}

    fn clear(&self, depth: bool) {
        self.record(Call::Clear { depth });
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        self.record(Call::DrawArrays { first, count });
    }

    fn draw_elements(&self, count: i32) {
        self.record(Call::DrawElements { count });
    }
}

/// A scripted display surface.
pub struct FakeSurface {
    pub events: VecDeque<SurfaceEvent>,
    /// Errors returned by upcoming presents; once empty, presents succeed.
    pub present_results: VecDeque<Result<(), SurfaceError>>,
    pub presents: usize,
    pub closed: usize,
    /// When set, a key press is injected after this many presents.
    pub key_after_presents: Option<(usize, KeyCode)>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            present_results: VecDeque::new(),
            presents: 0,
            closed: 0,
            key_after_presents: None,
        }
    }

    /// Ends the loop by pressing the key once enough frames are out.
    pub fn quit_after(presents: usize, key: KeyCode) -> Self {
        let mut surface = Self::new();
        surface.key_after_presents = Some((presents, key));
        surface
    }
}

impl Surface for FakeSurface {
    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        self.events.pop_front()
    }

    fn wait_for_event(&mut self, timeout: Duration) -> Wake {
        if self.events.is_empty() {
            // Keep tests fast regardless of the configured tick rate.
            std::thread::sleep(timeout.min(Duration::from_millis(2)));
            Wake::Timeout
        } else {
            Wake::Event
        }
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.presents += 1;
        if let Some((after, key)) = self.key_after_presents
            && self.presents >= after
        {
            self.events.push_back(SurfaceEvent::KeyPress(key));
            self.key_after_presents = None;
        }
        self.present_results.pop_front().unwrap_or(Ok(()))
    }

    fn close(&mut self) {
        self.closed += 1;
    }
}
