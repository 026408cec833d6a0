//! The render loop
//!
//! Owns the loop state machine: resources are acquired in `Initializing`,
//! frames are produced in `Running` at a fixed tick rate, and `Draining`
//! releases everything exactly once before the loop reports `Closed`.
//!
//! Pacing uses a single cooperative wait per tick. Between ticks the loop
//! parks in [`Surface::wait_for_event`] with the time remaining until the
//! next deadline; an early wake drains pending events and goes back to
//! waiting, so input stays responsive without busy-spinning.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::render::api::{BufferTarget, BufferUsage, GraphicsApi};
use crate::render::error::{ReleaseError, RenderError, SurfaceError};
use crate::render::geometry::{self, GeometryBuffers};
use crate::render::program::Program;
use crate::scene::{Anchor, Draw, GeometryMode, Projection, SceneSpec, UniformValue};

use super::clock::AnimationClock;
use super::config::AppConfig;
use super::surface::{KeyCode, Surface, SurfaceEvent, Wake};

/// Lifecycle of the loop. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Draining,
    Closed,
}

/// Current drawable size. GL divides by the aspect ratio, so a zero
/// dimension is clamped rather than propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        let mut viewport = Self { width: 1, height: 1 };
        viewport.set(width, height);
        viewport
    }

    fn set(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!(width, height, "degenerate viewport dimensions, clamping to 1");
        }
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Locations of the well-known uniforms, resolved once after link. A
/// scene that does not declare one simply gets no update for it.
struct UniformSet<G: GraphicsApi> {
    camera_to_clip: Option<G::UniformLocation>,
    model_to_camera: Option<G::UniformLocation>,
    offset: Option<G::UniformLocation>,
    time: Option<G::UniformLocation>,
}

impl<G: GraphicsApi> UniformSet<G> {
    fn resolve(gl: &G, program: &Program<G>) -> Self {
        Self {
            camera_to_clip: program.optional_uniform(gl, "camera_to_clip"),
            model_to_camera: program.optional_uniform(gl, "model_to_camera"),
            offset: program.optional_uniform(gl, "offset"),
            time: program.optional_uniform(gl, "time"),
        }
    }
}

/// Everything acquired during initialization and released during drain.
struct SceneResources<G: GraphicsApi> {
    program: Program<G>,
    buffers: GeometryBuffers<G>,
    uniforms: UniformSet<G>,
}

/// Drives one scene on one surface until the quit key arrives or the
/// surface is lost.
pub struct RenderLoop<G: GraphicsApi, S: Surface> {
    gl: G,
    surface: S,
    scene: SceneSpec,
    tick_period: Duration,
    quit_key: KeyCode,
    state: LoopState,
    viewport: Viewport,
    clock: AnimationClock,
    resources: Option<SceneResources<G>>,
    // Scratch block for rewrite-mode scenes, reused across frames.
    scratch: Vec<f32>,
}

impl<G: GraphicsApi, S: Surface> RenderLoop<G, S> {
    pub fn new(gl: G, surface: S, scene: SceneSpec, config: &AppConfig) -> Self {
        let (width, height) = config.window.parse_geometry().unwrap_or((500, 500));
        let tick_rate = config.runtime.tick_rate_hz.max(1);
        Self {
            gl,
            surface,
            scene,
            tick_period: Duration::from_secs(1) / tick_rate,
            quit_key: config.runtime.quit_key,
            state: LoopState::Initializing,
            viewport: Viewport::new(width, height),
            clock: AnimationClock::start(),
            resources: None,
            scratch: Vec::new(),
        }
    }

    /// Runs the loop to completion. On return the loop is `Closed` and all
    /// GPU resources have been released, whether the run succeeded or not.
    pub fn run(&mut self) -> Result<(), RenderError> {
        if self.state != LoopState::Initializing {
            return Ok(());
        }

        if let Err(e) = self.initialize() {
            error!(error = %e, scene = self.scene.name, "scene initialization failed");
            self.drain();
            return Err(e);
        }

        let mut next_tick = Instant::now();
        while self.state == LoopState::Running {
            let now = Instant::now();
            if now < next_tick {
                match self.surface.wait_for_event(next_tick - now) {
                    Wake::Event => {
                        // Handle input promptly, then resume waiting out
                        // the remainder of the tick.
                        self.drain_events();
                        continue;
                    }
                    Wake::Timeout => {}
                }
            }

            self.tick();

            next_tick += self.tick_period;
            // After a long stall, rebase instead of producing a burst of
            // catch-up frames.
            let now = Instant::now();
            if next_tick < now {
                next_tick = now;
            }
        }

        self.drain();
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), RenderError> {
        let [r, g, b, a] = self.scene.clear_color;
        self.gl.set_clear_color(r, g, b, a);
        if self.scene.depth_test {
            self.gl.enable_depth_test();
        }
        if self.scene.cull_back_faces {
            self.gl.enable_backface_culling();
        }

        let program = Program::build(
            &self.gl,
            self.scene.vertex_shader,
            self.scene.fragment_shader,
        )?;
        let uniforms = UniformSet::resolve(&self.gl, &program);

        let usage = match self.scene.geometry_mode {
            GeometryMode::Static => BufferUsage::Static,
            GeometryMode::Rewrite(_) => BufferUsage::Dynamic,
        };
        let buffers = match geometry::upload(&self.gl, &program, &self.scene.geometry, usage) {
            Ok(buffers) => buffers,
            Err(e) => {
                if let Err(release) = program.release(&self.gl) {
                    warn!(error = %release, "release failed during init unwind");
                }
                return Err(e);
            }
        };

        self.gl.use_program(Some(program.handle()));
        for (name, value) in &self.scene.init_uniforms {
            if let Some(location) = program.optional_uniform(&self.gl, name) {
                match *value {
                    UniformValue::F1(x) => self.gl.uniform_1_f32(&location, x),
                    UniformValue::F2(x, y) => self.gl.uniform_2_f32(&location, x, y),
                    UniformValue::F3(x, y, z) => self.gl.uniform_3_f32(&location, x, y, z),
                }
            }
        }

        self.gl
            .set_viewport(self.viewport.width as i32, self.viewport.height as i32);

        self.resources = Some(SceneResources {
            program,
            buffers,
            uniforms,
        });
        self.push_projection();

        self.clock = AnimationClock::start();
        self.state = LoopState::Running;
        info!(
            scene = self.scene.name,
            width = self.viewport.width,
            height = self.viewport.height,
            tick_period_ms = self.tick_period.as_millis() as u64,
            "render loop running"
        );
        Ok(())
    }

    /// One tick: events, then geometry, then a frame.
    fn tick(&mut self) {
        if self.state != LoopState::Running {
            return;
        }

        self.drain_events();
        if self.state != LoopState::Running {
            return;
        }

        self.update_geometry();
        self.draw_frame();

        match self.surface.present() {
            Ok(()) => {}
            Err(SurfaceError::Lost) => {
                warn!("surface lost, shutting down");
                self.state = LoopState::Draining;
            }
            Err(SurfaceError::Present(detail)) => {
                // A single failed present is not fatal; the next tick
                // draws a complete frame anyway.
                warn!(%detail, "frame presentation failed");
            }
        }
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.surface.poll_event() {
            match event {
                SurfaceEvent::KeyPress(key) if key == self.quit_key => {
                    info!(?key, "quit key pressed");
                    self.state = LoopState::Draining;
                }
                SurfaceEvent::KeyPress(key) => {
                    debug!(?key, "ignoring key press");
                }
                SurfaceEvent::Resized { width, height } => {
                    self.handle_resize(width, height);
                }
                SurfaceEvent::Damaged => {
                    // Every tick redraws in full; nothing to do.
                }
            }
        }
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        self.viewport.set(width, height);
        self.gl
            .set_viewport(self.viewport.width as i32, self.viewport.height as i32);
        self.push_projection();
        debug!(
            width = self.viewport.width,
            height = self.viewport.height,
            "viewport resized"
        );
    }

    /// Re-pushes the projection matrix for the current aspect ratio. A
    /// no-op for clip-space scenes and programs without the uniform.
    fn push_projection(&self) {
        let Some(resources) = &self.resources else {
            return;
        };
        let Projection::Perspective(params) = self.scene.projection else {
            return;
        };
        if let Some(location) = &resources.uniforms.camera_to_clip {
            let matrix = params.matrix(self.viewport.aspect());
            self.gl.uniform_matrix_4(location, matrix.as_array());
        }
    }

    fn update_geometry(&mut self) {
        let GeometryMode::Rewrite(rewrite) = self.scene.geometry_mode else {
            return;
        };
        let Some(resources) = &self.resources else {
            return;
        };
        let base = &self.scene.geometry.vertices;
        self.scratch.resize(base.len(), 0.0);
        rewrite(base, &mut self.scratch, self.clock.elapsed());
        resources.buffers.upload_vertices(&self.gl, &self.scratch);
    }

    fn draw_frame(&self) {
        let Some(resources) = &self.resources else {
            return;
        };
        let elapsed = self.clock.elapsed();

        if let Some(location) = &resources.uniforms.time {
            self.gl.uniform_1_f32(location, elapsed.as_secs_f32());
        }

        self.gl.clear(self.scene.depth_test);

        for object in &self.scene.objects {
            match object.anchor {
                Anchor::ModelMatrix(motion) => {
                    if let Some(location) = &resources.uniforms.model_to_camera {
                        let matrix = motion.model_matrix(elapsed);
                        self.gl.uniform_matrix_4(location, matrix.as_array());
                    }
                }
                Anchor::Offset2(motion) => {
                    if let Some(location) = &resources.uniforms.offset {
                        let [x, y, _] = motion.position(elapsed);
                        self.gl.uniform_2_f32(location, x, y);
                    }
                }
                Anchor::Offset3(motion) => {
                    if let Some(location) = &resources.uniforms.offset {
                        let [x, y, z] = motion.position(elapsed);
                        self.gl.uniform_3_f32(location, x, y, z);
                    }
                }
            }
            match object.draw {
                Draw::Arrays { first, count } => self.gl.draw_arrays(first, count),
                Draw::Elements { count } => self.gl.draw_elements(count),
            }
        }
    }

    /// Releases everything. Safe to call more than once; after the first
    /// call the loop is `Closed` and later calls return immediately.
    pub fn drain(&mut self) -> Vec<ReleaseError> {
        if self.state == LoopState::Closed {
            return Vec::new();
        }
        self.state = LoopState::Draining;
        info!(scene = self.scene.name, "draining render loop");

        let mut failures = Vec::new();
        if let Some(resources) = self.resources.take() {
            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(BufferTarget::Array, None);
            self.gl.bind_buffer(BufferTarget::ElementArray, None);
            self.gl.use_program(None);

            failures.extend(resources.buffers.release(&self.gl));
            if let Err(e) = resources.program.release(&self.gl) {
                failures.push(e);
            }
        }
        self.surface.close();
        self.state = LoopState::Closed;

        for failure in &failures {
            warn!(error = %failure, "resource release failed");
        }
        if failures.is_empty() {
            info!("render loop closed");
        } else {
            warn!(
                count = failures.len(),
                "render loop closed with release failures"
            );
        }
        failures
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
