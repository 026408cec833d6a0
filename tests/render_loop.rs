//! Integration tests for the render loop
//!
//! Everything runs against the in-memory graphics binding and a scripted
//! surface, so the full lifecycle (build, run, resize, drain) is exercised
//! without a GPU or a window.

mod common;

use std::time::Duration;

use common::{Call, FakeApi, FakeSurface};
use prism::app::surface::SurfaceEvent;
use prism::app::{AppConfig, KeyCode, LoopState, RenderLoop, RuntimeConfig, WindowConfig};
use prism::render::api::{BufferTarget, BufferUsage, ShaderStage};
use prism::render::error::SurfaceError;
use prism::render::{Program, RenderError, geometry};
use prism::scene::catalog;

fn test_config(scene: &str) -> AppConfig {
    AppConfig {
        profile: "test".to_string(),
        window: WindowConfig {
            title: "test".to_string(),
            geometry: "500x500".to_string(),
            api_version: "3.2".to_string(),
        },
        runtime: RuntimeConfig {
            // High tick rate keeps test wall time short.
            tick_rate_hz: 250,
            quit_key: KeyCode::Escape,
            scene: scene.to_string(),
        },
    }
}

fn scene(name: &str) -> prism::scene::SceneSpec {
    catalog::by_name(name).unwrap()
}

const VERT: &str = "#version 150\nvoid main() {}\n";
const FRAG: &str = "#version 150\nvoid main() {}\n";

#[test]
fn test_compile_failure_skips_link_and_frees_shaders() {
    let gl = FakeApi::new();
    gl.fail_compile_fragment.set(true);

    let result = Program::build(&gl, VERT, FRAG);
    match result {
        Err(RenderError::Compile { stage, diagnostic }) => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert!(!diagnostic.is_empty());
        }
        other => panic!("expected a fragment compile error, got {:?}", other.err()),
    }

    assert_eq!(gl.count_calls(|c| matches!(c, Call::LinkProgram(_))), 0);
    assert_eq!(gl.live_objects(), 0);
}

#[test]
fn test_vertex_compile_failure_skips_link_and_frees_shaders() {
    let gl = FakeApi::new();
    gl.fail_compile_vertex.set(true);

    let result = Program::build(&gl, VERT, FRAG);
    match result {
        Err(RenderError::Compile { stage, diagnostic }) => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!diagnostic.is_empty());
        }
        other => panic!("expected a vertex compile error, got {:?}", other.err()),
    }

    assert_eq!(gl.count_calls(|c| matches!(c, Call::LinkProgram(_))), 0);
    assert_eq!(gl.live_objects(), 0);
}

#[test]
fn test_link_failure_frees_program() {
    let gl = FakeApi::new();
    gl.fail_link.set(true);

    let result = Program::build(&gl, VERT, FRAG);
    assert!(matches!(result, Err(RenderError::Link { .. })));
    assert_eq!(gl.live_objects(), 0);
}

#[test]
fn test_successful_build_frees_stage_objects() {
    let gl = FakeApi::new();
    let program = Program::build(&gl, VERT, FRAG).unwrap();

    // Only the linked program survives; both shader objects are gone.
    assert_eq!(gl.live_objects(), 1);
    assert_eq!(gl.count_calls(|c| matches!(c, Call::DeleteShader(_))), 2);

    program.release(&gl).unwrap();
    assert_eq!(gl.live_objects(), 0);
}

#[test]
fn test_required_uniform_lookup_failure_is_recoverable() {
    let gl = FakeApi::new();
    gl.missing_uniforms.borrow_mut().insert("nope".to_string());

    let program = Program::build(&gl, VERT, FRAG).unwrap();
    let result = program.uniform(&gl, "nope");
    match result {
        Err(RenderError::LocationNotFound { name }) => assert_eq!(name, "nope"),
        other => panic!("expected a lookup failure, got {:?}", other.err()),
    }

    // The program is still usable afterwards.
    assert!(program.optional_uniform(&gl, "offset").is_some());
    program.release(&gl).unwrap();
}

#[test]
fn test_full_run_quits_on_quit_key() {
    let gl = FakeApi::new();
    let surface = FakeSurface::quit_after(3, KeyCode::Escape);
    let config = test_config("moving-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("moving-triangle"), &config);

    render_loop.run().unwrap();

    assert_eq!(render_loop.state(), LoopState::Closed);
    assert_eq!(render_loop.surface().closed, 1);
    assert!(render_loop.surface().presents >= 3);
    // Every acquired GL object was released.
    assert_eq!(render_loop.gl().live_objects(), 0);
    assert!(!render_loop.gl().double_free.get());
}

#[test]
fn test_frames_push_offset_and_draw() {
    let gl = FakeApi::new();
    let surface = FakeSurface::quit_after(3, KeyCode::Escape);
    let config = test_config("moving-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("moving-triangle"), &config);

    render_loop.run().unwrap();

    let presents = render_loop.surface().presents;
    let offsets = render_loop
        .gl()
        .count_calls(|c| matches!(c, Call::Uniform2(name, _, _) if name == "offset"));
    let draws = render_loop
        .gl()
        .count_calls(|c| matches!(c, Call::DrawArrays { first: 0, count: 3 }));
    assert_eq!(offsets, presents);
    assert_eq!(draws, presents);
}

#[test]
fn test_non_quit_keys_are_ignored() {
    let gl = FakeApi::new();
    let mut surface = FakeSurface::quit_after(2, KeyCode::Escape);
    surface
        .events
        .push_back(SurfaceEvent::KeyPress(KeyCode::Space));
    let config = test_config("moving-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("moving-triangle"), &config);

    render_loop.run().unwrap();
    assert!(render_loop.surface().presents >= 2);
    assert_eq!(render_loop.state(), LoopState::Closed);
}

#[test]
fn test_resize_updates_viewport_and_projection() {
    let gl = FakeApi::new();
    let mut surface = FakeSurface::quit_after(2, KeyCode::Escape);
    surface.events.push_back(SurfaceEvent::Resized {
        width: 800,
        height: 400,
    });
    let config = test_config("perspective-prism");
    let mut render_loop = RenderLoop::new(gl, surface, scene("perspective-prism"), &config);

    render_loop.run().unwrap();

    let viewport = render_loop.viewport();
    assert_eq!((viewport.width(), viewport.height()), (800, 400));
    assert_eq!(
        render_loop
            .gl()
            .count_calls(|c| matches!(c, Call::SetViewport(800, 400))),
        1
    );

    // frustum_scale 1.0 at aspect 2.0 lands 0.5 in the first entry; the
    // fov term is untouched.
    let calls = render_loop.gl().calls.borrow();
    let rescaled = calls.iter().any(|c| {
        matches!(c, Call::UniformMatrix(name, m)
            if name == "camera_to_clip" && (m[0] - 0.5).abs() < 1e-6 && m[5] == 1.0)
    });
    assert!(rescaled, "no projection push for the resized aspect ratio");
}

#[test]
fn test_last_of_several_resizes_in_one_frame_wins() {
    let gl = FakeApi::new();
    let mut surface = FakeSurface::quit_after(2, KeyCode::Escape);
    surface.events.push_back(SurfaceEvent::Resized {
        width: 640,
        height: 480,
    });
    surface.events.push_back(SurfaceEvent::Resized {
        width: 800,
        height: 400,
    });
    let config = test_config("perspective-prism");
    let mut render_loop = RenderLoop::new(gl, surface, scene("perspective-prism"), &config);

    render_loop.run().unwrap();

    let viewport = render_loop.viewport();
    assert_eq!((viewport.width(), viewport.height()), (800, 400));
    // Both resizes were applied in arrival order, so the last projection
    // push before any draw reflects the final aspect ratio.
    assert_eq!(
        render_loop
            .gl()
            .count_calls(|c| matches!(c, Call::SetViewport(640, 480))),
        1
    );
    assert_eq!(
        render_loop
            .gl()
            .count_calls(|c| matches!(c, Call::SetViewport(800, 400))),
        1
    );
}

#[test]
fn test_degenerate_resize_is_clamped() {
    let gl = FakeApi::new();
    let mut surface = FakeSurface::quit_after(2, KeyCode::Escape);
    surface.events.push_back(SurfaceEvent::Resized {
        width: 0,
        height: 400,
    });
    let config = test_config("perspective-prism");
    let mut render_loop = RenderLoop::new(gl, surface, scene("perspective-prism"), &config);

    render_loop.run().unwrap();

    let viewport = render_loop.viewport();
    assert_eq!((viewport.width(), viewport.height()), (1, 400));
    assert!(viewport.aspect() > 0.0);
}

#[test]
fn test_rewrite_scene_uploads_every_tick() {
    let gl = FakeApi::new();
    let surface = FakeSurface::quit_after(3, KeyCode::Escape);
    let config = test_config("drifting-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("drifting-triangle"), &config);

    render_loop.run().unwrap();

    let presents = render_loop.surface().presents;
    let rewrites = render_loop.gl().count_calls(|c| {
        matches!(c, Call::BufferSubData { target: BufferTarget::Array, len: 24 })
    });
    assert_eq!(rewrites, presents);
}

#[test]
fn test_indexed_scene_draws_elements_per_object() {
    let gl = FakeApi::new();
    let surface = FakeSurface::quit_after(2, KeyCode::Escape);
    let config = test_config("orbiting-prisms");
    let mut render_loop = RenderLoop::new(gl, surface, scene("orbiting-prisms"), &config);

    render_loop.run().unwrap();

    let presents = render_loop.surface().presents;
    let draws = render_loop
        .gl()
        .count_calls(|c| matches!(c, Call::DrawElements { count: 24 }));
    let matrices = render_loop
        .gl()
        .count_calls(|c| matches!(c, Call::UniformMatrix(name, _) if name == "model_to_camera"));
    // Three objects per frame, each with its own model matrix.
    assert_eq!(draws, presents * 3);
    assert_eq!(matrices, presents * 3);
    // Depth buffer cleared along with color.
    assert!(render_loop.gl().count_calls(|c| matches!(c, Call::Clear { depth: true })) >= presents);
}

#[test]
fn test_lost_surface_drains_cleanly() {
    let gl = FakeApi::new();
    let mut surface = FakeSurface::new();
    surface.present_results.push_back(Err(SurfaceError::Lost));
    let config = test_config("moving-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("moving-triangle"), &config);

    render_loop.run().unwrap();

    assert_eq!(render_loop.state(), LoopState::Closed);
    assert_eq!(render_loop.surface().closed, 1);
    assert_eq!(render_loop.gl().live_objects(), 0);
}

#[test]
fn test_transient_present_failure_does_not_stop_the_loop() {
    let gl = FakeApi::new();
    let mut surface = FakeSurface::quit_after(3, KeyCode::Escape);
    surface
        .present_results
        .push_back(Err(SurfaceError::Present("swap interrupted".to_string())));
    let config = test_config("moving-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("moving-triangle"), &config);

    render_loop.run().unwrap();

    // The failed present still counts; the loop carried on past it.
    assert!(render_loop.surface().presents >= 3);
    assert_eq!(render_loop.state(), LoopState::Closed);
}

#[test]
fn test_drain_is_idempotent() {
    let gl = FakeApi::new();
    let surface = FakeSurface::quit_after(1, KeyCode::Escape);
    let config = test_config("moving-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("moving-triangle"), &config);

    render_loop.run().unwrap();
    assert_eq!(render_loop.state(), LoopState::Closed);

    let failures = render_loop.drain();
    assert!(failures.is_empty());
    assert_eq!(render_loop.surface().closed, 1);
    assert!(!render_loop.gl().double_free.get());
}

#[test]
fn test_release_failures_are_aggregated() {
    let gl = FakeApi::new();
    let program = Program::build(&gl, VERT, FRAG).unwrap();
    let data = scene("orbiting-prisms").geometry;
    let buffers = geometry::upload(&gl, &program, &data, BufferUsage::Static).unwrap();

    gl.fail_delete_buffers.set(true);
    gl.fail_delete_vertex_array.set(true);

    let failures = buffers.release(&gl);
    // Index buffer, vertex buffer, and vertex array all failed, and all
    // three deletions were still attempted.
    assert_eq!(failures.len(), 3);
    assert_eq!(gl.count_calls(|c| matches!(c, Call::DeleteBuffer(_))), 2);
    assert_eq!(gl.count_calls(|c| matches!(c, Call::DeleteVertexArray(_))), 1);

    program.release(&gl).unwrap();
}

#[test]
fn test_init_allocation_failure_unwinds_program() {
    let gl = FakeApi::new();
    gl.fail_create_buffer.set(true);
    let surface = FakeSurface::new();
    let config = test_config("moving-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("moving-triangle"), &config);

    let result = render_loop.run();
    assert!(matches!(result, Err(RenderError::Allocation { .. })));
    assert_eq!(render_loop.state(), LoopState::Closed);
    assert_eq!(render_loop.gl().live_objects(), 0);
    assert_eq!(render_loop.surface().closed, 1);
}

#[test]
fn test_run_after_close_is_a_no_op() {
    let gl = FakeApi::new();
    let surface = FakeSurface::quit_after(1, KeyCode::Escape);
    let config = test_config("moving-triangle");
    let mut render_loop = RenderLoop::new(gl, surface, scene("moving-triangle"), &config);

    render_loop.run().unwrap();
    let presents = render_loop.surface().presents;

    // A second run must not reacquire resources or draw anything.
    render_loop.run().unwrap();
    assert_eq!(render_loop.surface().presents, presents);
    assert_eq!(render_loop.state(), LoopState::Closed);
}

#[test]
fn test_animation_positions_are_absolute() {
    // Two loops over the same scene at different wall-clock times still
    // agree on the orbit for a given elapsed time.
    let motion = prism::math::Motion::CircularOrbit {
        period: Duration::from_secs(12),
        radius: 5.0,
        height: -3.5,
        center_z: -20.0,
    };
    let early = motion.position(Duration::from_secs(3));
    let late = motion.position(Duration::from_secs(12 * 1000 + 3));
    for i in 0..3 {
        assert!((early[i] - late[i]).abs() < 1e-4);
    }
}
