#![allow(dead_code)]
use std::{
    thread,
    time::{Duration, Instant},
};

use sdl2::{event::WindowEvent, keyboard::Keycode, video};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod render;
mod render_vec;
mod shader;
mod vertex;

use render::{clear, gl_upd_viewport, Mesh};
use shader::ShaderProgram;
use vertex::Vertex;

/// This determines all values related to framecapping!
///
/// Note: this is SOFT due to the fact that we may or may not sleep
/// less, since we do calculations to not over-sleep, which may not
/// be perfect because for some reason keeping time is difficult
const SOFT_FPS_CAP: u64 = 120;

const OPENGL_MAJOR_VER: u8 = 3;
const OPENGL_MINOR_VER: u8 = 3;

const MAX_MICROS_BETWEEN_FRAMES: u64 = 1_000_000 / SOFT_FPS_CAP;

const DURATION_BETWEEN_FRAMES: Duration = Duration::from_micros(MAX_MICROS_BETWEEN_FRAMES);

const START_WIDTH: u32 = 1024;
const START_HEIGHT: u32 = 768;
const WINDOW_TITLE: &str = "shader sandbox";

const VERT_SHADER_PATH: &str = "glsl/vert_shader.glsl";
const FRAG_SHADER_PATH: &str = "glsl/frag_shader.glsl";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        error!("fatal: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (sdl_ctx, video_ctx, window, main_id) = init_sdl()?;
    gl::load_with(|s| video_ctx.gl_get_proc_address(s).cast());

    let mut event_pump = sdl_ctx.event_pump()?;

    let gl_ctx = window.gl_create_context()?;

    gl_upd_viewport(START_WIDTH, START_HEIGHT);

    let program = ShaderProgram::from_files(VERT_SHADER_PATH, FRAG_SHADER_PATH)?;
    info!("shader program ready (id {})", program.id());

    // The quad from the element-buffer lesson: four corners, two triangles.
    let vertices = [
        Vertex::new(0.5, 0.5, 0.0),
        Vertex::new(0.5, -0.5, 0.0),
        Vertex::new(-0.5, -0.5, 0.0),
        Vertex::new(-0.5, 0.5, 0.0),
    ];
    let indices: [u32; 6] = [0, 1, 3, 1, 2, 3];
    let mesh = Mesh::upload(&gl_ctx, &vertices, &indices);

    let mut frame_width: u32 = START_WIDTH;
    let mut frame_height: u32 = START_HEIGHT;

    let mut frametime_collector = Vec::with_capacity(SOFT_FPS_CAP as usize);
    let mut last_debug_check = Instant::now();
    let start = Instant::now();

    'going: loop {
        let instant_loop_start = Instant::now();
        for event in event_pump.poll_iter() {
            use sdl2::event::Event as Ev;
            match event {
                Ev::Quit { .. }
                | Ev::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => {
                    break 'going;
                }
                Ev::Window {
                    window_id,
                    win_event: WindowEvent::Resized(width, height),
                    ..
                } if window_id == main_id => {
                    frame_width = width.try_into().unwrap_or(START_WIDTH);
                    frame_height = height.try_into().unwrap_or(START_HEIGHT);
                }
                _ => {}
            }
        }

        gl_upd_viewport(frame_width, frame_height);
        clear();

        // Pulse the quad on the green channel.
        let time = start.elapsed().as_secs_f32();
        let green = (time.sin() / 2.0) + 0.5;
        program.set_vec4("ourColor", [0.0, green, 0.0, 1.0]);

        mesh.draw(&program);

        window.gl_swap_window();

        let instant_before_sleep = Instant::now();
        // Soft cap fps
        thread::sleep(
            DURATION_BETWEEN_FRAMES
                .checked_sub(instant_before_sleep.duration_since(instant_loop_start))
                .unwrap_or(Duration::ZERO),
        );

        let frametime = Instant::now()
            .duration_since(instant_loop_start)
            .as_secs_f64();
        frametime_collector.push(frametime);

        // If it's been over a second since
        // last debug print, print it
        if Instant::now()
            .duration_since(last_debug_check)
            .as_secs()
            >= 1
        {
            let total_time: f64 = frametime_collector.iter().sum();
            let len_float: f64 = frametime_collector.len() as f64;
            let avg_time: f64 = total_time / len_float;
            debug!(
                "frametime: {avg_time:0.8}, FPS: {:0.8}, frames counted: {:05}",
                1. / avg_time,
                frametime_collector.len()
            );

            frametime_collector.clear();
            last_debug_check = Instant::now();
        }
    }

    Ok(())
}

fn init_sdl() -> Result<(sdl2::Sdl, sdl2::VideoSubsystem, video::Window, u32), String> {
    let sdl_ctx = sdl2::init()?;

    let video_ctx = sdl_ctx.video()?;
    video_ctx.gl_load_library_default()?;

    video_ctx
        .gl_attr()
        .set_context_flags()
        .forward_compatible()
        .set();
    video_ctx
        .gl_attr()
        .set_context_major_version(OPENGL_MAJOR_VER);
    video_ctx
        .gl_attr()
        .set_context_minor_version(OPENGL_MINOR_VER);
    video_ctx
        .gl_attr()
        .set_context_profile(video::GLProfile::Core);

    let window = video_ctx
        .window(WINDOW_TITLE, START_WIDTH, START_HEIGHT)
        .position_centered()
        .resizable()
        .opengl()
        .build()
        .map_err(|err| format!("Error creating window: {err}"))?;

    let main_id = window.id();
    Ok((sdl_ctx, video_ctx, window, main_id))
}
