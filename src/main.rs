// Declare modules directly in the binary crate root
pub mod camera;
pub mod config;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod render;
pub mod shader;
pub mod state;
pub mod ui;
pub mod vertex_array;

use crate::config::Config;
use crate::state::State;

use anyhow::Result;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};
use std::sync::Arc;

async fn run(event_loop: EventLoop<()>, window: Arc<Window>, settings: Config) -> Result<()> {
    let mut state = Some(State::new(window, settings).await?);
    if let Some(state) = &state {
        state.window.request_redraw();
    }

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Wait);

        if let Event::LoopExiting = event {
            // Taking the state out guarantees GPU resources are released once.
            if let Some(state) = state.take() {
                state.release();
            }
            return;
        }

        let Some(state) = state.as_mut() else {
            return;
        };

        match event {
            Event::WindowEvent { window_id, ref event }
                if window_id == state.window.id() =>
            {
                // Pass window-specific events to egui_winit FIRST
                let response = state.egui_winit_state.on_window_event(&state.window, event);

                if response.repaint {
                    state.window.request_redraw();
                }

                // The board still needs resize, redraw and close even when egui used them.
                let consumed_by_egui = response.consumed
                    && !matches!(
                        event,
                        WindowEvent::Resized(_) | WindowEvent::RedrawRequested | WindowEvent::CloseRequested
                    );

                if consumed_by_egui {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(*new_size);
                        state.window.request_redraw();
                    }
                    WindowEvent::MouseInput { state: element_state, button, .. } => {
                        input::handle_mouse_input(state, *button, *element_state);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        input::handle_cursor_move(state, *position);
                    }
                    WindowEvent::CursorLeft { .. } => {
                        input::handle_cursor_left(state);
                    }
                    WindowEvent::KeyboardInput { event: key_event, .. } => {
                        input::handle_keyboard_input(key_event);
                    }
                    WindowEvent::RedrawRequested => match state.update_and_render() {
                        Ok(frame) => {
                            ui::draw_overlay(state, &frame);
                            frame.present();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory, exiting.");
                            window_target.exit();
                        }
                        Err(e) => {
                            // Lost was already handled by reconfiguring; the rest are transient.
                            log::warn!("Skipping frame due to surface {:?}", e);
                            state.window.request_redraw();
                        }
                    },
                    _ => (),
                }
            }
            _ => (),
        }
    })?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = start() {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn start() -> Result<()> {
    let settings = Config::default();
    let event_loop = EventLoop::new()?;

    let initial_size = winit::dpi::LogicalSize::new(settings.window_width as f64, settings.window_height as f64);

    let window = Arc::new(WindowBuilder::new()
        .with_title(settings.title.as_str())
        .with_inner_size(initial_size)
        .with_resizable(true)
        .build(&event_loop)?);

    pollster::block_on(run(event_loop, window, settings))
}
