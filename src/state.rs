use crate::camera::Projection;
use crate::config::Config;
use crate::grid::{Grid, Toggle};
use crate::render::{GridRenderer, POSITION_COMPONENTS, POSITION_LOCATION};
use crate::shader::ShaderProgram;
use crate::vertex_array::VertexArray;
use anyhow::{Context, Result};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    window::Window,
};
use std::sync::Arc;

// GUI Imports
use egui_winit::State as EguiWinitState;
use egui_wgpu::Renderer as EguiWgpuRenderer;
use egui::Context as EguiContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Cells,
    Lines,
}

pub struct State {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub window: Arc<Window>,
    pub settings: Config,

    pub grid: Grid,
    pub renderer: GridRenderer,
    pub shader: ShaderProgram,
    pub projection: Projection,

    pub cursor_pos: Option<PhysicalPosition<f64>>,
    pub fill_cells: bool,
    pub last_toggled: Option<usize>,

    // GUI state
    pub egui_ctx: EguiContext,
    pub egui_winit_state: EguiWinitState,
    pub egui_renderer: EguiWgpuRenderer,
}

impl State {
    pub async fn new(window: Arc<Window>, settings: Config) -> Result<Self> {
        let size = window.inner_size();

        log::info!("Initializing wgpu...");

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .context("Failed to find an appropriate adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats[0];

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![surface_format.into()],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Board
        let mut rng = rand::rng();
        let mut grid = Grid::random(settings.grid_size, settings.alive_probability, &mut rng);
        log::info!(
            "Created {n}x{n} grid with {} live cells",
            grid.live_count(),
            n = grid.size()
        );
        log::debug!("Board:\n{}", grid);

        let vertex_array = VertexArray::link(POSITION_LOCATION, POSITION_COMPONENTS)
            .context("Unsupported position attribute layout")?;

        let shader = ShaderProgram::new(
            &device,
            config.format,
            &settings.vertex_shader,
            &settings.fragment_shader,
            vertex_array.layout(),
        )
        .await?;

        let renderer = GridRenderer::new(&device, &queue, &vertex_array, &mut grid);
        let projection = Projection::with_margin(settings.startup_margin);

        log::info!("Initializing egui...");
        let egui_ctx = EguiContext::default();
        let egui_winit_state = EguiWinitState::new(egui_ctx.clone(), egui_ctx.viewport_id(), &window, None, None);
        let egui_renderer = EguiWgpuRenderer::new(&device, config.format, None, 1);
        log::info!("egui initialized.");

        log::info!("wgpu initialized successfully.");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            settings,
            grid,
            renderer,
            shader,
            projection,
            cursor_pos: None,
            fill_cells: false,
            last_toggled: None,
            egui_ctx,
            egui_winit_state,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(projection) = Projection::fit(new_size.width, new_size.height, self.settings.resize_buffer) else {
            log::warn!("Ignoring resize to zero dimensions: {}x{}", new_size.width, new_size.height);
            return;
        };

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.projection = projection;

        log::info!(
            "Resized to {}x{}, view [{:.2}, {:.2}] x [{:.2}, {:.2}]",
            new_size.width,
            new_size.height,
            projection.left,
            projection.right,
            projection.bottom,
            projection.top
        );
    }

    /// Toggle the cell under a cursor position given in physical pixels.
    pub fn click(&mut self, position: PhysicalPosition<f64>) -> Toggle {
        let world = self.projection.screen_to_world(
            position.x as f32,
            position.y as f32,
            self.size.width.max(1),
            self.size.height.max(1),
        );

        let toggle = self.grid.toggle_at(world);
        if let Toggle::Flipped { index, .. } = toggle {
            self.last_toggled = Some(index);
            self.window.request_redraw();
        }
        toggle
    }

    /// Render the board. Returns the surface texture for egui to draw on.
    pub fn update_and_render(&mut self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        let output_frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost) => {
                log::warn!("Surface lost, recreating...");
                self.resize(self.size);
                return Err(wgpu::SurfaceError::Lost);
            }
            Err(e) => {
                log::error!("Failed to acquire next swap chain texture: {:?}", e);
                return Err(e);
            }
        };

        let output_view = output_frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.shader.set_matrix4("projection", &self.projection.matrix());

        // Uniform writes land at submit time, so each colour gets its own pass.
        let mut load = wgpu::LoadOp::Clear(self.settings.clear_color);
        if self.fill_cells {
            self.renderer.sync(&self.device, &self.queue, &mut self.grid);
            self.shader.set_color(self.settings.fill_color);
            self.shader.flush(&self.queue);
            self.draw_layer(&output_view, load, Layer::Cells);
            load = wgpu::LoadOp::Load;
        }

        self.shader.set_color(self.settings.line_color);
        self.shader.flush(&self.queue);
        self.draw_layer(&output_view, load, Layer::Lines);

        Ok(output_frame)
    }

    fn draw_layer(&self, view: &wgpu::TextureView, load: wgpu::LoadOp<wgpu::Color>, layer: Layer) {
        let mut encoder = self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load,
                            store: wgpu::StoreOp::Store,
                        },
                    })
                ],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            match layer {
                Layer::Cells => self.renderer.draw_filled_cells(&mut render_pass, &self.shader),
                Layer::Lines => self.renderer.draw_grid_lines(&mut render_pass, &self.shader),
            }
        }
        self.queue.submit(Some(encoder.finish()));
    }

    /// Free every GPU resource owned by the board. Consumes the state, so it can only happen once.
    pub fn release(self) {
        log::info!("Releasing GPU resources");
        self.renderer.release();
        self.shader.delete();
    }
}
