use crate::state::State;

/// Draw the stats overlay on top of the rendered board.
pub fn draw_overlay(state: &mut State, output_frame: &wgpu::SurfaceTexture) {
    let output_view = output_frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    // Begin egui frame
    let raw_input = state.egui_winit_state.take_egui_input(&state.window);
    state.egui_ctx.begin_frame(raw_input);

    let size = state.grid.size();
    let live = state.grid.live_count();
    let cell_vertices = state.renderer.cell_vertex_count();

    let panel_frame = egui::Frame {
        fill: egui::Color32::from_rgba_unmultiplied(25, 25, 25, 160),
        ..egui::Frame::window(&state.egui_ctx.style())
    };

    egui::Window::new("Board")
        .frame(panel_frame)
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(5.0, 5.0))
        .resizable(false)
        .collapsible(true)
        .show(&state.egui_ctx, |ui| {
            ui.label(format!("Grid: {}x{}", size, size));
            ui.label(format!("Live Cells: {}", live));
            ui.label(format!(
                "Last Toggled: {}",
                state.last_toggled.map_or_else(|| "N/A".to_string(), |index| index.to_string())
            ));
            ui.separator();
            if ui.checkbox(&mut state.fill_cells, "Fill live cells").changed() {
                log::info!("Cell fill {}", if state.fill_cells { "enabled" } else { "disabled" });
            }
            if state.fill_cells {
                ui.label(format!("Cell Vertices: {}", cell_vertices));
            }
        });

    // End egui frame
    let full_output = state.egui_ctx.end_frame();
    let paint_jobs = state.egui_ctx.tessellate(full_output.shapes, state.window.scale_factor() as f32);
    let screen_descriptor = egui_wgpu::ScreenDescriptor {
        size_in_pixels: [state.config.width, state.config.height],
        pixels_per_point: state.window.scale_factor() as f32,
    };

    // Upload egui data to GPU
    let mut encoder = state.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("egui Encoder"),
    });
    for (id, image_delta) in &full_output.textures_delta.set {
        state.egui_renderer.update_texture(&state.device, &state.queue, *id, image_delta);
    }
    let _tdelta = state.egui_renderer.update_buffers(
        &state.device,
        &state.queue,
        &mut encoder,
        &paint_jobs,
        &screen_descriptor,
    );
    state.egui_winit_state.handle_platform_output(
        &state.window,
        full_output.platform_output,
    );

    // Render egui
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("egui Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        state.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
    }

    // Free texture delta
    for id in &full_output.textures_delta.free {
        state.egui_renderer.free_texture(id);
    }

    state.queue.submit(Some(encoder.finish()));
}
