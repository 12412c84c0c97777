//! egui integration: input capture, one UI pass per frame, and painting the
//! result over the scene

use common::GraphicsContext;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

pub struct Overlay {
    pub ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Screen size and scale handed to egui-wgpu for one frame
pub fn screen_descriptor(
    size: PhysicalSize<u32>,
    pixels_per_point: f32,
) -> egui_wgpu::ScreenDescriptor {
    egui_wgpu::ScreenDescriptor {
        size_in_pixels: [size.width.max(1), size.height.max(1)],
        pixels_per_point,
    }
}

impl Overlay {
    pub fn new(gfx: &GraphicsContext) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &gfx.window,
            Some(gfx.window.scale_factor() as f32),
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Returns true when egui wants the event for itself
    pub fn on_window_event(&mut self, gfx: &GraphicsContext, event: &WindowEvent) -> bool {
        self.state.on_window_event(&gfx.window, event).consumed
    }

    /// Run one UI pass and forward clipboard/cursor requests to the window
    pub fn run(
        &mut self,
        gfx: &GraphicsContext,
        build_ui: impl FnMut(&egui::Context),
    ) -> egui::FullOutput {
        let raw_input = self.state.take_egui_input(&gfx.window);
        let mut output = self.ctx.run(raw_input, build_ui);
        let platform_output = std::mem::take(&mut output.platform_output);
        self.state.handle_platform_output(&gfx.window, platform_output);
        output
    }

    /// Draw a finished UI pass on top of whatever `view` already holds
    pub fn paint(
        &mut self,
        gfx: &GraphicsContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        output: egui::FullOutput,
    ) {
        let screen = screen_descriptor(gfx.size, output.pixels_per_point);
        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);

        for (id, delta) in &output.textures_delta.set {
            self.renderer
                .update_texture(&gfx.device, &gfx.queue, *id, delta);
        }
        self.renderer
            .update_buffers(&gfx.device, &gfx.queue, encoder, &primitives, &screen);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
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
            self.renderer.render(&mut pass, &primitives, &screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_descriptor_matches_surface() {
        let screen = screen_descriptor(PhysicalSize::new(1280, 720), 2.0);
        assert_eq!(screen.size_in_pixels, [1280, 720]);
        assert_eq!(screen.pixels_per_point, 2.0);
    }

    #[test]
    fn test_screen_descriptor_never_zero_sized() {
        let screen = screen_descriptor(PhysicalSize::new(0, 0), 1.0);
        assert_eq!(screen.size_in_pixels, [1, 1]);
    }
}
