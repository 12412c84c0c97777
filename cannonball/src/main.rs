//! Cannonball launcher
//!
//! A ball fired from the cannon falls under gravity and is relaunched from the
//! cannon whenever it leaves the bounding box. The left panel edits the cannon,
//! the light and the static objects while the ball is flying.
//!
//! Usage: `cannonball [config.json]`
//!
//! Controls:
//! - Left mouse drag: Orbit camera
//! - Scroll: Zoom in/out
//! - Space: Pause/resume
//! - R: Relaunch the ball
//! - T: Toggle trail
//! - G: Toggle floor grid
//! - C: Reset camera
//! - O: Scatter objects
//! - X: Clear objects

use cannonball::config::{ConfigError, SceneConfig};
use cannonball::controls::{Controls, DEFAULT_MAX_OBJECTS};
use cannonball::controls_ui::{draw_controls_panel, PanelActions, SCATTER_COUNT};
use cannonball::equations_ui::draw_equations_sidebar;
use cannonball::overlay::Overlay;
use cannonball::physics::{Bounds, Simulation};
use cannonball::renderer::Renderer;
use cannonball::scene::Scene;
use common::{GraphicsContext, GraphicsError};
use std::time::Instant;
use winit::{
    error::EventLoopError,
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

/// Longest frame fed to the simulation, in seconds
const MAX_FRAME_TIME: f32 = 0.1;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
}

fn draw_status_bar(ctx: &egui::Context, simulation: &Simulation, objects: usize, paused: bool) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let p = simulation.ball.position;
            ui.label(format!("Ball: ({:.0}, {:.0}, {:.0})", p.x, p.y, p.z));
            ui.separator();
            ui.label(format!("Resets: {}", simulation.resets));
            ui.separator();
            ui.label(format!("Time: {:.1}s", simulation.elapsed_time));
            ui.separator();
            ui.label(format!("Objects: {}", objects));
            ui.separator();
            let (text, color) = if paused {
                ("PAUSED", egui::Color32::YELLOW)
            } else {
                ("RUNNING", egui::Color32::GREEN)
            };
            ui.label(egui::RichText::new(text).color(color));
        });
    });
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    scene: Scene,
    simulation: Simulation,
    controls: Controls,
    paused: bool,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    overlay: Overlay,
}

impl App {
    fn new(ctx: GraphicsContext, config: &SceneConfig) -> Self {
        let scene = Scene::new(config, ctx.aspect_ratio());
        let renderer = Renderer::new(&ctx, &scene, DEFAULT_MAX_OBJECTS, config.trail_length);

        let mut controls = Controls::new(config.cannon(), config.light_direction)
            .with_max_objects(DEFAULT_MAX_OBJECTS);
        controls.set_objects(config.objects.clone());

        let simulation = Simulation::new(&controls.cannon)
            .with_bounds(Bounds::new(config.bounds))
            .with_gravity(config.gravity)
            .with_trail_length(config.trail_length);

        log::info!(
            "Cannon at {:?} aiming {:?}, gravity {}, bounds {:?}",
            controls.cannon.position,
            controls.cannon.direction,
            simulation.gravity,
            simulation.bounds.half_extents
        );

        let overlay = Overlay::new(&ctx);

        Self {
            ctx,
            renderer,
            scene,
            simulation,
            controls,
            paused: false,
            mouse_pressed: false,
            last_mouse_pos: None,
            overlay,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.scene.resize(self.ctx.aspect_ratio());
        self.renderer
            .resize(&self.ctx.device, new_size.width, new_size.height);
    }

    fn update(&mut self, dt: f32) {
        self.scene.light.set_direction(self.controls.light_direction);
        if !self.paused {
            self.simulation.step(dt, &self.controls.cannon);
        }
    }

    fn relaunch(&mut self) {
        self.simulation.relaunch(&self.controls.cannon);
    }

    fn toggle_trail(&mut self) {
        self.scene.show_trail = !self.scene.show_trail;
        self.simulation.set_trail_recording(self.scene.show_trail);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let counts = self.renderer.update(
            &self.ctx.queue,
            &self.scene,
            &self.simulation,
            &self.controls,
        );

        let mut actions = PanelActions::default();
        let simulation = &self.simulation;
        let controls = &mut self.controls;
        let paused = self.paused;
        let ui_output = self.overlay.run(&self.ctx, |ctx| {
            draw_status_bar(ctx, simulation, controls.objects.len(), paused);
            actions = draw_controls_panel(ctx, controls);
            draw_equations_sidebar(ctx, simulation);
        });

        if actions.relaunch {
            self.relaunch();
        }

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, &self.scene, counts);

        self.overlay.paint(&self.ctx, &mut encoder, &view, ui_output);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::Space => self.paused = !self.paused,
            KeyCode::KeyR => self.relaunch(),
            KeyCode::KeyT => self.toggle_trail(),
            KeyCode::KeyG => self.scene.show_grid = !self.scene.show_grid,
            KeyCode::KeyC => self.scene.reset_view(),
            KeyCode::KeyO => {
                self.controls
                    .scatter_objects(SCATTER_COUNT, &mut rand::thread_rng());
            }
            KeyCode::KeyX => self.controls.clear_objects(),
            _ => {}
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if self.mouse_pressed {
            if let Some((last_x, last_y)) = self.last_mouse_pos {
                let dx = (x - last_x) as f32 * 0.01;
                let dy = (y - last_y) as f32 * 0.01;
                self.scene.camera.orbit(dx, dy);
            }
            self.last_mouse_pos = Some((x, y));
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.scene.camera.zoom(delta * 10.0);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.overlay.on_window_event(&self.ctx, event)
    }
}

fn run() -> Result<(), AppError> {
    let config = SceneConfig::from_args(std::env::args())?;

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        &config.title,
        config.width,
        config.height,
    ))?;

    let mut app = App::new(ctx, &config);
    let mut last_time = Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::MouseInput { state, button, .. } => {
                            if *button == MouseButton::Left {
                                app.mouse_pressed = *state == ElementState::Pressed;
                                if !app.mouse_pressed {
                                    app.last_mouse_pos = None;
                                }
                            }
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            app.handle_mouse_move(position.x, position.y);
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => app.handle_key(*key, *state),
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                            };
                            app.handle_scroll(scroll);
                        }
                        _ => {}
                    }
                }

                // Redraws must run even when egui consumed the event
                if let WindowEvent::RedrawRequested = event {
                    let now = Instant::now();
                    let dt = (now - last_time).as_secs_f32().min(MAX_FRAME_TIME);
                    last_time = now;

                    app.update(dt);
                    match app.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            log::warn!("Surface lost, reconfiguring");
                            app.resize(app.ctx.size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
