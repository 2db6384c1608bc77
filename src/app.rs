use std::sync::Arc;
use std::time::Instant;

use egui_wgpu::ScreenDescriptor;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::grid::Cell;
use crate::renderer::Renderer;
use crate::sampler::FieldSampler;
use crate::simulation::{Command, Simulation};
use crate::stats::Stats;
use crate::ui::{draw_ui, UiActions, UiState};

/// Grid dimension (square).
const GRID_SIZE: u32 = 512;

/// Initial window dimension (square).
const WINDOW_SIZE: u32 = 1024;

/// Initial random fill density.
const INITIAL_DENSITY: f64 = 0.2;

/// Target simulation ticks per second.
const TICK_HZ: f64 = 30.0;

/// Most ticks allowed per frame, so a long frame cannot spiral.
const MAX_TICKS_PER_FRAME: u32 = 4;

/// Application state: the simulation engine, the camera, and all
/// window/GPU/UI glue around them.
pub struct App {
    gpu: Option<GpuState>,
    simulation: Simulation,
    camera: Camera,
    stats: Stats,
    ui_state: UiState,
    /// Whether ticks advance. Input handling continues while paused.
    running: bool,
    tick_accumulator: f64,
    last_frame: Instant,
    /// Material being painted while a mouse button is held.
    painting: Option<Cell>,
    panning: bool,
    cursor: (f32, f32),
    last_mouse_pos: Option<(f64, f64)>,
}

struct GpuState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl App {
    pub fn new() -> Self {
        let mut simulation = Simulation::new(GRID_SIZE, GRID_SIZE, FieldSampler::new());
        simulation.randomize(INITIAL_DENSITY);

        Self {
            gpu: None,
            simulation,
            camera: Camera::new(WINDOW_SIZE, WINDOW_SIZE, GRID_SIZE, GRID_SIZE),
            stats: Stats::new((GRID_SIZE * GRID_SIZE) as u64),
            ui_state: UiState::new(),
            running: true,
            tick_accumulator: 0.0,
            last_frame: Instant::now(),
            painting: None,
            panning: false,
            cursor: (0.0, 0.0),
            last_mouse_pos: None,
        }
    }

    fn initialize_gpu(&mut self, window: Arc<Window>) {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("No suitable GPU adapter found");

        log::info!("GPU adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.camera.set_viewport(config.width, config.height);

        let renderer = Renderer::new(&device, surface_format, GRID_SIZE, GRID_SIZE);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.gpu = Some(GpuState {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_ctx,
            egui_state,
            egui_renderer,
        });
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(ref mut gpu) = self.gpu {
            if new_size.width > 0 && new_size.height > 0 {
                gpu.config.width = new_size.width;
                gpu.config.height = new_size.height;
                gpu.surface.configure(&gpu.device, &gpu.config);
                self.camera.set_viewport(new_size.width, new_size.height);
            }
        }
    }

    /// Apply the held brush at the current cursor position. Runs between
    /// ticks on the event-loop thread, never during one.
    fn apply_brush(&mut self) {
        let Some(material) = self.painting else { return };
        if let Some(ref gpu) = self.gpu {
            if gpu.egui_ctx.wants_pointer_input() {
                return;
            }
        }
        let (gx, gy) = self.camera.screen_to_grid(self.cursor.0, self.cursor.1);
        self.simulation
            .edit(gy, gx, self.ui_state.brush_radius, material);
    }

    fn step_once(&mut self) {
        self.simulation.tick();
        self.record_stats();
    }

    fn record_stats(&mut self) {
        self.stats.record(
            self.simulation.generation(),
            self.simulation.population(Cell::Alive),
            self.simulation.population(Cell::Tree),
        );
    }

    fn dispatch(&mut self, actions: UiActions) {
        for command in actions.commands {
            if matches!(command, Command::Randomize(_) | Command::Clear) {
                self.stats.reset();
            }
            self.simulation.apply(command);
        }
        if actions.toggle_pause {
            self.running = !self.running;
            log::info!(
                "Simulation {}",
                if self.running { "resumed" } else { "paused" }
            );
        }
        if actions.step_once && !self.running {
            self.step_once();
        }
        if actions.reset_camera {
            self.camera.reset();
        }
    }

    fn render_frame(&mut self) {
        if self.gpu.is_none() {
            return;
        }

        // Timing
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        // Brush edits land before the tick, never during one.
        self.apply_brush();

        // Fixed-cadence ticks.
        if self.running {
            self.tick_accumulator += dt * TICK_HZ;
            let steps = (self.tick_accumulator as u32).min(MAX_TICKS_PER_FRAME);
            self.tick_accumulator -= self.tick_accumulator.floor();
            for _ in 0..steps {
                self.step_once();
            }
        }

        // ── egui frame ──
        let generation = self.simulation.generation();
        let mut actions = UiActions::default();
        let full_output = {
            let Some(gpu) = self.gpu.as_mut() else { return };
            let raw_input = gpu.egui_state.take_egui_input(&gpu.window);
            let ui_state = &mut self.ui_state;
            let config = &self.simulation.config;
            let stats = &self.stats;
            let running = self.running;
            let output = gpu.egui_ctx.run(raw_input, |ctx| {
                actions = draw_ui(
                    ctx,
                    ui_state,
                    running,
                    generation,
                    config,
                    stats,
                    GRID_SIZE,
                    GRID_SIZE,
                );
            });
            gpu.egui_state
                .handle_platform_output(&gpu.window, output.platform_output.clone());
            output
        };

        self.dispatch(actions);

        // ── Render ──
        let Some(gpu) = self.gpu.as_mut() else { return };

        let output = match gpu.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                return;
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.upload_grid(&gpu.queue, self.simulation.snapshot());
        gpu.renderer.update_camera(&gpu.queue, &self.camera.uniform());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        gpu.renderer.render(&mut encoder, &view);

        // egui overlay on top of the grid.
        let clipped = gpu
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: gpu.window.scale_factor() as f32,
        };
        for (id, delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &clipped,
            &screen_descriptor,
        );
        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            let mut pass = pass.forget_lifetime();
            gpu.egui_renderer.render(&mut pass, &clipped, &screen_descriptor);
        }
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        let status = if self.running { "▶" } else { "⏸" };
        gpu.window.set_title(&format!(
            "GroveLife | {status} Gen {generation} | {GRID_SIZE}×{GRID_SIZE}"
        ));

        gpu.window.request_redraw();
    }

    fn handle_key(&mut self, event: KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }

        match event.logical_key {
            Key::Named(NamedKey::Space) => {
                self.running = !self.running;
                log::info!(
                    "Simulation {}",
                    if self.running { "resumed" } else { "paused" }
                );
            }
            Key::Named(NamedKey::ArrowRight) if !self.running => {
                self.step_once();
            }
            Key::Named(NamedKey::Escape) => {
                std::process::exit(0);
            }
            Key::Character(ref c) => match c.as_str() {
                "r" => {
                    self.stats.reset();
                    self.simulation.randomize(self.ui_state.density);
                    log::info!("Grid randomized");
                }
                "c" => {
                    self.stats.reset();
                    self.simulation.clear();
                    log::info!("Grid cleared");
                }
                "h" => {
                    self.camera.reset();
                    log::info!("View reset");
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_mouse_input(&mut self, state: ElementState, button: MouseButton) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => {
                self.painting = pressed.then_some(self.ui_state.brush_material);
            }
            MouseButton::Right => {
                self.painting = pressed.then_some(Cell::Empty);
            }
            MouseButton::Middle => {
                self.panning = pressed;
                if !pressed {
                    self.last_mouse_pos = None;
                }
            }
            _ => {}
        }
    }

    fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = (x as f32, y as f32);
        if self.panning {
            if let Some((lx, ly)) = self.last_mouse_pos {
                self.camera.pan((lx - x) as f32, (ly - y) as f32);
            }
            self.last_mouse_pos = Some((x, y));
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_none() {
            let attrs = WindowAttributes::default()
                .with_title("GroveLife")
                .with_inner_size(PhysicalSize::new(WINDOW_SIZE, WINDOW_SIZE));

            let window = Arc::new(
                event_loop
                    .create_window(attrs)
                    .expect("Failed to create window"),
            );

            self.initialize_gpu(window);
            self.last_frame = Instant::now();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui see the event first; pointer events it claims stay out
        // of the brush/camera path.
        let consumed = if let Some(ref mut gpu) = self.gpu {
            gpu.egui_state.on_window_event(&gpu.window, &event).consumed
        } else {
            false
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.resize(size);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                self.handle_key(event);
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let ticks = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 50.0) as f32,
                };
                self.camera.zoom_at(ticks, self.cursor.0, self.cursor.1);
            }
            WindowEvent::MouseInput { state, button, .. } if !consumed => {
                self.handle_mouse_input(state, button);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_moved(position.x, position.y);
            }
            _ => {}
        }
    }
}
