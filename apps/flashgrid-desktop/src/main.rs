mod bindings;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use flashgrid_assets::{MaterialSet, TextureStore};
use flashgrid_common::Settings;
use flashgrid_input::InputState;
use flashgrid_render::{FrameComposer, FrameEvent, FrameStats, SceneState};
use flashgrid_render_wgpu::{FrameRecorder, WgpuRenderer};
use flashgrid_world::{OccupancyGrid, cube_counts, generate_cubes};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "flashgrid-desktop", about = "Walk a dark maze by flashlight")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Layout file overriding the built-in maze
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load_or_default(self.config.as_deref())
            .context("loading settings")?;
        if let Some(layout) = &self.layout {
            settings.world.layout = Some(layout.clone());
        }
        if let Some(width) = self.width {
            settings.window.width = width;
        }
        if let Some(height) = self.height {
            settings.window.height = height;
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Everything that lives independently of the GPU.
struct AppState {
    settings: Settings,
    scene: SceneState,
    composer: FrameComposer,
    input: InputState,
    recorder: FrameRecorder,
    textures: TextureStore,
    materials: MaterialSet,
    stats: FrameStats,
    aspect: f32,
    show_hud: bool,
    // Locked cursors report raw motion; otherwise absolute positions are used.
    cursor_locked: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(settings: Settings) -> Result<Self> {
        let grid = OccupancyGrid::load_or_default(settings.world.layout.as_deref())
            .context("loading layout")?;
        let cubes = generate_cubes(&grid, settings.world.cell_size);
        let (ground, walls) = cube_counts(&grid);
        tracing::info!(
            "{}x{} layout: {} ground cubes, {} wall cubes",
            grid.width(),
            grid.width(),
            ground,
            walls
        );

        let mut textures = TextureStore::new();
        let materials = textures.load_materials(&settings.textures);

        Ok(Self {
            scene: SceneState::from_settings(&settings),
            composer: FrameComposer::from_settings(cubes, &settings),
            input: InputState::new(),
            recorder: FrameRecorder::new(),
            textures,
            materials,
            stats: FrameStats::default(),
            aspect: settings.window.aspect_ratio(),
            show_hud: true,
            cursor_locked: false,
            last_frame: Instant::now(),
            settings,
        })
    }

    /// Advance time, apply drained input and record the frame. Returns
    /// `false` when the user asked to quit.
    fn step(&mut self) -> bool {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        for event in self.scene.frame.advance(dt) {
            match event {
                FrameEvent::SuspenseCue { at } => {
                    tracing::info!("suspense cue at {at:.1}s");
                }
                FrameEvent::CheatAutoEnabled { at } => {
                    tracing::info!("cheat mode forced on at {at:.1}s");
                }
            }
        }

        let input = self.input.drain();
        if input.quit {
            return false;
        }
        self.scene.apply_input(&input);

        self.recorder.reset();
        self.stats = self
            .composer
            .compose(&self.scene, self.aspect, &mut self.recorder);
        tracing::trace!(
            "frame {} dt={dt:.4} draws={}",
            self.scene.frame.frame_index(),
            self.stats.draws
        );
        true
    }

    fn draw_hud(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }
        let camera = &self.scene.camera;
        let frame = &self.scene.frame;
        let on_off = |b: bool| if b { "on" } else { "off" };

        egui::Window::new("Flashgrid")
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                let dt = frame.delta_time();
                if dt > 0.0 {
                    ui.label(format!("{:.0} fps", 1.0 / dt));
                }
                ui.label(format!("Time: {:.1}s", frame.total_time()));
                let p = camera.position();
                ui.label(format!("Position: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z));
                ui.label(format!(
                    "Yaw {:.1}  Pitch {:.1}  Zoom {:.1}",
                    camera.yaw(),
                    camera.pitch(),
                    camera.zoom()
                ));
                ui.separator();
                ui.label(format!("Flashlight: {}", on_off(frame.flashlight_on())));
                ui.label(format!("Cheat mode: {}", on_off(frame.cheat_mode())));
                ui.label(format!(
                    "Draws: {} ({} ground, {} wall)",
                    self.stats.draws, self.stats.ground_draws, self.stats.wall_draws
                ));
                ui.separator();
                ui.small("WASD move | Space/Ctrl up/down | F light | C cheat | F1 HUD | Esc quit");
            });
    }
}

/// Window, surface and GPU resources, created on resume.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, state: &AppState, egui_ctx: &EguiContext) -> Result<Self> {
        let window_settings = &state.settings.window;
        let attrs = Window::default_attributes()
            .with_title(window_settings.title.clone())
            .with_inner_size(PhysicalSize::new(
                window_settings.width,
                window_settings.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("flashgrid_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            &state.textures,
            &state.materials,
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Hide the cursor and keep it in the window. Returns whether raw
    /// relative motion is available.
    fn grab_cursor(&self) -> bool {
        let locked = match self.window.set_cursor_grab(CursorGrabMode::Locked) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("cursor lock unavailable ({e}), confining instead");
                if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::Confined) {
                    tracing::warn!("cursor grab unavailable: {e}");
                }
                false
            }
        };
        self.window.set_cursor_visible(false);
        locked
    }

    fn draw_hud(&mut self, egui_ctx: &EguiContext, view: &wgpu::TextureView, state: &AppState) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_hud(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.state.step() {
            tracing::info!("quit requested");
            event_loop.exit();
            return;
        }

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                tracing::warn!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &self.state.recorder);
        gpu.draw_hud(&self.egui_ctx, &view, &self.state);

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.state, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.aspect = gpu.aspect();
                self.state.cursor_locked = gpu.grab_cursor();
                self.state.last_frame = Instant::now();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("{e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                    self.state.aspect = gpu.aspect();
                }
            }
            WindowEvent::Focused(focused) => {
                if focused {
                    if let Some(gpu) = &self.gpu {
                        self.state.cursor_locked = gpu.grab_cursor();
                    }
                } else {
                    self.state.input.release_all();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if key == KeyCode::F1 && pressed && !repeat {
                    self.state.show_hud = !self.state.show_hud;
                } else if let Some(control) = bindings::control_for(key) {
                    if pressed {
                        self.state.input.press(control);
                    } else {
                        self.state.input.release(control);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if !self.state.cursor_locked {
                    self.state
                        .input
                        .cursor_moved(position.x as f32, position.y as f32);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.input.scroll(bindings::scroll_lines(delta));
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.cursor_locked {
                self.state
                    .input
                    .mouse_motion(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    tracing::info!("flashgrid-desktop starting");

    let settings = cli.settings()?;
    tracing::debug!("settings: {settings:?}");
    let state = AppState::new(settings)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
