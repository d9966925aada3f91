use anyhow::{Context as _, Result};
use egui::{ClippedPrimitive, Context, TexturesDelta};
use egui_wgpu::renderer::{Renderer, ScreenDescriptor};
use log::info;
use pixels::{wgpu, Pixels, PixelsContext, SurfaceTexture};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};
use winit_input_helper::WinitInputHelper;

pub mod clock;
pub mod config;
pub mod game;
pub mod render;
pub mod square;

use crate::clock::Clock;
use crate::config::Config;
use crate::game::{Game, GameState, Rules, Tick};
use crate::render::Canvas;
use crate::square::Point;

const LEFT_BUTTON: usize = 0;

struct RingBuffer<T> {
    buf: Vec<T>,
    len: usize,
}

struct Gui {
    history: RingBuffer<String>,
    rounds: u32,
}

struct State {
    egui_ctx: Context,
    egui_state: egui_winit::State,
    screen_descriptor: ScreenDescriptor,
    renderer: Renderer,
    paint_jobs: Vec<ClippedPrimitive>,
    textures: TexturesDelta,
    gui: Gui,
    game: Game<StdRng>,
    clock: Clock,
}

impl<T> RingBuffer<T> {
    fn new(len: usize) -> Self {
        Self {
            buf: Vec::new(),
            len: len.max(1),
        }
    }

    /// Drops the oldest half (at least one entry) once full.
    fn push(&mut self, value: T) {
        if self.buf.len() >= self.len {
            let drop = (self.len / 2).max(1);
            self.buf.drain(..drop);
        }

        self.buf.push(value);
    }

    fn vec(&mut self) -> &mut Vec<T> {
        &mut self.buf
    }
}

impl Gui {
    fn new(history: usize) -> Self {
        Self {
            history: RingBuffer::new(history),
            rounds: 0,
        }
    }

    fn log(&mut self, score: u32, high_score: u32) {
        self.rounds += 1;
        self.history.push(format!(
            "#{}: {} (best {})",
            self.rounds, score, high_score
        ));
    }

    /// Returns true when Start Game was clicked.
    fn ui(&mut self, ctx: &Context, state: &GameState) -> bool {
        let mut start = false;

        egui::Window::new("squares")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading(format!("Score: {}", state.score));
                ui.heading(format!("Time: {}", state.time_remaining));
                ui.heading(format!("High Score: {}", state.high_score));

                if !state.active {
                    ui.separator();
                    start = ui.button("Start Game").clicked();

                    if !self.history.vec().is_empty() {
                        let log = self.history.vec().join("\n");
                        egui::ScrollArea::vertical()
                            .max_height(120.0)
                            .stick_to_bottom(true)
                            .show(ui, |ui| ui.monospace(log));
                    }
                }
            });

        start
    }
}

impl State {
    fn new<T>(
        event_loop: &EventLoopWindowTarget<T>,
        width: u32,
        height: u32,
        scale_factor: f32,
        pixels: &Pixels,
        game: Game<StdRng>,
        clock: Clock,
        history: usize,
    ) -> Self {
        let max_texture_size = pixels.device().limits().max_texture_dimension_2d as usize;

        let egui_ctx = Context::default();
        let mut egui_state = egui_winit::State::new(event_loop);
        egui_state.set_max_texture_side(max_texture_size);
        egui_state.set_pixels_per_point(scale_factor);
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: scale_factor,
        };
        let renderer = Renderer::new(pixels.device(), pixels.render_texture_format(), None, 1);

        Self {
            egui_ctx,
            egui_state,
            screen_descriptor,
            renderer,
            paint_jobs: Vec::new(),
            textures: TexturesDelta::default(),
            gui: Gui::new(history),
            game,
            clock,
        }
    }

    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) {
        let _ = self.egui_state.on_event(&self.egui_ctx, event);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.screen_descriptor.size_in_pixels = [width, height];
        }
    }

    pub fn scale_factor(&mut self, scale_factor: f64) {
        self.screen_descriptor.pixels_per_point = scale_factor as f32;
    }

    /// Clicks over the HUD belong to egui.
    fn pointer_captured(&self) -> bool {
        self.egui_ctx.is_pointer_over_area() || self.egui_ctx.wants_pointer_input()
    }

    fn tap(&mut self, x: usize, y: usize) {
        self.game.tap(Point::new(x as f32, y as f32));
    }

    fn tick(&mut self, now: Instant) {
        for _ in 0..self.clock.elapsed(now) {
            if let Tick::Ended { score, high_score } = self.game.on_tick() {
                self.gui.log(score, high_score);
            }
        }
    }

    fn update(&mut self) -> bool {
        self.game.update()
    }

    pub fn prepare(&mut self, window: &Window) {
        let raw_input = self.egui_state.take_egui_input(window);
        let mut start = false;
        let output = self.egui_ctx.run(raw_input, |egui_ctx| {
            start = self.gui.ui(egui_ctx, self.game.state());
        });

        if start {
            self.game.start_game();
            self.clock.reset(Instant::now());
        }

        self.textures.append(output.textures_delta);
        self.egui_state
            .handle_platform_output(window, &self.egui_ctx, output.platform_output);
        self.paint_jobs = self.egui_ctx.tessellate(output.shapes);
    }

    pub fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        render_target: &wgpu::TextureView,
        context: &PixelsContext,
    ) {
        for (id, image_delta) in &self.textures.set {
            self.renderer
                .update_texture(&context.device, &context.queue, *id, image_delta);
        }
        self.renderer.update_buffers(
            &context.device,
            &context.queue,
            encoder,
            &self.paint_jobs,
            &self.screen_descriptor,
        );

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: render_target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            self.renderer
                .render(&mut rpass, &self.paint_jobs, &self.screen_descriptor);
        }

        let textures = std::mem::take(&mut self.textures);
        for id in &textures.free {
            self.renderer.free_texture(id);
        }
    }

    fn draw(&self, frame: &mut [u8]) {
        let surface = self.game.surface();
        let mut canvas = Canvas::new(frame, surface.width, surface.height);
        for cmd in render::scene(self.game.state()) {
            canvas.draw(&cmd);
        }
    }
}

pub fn run<P: AsRef<Path>>(config_dir: P) -> Result<()> {
    env_logger::init();

    let config_dir = config_dir.as_ref();
    let config = Config::load_from(config_dir)
        .with_context(|| format!("loading configuration from {}", config_dir.display()))?;
    info!(
        "surface {}x{}, {}s rounds, {}ms ticks",
        config.surface.width,
        config.surface.height,
        config.game.round_seconds,
        config.game.tick_ms
    );

    let game = Game::new(
        Rules::from_config(&config),
        config.surface,
        StdRng::from_entropy(),
    )?;

    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();
    let window = {
        let size = LogicalSize::new(config.window.width as f64, config.window.height as f64);
        WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(size)
            .with_min_inner_size(size)
            .with_resizable(false)
            .build(&event_loop)
            .context("creating window")?
    };

    let (mut pixels, mut state) = {
        let window_size = window.inner_size();
        let scale_factor = window.scale_factor() as f32;
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        let pixels = Pixels::new(config.surface.width, config.surface.height, surface_texture)
            .context("creating framebuffer")?;
        let state = State::new(
            &event_loop,
            window_size.width,
            window_size.height,
            scale_factor,
            &pixels,
            game,
            Clock::new(config.tick_period(), Instant::now()),
            config.hud.history,
        );
        (pixels, state)
    };

    event_loop.run(move |event, _, control_flow| {
        if input.update(&event) {
            if input.key_pressed(VirtualKeyCode::Escape) || input.close_requested() {
                *control_flow = ControlFlow::Exit;
                return;
            }

            if let Some(scale_factor) = input.scale_factor() {
                state.scale_factor(scale_factor);
            }

            if let Some(size) = input.window_resized() {
                if pixels.resize_surface(size.width, size.height).is_err() {
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                state.resize(size.width, size.height);
            }

            if input.mouse_pressed(LEFT_BUTTON) && !state.pointer_captured() {
                if let Some((x, y)) = input
                    .mouse()
                    .and_then(|pos| pixels.window_pos_to_pixel(pos).ok())
                {
                    state.tap(x, y);
                }
            }

            window.request_redraw();
        }

        match event {
            Event::WindowEvent { event, .. } => {
                state.handle_event(&event);
            }
            Event::RedrawRequested(_) => {
                state.draw(pixels.frame_mut());
                state.prepare(&window);
                let _ = pixels.render_with(|encoder, target, ctx| {
                    ctx.scaling_renderer.render(encoder, target);
                    state.render(encoder, target, ctx);
                    Ok(())
                });
            }
            _ => (),
        }

        state.tick(Instant::now());
        if state.update() {
            window.request_redraw();
        }

        if *control_flow != ControlFlow::Exit {
            *control_flow = ControlFlow::WaitUntil(state.clock.deadline());
        }
    });
}
