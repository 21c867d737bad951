use crate::scene::Scene;
use crate::screening::{Control, Screening};
use anyhow::{Context, Result};
use chroma_plate::AssetSource;
use chroma_timing::{HighPrecisionTimer, Timer};
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::ThreadRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tiny_skia::Pixmap;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

pub type AppScreening = Screening<HighPrecisionTimer, Box<dyn AssetSource>, ThreadRng>;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    scene: Option<Scene>,
    canvas: Option<Pixmap>,
    screening: AppScreening,
    output: PathBuf,
    current_size: Option<PhysicalSize<u32>>,
    scale_factor: f64,
    refresh_rate: Option<f64>,
    should_exit: bool,
}

impl App {
    pub fn new(screening: AppScreening, output: PathBuf) -> Self {
        Self {
            window: None,
            pixels: None,
            scene: None,
            canvas: None,
            screening,
            output,
            current_size: None,
            scale_factor: 1.0,
            refresh_rate: None,
            should_exit: false,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        tracing::info!(
            os = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            test = %self.screening.test_type(),
            "Starting screening window"
        );
        event_loop.run_app(&mut self)?;
        self.finish()
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .context("No monitor available")?;

        self.refresh_rate = primary_monitor
            .refresh_rate_millihertz()
            .map(|rate| rate as f64 / 1000.0);

        let window_attributes = Window::default_attributes()
            .with_title("Chromascreen")
            .with_fullscreen(Some(Fullscreen::Borderless(Some(primary_monitor))))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let size = window.inner_size();
        self.current_size = Some(size);
        self.scale_factor = window.scale_factor();

        tracing::info!(
            width = size.width,
            height = size.height,
            scale_factor = self.scale_factor,
            refresh_hz = self.refresh_rate,
            "Display configuration"
        );

        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface_texture)?);
        self.canvas = Pixmap::new(size.width, size.height);
        self.scene = Some(Scene::new(size.width, size.height));

        window.set_cursor_visible(false);
        window.request_redraw();
        self.window = Some(window);

        self.screening.start();
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(scene), Some(canvas)) =
            (self.pixels.as_mut(), self.scene.as_mut(), self.canvas.as_mut())
        else {
            return Ok(());
        };

        let started = Instant::now();
        scene.render(canvas, &self.screening.frame());

        let frame = pixels.frame_mut();
        if frame.len() == canvas.data().len() {
            frame.copy_from_slice(canvas.data());
        }
        pixels.render()?;

        self.screening.timer_mut().record_frame(started.elapsed());
        Ok(())
    }

    fn handle_input(&mut self, key: PhysicalKey, event_loop: &ActiveEventLoop) {
        if let PhysicalKey::Code(code) = key {
            if self.screening.on_key(code) == Control::Exit {
                self.cleanup_and_exit(event_loop);
            }
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        self.current_size = Some(new_size);
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                tracing::error!(error = %e, "Failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                tracing::error!(error = %e, "Failed to resize buffer");
            }
        }
        self.canvas = Pixmap::new(new_size.width, new_size.height);
        if let Some(scene) = &mut self.scene {
            scene.resize(new_size.width, new_size.height);
        }
        tracing::debug!(width = new_size.width, height = new_size.height, "Display resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(true);
        }
        self.should_exit = true;
        event_loop.exit();
    }

    /// Logs the session summary and frame timing, then writes the outcome.
    fn finish(&self) -> Result<()> {
        let stats = self.screening.machine().timer().frame_stats();
        tracing::info!(
            frames = stats.samples,
            avg_ms = stats.average_frame_time_ns / 1e6,
            jitter_ms = stats.jitter_ns / 1e6,
            fps = stats.effective_fps,
            "Frame timing"
        );

        let Some(outcome) = self.screening.outcome() else {
            let (done, total) = self.screening.machine().progress();
            tracing::info!(done, total, "Session ended before completion, nothing written");
            return Ok(());
        };
        if self.screening.diagnosis_pending() {
            tracing::info!("Remote diagnosis still pending, keeping local result");
        }

        let c = &outcome.classification;
        tracing::info!(
            category = %c.category,
            accuracy_pct = c.accuracy_pct,
            source = %outcome.source,
            "Result"
        );
        crate::write_outcome(outcome, &self.output)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                tracing::error!(error = %e, "Failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.screening.on_key(winit::keyboard::KeyCode::Escape);
                self.cleanup_and_exit(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    tracing::error!(error = %e, "Render error");
                }
                self.screening.update();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                if !event.repeat {
                    self.handle_input(event.physical_key, event_loop);
                }
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    self.handle_resize(window.inner_size());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
