//! Windowed viewer built on winit's [`ApplicationHandler`].

use std::path::PathBuf;
use std::sync::Arc;

use cubeflat_config::Config;
use cubeflat_render::{
    CubeMapBinding, CubeMapTexture, FlatCubeRenderer, FlatCubeView, RenderContext,
    SurfaceError, clear_target, init_render_context_blocking,
};
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::{background_color, build_view};

/// Window attributes from the `window` config section.
pub fn window_attributes(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// GPU-side state, created once the window exists.
struct Viewport {
    ctx: RenderContext,
    renderer: FlatCubeRenderer,
    view: FlatCubeView<CubeMapBinding>,
    _cube_map: CubeMapTexture,
}

impl Viewport {
    fn new(ctx: RenderContext, config: &Config) -> Result<Self, cubeflat_render::TextureError> {
        let renderer = FlatCubeRenderer::new(&ctx.device, ctx.surface_format);
        let (cube_map, view) = build_view(
            &ctx.device,
            &ctx.queue,
            &renderer,
            &config.cubemap,
            &config.view,
            ctx.size(),
        )?;
        Ok(Self {
            ctx,
            renderer,
            view,
            _cube_map: cube_map,
        })
    }

    /// Rebuild the cube map and view after a config change.
    fn rebuild(&mut self, config: &Config) -> Result<(), cubeflat_render::TextureError> {
        let (cube_map, view) = build_view(
            &self.ctx.device,
            &self.ctx.queue,
            &self.renderer,
            &config.cubemap,
            &config.view,
            self.ctx.size(),
        )?;
        self.view = view;
        self._cube_map = cube_map;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        let (w, h) = self.ctx.size();
        self.view.set_size(w as f32, h as f32);
    }

    fn draw(&mut self, background: wgpu::Color) -> Result<(), SurfaceError> {
        let frame = self.ctx.get_current_texture()?;
        let target_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cubeflat-frame"),
            });
        clear_target(&mut encoder, &target_view, background);
        if let Err(e) = self.view.render(&mut self.renderer.frame(
            &self.ctx.device,
            &mut encoder,
            &frame.texture,
        )) {
            error!("Flat cube render failed: {e}");
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Viewer state driven by the winit event loop.
pub struct ViewerApp {
    config: Config,
    config_dir: PathBuf,
    window: Option<Arc<Window>>,
    viewport: Option<Viewport>,
}

impl ViewerApp {
    pub fn new(config: Config, config_dir: PathBuf) -> Self {
        Self {
            config,
            config_dir,
            window: None,
            viewport: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pick up edits to `config.ron`; only the view and cube map sections apply live.
    fn reload_config(&mut self) {
        let fresh = match self.config.reload(&self.config_dir) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => return,
            Err(e) => {
                warn!("Config reload failed: {e}");
                return;
            }
        };
        let changed = fresh.view != self.config.view || fresh.cubemap != self.config.cubemap;
        self.config.view = fresh.view;
        self.config.cubemap = fresh.cubemap;
        if !changed {
            return;
        }

        if let Some(viewport) = &mut self.viewport {
            match viewport.rebuild(&self.config) {
                Ok(()) => info!("Applied reloaded view settings"),
                Err(e) => error!("Failed to rebuild cube map: {e}"),
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let viewport = init_render_context_blocking(window.clone())
            .map_err(|e| e.to_string())
            .and_then(|ctx| Viewport::new(ctx, &self.config).map_err(|e| e.to_string()));
        match viewport {
            Ok(viewport) => {
                let (w, h) = viewport.ctx.size();
                info!("Viewer initialized at {w}x{h}");
                self.viewport = Some(viewport);
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(viewport) = &mut self.viewport {
                    viewport.resize(size.width, size.height);
                    debug!("Resized to {}x{}", size.width, size.height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::Focused(true) => self.reload_config(),
            WindowEvent::RedrawRequested => {
                let background = background_color(&self.config.view);
                let Some(viewport) = &mut self.viewport else {
                    return;
                };
                match viewport.draw(background) {
                    Ok(()) => {}
                    Err(SurfaceError::Lost) => {
                        let (w, h) = viewport.ctx.size();
                        viewport.resize(w, h);
                    }
                    Err(SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(SurfaceError::Timeout) => {
                        warn!("Surface timeout, skipping frame");
                    }
                }
            }
            _ => {}
        }
    }
}

/// Open the viewer window and block until it is closed.
pub fn run(config: Config, config_dir: PathBuf) -> Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = ViewerApp::new(config, config_dir);
    event_loop.run_app(&mut app)
}
