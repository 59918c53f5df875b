//! 窗口运行：每帧重绘场景，并用圆圈跟随光标

use mini_scene::driver::playground;
use mini_scene::{
    BlockGlyphs, Canvas, GlyphSource, LayoutContext, Scene, SceneConfig, Size, TextRenderer,
    ThreadedImageLoader,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

struct SceneWindow {
    window: Option<Arc<Window>>,
    surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,
    scene: Scene,
    canvas: Canvas,
    glyphs: Box<dyn GlyphSource>,
}

impl SceneWindow {
    fn new(scene_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut scene = match scene_path {
            Some(path) => Scene::from_config(&SceneConfig::from_file(path)?),
            None => {
                let viewport = Size::new(800.0, 600.0);
                Scene::new(playground(viewport), viewport)
            }
        };

        let glyphs: Box<dyn GlyphSource> = match TextRenderer::load_system_font() {
            Ok(renderer) => Box::new(renderer),
            Err(e) => {
                log::warn!("{}, falling back to block glyphs", e);
                Box::new(BlockGlyphs)
            }
        };

        // 测量完成后才进入逐帧绘制
        let images = ThreadedImageLoader::new();
        let size = scene.mount_blocking(LayoutContext::new(glyphs.as_measurer(), &images))?;
        println!("✅ Scene measured: {:.0}x{:.0}", size.width, size.height);

        let viewport = scene.viewport();
        Ok(Self {
            window: None,
            surface: None,
            canvas: Canvas::new(viewport.width as u32, viewport.height as u32),
            scene,
            glyphs,
        })
    }

    fn present(&mut self) {
        if let Err(e) = self.scene.draw_frame(&mut self.canvas, self.glyphs.as_ref()) {
            log::error!("frame failed: {}", e);
            return;
        }

        let (Some(window), Some(surface)) = (&self.window, &mut self.surface) else {
            return;
        };
        let size = window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        if surface.resize(width, height).is_err() {
            return;
        }
        if let Ok(mut buffer) = surface.buffer_mut() {
            buffer.fill(0);
            self.canvas.present_into(&mut buffer, size.width, size.height);
            if let Err(e) = buffer.present() {
                log::error!("present failed: {}", e);
            }
        }
    }
}

impl ApplicationHandler for SceneWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let viewport = self.scene.viewport();
        let attrs = WindowAttributes::default()
            .with_title("Mini Scene")
            .with_inner_size(winit::dpi::PhysicalSize::new(viewport.width as u32, viewport.height as u32))
            .with_resizable(false);

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("cannot create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                log::error!("cannot create surface: {}", e);
                event_loop.exit();
                return;
            }
        }
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.scene.detach();
                event_loop.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.scene.set_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::RedrawRequested => {
                self.present();
                // 每次显示刷新都重绘一帧
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut app = SceneWindow::new(std::env::args().nth(1))?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut app)?;
    Ok(())
}
