//! 无窗口运行：测量场景、绘制一帧并保存为 PNG
//!
//! 用法：`mini-scene [scene.json] [output.png]`

use mini_scene::driver::playground;
use mini_scene::{
    BlockGlyphs, Canvas, GlyphSource, LayoutContext, Scene, SceneConfig, Size, TextRenderer,
    ThreadedImageLoader,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let scene_path = args.next();
    let output = args.next().unwrap_or_else(|| "mini_scene.png".to_string());

    let mut scene = match &scene_path {
        Some(path) => Scene::from_config(&SceneConfig::from_file(path)?),
        None => {
            let viewport = Size::new(800.0, 600.0);
            Scene::new(playground(viewport), viewport)
        }
    };

    let fonts = TextRenderer::load_system_font();
    let glyphs: &dyn GlyphSource = match &fonts {
        Ok(renderer) => renderer,
        Err(e) => {
            log::warn!("{}, falling back to block glyphs", e);
            &BlockGlyphs
        }
    };

    let images = ThreadedImageLoader::new();
    let root_size = scene.mount_blocking(LayoutContext::new(glyphs.as_measurer(), &images))?;
    println!("✅ Scene measured: {:.0}x{:.0}", root_size.width, root_size.height);

    let viewport = scene.viewport();
    let mut canvas = Canvas::new(viewport.width as u32, viewport.height as u32);
    scene.draw_frame(&mut canvas, glyphs)?;
    canvas.save_png(&output)?;
    println!("✅ Frame rendered to {}", output);

    scene.detach();
    Ok(())
}
