//! 图片节点单元测试
//! 尺寸模式、异步加载与未加载时的绘制

use super::{Call, FixedAdvance, RecordingContext};
use crate::bitmap::ImageLoader;
use crate::scene::{fit_size, ImageMode, ImageNode, ImageSource, LayoutContext, Node, Style};
use crate::{Bitmap, Color, MemoryImageLoader, Rect, RenderError, Size, ThreadedImageLoader};
use futures::executor::block_on;

fn wide_loader() -> MemoryImageLoader {
    MemoryImageLoader::new()
        .with("wide.png", Bitmap::solid(200, 100, Color::RED))
        .with("tall.png", Bitmap::solid(50, 100, Color::BLUE))
}

fn measure(node: &mut Node, images: &MemoryImageLoader, width: f32, height: f32) -> crate::Result<Size> {
    block_on(node.measure(LayoutContext::new(&FixedAdvance, images), width, height))
}

#[test]
fn test_aspect_fit_wide_image_is_width_driven() {
    let style = Style::new().with_width("50%");
    let size = fit_size(ImageMode::AspectFit, &style, 400.0, 300.0, 200.0, 100.0);
    assert_eq!(size, Size::new(200.0, 100.0));
}

#[test]
fn test_aspect_fit_tall_image_is_height_driven() {
    let style = Style::new().with_height(80.0);
    let size = fit_size(ImageMode::AspectFit, &style, 400.0, 300.0, 50.0, 100.0);
    assert_eq!(size, Size::new(40.0, 80.0));
}

#[test]
fn test_width_fix_and_height_fix() {
    let style = Style::new().with_size(100.0, "50%");
    assert_eq!(
        fit_size(ImageMode::WidthFix, &style, 400.0, 300.0, 50.0, 100.0),
        Size::new(100.0, 200.0)
    );
    assert_eq!(
        fit_size(ImageMode::HeightFix, &style, 400.0, 300.0, 200.0, 100.0),
        Size::new(300.0, 150.0)
    );
}

#[test]
fn test_missing_dimension_uses_parent() {
    let size = fit_size(ImageMode::WidthFix, &Style::new(), 400.0, 300.0, 200.0, 100.0);
    assert_eq!(size, Size::new(400.0, 200.0));
}

#[test]
fn test_zero_sized_bitmap() {
    let size = fit_size(ImageMode::AspectFit, &Style::new(), 400.0, 300.0, 0.0, 0.0);
    assert_eq!(size, Size::default());
}

#[test]
fn test_measure_waits_for_bitmap() {
    let images = wide_loader();
    let mut node: Node = ImageNode::new(Style::new().with_width("50%"), "wide.png").into();
    assert!(!node.as_image().unwrap().is_loaded());

    let size = measure(&mut node, &images, 400.0, 300.0).unwrap();
    assert_eq!(size, Size::new(200.0, 100.0));

    let image = node.as_image().unwrap();
    assert!(image.is_loaded());
    assert_eq!(image.measured_size(), Some(size));

    let mut ctx = RecordingContext::new();
    node.draw(&mut ctx, 10.0, 20.0).unwrap();
    assert_eq!(ctx.calls, vec![Call::DrawImage(Rect::new(10.0, 20.0, 200.0, 100.0))]);
}

#[test]
fn test_draw_before_load_is_noop() {
    let mut node: Node = ImageNode::new(Style::new(), "wide.png").into();
    let mut ctx = RecordingContext::new();
    node.draw(&mut ctx, 0.0, 0.0).unwrap();
    assert_eq!(ctx.count(|c| matches!(c, Call::DrawImage(_))), 0);
}

#[test]
fn test_blob_source_fails_with_empty_locator() {
    let source = ImageSource::Blob(vec![0x89, b'P', b'N', b'G']);
    assert_eq!(source.locator(), "");

    let mut node: Node = ImageNode::new(Style::new(), source).into();
    let err = measure(&mut node, &wide_loader(), 100.0, 100.0).unwrap_err();
    assert!(matches!(err, RenderError::ImageLoad { ref locator, .. } if locator.is_empty()));
}

#[test]
fn test_detach_releases_bitmap() {
    let images = wide_loader();
    let mut node: Node = ImageNode::new(Style::new(), "tall.png").into();
    measure(&mut node, &images, 100.0, 100.0).unwrap();
    assert!(node.as_image().unwrap().is_loaded());

    node.detach();
    assert!(!node.as_image().unwrap().is_loaded());
    let mut ctx = RecordingContext::new();
    node.draw(&mut ctx, 0.0, 0.0).unwrap();
    assert!(ctx.calls.is_empty());
}

#[test]
fn test_threaded_loader_rejects_empty_locator() {
    let loader = ThreadedImageLoader::new();
    let err = block_on(loader.load("")).unwrap_err();
    assert!(matches!(err, RenderError::ImageLoad { .. }));
}

#[test]
fn test_threaded_loader_reads_file() {
    let path = std::env::temp_dir().join(format!("mini_scene_loader_{}.png", std::process::id()));
    image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 255, 0, 255]))
        .save(&path)
        .unwrap();

    let loader = ThreadedImageLoader::new();
    let locator = path.to_string_lossy().to_string();
    let bitmap = block_on(loader.load(&locator)).unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (3, 2));

    // 第二次命中缓存
    let again = block_on(loader.load(&locator)).unwrap();
    assert_eq!(again.as_raw(), bitmap.as_raw());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_threaded_loader_reports_decode_error() {
    let path = std::env::temp_dir().join(format!("mini_scene_garbage_{}.png", std::process::id()));
    std::fs::write(&path, b"not an image").unwrap();

    let loader = ThreadedImageLoader::new();
    let err = block_on(loader.load(&path.to_string_lossy())).unwrap_err();
    assert!(matches!(err, RenderError::ImageDecode { .. }));
    let _ = std::fs::remove_file(&path);
}
