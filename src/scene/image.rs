//! 图片节点 - 异步加载位图并按模式计算尺寸

use super::style::{resolve_size, Style};
use super::{LayoutContext, NodeState};
use crate::bitmap::Bitmap;
use crate::context::RenderContext;
use crate::{Rect, Result, Size};
use serde::Deserialize;

/// 尺寸模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageMode {
    /// 宽图按宽度、高图按高度等比缩放
    #[default]
    AspectFit,
    /// 宽度取样式值，高度等比
    WidthFix,
    /// 高度取样式值，宽度等比
    HeightFix,
}

/// 图片来源
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Locator(String),
    /// 二进制数据暂不支持，按空定位符处理
    Blob(Vec<u8>),
}

impl ImageSource {
    pub fn locator(&self) -> &str {
        match self {
            ImageSource::Locator(s) => s,
            ImageSource::Blob(_) => "",
        }
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        ImageSource::Locator(s.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        ImageSource::Locator(s)
    }
}

/// 按模式计算图片尺寸，保持位图宽高比
pub fn fit_size(mode: ImageMode, style: &Style, parent_width: f32, parent_height: f32, source_width: f32, source_height: f32) -> Size {
    if source_width <= 0.0 || source_height <= 0.0 {
        return Size::default();
    }

    let width_driven = |style: &Style| {
        let width = resolve_size(style.width.as_ref(), parent_width);
        Size::new(width, width / source_width * source_height)
    };
    let height_driven = |style: &Style| {
        let height = resolve_size(style.height.as_ref(), parent_height);
        Size::new(height / source_height * source_width, height)
    };

    match mode {
        ImageMode::WidthFix => width_driven(style),
        ImageMode::HeightFix => height_driven(style),
        ImageMode::AspectFit if source_width > source_height => width_driven(style),
        ImageMode::AspectFit => height_driven(style),
    }
}

pub struct ImageNode {
    style: Style,
    source: ImageSource,
    mode: ImageMode,
    bitmap: Option<Bitmap>,
    size: Option<Size>,
    pub(super) state: NodeState,
}

impl ImageNode {
    pub fn new(style: Style, source: impl Into<ImageSource>) -> Self {
        Self {
            style,
            source: source.into(),
            mode: ImageMode::default(),
            bitmap: None,
            size: None,
            state: NodeState::default(),
        }
    }

    pub fn with_mode(mut self, mode: ImageMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn mode(&self) -> ImageMode {
        self.mode
    }

    pub fn is_loaded(&self) -> bool {
        self.bitmap.is_some()
    }

    pub fn measured_size(&self) -> Option<Size> {
        self.size
    }

    /// 等待位图加载完成后才得到尺寸
    pub async fn measure(&mut self, ctx: LayoutContext<'_>, parent_width: f32, parent_height: f32) -> Result<Size> {
        let bitmap = ctx.images.load(self.source.locator()).await?;
        let size = fit_size(
            self.mode,
            &self.style,
            parent_width,
            parent_height,
            bitmap.width() as f32,
            bitmap.height() as f32,
        );
        log::debug!(
            "image {:?} {}x{} -> {:.1}x{:.1}",
            self.source.locator(),
            bitmap.width(),
            bitmap.height(),
            size.width,
            size.height
        );
        self.bitmap = Some(bitmap);
        self.size = Some(size);
        Ok(size)
    }

    /// 位图未加载时不绘制
    pub fn draw(&mut self, ctx: &mut dyn RenderContext, left: f32, top: f32) {
        self.state.record_draw(left, top);
        if let (Some(bitmap), Some(size)) = (&self.bitmap, self.size) {
            ctx.draw_image(bitmap, &Rect::from_size(left, top, size));
        }
    }

    pub(super) fn detach(&mut self) {
        self.bitmap = None;
    }
}
