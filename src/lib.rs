//! Mini Scene - 保留模式的场景树渲染器
//! 容器/图片/文本三类节点，两段式测量与绘制，软件光栅化输出

mod canvas;
mod color;
mod error;
mod geometry;
mod paint;
mod path;

pub mod bitmap;
pub mod config;
pub mod context;
pub mod driver;
pub mod scene;
pub mod text;

pub use bitmap::{Bitmap, ImageLoader, MemoryImageLoader, ThreadedImageLoader};
pub use canvas::Canvas;
pub use color::Color;
pub use config::SceneConfig;
pub use context::{GlyphSource, Painter, RenderContext, StateGuard, TextMeasurer};
pub use driver::Scene;
pub use error::{RenderError, Result};
pub use geometry::{Offset, Point, Rect, Size};
pub use paint::{Paint, PaintStyle};
pub use path::{Path, PathCommand};
pub use scene::{Container, ImageNode, LayoutContext, Node, TextNode};
pub use text::{BlockGlyphs, FontSpec, TextMetrics, TextRenderer};

// 单元测试
#[cfg(test)]
mod tests;
