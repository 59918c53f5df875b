//! 绘制上下文 - 组件树与具体绘制表面之间的接口

use crate::bitmap::Bitmap;
use crate::text::{FontSpec, TextMetrics};
use crate::{Canvas, Color, Paint, Path, Rect};
use std::ops::{Deref, DerefMut};

/// 文本度量，测量阶段只需要这一能力
pub trait TextMeasurer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextMetrics;
}

/// 能把文本光栅化到画布上的字形来源
pub trait GlyphSource: TextMeasurer {
    /// `baseline` 为基线的 y 坐标
    fn draw_text(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, font: &FontSpec, color: Color);

    /// 测量阶段只需要度量能力
    fn as_measurer(&self) -> &dyn TextMeasurer;
}

/// 2D 绘制上下文
///
/// 填充样式随每次调用传入，只有裁剪区域属于可保存的状态。
/// 修改裁剪的调用方应通过 [`StateGuard`] 成对地保存和恢复。
pub trait RenderContext: TextMeasurer {
    fn save(&mut self);
    fn restore(&mut self);
    fn fill_rect(&mut self, rect: &Rect, color: Color);
    fn fill_path(&mut self, path: &Path, color: Color);
    /// 与当前裁剪区域求交
    fn clip_path(&mut self, path: &Path);
    /// 把位图拉伸绘制到 `dst`
    fn draw_image(&mut self, bitmap: &Bitmap, dst: &Rect);
    fn fill_text(&mut self, text: &str, x: f32, baseline: f32, font: &FontSpec, color: Color);
}

/// 作用域内的绘制状态快照，离开作用域（包括 `?` 提前返回）时恢复
pub struct StateGuard<'a> {
    ctx: &'a mut dyn RenderContext,
}

impl<'a> StateGuard<'a> {
    pub fn new(ctx: &'a mut dyn RenderContext) -> Self {
        ctx.save();
        Self { ctx }
    }
}

impl<'a> Deref for StateGuard<'a> {
    type Target = dyn RenderContext + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl<'a> DerefMut for StateGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}

/// 把 [`Canvas`] 和字形来源组合成 [`RenderContext`]
pub struct Painter<'a> {
    canvas: &'a mut Canvas,
    glyphs: &'a dyn GlyphSource,
}

impl<'a> Painter<'a> {
    pub fn new(canvas: &'a mut Canvas, glyphs: &'a dyn GlyphSource) -> Self {
        Self { canvas, glyphs }
    }

    pub fn canvas(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl TextMeasurer for Painter<'_> {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextMetrics {
        self.glyphs.measure_text(text, font)
    }
}

impl RenderContext for Painter<'_> {
    fn save(&mut self) {
        self.canvas.save();
    }

    fn restore(&mut self) {
        self.canvas.restore();
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        self.canvas.fill_rect(rect, color);
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.canvas.draw_path(path, &Paint::fill(color));
    }

    fn clip_path(&mut self, path: &Path) {
        self.canvas.clip_path(path);
    }

    fn draw_image(&mut self, bitmap: &Bitmap, dst: &Rect) {
        self.canvas.draw_image(bitmap.as_raw(), bitmap.width(), bitmap.height(), dst);
    }

    fn fill_text(&mut self, text: &str, x: f32, baseline: f32, font: &FontSpec, color: Color) {
        self.glyphs.draw_text(self.canvas, text, x, baseline, font, color);
    }
}
