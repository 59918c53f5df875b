//! 单元测试模块
//! 覆盖样式解析、容器布局、文本换行、图片尺寸、光栅输出与场景配置

pub mod container_tests;
pub mod image_tests;
pub mod style_tests;

use crate::bitmap::Bitmap;
use crate::context::{RenderContext, TextMeasurer};
use crate::text::{FontSpec, TextMetrics};
use crate::{Color, Path, Rect};

/// 等宽测量器：每个字符 10px，ascent 8，descent 2
pub struct FixedAdvance;

impl FixedAdvance {
    pub const ADVANCE: f32 = 10.0;
}

impl TextMeasurer for FixedAdvance {
    fn measure_text(&self, text: &str, _font: &FontSpec) -> TextMetrics {
        let count = text.chars().count();
        if count == 0 {
            return TextMetrics::default();
        }
        TextMetrics {
            width: count as f32 * Self::ADVANCE,
            ascent: 8.0,
            descent: 2.0,
        }
    }
}

/// 记录到的绘制调用
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Save,
    Restore,
    FillRect(Rect, Color),
    FillPath(Color),
    ClipPath,
    DrawImage(Rect),
    FillText(String, f32, f32),
}

/// 只记录调用的绘制上下文
#[derive(Default)]
pub struct RecordingContext {
    pub calls: Vec<Call>,
    pub depth: usize,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn texts(&self) -> Vec<(String, f32, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::FillText(s, x, y) => Some((s.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasurer for RecordingContext {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextMetrics {
        FixedAdvance.measure_text(text, font)
    }
}

impl RenderContext for RecordingContext {
    fn save(&mut self) {
        self.depth += 1;
        self.calls.push(Call::Save);
    }

    fn restore(&mut self) {
        self.depth -= 1;
        self.calls.push(Call::Restore);
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        self.calls.push(Call::FillRect(*rect, color));
    }

    fn fill_path(&mut self, _path: &Path, color: Color) {
        self.calls.push(Call::FillPath(color));
    }

    fn clip_path(&mut self, _path: &Path) {
        self.calls.push(Call::ClipPath);
    }

    fn draw_image(&mut self, _bitmap: &Bitmap, dst: &Rect) {
        self.calls.push(Call::DrawImage(*dst));
    }

    fn fill_text(&mut self, text: &str, x: f32, baseline: f32, _font: &FontSpec, _color: Color) {
        self.calls.push(Call::FillText(text.to_string(), x, baseline));
    }
}
