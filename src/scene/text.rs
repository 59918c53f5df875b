//! 文本节点 - 按字符贪心换行、最大行数与省略号

use super::style::{resolve_size, Style};
use super::NodeState;
use crate::context::{RenderContext, TextMeasurer};
use crate::text::FontSpec;
use crate::{Color, Size};

pub const ELLIPSIS: &str = "...";
pub const DEFAULT_LINE_HEIGHT: f32 = 1.2;

/// 逐字符贪心换行，不按单词断行
///
/// 当前行加上下一个字符仍窄于 `max_width`，或当前行还是空的，就把字符追加到当前行；
/// 否则另起一行重试该字符。行数达到 `max_line` 后剩余字符直接丢弃。
pub fn wrap_lines(measurer: &dyn TextMeasurer, text: &str, font: &FontSpec, max_width: f32, max_line: Option<usize>) -> Vec<String> {
    let mut lines = vec![String::new()];
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        let Some(line) = lines.last_mut() else { break };
        let mut candidate = String::with_capacity(line.len() + ch.len_utf8());
        candidate.push_str(line);
        candidate.push(ch);

        if line.is_empty() || measurer.measure_text(&candidate, font).width < max_width {
            *line = candidate;
            chars.next();
        } else if max_line.is_some_and(|max| lines.len() + 1 > max) {
            break;
        } else {
            lines.push(String::new());
        }
    }
    lines
}

/// 给一行文本加省略号
///
/// 行尾加上省略号仍放得下时不做处理（返回 None）；否则从后往前截断，
/// 取最长的严格前缀使 `前缀 + "..."` 不超过 `max_width`。找不到时也返回 None。
pub fn apply_ellipsis(measurer: &dyn TextMeasurer, line: &str, font: &FontSpec, max_width: f32) -> Option<String> {
    if measurer.measure_text(&format!("{line}{ELLIPSIS}"), font).width <= max_width {
        return None;
    }
    let chars: Vec<char> = line.chars().collect();
    (0..chars.len()).rev().find_map(|keep| {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.push_str(ELLIPSIS);
        (measurer.measure_text(&candidate, font).width <= max_width).then_some(candidate)
    })
}

pub struct TextNode {
    style: Style,
    text: String,
    font: FontSpec,
    color: Color,
    max_line: Option<usize>,
    line_height: f32,
    ellipsis: bool,
    lines: Vec<String>,
    line_height_px: f32,
    size: Option<Size>,
    pub(super) state: NodeState,
}

impl TextNode {
    pub fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
            font: FontSpec::default(),
            color: Color::BLACK,
            max_line: None,
            line_height: DEFAULT_LINE_HEIGHT,
            ellipsis: false,
            lines: Vec::new(),
            line_height_px: 0.0,
            size: None,
            state: NodeState::default(),
        }
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = Some(max_line);
        self
    }

    /// 行高倍数，相对字形的 ascent + descent
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_ellipsis(mut self, ellipsis: bool) -> Self {
        self.ellipsis = ellipsis;
        self
    }

    /// 替换文本，下一次测量生效
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 最近一次测量得到的各行
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_height_px(&self) -> f32 {
        self.line_height_px
    }

    pub fn measured_size(&self) -> Option<Size> {
        self.size
    }

    pub fn measure(&mut self, measurer: &dyn TextMeasurer, parent_width: f32, _parent_height: f32) -> Size {
        let max_width = resolve_size(self.style.width.as_ref(), parent_width);
        let mut lines = wrap_lines(measurer, &self.text, &self.font, max_width, self.max_line);

        // 行高只按第一行的字形度量计算一次
        let first = lines
            .first()
            .map(|l| measurer.measure_text(l, &self.font))
            .unwrap_or_default();
        let line_height_px = (first.ascent + first.descent) * self.line_height;

        if self.ellipsis && !self.text.is_empty() {
            if let Some(last) = lines.last_mut() {
                if let Some(truncated) = apply_ellipsis(measurer, last, &self.font, max_width) {
                    *last = truncated;
                }
            }
        }

        let size = Size::new(max_width, line_height_px * lines.len() as f32);
        log::debug!("text measured {} lines, {:.1}x{:.1}", lines.len(), size.width, size.height);
        self.lines = lines;
        self.line_height_px = line_height_px;
        self.size = Some(size);
        size
    }

    /// 各行左对齐，第 i 行基线位于 top + (i + 1) * 行高
    pub fn draw(&mut self, ctx: &mut dyn RenderContext, left: f32, top: f32) {
        self.state.record_draw(left, top);
        for (i, line) in self.lines.iter().enumerate() {
            let baseline = top + (i + 1) as f32 * self.line_height_px;
            ctx.fill_text(line, left, baseline, &self.font, self.color);
        }
    }
}
