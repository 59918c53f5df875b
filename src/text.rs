//! 文本渲染模块 - 字体描述、字形度量与光栅化

use crate::context::{GlyphSource, TextMeasurer};
use crate::{Canvas, Color, RenderError, Rect};
use fontdue::{Font, FontSettings, Metrics};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// 默认字体，与 canvas 的 `15pt` 一致
pub const DEFAULT_FONT: &str = "15pt";

static FONT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)(px|pt)?\s*(.*?)\s*$").expect("valid font regex"));

/// 字体描述，解析自 `"24pt Verdana"` 这样的简写
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// 像素字号
    pub size: f32,
    pub family: Option<String>,
}

impl FontSpec {
    pub fn new(size: f32) -> Self {
        Self { size, family: None }
    }

    /// 解析字体简写，无法识别时回退到默认字体
    pub fn parse(value: &str) -> Self {
        let Some(caps) = FONT_PATTERN.captures(value) else {
            log::warn!("unrecognized font `{}`, using {}", value, DEFAULT_FONT);
            return Self::default();
        };
        let number: f32 = caps[1].parse().unwrap_or(15.0);
        let size = match caps.get(2).map(|m| m.as_str()) {
            Some("pt") => number * 4.0 / 3.0,
            _ => number,
        };
        let family = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());
        Self { size, family }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(15.0 * 4.0 / 3.0)
    }
}

/// 文本度量结果
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f32,
    /// 基线以上的实际包围盒高度
    pub ascent: f32,
    /// 基线以下的实际包围盒高度
    pub descent: f32,
}

/// 字形缓存 key：(字符, 字号 * 10)
type GlyphKey = (char, u32);

/// 文本渲染器 - 支持 Emoji 字体回退
pub struct TextRenderer {
    main_font: Font,
    emoji_font: Option<Font>,
    cache: Mutex<HashMap<GlyphKey, (Metrics, Vec<u8>)>>,
}

impl TextRenderer {
    /// 从字体数据创建
    pub fn from_bytes(font_data: &[u8]) -> crate::Result<Self> {
        let font = Self::parse_font(font_data)?;
        Ok(Self {
            main_font: font,
            emoji_font: None,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// 从文件路径加载字体
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let font_data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&font_data)
    }

    fn parse_font(data: &[u8]) -> crate::Result<Font> {
        let settings = FontSettings {
            scale: 40.0,
            ..Default::default()
        };
        Font::from_bytes(data, settings).map_err(|e| RenderError::Font(e.to_string()))
    }

    /// 按平台常见路径查找系统字体
    pub fn load_system_font() -> crate::Result<Self> {
        let main_font_paths = [
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
            "/Library/Fonts/Arial Unicode.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];
        let emoji_font_paths = [
            "/System/Library/Fonts/Apple Color Emoji.ttc",
            "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
        ];

        let mut renderer = main_font_paths
            .iter()
            .filter(|p| Path::new(p).exists())
            .find_map(|p| match Self::from_file(p) {
                Ok(r) => {
                    log::info!("main font: {}", p);
                    Some(r)
                }
                Err(e) => {
                    log::debug!("skipping font {}: {}", p, e);
                    None
                }
            })
            .ok_or_else(|| RenderError::Font("no system font found".into()))?;

        renderer.emoji_font = emoji_font_paths
            .iter()
            .filter(|p| Path::new(p).exists())
            .find_map(|p| std::fs::read(p).ok().and_then(|data| Self::parse_font(&data).ok()));

        Ok(renderer)
    }

    /// 判断字符是否为 Emoji
    fn is_emoji(ch: char) -> bool {
        matches!(ch as u32,
            0x1F300..=0x1F9FF |
            0x2600..=0x26FF |
            0x2700..=0x27BF |
            0x1F000..=0x1F02F |
            0x1F100..=0x1F2FF |
            0x1FA00..=0x1FAFF
        )
    }

    fn font_for(&self, ch: char) -> &Font {
        if Self::is_emoji(ch) {
            self.emoji_font.as_ref().unwrap_or(&self.main_font)
        } else {
            &self.main_font
        }
    }

    fn glyph(&self, ch: char, size: f32) -> (Metrics, Vec<u8>) {
        let key = (ch, (size * 10.0) as u32);
        if let Some(hit) = self.cache.lock().unwrap_or_else(|e| e.into_inner()).get(&key) {
            return hit.clone();
        }
        // 光栅化较慢，不在锁内进行
        let glyph = self.font_for(ch).rasterize(ch, size);
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, glyph.clone());
        glyph
    }
}

impl TextMeasurer for TextRenderer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextMetrics {
        let mut out = TextMetrics::default();
        for ch in text.chars() {
            let metrics = self.font_for(ch).metrics(ch, font.size);
            out.width += metrics.advance_width;
            if metrics.height > 0 {
                out.ascent = out.ascent.max(metrics.height as f32 + metrics.ymin as f32);
                out.descent = out.descent.max(-(metrics.ymin as f32));
            }
        }
        out
    }
}

impl GlyphSource for TextRenderer {
    fn draw_text(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, font: &FontSpec, color: Color) {
        let mut cursor_x = x;
        for ch in text.chars() {
            let (metrics, bitmap) = self.glyph(ch, font.size);

            let glyph_x = cursor_x + metrics.xmin as f32;
            let glyph_y = baseline - metrics.height as f32 - metrics.ymin as f32;
            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx] as f32 / 255.0;
                    if coverage > 0.001 {
                        let px = (glyph_x + gx as f32).round() as i32;
                        let py = (glyph_y + gy as f32).round() as i32;
                        canvas.set_pixel(px, py, color.with_coverage(coverage));
                    }
                }
            }

            cursor_x += metrics.advance_width;
        }
    }

    fn as_measurer(&self) -> &dyn TextMeasurer {
        self
    }
}

/// 无字体时的替代字形：等宽，每个字符画成一个小方块
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockGlyphs;

impl BlockGlyphs {
    const ADVANCE: f32 = 0.6;
    const ASCENT: f32 = 0.8;
    const DESCENT: f32 = 0.2;
}

impl TextMeasurer for BlockGlyphs {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextMetrics {
        let count = text.chars().count();
        if count == 0 {
            return TextMetrics::default();
        }
        TextMetrics {
            width: count as f32 * font.size * Self::ADVANCE,
            ascent: font.size * Self::ASCENT,
            descent: font.size * Self::DESCENT,
        }
    }
}

impl GlyphSource for BlockGlyphs {
    fn draw_text(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, font: &FontSpec, color: Color) {
        let advance = font.size * Self::ADVANCE;
        let height = font.size * Self::ASCENT;
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = x + i as f32 * advance;
            canvas.fill_rect(&Rect::new(left + 1.0, baseline - height, advance - 2.0, height), color);
        }
    }

    fn as_measurer(&self) -> &dyn TextMeasurer {
        self
    }
}
