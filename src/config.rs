//! 场景描述文件（JSON）
//!
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "root": {
//!     "type": "container",
//!     "width": "80%",
//!     "background_color": "#f0f0f0",
//!     "children": [
//!       { "type": "text", "content": "hello", "font": "24pt Verdana", "width": "60%" }
//!     ]
//!   }
//! }
//! ```

use crate::scene::{
    Align, Container, Dimension, Direction, ImageMode, ImageNode, Node, Overflow, SizingMode, Style,
    TextNode, DEFAULT_LINE_HEIGHT,
};
use crate::text::{FontSpec, DEFAULT_FONT};
use crate::{Color, Result, Size};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800, height: 600 }
    }
}

impl Viewport {
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

fn default_clear_color() -> String {
    "#ffffff".to_string()
}

fn default_cursor_radius() -> f32 {
    40.0
}

/// 整个场景的配置
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub viewport: Viewport,
    /// 每帧清屏颜色
    #[serde(default = "default_clear_color")]
    pub clear_color: String,
    /// 跟随光标的圆圈半径
    #[serde(default = "default_cursor_radius")]
    pub cursor_radius: f32,
    pub root: NodeConfig,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn clear_color(&self) -> Color {
        parse_color(&self.clear_color).unwrap_or(Color::WHITE)
    }
}

/// 样式属性，三类节点共用
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub border_radius: f32,
    pub background_color: Option<String>,
    pub overflow: Overflow,
    pub direction: Direction,
    pub align: Align,
}

impl StyleConfig {
    fn to_style(&self) -> Style {
        Style {
            width: self.width.clone(),
            height: self.height.clone(),
            border_radius: self.border_radius,
            background_color: self.background_color.as_deref().and_then(parse_color),
            overflow: self.overflow,
            direction: self.direction,
            align: self.align,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeConfig {
    Container {
        #[serde(flatten)]
        style: StyleConfig,
        #[serde(default)]
        width_mode: Option<SizingMode>,
        #[serde(default)]
        height_mode: Option<SizingMode>,
        #[serde(default)]
        children: Vec<NodeConfig>,
    },
    Image {
        #[serde(flatten)]
        style: StyleConfig,
        source: String,
        #[serde(default)]
        mode: ImageMode,
    },
    Text {
        #[serde(flatten)]
        style: StyleConfig,
        #[serde(default)]
        content: String,
        #[serde(default)]
        font: Option<String>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        max_line: Option<usize>,
        #[serde(default)]
        line_height: Option<f32>,
        #[serde(default)]
        ellipsis: bool,
    },
}

impl NodeConfig {
    /// 构建节点树
    pub fn build(&self) -> Node {
        match self {
            NodeConfig::Container { style, width_mode, height_mode, children } => {
                let mut container = Container::new(style.to_style()).with_modes(*width_mode, *height_mode);
                for child in children {
                    container.add(child.build());
                }
                container.into()
            }
            NodeConfig::Image { style, source, mode } => {
                ImageNode::new(style.to_style(), source.as_str()).with_mode(*mode).into()
            }
            NodeConfig::Text { style, content, font, color, max_line, line_height, ellipsis } => {
                let mut text = TextNode::new(style.to_style(), content.as_str())
                    .with_font(FontSpec::parse(font.as_deref().unwrap_or(DEFAULT_FONT)))
                    .with_color(color.as_deref().and_then(parse_color).unwrap_or(Color::BLACK))
                    .with_line_height(line_height.unwrap_or(DEFAULT_LINE_HEIGHT))
                    .with_ellipsis(*ellipsis);
                if let Some(max_line) = max_line {
                    text = text.with_max_line(*max_line);
                }
                text.into()
            }
        }
    }
}

fn parse_color(value: &str) -> Option<Color> {
    let color = Color::parse(value);
    if color.is_none() {
        log::warn!("unsupported color `{}`", value);
    }
    color
}
