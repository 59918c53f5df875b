//! 节点样式：尺寸、对齐、方向、裁剪

use crate::Color;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static PERCENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(\.?)(\d*)%$").expect("valid percent regex"));

/// 宽或高的取值：绝对像素、相对父节点的百分比，或无法识别的字符串
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "DimensionRepr")]
pub enum Dimension {
    Px(f32),
    Percent(f32),
    /// 无法识别的取值，解析时回退为父节点尺寸
    Invalid(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Number(f32),
    Text(String),
}

impl From<DimensionRepr> for Dimension {
    fn from(repr: DimensionRepr) -> Self {
        match repr {
            DimensionRepr::Number(v) => Dimension::Px(v),
            DimensionRepr::Text(s) => Dimension::parse(&s),
        }
    }
}

impl Dimension {
    /// 解析 `"N%"`（N 为整数或小数），其他字符串记为 `Invalid`
    pub fn parse(value: &str) -> Self {
        if PERCENT_PATTERN.is_match(value) {
            if let Ok(n) = value[..value.len() - 1].parse::<f32>() {
                return Dimension::Percent(n);
            }
        }
        log::warn!("unsupported size `{}`, falling back to parent size", value);
        Dimension::Invalid(value.to_string())
    }

    /// 相对父节点尺寸求值
    pub fn resolve(&self, parent: f32) -> f32 {
        match self {
            Dimension::Px(v) => *v,
            Dimension::Percent(n) => n / 100.0 * parent,
            Dimension::Invalid(_) => parent,
        }
    }
}

impl From<f32> for Dimension {
    fn from(v: f32) -> Self {
        Dimension::Px(v)
    }
}

impl From<&str> for Dimension {
    fn from(s: &str) -> Self {
        Dimension::parse(s)
    }
}

/// 缺省时取父节点尺寸
pub fn resolve_size(value: Option<&Dimension>, parent: f32) -> f32 {
    value.map_or(parent, |d| d.resolve(parent))
}

/// 单个轴上的尺寸模式，构造时确定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    /// 主轴方向为子节点之和，交叉轴为最大值
    WrapContent,
    MatchParent,
    Specific,
}

impl SizingMode {
    /// 没有显式模式时：给了尺寸为 `Specific`，否则 `MatchParent`
    pub fn infer(explicit: Option<SizingMode>, value: Option<&Dimension>) -> Self {
        explicit.unwrap_or(match value {
            Some(_) => SizingMode::Specific,
            None => SizingMode::MatchParent,
        })
    }
}

/// 子节点堆叠方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// 交叉轴对齐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Start,
    End,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
}

/// 节点样式，构造后只读
#[derive(Debug, Clone, Default)]
pub struct Style {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub border_radius: f32,
    pub background_color: Option<Color>,
    pub overflow: Overflow,
    pub direction: Direction,
    pub align: Align,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: impl Into<Dimension>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_height(mut self, height: impl Into<Dimension>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn with_size(self, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        self.with_width(width).with_height(height)
    }

    pub fn with_border_radius(mut self, radius: f32) -> Self {
        self.border_radius = radius;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}
