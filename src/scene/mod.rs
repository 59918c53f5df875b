//! 场景树：容器、图片、文本三类节点的测量与绘制
//!
//! 每个节点遵循两段式约定：
//! 1. `measure` 自顶向下发起、自底向上完成，得到节点尺寸并缓存子节点偏移；
//! 2. `draw` 严格自顶向下，使用测量阶段的结果绘制到 [`RenderContext`]。

mod container;
mod image;
mod stack;
mod style;
mod text;

pub use self::container::Container;
pub use self::image::{fit_size, ImageMode, ImageNode, ImageSource};
pub use self::stack::stack;
pub use self::style::{resolve_size, Align, Dimension, Direction, Overflow, SizingMode, Style};
pub use self::text::{apply_ellipsis, wrap_lines, TextNode, DEFAULT_LINE_HEIGHT, ELLIPSIS};

use crate::bitmap::ImageLoader;
use crate::context::{RenderContext, TextMeasurer};
use crate::{Offset, Result, Size};
use futures::future::{self, FutureExt, LocalBoxFuture};

/// 测量阶段依赖的外部能力
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub text: &'a dyn TextMeasurer,
    pub images: &'a dyn ImageLoader,
}

impl<'a> LayoutContext<'a> {
    pub fn new(text: &'a dyn TextMeasurer, images: &'a dyn ImageLoader) -> Self {
        Self { text, images }
    }
}

pub type MeasureFuture<'a> = LocalBoxFuture<'a, Result<Size>>;

/// 所有节点共有的状态
#[derive(Debug, Clone, Default)]
pub struct NodeState {
    dirty: bool,
    /// 在父容器子节点列表中的下标，根节点为 None
    slot: Option<usize>,
    last_draw: Option<Offset>,
}

impl NodeState {
    fn record_draw(&mut self, left: f32, top: f32) {
        self.dirty = false;
        self.last_draw = Some(Offset::new(left, top));
    }
}

/// 场景树节点
pub enum Node {
    Container(Container),
    Image(ImageNode),
    Text(TextNode),
}

impl Node {
    /// 测量节点，父节点尺寸应为有限非负值
    pub fn measure<'a>(&'a mut self, ctx: LayoutContext<'a>, parent_width: f32, parent_height: f32) -> MeasureFuture<'a> {
        match self {
            Node::Container(c) => c.measure(ctx, parent_width, parent_height).boxed_local(),
            Node::Image(i) => i.measure(ctx, parent_width, parent_height).boxed_local(),
            Node::Text(t) => future::ready(Ok(t.measure(ctx.text, parent_width, parent_height))).boxed_local(),
        }
    }

    /// 在绝对坐标 (left, top) 处绘制节点
    pub fn draw(&mut self, ctx: &mut dyn RenderContext, left: f32, top: f32) -> Result<()> {
        match self {
            Node::Container(c) => c.draw(ctx, left, top),
            Node::Image(i) => {
                i.draw(ctx, left, top);
                Ok(())
            }
            Node::Text(t) => {
                t.draw(ctx, left, top);
                Ok(())
            }
        }
    }

    /// 在上一次绘制的位置重绘，从未绘制过时什么也不做
    pub fn redraw(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        match self.state().last_draw {
            Some(at) => self.draw(ctx, at.left, at.top),
            None => Ok(()),
        }
    }

    /// 标记为脏。父容器的通知由 [`Container::mark_child_dirty`] 完成
    pub fn mark_dirty(&mut self) {
        self.state_mut().dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.state().dirty
    }

    /// 在父容器中的位置
    pub fn slot(&self) -> Option<usize> {
        self.state().slot
    }

    /// 上一次绘制的位置
    pub fn last_draw(&self) -> Option<Offset> {
        self.state().last_draw
    }

    /// 从绘制表面卸载，释放子树持有的位图
    pub fn detach(&mut self) {
        match self {
            Node::Container(c) => c.detach(),
            Node::Image(i) => i.detach(),
            Node::Text(_) => {}
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Node::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Node::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageNode> {
        match self {
            Node::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    fn state(&self) -> &NodeState {
        match self {
            Node::Container(c) => &c.state,
            Node::Image(i) => &i.state,
            Node::Text(t) => &t.state,
        }
    }

    fn state_mut(&mut self) -> &mut NodeState {
        match self {
            Node::Container(c) => &mut c.state,
            Node::Image(i) => &mut i.state,
            Node::Text(t) => &mut t.state,
        }
    }

    fn set_slot(&mut self, slot: usize) {
        self.state_mut().slot = Some(slot);
    }
}

impl From<Container> for Node {
    fn from(c: Container) -> Self {
        Node::Container(c)
    }
}

impl From<ImageNode> for Node {
    fn from(i: ImageNode) -> Self {
        Node::Image(i)
    }
}

impl From<TextNode> for Node {
    fn from(t: TextNode) -> Self {
        Node::Text(t)
    }
}
