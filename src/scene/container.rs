//! 容器节点 - 百分比尺寸、方向堆叠与交叉轴对齐

use super::stack::stack;
use super::style::{resolve_size, Overflow, SizingMode, Style};
use super::{LayoutContext, Node, NodeState};
use crate::context::{RenderContext, StateGuard};
use crate::{Offset, Path, Rect, RenderError, Result, Size};
use futures::future::try_join_all;

/// 容器 - 拥有有序的子节点列表
pub struct Container {
    style: Style,
    width_mode: SizingMode,
    height_mode: SizingMode,
    children: Vec<Node>,
    child_offsets: Vec<Offset>,
    last_measure_size: Option<Size>,
    pub(super) state: NodeState,
}

impl Container {
    /// 给了宽/高的轴为 `Specific`，否则 `MatchParent`
    pub fn new(style: Style) -> Self {
        let width_mode = SizingMode::infer(None, style.width.as_ref());
        let height_mode = SizingMode::infer(None, style.height.as_ref());
        Self {
            style,
            width_mode,
            height_mode,
            children: Vec::new(),
            child_offsets: Vec::new(),
            last_measure_size: None,
            state: NodeState::default(),
        }
    }

    /// 显式指定尺寸模式，`None` 表示按样式推断
    pub fn with_modes(mut self, width_mode: Option<SizingMode>, height_mode: Option<SizingMode>) -> Self {
        self.width_mode = SizingMode::infer(width_mode, self.style.width.as_ref());
        self.height_mode = SizingMode::infer(height_mode, self.style.height.as_ref());
        self
    }

    /// 两个轴都按子节点范围收缩
    pub fn wrap_content(self) -> Self {
        self.with_modes(Some(SizingMode::WrapContent), Some(SizingMode::WrapContent))
    }

    /// 追加子节点，返回其下标
    pub fn add(&mut self, child: impl Into<Node>) -> usize {
        let mut child = child.into();
        let slot = self.children.len();
        child.set_slot(slot);
        self.children.push(child);
        slot
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.add(child);
        self
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn width_mode(&self) -> SizingMode {
        self.width_mode
    }

    pub fn height_mode(&self) -> SizingMode {
        self.height_mode
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    /// 最近一次测量得到的子节点偏移，与子节点同序
    pub fn child_offsets(&self) -> &[Offset] {
        &self.child_offsets
    }

    pub fn measured_size(&self) -> Option<Size> {
        self.last_measure_size
    }

    /// 标记子节点为脏并通知本容器
    pub fn mark_child_dirty(&mut self, index: usize) -> bool {
        let Some(child) = self.children.get_mut(index) else {
            return false;
        };
        child.mark_dirty();
        self.on_child_dirty(index);
        true
    }

    // 局部重绘的扩展点，目前只记录
    fn on_child_dirty(&mut self, index: usize) {
        log::trace!("child {} marked dirty ({} children)", index, self.children.len());
    }

    pub async fn measure(&mut self, ctx: LayoutContext<'_>, parent_width: f32, parent_height: f32) -> Result<Size> {
        // 测量失败时不保留上一轮的结果
        self.last_measure_size = None;
        self.child_offsets.clear();

        let mut res = Size::new(parent_width, parent_height);
        if self.width_mode == SizingMode::Specific {
            res.width = resolve_size(self.style.width.as_ref(), parent_width);
        }
        if self.height_mode == SizingMode::Specific {
            res.height = resolve_size(self.style.height.as_ref(), parent_height);
        }

        let sizes = try_join_all(
            self.children
                .iter_mut()
                .map(move |child| child.measure(ctx, res.width, res.height)),
        )
        .await?;

        let (offsets, extent) = stack(&sizes, self.style.direction, self.style.align, res);

        if self.width_mode == SizingMode::WrapContent {
            res.width = extent.width;
        }
        if self.height_mode == SizingMode::WrapContent {
            res.height = extent.height;
        }

        log::debug!(
            "container measured {:.1}x{:.1} with {} children",
            res.width,
            res.height,
            sizes.len()
        );
        self.child_offsets = offsets;
        self.last_measure_size = Some(res);
        Ok(res)
    }

    /// 绘制背景、按需裁剪，再按添加顺序绘制子节点（后加的在上层）
    pub fn draw(&mut self, ctx: &mut dyn RenderContext, left: f32, top: f32) -> Result<()> {
        let size = self.last_measure_size.ok_or(RenderError::NotMeasured)?;
        self.state.record_draw(left, top);

        let rect = Rect::from_size(left, top, size);
        let radius = self.style.border_radius;
        let mut ctx = StateGuard::new(ctx);

        if let Some(color) = self.style.background_color {
            if radius > 0.0 {
                ctx.fill_path(&Path::round_rect(&rect, radius), color);
            } else {
                ctx.fill_rect(&rect, color);
            }
        }

        if self.style.overflow == Overflow::Hidden {
            ctx.clip_path(&Path::round_rect(&rect, radius));
        }

        for (child, offset) in self.children.iter_mut().zip(&self.child_offsets) {
            child.draw(&mut *ctx, left + offset.left, top + offset.top)?;
        }
        Ok(())
    }

    pub(super) fn detach(&mut self) {
        for child in &mut self.children {
            child.detach();
        }
    }
}
