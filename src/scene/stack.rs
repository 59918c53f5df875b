//! 子节点堆叠与对齐计算

use super::style::{Align, Direction};
use crate::{Offset, Size};

impl Align {
    /// 子节点在交叉轴上相对容器的偏移
    pub fn offset(self, child: f32, container: f32) -> f32 {
        match self {
            Align::Start => 0.0,
            Align::End => container - child,
            Align::Center => (container - child) / 2.0,
        }
    }
}

/// 按方向依次排列子节点
///
/// 返回每个子节点的偏移（与输入同序）以及子节点整体范围：
/// 主轴为尺寸之和，交叉轴为最大值。交叉轴对齐以 `container` 为准。
pub fn stack(sizes: &[Size], direction: Direction, align: Align, container: Size) -> (Vec<Offset>, Size) {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut extent = Size::default();
    let mut cursor = 0.0;

    for size in sizes {
        match direction {
            Direction::Vertical => {
                offsets.push(Offset::new(align.offset(size.width, container.width), cursor));
                cursor += size.height;
                extent.height += size.height;
                extent.width = extent.width.max(size.width);
            }
            Direction::Horizontal => {
                offsets.push(Offset::new(cursor, align.offset(size.height, container.height)));
                cursor += size.width;
                extent.width += size.width;
                extent.height = extent.height.max(size.height);
            }
        }
    }

    (offsets, extent)
}
