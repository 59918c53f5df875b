//! 容器单元测试
//! 测量、堆叠、绘制顺序、save/restore 配对与失败传播

use super::{Call, FixedAdvance, RecordingContext};
use crate::scene::{Align, Container, Direction, ImageNode, LayoutContext, Node, Overflow, SizingMode, Style};
use crate::{Bitmap, Color, MemoryImageLoader, Offset, Rect, RenderError, Size};
use futures::executor::block_on;

fn measure(node: &mut Node, images: &MemoryImageLoader, width: f32, height: f32) -> crate::Result<Size> {
    let ctx = LayoutContext::new(&FixedAdvance, images);
    block_on(node.measure(ctx, width, height))
}

/// 固定尺寸的色块
fn block(width: f32, height: f32) -> Container {
    Container::new(Style::new().with_size(width, height))
}

#[test]
fn test_wrap_content_vertical() {
    let mut root: Node = Container::new(Style::new())
        .wrap_content()
        .with_child(block(10.0, 5.0))
        .with_child(block(20.0, 7.0))
        .into();

    let size = measure(&mut root, &MemoryImageLoader::new(), 800.0, 600.0).unwrap();
    assert_eq!(size, Size::new(20.0, 12.0));

    let container = root.as_container().unwrap();
    assert_eq!(container.child_offsets(), &[Offset::new(0.0, 0.0), Offset::new(0.0, 5.0)]);
    assert_eq!(container.measured_size(), Some(Size::new(20.0, 12.0)));
}

#[test]
fn test_wrap_content_horizontal() {
    let mut root: Node = Container::new(Style::new().with_direction(Direction::Horizontal))
        .wrap_content()
        .with_child(block(10.0, 5.0))
        .with_child(block(20.0, 7.0))
        .into();

    let size = measure(&mut root, &MemoryImageLoader::new(), 800.0, 600.0).unwrap();
    assert_eq!(size, Size::new(30.0, 7.0));
    assert_eq!(
        root.as_container().unwrap().child_offsets(),
        &[Offset::new(0.0, 0.0), Offset::new(10.0, 0.0)]
    );
}

#[test]
fn test_match_parent_and_percent_children() {
    let mut root: Node = Container::new(Style::new())
        .with_child(Container::new(Style::new().with_size("50%", "40%")))
        .into();

    let size = measure(&mut root, &MemoryImageLoader::new(), 400.0, 300.0).unwrap();
    assert_eq!(size, Size::new(400.0, 300.0));

    let container = root.as_container().unwrap();
    assert_eq!(container.width_mode(), SizingMode::MatchParent);
    let child = container.children()[0].as_container().unwrap();
    assert_eq!(child.width_mode(), SizingMode::Specific);
    assert_eq!(child.measured_size(), Some(Size::new(200.0, 120.0)));
}

#[test]
fn test_center_align_uses_container_width() {
    let mut root: Node = Container::new(Style::new().with_size(100.0, 50.0).with_align(Align::Center))
        .with_child(block(30.0, 10.0))
        .into();

    measure(&mut root, &MemoryImageLoader::new(), 800.0, 600.0).unwrap();
    assert_eq!(root.as_container().unwrap().child_offsets(), &[Offset::new(35.0, 0.0)]);
}

#[test]
fn test_end_align_horizontal() {
    let mut root: Node = Container::new(
        Style::new()
            .with_size(100.0, 50.0)
            .with_direction(Direction::Horizontal)
            .with_align(Align::End),
    )
    .with_child(block(30.0, 10.0))
    .with_child(block(20.0, 50.0))
    .into();

    measure(&mut root, &MemoryImageLoader::new(), 800.0, 600.0).unwrap();
    assert_eq!(
        root.as_container().unwrap().child_offsets(),
        &[Offset::new(0.0, 40.0), Offset::new(30.0, 0.0)]
    );
}

#[test]
fn test_draw_before_measure_fails() {
    let mut root: Node = Container::new(Style::new().with_background(Color::RED)).into();
    let mut ctx = RecordingContext::new();

    let err = root.draw(&mut ctx, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, RenderError::NotMeasured));
    assert!(ctx.calls.is_empty());

    measure(&mut root, &MemoryImageLoader::new(), 10.0, 10.0).unwrap();
    assert!(root.draw(&mut ctx, 0.0, 0.0).is_ok());
    assert_eq!(ctx.depth, 0);
}

#[test]
fn test_draw_background_and_children_in_order() {
    let mut root: Node = Container::new(Style::new().with_size(50.0, 50.0).with_background(Color::WHITE))
        .with_child(Container::new(Style::new().with_size(10.0, 10.0).with_background(Color::RED)))
        .with_child(Container::new(Style::new().with_size(10.0, 10.0).with_background(Color::BLUE)))
        .into();
    measure(&mut root, &MemoryImageLoader::new(), 800.0, 600.0).unwrap();

    let mut ctx = RecordingContext::new();
    root.draw(&mut ctx, 5.0, 5.0).unwrap();

    assert_eq!(
        ctx.calls,
        vec![
            Call::Save,
            Call::FillRect(Rect::new(5.0, 5.0, 50.0, 50.0), Color::WHITE),
            Call::Save,
            Call::FillRect(Rect::new(5.0, 5.0, 10.0, 10.0), Color::RED),
            Call::Restore,
            Call::Save,
            Call::FillRect(Rect::new(5.0, 15.0, 10.0, 10.0), Color::BLUE),
            Call::Restore,
            Call::Restore,
        ]
    );
}

#[test]
fn test_rounded_background_and_clip() {
    let mut root: Node = Container::new(
        Style::new()
            .with_size(40.0, 40.0)
            .with_border_radius(8.0)
            .with_background(Color::GREEN)
            .with_overflow(Overflow::Hidden),
    )
    .into();
    measure(&mut root, &MemoryImageLoader::new(), 100.0, 100.0).unwrap();

    let mut ctx = RecordingContext::new();
    root.draw(&mut ctx, 0.0, 0.0).unwrap();
    assert_eq!(
        ctx.calls,
        vec![Call::Save, Call::FillPath(Color::GREEN), Call::ClipPath, Call::Restore]
    );
}

#[test]
fn test_join_failure_propagates() {
    let images = MemoryImageLoader::new().with("ok.png", Bitmap::solid(4, 2, Color::RED));
    let mut root: Node = Container::new(Style::new())
        .with_child(block(10.0, 10.0))
        .with_child(ImageNode::new(Style::new().with_width(40.0), "ok.png"))
        .with_child(ImageNode::new(Style::new().with_width(40.0), "missing.png"))
        .into();

    let err = measure(&mut root, &images, 100.0, 100.0).unwrap_err();
    assert!(matches!(err, RenderError::ImageLoad { ref locator, .. } if locator == "missing.png"));

    // 不保留部分结果
    let container = root.as_container().unwrap();
    assert_eq!(container.measured_size(), None);
    assert!(container.child_offsets().is_empty());
    let mut ctx = RecordingContext::new();
    assert!(matches!(root.draw(&mut ctx, 0.0, 0.0), Err(RenderError::NotMeasured)));
}

#[test]
fn test_failed_remeasure_discards_previous_result() {
    let images = MemoryImageLoader::new().with("a.png", Bitmap::solid(2, 1, Color::RED));
    let mut root: Node = Container::new(Style::new())
        .with_child(ImageNode::new(Style::new().with_width(20.0), "a.png"))
        .into();
    measure(&mut root, &images, 100.0, 100.0).unwrap();
    assert!(root.as_container().unwrap().measured_size().is_some());

    assert!(measure(&mut root, &MemoryImageLoader::new(), 100.0, 100.0).is_err());
    assert_eq!(root.as_container().unwrap().measured_size(), None);
}

#[test]
fn test_state_restored_when_child_draw_fails() {
    let images = MemoryImageLoader::new().with("a.png", Bitmap::solid(2, 1, Color::RED));
    let mut root: Node = Container::new(Style::new().with_overflow(Overflow::Hidden))
        .with_child(
            Container::new(Style::new().with_size(50.0, 50.0))
                .with_child(ImageNode::new(Style::new().with_width(20.0), "a.png")),
        )
        .into();
    measure(&mut root, &images, 100.0, 100.0).unwrap();

    // 子容器重新测量失败后处于未测量状态
    let child = root.as_container_mut().unwrap().child_mut(0).unwrap();
    assert!(measure(child, &MemoryImageLoader::new(), 100.0, 100.0).is_err());

    let mut ctx = RecordingContext::new();
    let err = root.draw(&mut ctx, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, RenderError::NotMeasured));
    assert_eq!(ctx.depth, 0);
    assert_eq!(ctx.calls, vec![Call::Save, Call::ClipPath, Call::Restore]);
}

#[test]
fn test_slots_dirty_and_redraw() {
    let mut container = Container::new(Style::new());
    assert_eq!(container.add(block(1.0, 1.0)), 0);
    assert_eq!(container.add(block(2.0, 2.0)), 1);
    assert_eq!(container.children()[1].slot(), Some(1));

    assert!(container.mark_child_dirty(1));
    assert!(container.children()[1].is_dirty());
    assert!(!container.children()[0].is_dirty());
    assert!(!container.mark_child_dirty(5));

    let mut root: Node = container.into();
    assert_eq!(root.slot(), None);

    // 从未绘制过时 redraw 什么也不做
    let mut ctx = RecordingContext::new();
    measure(&mut root, &MemoryImageLoader::new(), 10.0, 10.0).unwrap();
    root.redraw(&mut ctx).unwrap();
    assert!(ctx.calls.is_empty());

    root.draw(&mut ctx, 3.0, 4.0).unwrap();
    assert_eq!(root.last_draw(), Some(Offset::new(3.0, 4.0)));
    let child = &root.as_container().unwrap().children()[1];
    assert!(!child.is_dirty());
    assert_eq!(child.last_draw(), Some(Offset::new(3.0, 5.0)));

    let before = ctx.calls.len();
    root.redraw(&mut ctx).unwrap();
    assert_eq!(ctx.calls.len(), before * 2);
}
