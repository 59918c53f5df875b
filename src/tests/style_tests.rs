//! 样式单元测试
//! 百分比解析、尺寸模式推断、堆叠与对齐

use crate::scene::{resolve_size, stack, Align, Dimension, Direction, SizingMode};
use crate::text::FontSpec;
use crate::{Color, Offset, Size};

#[test]
fn test_percent_resolves_against_parent() {
    for parent in [0.0f32, 1.0, 333.0, 800.0] {
        for n in [0u32, 1, 25, 50, 99, 100] {
            let dim = Dimension::parse(&format!("{}%", n));
            assert_eq!(dim, Dimension::Percent(n as f32));
            assert_eq!(dim.resolve(parent), n as f32 / 100.0 * parent);
        }
    }
}

#[test]
fn test_fractional_percent() {
    let dim = Dimension::parse("12.5%");
    assert_eq!(dim.resolve(200.0), 25.0);
    // 末尾的小数点也被接受
    assert_eq!(Dimension::parse("40.%").resolve(50.0), 20.0);
}

#[test]
fn test_invalid_size_falls_back_to_parent() {
    for raw in ["auto", "50px", "%", "-10%", " 50%", "abc%"] {
        let dim = Dimension::parse(raw);
        assert!(matches!(dim, Dimension::Invalid(_)), "{raw} should be invalid");
        assert_eq!(dim.resolve(123.0), 123.0);
    }
}

#[test]
fn test_absolute_and_missing_sizes() {
    assert_eq!(resolve_size(Some(&Dimension::Px(42.0)), 500.0), 42.0);
    // 0 是合法的尺寸，不会退回父节点尺寸
    assert_eq!(resolve_size(Some(&Dimension::Px(0.0)), 500.0), 0.0);
    assert_eq!(resolve_size(None, 500.0), 500.0);
}

#[test]
fn test_sizing_mode_inference() {
    let width = Dimension::Px(10.0);
    assert_eq!(SizingMode::infer(None, Some(&width)), SizingMode::Specific);
    assert_eq!(SizingMode::infer(None, None), SizingMode::MatchParent);
    // 显式模式优先
    assert_eq!(
        SizingMode::infer(Some(SizingMode::WrapContent), Some(&width)),
        SizingMode::WrapContent
    );
}

#[test]
fn test_align_offsets() {
    assert_eq!(Align::Start.offset(30.0, 100.0), 0.0);
    assert_eq!(Align::End.offset(30.0, 100.0), 70.0);
    assert_eq!(Align::Center.offset(30.0, 100.0), 35.0);
}

#[test]
fn test_vertical_stack_with_center_align() {
    let sizes = [Size::new(10.0, 5.0), Size::new(20.0, 7.0)];
    let (offsets, extent) = stack(&sizes, Direction::Vertical, Align::Center, Size::new(40.0, 100.0));

    assert_eq!(offsets, vec![Offset::new(15.0, 0.0), Offset::new(10.0, 5.0)]);
    assert_eq!(extent, Size::new(20.0, 12.0));
}

#[test]
fn test_horizontal_stack_with_end_align() {
    let sizes = [Size::new(10.0, 5.0), Size::new(20.0, 7.0)];
    let (offsets, extent) = stack(&sizes, Direction::Horizontal, Align::End, Size::new(100.0, 10.0));

    assert_eq!(offsets, vec![Offset::new(0.0, 5.0), Offset::new(10.0, 3.0)]);
    assert_eq!(extent, Size::new(30.0, 7.0));
}

#[test]
fn test_color_parse() {
    assert_eq!(Color::parse("#FF80A0"), Some(Color::rgb(0xFF, 0x80, 0xA0)));
    assert_eq!(Color::parse("#f0f"), Some(Color::rgb(0xFF, 0x00, 0xFF)));
    assert_eq!(Color::parse("#00000080"), Some(Color::new(0, 0, 0, 0x80)));
    assert_eq!(Color::parse("magenta"), None);
    assert_eq!(Color::parse("#12345"), None);
}

#[test]
fn test_font_shorthand() {
    let font = FontSpec::parse("24pt Verdana");
    assert_eq!(font.size, 32.0);
    assert_eq!(font.family.as_deref(), Some("Verdana"));

    let font = FontSpec::parse("18px");
    assert_eq!(font.size, 18.0);
    assert_eq!(font.family, None);

    // 无法识别时回退到 15pt
    assert_eq!(FontSpec::parse("bold"), FontSpec::default());
    assert_eq!(FontSpec::default().size, 20.0);
}
