//! 帧驱动：挂载场景、逐帧绘制并叠加光标圆圈

use crate::config::SceneConfig;
use crate::context::{GlyphSource, Painter};
use crate::scene::{LayoutContext, Node};
use crate::{Canvas, Color, Paint, PaintStyle, Point, Result, Size};

/// 场景 - 持有组件树，测量完成后才开始绘制
pub struct Scene {
    root: Node,
    viewport: Size,
    mounted: bool,
    clear_color: Color,
    cursor: Option<Point>,
    cursor_radius: f32,
}

impl Scene {
    pub fn new(root: impl Into<Node>, viewport: Size) -> Self {
        Self {
            root: root.into(),
            viewport,
            mounted: false,
            clear_color: Color::WHITE,
            cursor: None,
            cursor_radius: 40.0,
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(config.root.build(), config.viewport.size())
            .with_clear_color(config.clear_color())
            .with_cursor_radius(config.cursor_radius)
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_cursor_radius(mut self, radius: f32) -> Self {
        self.cursor_radius = radius;
        self
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// 以视口尺寸测量整棵树；完成之前 `draw_frame` 只画覆盖层
    pub async fn mount(&mut self, ctx: LayoutContext<'_>) -> Result<Size> {
        self.mounted = false;
        let size = self.root.measure(ctx, self.viewport.width, self.viewport.height).await?;
        log::info!("scene mounted: root {:.1}x{:.1}", size.width, size.height);
        self.mounted = true;
        Ok(size)
    }

    /// 阻塞直到测量完成
    pub fn mount_blocking(&mut self, ctx: LayoutContext<'_>) -> Result<Size> {
        futures::executor::block_on(self.mount(ctx))
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Some(Point::new(x, y));
    }

    /// 清屏、绘制根节点，再在最上层画光标圆圈
    pub fn draw_frame(&mut self, canvas: &mut Canvas, glyphs: &dyn GlyphSource) -> Result<()> {
        canvas.clear(self.clear_color);
        if self.mounted {
            let mut painter = Painter::new(canvas, glyphs);
            self.root.draw(&mut painter, 0.0, 0.0)?;
        }

        if let Some(cursor) = self.cursor {
            let paint = Paint::new()
                .with_color(Color::BLACK)
                .with_style(PaintStyle::Stroke);
            canvas.draw_circle(cursor.x, cursor.y, self.cursor_radius, &paint);
        }
        Ok(())
    }

    /// 卸载：通知整棵树并停止绘制
    pub fn detach(&mut self) {
        self.root.detach();
        self.mounted = false;
    }
}

/// 内置演示场景：居中的浅灰根容器，内含白色块、带圆角裁剪的图片卡片和一段长文本
pub fn playground(viewport: Size) -> Node {
    use crate::scene::{Align, Container, Direction, ImageNode, Overflow, Style, TextNode};
    use crate::text::FontSpec;

    let mut root = Container::new(
        Style::new()
            .with_size(viewport.width * 0.8, viewport.height)
            .with_background(Color::from_hex(0xF0F0F0))
            .with_align(Align::Center),
    );
    root.add(Container::new(
        Style::new()
            .with_size("50%", "40%")
            .with_background(Color::WHITE),
    ));
    root.add(
        Container::new(
            Style::new()
                .with_size("25%", "45%")
                .with_border_radius(15.0)
                .with_background(Color::from_hex(0xFF00FF))
                .with_overflow(Overflow::Hidden)
                .with_align(Align::Center)
                .with_direction(Direction::Vertical),
        )
        .with_child(ImageNode::new(
            Style::new().with_width("100%"),
            "https://pic2.zhimg.com/80/v2-877dd8180e16ed1ec0c6b253d07f388d_720w.webp",
        )),
    );
    root.add(
        TextNode::new(
            Style::new().with_width("60%"),
            "  233333ASDASdasfewrewfddsfsdfdsfweqweqweqw111111111111111111111111111111111111111111111",
        )
        .with_font(FontSpec::parse("24pt Verdana"))
        .with_color(Color::from_hex(0xFF80A0)),
    );
    root.into()
}
