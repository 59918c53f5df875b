//! Canvas 画布模块 - 软件光栅化的绘制表面

use crate::{Color, Paint, PaintStyle, Path, Point, Rect};
use std::sync::Arc;

/// 抗锯齿的纵向子采样数
const SUB_SAMPLES: usize = 4;

/// 可保存/恢复的画布状态
#[derive(Clone, Default)]
struct CanvasState {
    /// 路径裁剪的覆盖率遮罩，与像素一一对应
    clip_mask: Option<Arc<Vec<u8>>>,
}

/// 画布 - 主要渲染接口
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    state: CanvasState,
    state_stack: Vec<CanvasState>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; (width * height) as usize],
            state: CanvasState::default(),
            state_stack: Vec::new(),
        }
    }

    /// 保存当前裁剪状态
    pub fn save(&mut self) {
        self.state_stack.push(self.state.clone());
    }

    /// 恢复上一次保存的状态，栈为空时忽略
    pub fn restore(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    /// 当前未恢复的 save 层数
    pub fn save_depth(&self) -> usize {
        self.state_stack.len()
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// 清空画布，不受裁剪影响
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// 用路径与当前裁剪区域求交
    pub fn clip_path(&mut self, path: &Path) {
        let mut mask = vec![0u8; self.pixels.len()];
        let contours = path.flatten(0.5);
        let width = self.width as i32;
        self.scan_coverage(&contours, |x, y, coverage| {
            let idx = (y * width + x) as usize;
            mask[idx] = (coverage * 255.0).round() as u8;
        });

        if let Some(current) = &self.state.clip_mask {
            for (m, c) in mask.iter_mut().zip(current.iter()) {
                *m = (*m).min(*c);
            }
        }
        self.state.clip_mask = Some(Arc::new(mask));
    }

    /// 获取像素
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize]
        } else {
            Color::TRANSPARENT
        }
    }

    /// 设置像素（带裁剪与 alpha 混合）
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let idx = (y as u32 * self.width + x as u32) as usize;
        let color = match &self.state.clip_mask {
            Some(mask) => match mask[idx] {
                0 => return,
                255 => color,
                m => color.with_coverage(m as f32 / 255.0),
            },
            None => color,
        };

        if color.a == 255 {
            self.pixels[idx] = color;
        } else if color.a > 0 {
            self.pixels[idx] = color.blend(&self.pixels[idx]);
        }
    }

    fn set_pixel_aa(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if coverage <= 0.0 { return; }
        self.set_pixel(x, y, color.with_coverage(coverage));
    }

    /// 填充矩形
    pub fn fill_rect(&mut self, rect: &Rect, color: Color) {
        let x0 = rect.x.max(0.0) as i32;
        let y0 = rect.y.max(0.0) as i32;
        let x1 = rect.right().min(self.width as f32) as i32;
        let y1 = rect.bottom().min(self.height as f32) as i32;

        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// 绘制圆形
    pub fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        let (inner, outer) = match paint.style {
            PaintStyle::Fill => (f32::MIN, radius),
            PaintStyle::Stroke => (radius - paint.stroke_width / 2.0, radius + paint.stroke_width / 2.0),
        };

        let x0 = (cx - outer - 1.0).max(0.0) as i32;
        let y0 = (cy - outer - 1.0).max(0.0) as i32;
        let x1 = (cx + outer + 1.0).min(self.width as f32) as i32;
        let y1 = (cy + outer + 1.0).min(self.height as f32) as i32;

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();

                if paint.anti_alias {
                    // 内外边缘各半个像素的过渡
                    let coverage = (outer + 0.5 - d).min(d - inner + 0.5).min(1.0);
                    self.set_pixel_aa(x, y, paint.color, coverage);
                } else if d >= inner && d <= outer {
                    self.set_pixel(x, y, paint.color);
                }
            }
        }
    }

    /// 填充路径
    pub fn draw_path(&mut self, path: &Path, paint: &Paint) {
        let contours = path.flatten(0.5);
        let color = paint.color;
        let anti_alias = paint.anti_alias;
        let mut spans = Vec::new();
        self.scan_coverage(&contours, |x, y, coverage| spans.push((x, y, coverage)));
        for (x, y, coverage) in spans {
            if anti_alias {
                self.set_pixel_aa(x, y, color, coverage);
            } else if coverage >= 0.5 {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// 扫描线计算每个像素被轮廓覆盖的比例（奇偶规则）
    fn scan_coverage(&self, contours: &[Vec<Point>], mut emit: impl FnMut(i32, i32, f32)) {
        if contours.is_empty() { return; }

        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for p in contours.iter().flatten() {
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let y0 = (min_y.floor() as i32).max(0);
        let y1 = (max_y.ceil() as i32).min(self.height as i32 - 1);
        let mut row = vec![0.0f32; self.width as usize];

        for y in y0..=y1 {
            row.iter_mut().for_each(|c| *c = 0.0);
            let mut touched = false;

            for sub in 0..SUB_SAMPLES {
                let scan_y = y as f32 + (sub as f32 + 0.5) / SUB_SAMPLES as f32;
                let mut crossings = Vec::new();
                for contour in contours {
                    for i in 0..contour.len() {
                        let p0 = &contour[i];
                        let p1 = &contour[(i + 1) % contour.len()];
                        if (p0.y <= scan_y && p1.y > scan_y) || (p1.y <= scan_y && p0.y > scan_y) {
                            let t = (scan_y - p0.y) / (p1.y - p0.y);
                            crossings.push(p0.x + t * (p1.x - p0.x));
                        }
                    }
                }
                crossings.sort_by(|a, b| a.total_cmp(b));

                for pair in crossings.chunks_exact(2) {
                    let (left, right) = (pair[0].max(0.0), pair[1].min(self.width as f32));
                    if right <= left { continue; }
                    touched = true;
                    let first = left.floor() as usize;
                    let last = (right.ceil() as usize).min(self.width as usize);
                    for px in first..last {
                        let overlap = right.min(px as f32 + 1.0) - left.max(px as f32);
                        if overlap > 0.0 {
                            row[px] += overlap / SUB_SAMPLES as f32;
                        }
                    }
                }
            }

            if !touched { continue; }
            for (x, coverage) in row.iter().enumerate() {
                if *coverage > 0.0 {
                    emit(x as i32, y, coverage.min(1.0));
                }
            }
        }
    }

    /// 把 RGBA 位图拉伸绘制到目标矩形（双线性采样）
    pub fn draw_image(&mut self, img_data: &[u8], img_w: u32, img_h: u32, dst: &Rect) {
        if img_w == 0 || img_h == 0 || img_data.len() < (img_w * img_h * 4) as usize {
            return;
        }
        if dst.width <= 0.0 || dst.height <= 0.0 {
            return;
        }

        let scale_x = dst.width / img_w as f32;
        let scale_y = dst.height / img_h as f32;

        let x0 = dst.x.max(0.0) as i32;
        let y0 = dst.y.max(0.0) as i32;
        let x1 = dst.right().min(self.width as f32).ceil() as i32;
        let y1 = dst.bottom().min(self.height as f32).ceil() as i32;

        let sample = |sx: u32, sy: u32| -> [f32; 4] {
            let sx = sx.min(img_w - 1);
            let sy = sy.min(img_h - 1);
            let idx = ((sy * img_w + sx) * 4) as usize;
            [
                img_data[idx] as f32,
                img_data[idx + 1] as f32,
                img_data[idx + 2] as f32,
                img_data[idx + 3] as f32,
            ]
        };
        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;

        for dest_y in y0..y1 {
            for dest_x in x0..x1 {
                // 像素中心映射回源图坐标
                let local_x = ((dest_x as f32 + 0.5 - dst.x) / scale_x - 0.5).max(0.0);
                let local_y = ((dest_y as f32 + 0.5 - dst.y) / scale_y - 0.5).max(0.0);
                if local_x >= img_w as f32 || local_y >= img_h as f32 {
                    continue;
                }

                let src_x = local_x.floor() as u32;
                let src_y = local_y.floor() as u32;
                let fx = local_x - src_x as f32;
                let fy = local_y - src_y as f32;

                let c00 = sample(src_x, src_y);
                let c10 = sample(src_x + 1, src_y);
                let c01 = sample(src_x, src_y + 1);
                let c11 = sample(src_x + 1, src_y + 1);

                let mut out = [0u8; 4];
                for i in 0..4 {
                    out[i] = lerp(lerp(c00[i], c10[i], fx), lerp(c01[i], c11[i], fx), fy).round() as u8;
                }

                self.set_pixel(dest_x, dest_y, Color::new(out[0], out[1], out[2], out[3]));
            }
        }
    }

    /// 导出为 RGBA 字节数组
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect()
    }

    /// 拷贝到窗口缓冲区（0RGB）
    pub fn present_into(&self, buffer: &mut [u32], buffer_width: u32, buffer_height: u32) {
        for y in 0..buffer_height.min(self.height) {
            for x in 0..buffer_width.min(self.width) {
                let dst_idx = (y * buffer_width + x) as usize;
                if dst_idx < buffer.len() {
                    buffer[dst_idx] = self.get_pixel(x, y).to_xrgb();
                }
            }
        }
    }

    /// 保存为 PNG
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        use image::{ImageBuffer, Rgba};

        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.to_rgba())
                .ok_or_else(|| crate::RenderError::Raster("pixel buffer size mismatch".into()))?;

        img.save(path.as_ref())
            .map_err(|e| crate::RenderError::Raster(e.to_string()))
    }
}
