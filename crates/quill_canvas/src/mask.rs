//! CPU stroke mask
//!
//! Strokes are rasterized with tiny-skia into a premultiplied RGBA buffer
//! whose rows are already padded to the texture copy alignment, so an
//! upload is a single `write_texture` with no repacking.

use std::sync::Arc;

use quill_core::{Color, Drawing, Stroke};
use quill_gpu::{GpuContext, GpuTexture};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, PixmapMut, Transform};

use crate::error::Result;

const PAGE_SIZE: usize = 4096;

fn align_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// Row-padded, page-sized RGBA buffer the strokes are drawn into
#[derive(Debug)]
pub struct MaskBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
}

impl MaskBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let stride = align_up(width as usize * 4, wgpu_row_alignment());
        let len = align_up(stride * height as usize, PAGE_SIZE);
        Self {
            data: vec![0; len],
            width,
            height,
            stride,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, a multiple of the copy alignment
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Premultiplied RGBA at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.stride + x as usize * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Rasterize every stroke of `drawing` in the drawing's color
    pub fn draw(&mut self, drawing: &Drawing) {
        let rows = self.stride * self.height as usize;
        let pitch_width = (self.stride / 4) as u32;
        let Some(mut pixmap) = PixmapMut::from_bytes(&mut self.data[..rows], pitch_width, self.height)
        else {
            tracing::warn!("mask buffer has no valid pixmap layout");
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(to_skia(drawing.color));
        paint.anti_alias = true;

        for stroke in &drawing.strokes {
            draw_stroke(&mut pixmap, &paint, stroke);
        }
    }
}

fn wgpu_row_alignment() -> usize {
    quill_gpu::wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize
}

fn to_skia(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        color.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn draw_stroke(pixmap: &mut PixmapMut<'_>, paint: &Paint<'_>, stroke: &Stroke) {
    if stroke.is_empty() {
        return;
    }

    // A lone sample is a dot
    if stroke.len() == 1 {
        let c = stroke.start();
        if let Some(dot) = PathBuilder::from_circle(c.x, c.y, (stroke.width / 2.0).max(0.5)) {
            pixmap.fill_path(&dot, paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let mut builder = PathBuilder::new();
    let first = stroke.start();
    builder.move_to(first.x, first.y);
    for point in &stroke.points[1..] {
        builder.line_to(point.location.x, point.location.y);
    }
    if stroke.is_closed {
        builder.close();
    }
    let Some(path) = builder.finish() else {
        tracing::trace!("skipping degenerate stroke of {} points", stroke.len());
        return;
    };

    if stroke.is_filled {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    } else {
        let outline = tiny_skia::Stroke {
            width: stroke.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&path, paint, &outline, Transform::identity(), None);
    }
}

/// Mask buffer plus the texture it uploads into
#[derive(Debug)]
pub struct MaskLayer {
    buffer: MaskBuffer,
    texture: Arc<GpuTexture>,
}

impl MaskLayer {
    pub fn new(ctx: &GpuContext, width: u32, height: u32) -> Result<Self> {
        let texture = ctx.create_target(width.max(1), height.max(1), "Mask Texture")?;
        let buffer = MaskBuffer::new(width, height);
        Ok(Self {
            buffer,
            texture: Arc::new(texture),
        })
    }

    pub fn texture(&self) -> &Arc<GpuTexture> {
        &self.texture
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn draw(&mut self, drawing: &Drawing) {
        self.buffer.draw(drawing);
    }

    /// Copy the buffer into the mask texture
    pub fn upload(&self, ctx: &GpuContext) {
        self.texture
            .write_rgba_rows(ctx.queue(), self.buffer.data(), self.buffer.stride() as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{InkKind, Point};

    fn rect(w: f32, h: f32, color: Color) -> Drawing {
        Drawing::from_points(
            vec![
                Point::at(0.0, 0.0),
                Point::at(w, 0.0),
                Point::at(w, h),
                Point::at(0.0, h),
            ],
            color,
            InkKind::Draw,
            1.0,
            true,
            true,
        )
    }

    #[test]
    fn rows_and_length_are_aligned() {
        let mask = MaskBuffer::new(100, 3);
        assert_eq!(mask.stride(), 512);
        assert_eq!(mask.data().len(), 4096);

        let big = MaskBuffer::new(1024, 5);
        assert_eq!(big.stride(), 4096);
        assert_eq!(big.data().len(), 4096 * 5);
    }

    #[test]
    fn zero_size_is_clamped() {
        let mask = MaskBuffer::new(0, 0);
        assert_eq!((mask.width(), mask.height()), (1, 1));
    }

    #[test]
    fn filled_rect_covers_canvas() {
        let mut mask = MaskBuffer::new(16, 8);
        mask.draw(&rect(16.0, 8.0, Color::RED));
        assert_eq!(mask.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(mask.pixel(15, 7), Some([255, 0, 0, 255]));
        assert_eq!(mask.pixel(16, 0), None);

        mask.clear();
        assert_eq!(mask.pixel(8, 4), Some([0, 0, 0, 0]));
    }

    #[test]
    fn color_is_premultiplied() {
        let mut mask = MaskBuffer::new(4, 4);
        mask.draw(&rect(4.0, 4.0, Color::RED.with_alpha(0.5)));
        let [r, g, b, a] = mask.pixel(2, 2).unwrap();
        assert_eq!((g, b), (0, 0));
        assert!((127..=128).contains(&a));
        assert_eq!(r, a);
    }

    #[test]
    fn open_stroke_uses_its_width() {
        let mut mask = MaskBuffer::new(64, 64);
        let line = Drawing::from_points(
            vec![Point::at(8.0, 32.0), Point::at(56.0, 32.0)],
            Color::BLACK,
            InkKind::Draw,
            10.0,
            false,
            false,
        );
        mask.draw(&line);
        assert_eq!(mask.pixel(32, 32).map(|p| p[3]), Some(255));
        assert_eq!(mask.pixel(32, 35).map(|p| p[3]), Some(255));
        assert_eq!(mask.pixel(32, 45).map(|p| p[3]), Some(0));
    }

    #[test]
    fn single_point_is_a_dot() {
        let mut mask = MaskBuffer::new(32, 32);
        let dot = Drawing::from_points(
            vec![Point::at(16.0, 16.0)],
            Color::BLACK,
            InkKind::Draw,
            8.0,
            false,
            false,
        );
        mask.draw(&dot);
        assert_eq!(mask.pixel(16, 16).map(|p| p[3]), Some(255));
        assert_eq!(mask.pixel(16, 26).map(|p| p[3]), Some(0));
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let mut mask = MaskBuffer::new(8, 8);
        let bad = Drawing::from_points(
            vec![Point::at(f32::NAN, 0.0), Point::at(4.0, 4.0)],
            Color::BLACK,
            InkKind::Draw,
            2.0,
            false,
            false,
        );
        mask.draw(&bad);
        assert!(mask.data().iter().all(|&b| b == 0));
    }
}
