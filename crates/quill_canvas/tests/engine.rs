//! End-to-end engine tests. Each test returns early when no GPU adapter is
//! available.

use std::cell::Cell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use quill_canvas::{CanvasEngine, EngineConfig};
use quill_core::{Color, DrawingStyle, PointerSample, TipKind, ToolPreset};
use quill_gpu::{wgpu, GpuConfig, GpuContext};

fn test_context() -> Option<GpuContext> {
    let config = GpuConfig::default().with_backends(wgpu::Backends::all());
    GpuContext::new_blocking(config).ok()
}

fn engine(ctx: &GpuContext, size: (u32, u32), style: DrawingStyle) -> CanvasEngine {
    let config = EngineConfig::default().with_gpu(ctx.config().clone());
    CanvasEngine::with_context(ctx.clone(), config, size, style).unwrap()
}

/// Horizontal-ish stroke from `from` to `to` in one-pixel steps, 10 ms apart
fn stroke(engine: &mut CanvasEngine, from: (f32, f32), to: (f32, f32), t0: f64) {
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil() as usize;
    engine
        .pointer_began(PointerSample::new(from.0, from.1, t0))
        .unwrap();
    for i in 1..=steps {
        let k = i as f32 / steps as f32;
        let sample = PointerSample::new(
            from.0 + (to.0 - from.0) * k,
            from.1 + (to.1 - from.1) * k,
            t0 + i as f64 * 0.01,
        );
        engine.pointer_moved(sample, &[]).unwrap();
    }
    engine.pointer_ended().unwrap();
}

fn solid(width: u32, height: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(px))
}

#[test]
fn test_undo_matches_fresh_replay() {
    let Some(ctx) = test_context() else {
        return;
    };
    let pen = ToolPreset::Pen.style(Color::RED, TipKind::Arrow);
    let marker = ToolPreset::Marker.style(Color::BLUE, TipKind::Default);

    let mut undone = engine(&ctx, (96, 64), pen.clone());
    undone.set_base_image(Some(solid(96, 64, [240, 240, 200, 255]))).unwrap();
    stroke(&mut undone, (4.0, 10.0), (90.0, 50.0), 0.0);
    undone.set_style(marker.clone()).unwrap();
    stroke(&mut undone, (4.0, 50.0), (90.0, 12.0), 1.0);
    assert_eq!(undone.items().len(), 2);
    undone.set_style(pen.clone()).unwrap();
    undone.undo().unwrap();
    assert_eq!(undone.items().len(), 1);

    let mut fresh = engine(&ctx, (96, 64), pen);
    fresh.set_base_image(Some(solid(96, 64, [240, 240, 200, 255]))).unwrap();
    stroke(&mut fresh, (4.0, 10.0), (90.0, 50.0), 0.0);

    let a = undone.get_image().unwrap();
    let b = fresh.get_image().unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn test_undo_without_history_is_a_no_op() {
    let Some(ctx) = test_context() else {
        return;
    };
    let mut engine = engine(&ctx, (8, 8), DrawingStyle::default());
    let changes = Rc::new(Cell::new(0));
    let seen = changes.clone();
    engine.set_on_changed(move || seen.set(seen.get() + 1));

    assert!(!engine.can_undo());
    engine.undo().unwrap();
    assert_eq!(changes.get(), 0);
}

#[test]
fn test_erase_reveals_base_image() {
    let Some(ctx) = test_context() else {
        return;
    };
    let pencil = ToolPreset::Pencil.style_with_width(10.0, Color::RED, TipKind::Default);
    let eraser = ToolPreset::Eraser.style_with_width(20.0, Color::WHITE, TipKind::Default);

    let mut engine = engine(&ctx, (64, 64), pencil);
    engine.set_base_image(Some(solid(64, 64, [0, 0, 255, 255]))).unwrap();
    stroke(&mut engine, (0.0, 32.0), (63.0, 32.0), 0.0);

    let drawn = engine.get_image().unwrap();
    assert_eq!(drawn.get_pixel(20, 32).0, [255, 0, 0, 255]);

    engine.set_style(eraser).unwrap();
    stroke(&mut engine, (0.0, 32.0), (40.0, 32.0), 2.0);

    let image = engine.get_image().unwrap();
    assert_eq!(image.get_pixel(20, 32).0, [0, 0, 255, 255]);
    assert_eq!(image.get_pixel(50, 32).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(20, 2).0, [0, 0, 255, 255]);
}

#[test]
fn test_long_press_fills_canvas() {
    let Some(ctx) = test_context() else {
        return;
    };
    let mut engine = engine(&ctx, (32, 32), DrawingStyle::default());
    let changes = Rc::new(Cell::new(0));
    let seen = changes.clone();
    engine.set_on_changed(move || seen.set(seen.get() + 1));

    engine
        .pointer_began(PointerSample::new(16.0, 16.0, 5.0))
        .unwrap();
    engine.tick(5.1).unwrap();
    assert_eq!(changes.get(), 0);
    engine.tick(5.35).unwrap();
    assert_eq!(changes.get(), 1);
    assert!(!engine.is_drawing());
    assert_eq!(engine.items().len(), 1);

    // a late lift does nothing
    engine.pointer_ended().unwrap();
    engine.tick(9.0).unwrap();
    assert_eq!(changes.get(), 1);

    let image = engine.get_image().unwrap();
    for (x, y) in [(1, 1), (16, 16), (30, 30), (30, 1)] {
        assert_eq!(image.get_pixel(x, y).0, [0, 0, 0, 255], "pixel ({}, {})", x, y);
    }
}

#[test]
fn test_clear_drops_everything() {
    let Some(ctx) = test_context() else {
        return;
    };
    let mut engine = engine(&ctx, (48, 48), DrawingStyle::default());
    let changes = Rc::new(Cell::new(0));
    let seen = changes.clone();
    engine.set_on_changed(move || seen.set(seen.get() + 1));

    stroke(&mut engine, (4.0, 24.0), (44.0, 24.0), 0.0);
    assert!(engine.can_undo());
    assert_eq!(changes.get(), 1);
    assert_eq!(engine.get_image().unwrap().get_pixel(24, 24).0[3], 255);

    engine.clear().unwrap();
    assert_eq!(changes.get(), 2);
    assert!(!engine.can_undo());
    assert!(engine.get_image().unwrap().pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn test_new_base_image_starts_over() {
    let Some(ctx) = test_context() else {
        return;
    };
    let mut engine = engine(&ctx, (16, 16), DrawingStyle::default());
    stroke(&mut engine, (0.0, 8.0), (15.0, 8.0), 0.0);
    assert_eq!(engine.items().len(), 1);

    engine.set_base_image(Some(solid(16, 16, [0, 255, 0, 255]))).unwrap();
    assert!(engine.items().is_empty());
    assert_eq!(engine.get_image().unwrap().get_pixel(8, 8).0, [0, 255, 0, 255]);
}

#[test]
fn test_resize_keeps_strokes_and_changes_output_size() {
    let Some(ctx) = test_context() else {
        return;
    };
    let mut engine = engine(&ctx, (32, 32), DrawingStyle::default());
    engine.set_base_image(Some(solid(32, 32, [255, 255, 255, 255]))).unwrap();
    stroke(&mut engine, (0.0, 16.0), (31.0, 16.0), 0.0);

    engine.resize(64, 48).unwrap();
    assert_eq!(engine.size(), (64, 48));
    let image = engine.get_image().unwrap();
    assert_eq!(image.dimensions(), (64, 48));
    assert_eq!(engine.items().len(), 1);

    // same size is a no-op
    engine.resize(64, 48).unwrap();
    assert_eq!(engine.size(), (64, 48));
}

/// Two-tone checkerboard of `cell`-pixel squares
fn checkerboard(width: u32, height: u32, cell: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgba([20, 40, 200, 255])
        } else {
            Rgba([250, 220, 30, 255])
        }
    })
}

#[test]
fn test_blur_undo_matches_fresh_replay_with_smaller_base() {
    let Some(ctx) = test_context() else {
        return;
    };
    let blur = ToolPreset::Blur.style_with_width(20.0, Color::WHITE, TipKind::Default);

    let mut undone = engine(&ctx, (64, 64), blur.clone());
    undone.set_base_image(Some(checkerboard(32, 32, 4))).unwrap();
    stroke(&mut undone, (4.0, 20.0), (60.0, 20.0), 0.0);
    stroke(&mut undone, (4.0, 44.0), (60.0, 44.0), 1.0);
    undone.undo().unwrap();
    assert_eq!(undone.items().len(), 1);

    let mut fresh = engine(&ctx, (64, 64), blur);
    fresh.set_base_image(Some(checkerboard(32, 32, 4))).unwrap();
    stroke(&mut fresh, (4.0, 20.0), (60.0, 20.0), 0.0);

    let a = undone.get_image().unwrap();
    let b = fresh.get_image().unwrap();
    assert_eq!(a.dimensions(), (64, 64));
    assert_eq!(a.as_raw(), b.as_raw());

    // the stroke actually blurred something
    let mut plain = engine(&ctx, (64, 64), DrawingStyle::default());
    plain.set_base_image(Some(checkerboard(32, 32, 4))).unwrap();
    assert_ne!(plain.get_image().unwrap().as_raw(), b.as_raw());
}

#[test]
fn test_long_stroke_splits_and_keeps_first_segment() {
    let Some(ctx) = test_context() else {
        return;
    };
    let mut engine = engine(&ctx, (128, 128), DrawingStyle::default());
    let changes = Rc::new(Cell::new(0));
    let seen = changes.clone();
    engine.set_on_changed(move || seen.set(seen.get() + 1));

    engine
        .pointer_began(PointerSample::new(8.0, 20.0, 0.0))
        .unwrap();
    for i in 1..=1000 {
        let sample = PointerSample::new(8.0 + i as f32 * 0.1, 20.0, i as f64 * 0.01);
        engine.pointer_moved(sample, &[]).unwrap();
    }
    assert_eq!(changes.get(), 1);
    assert_eq!(engine.items().len(), 1);
    assert!(engine.is_drawing());
    assert_eq!(engine.get_image().unwrap().get_pixel(50, 20).0, [0, 0, 0, 255]);

    for i in 1..=100 {
        let sample = PointerSample::new(108.0 - i as f32 * 0.5, 100.0, 10.0 + i as f64 * 0.01);
        engine.pointer_moved(sample, &[]).unwrap();
    }
    engine.pointer_ended().unwrap();
    assert_eq!(changes.get(), 2);
    assert_eq!(engine.items().len(), 2);
    assert_eq!(engine.get_image().unwrap().get_pixel(80, 100).0, [0, 0, 0, 255]);

    // undo only takes back the continuation
    engine.undo().unwrap();
    let image = engine.get_image().unwrap();
    assert_eq!(image.get_pixel(50, 20).0, [0, 0, 0, 255]);
    assert_eq!(image.get_pixel(80, 100).0, [0, 0, 0, 0]);
}

#[test]
fn test_base_image_during_stroke_keeps_history() {
    let Some(ctx) = test_context() else {
        return;
    };
    let mut engine = engine(&ctx, (32, 32), DrawingStyle::default());
    let changes = Rc::new(Cell::new(0));
    let seen = changes.clone();
    engine.set_on_changed(move || seen.set(seen.get() + 1));
    stroke(&mut engine, (2.0, 8.0), (30.0, 8.0), 0.0);

    engine
        .pointer_began(PointerSample::new(2.0, 24.0, 1.0))
        .unwrap();
    for i in 1..=28 {
        let sample = PointerSample::new(2.0 + i as f32, 24.0, 1.0 + i as f64 * 0.01);
        engine.pointer_moved(sample, &[]).unwrap();
    }
    engine.set_base_image(Some(solid(16, 16, [0, 255, 0, 255]))).unwrap();
    assert!(engine.is_drawing());
    assert_eq!(engine.items().len(), 1);
    assert_eq!(changes.get(), 1);

    engine.pointer_ended().unwrap();
    assert_eq!(engine.items().len(), 2);
    let image = engine.get_image().unwrap();
    assert_eq!(image.get_pixel(16, 8).0, [0, 0, 0, 255]);
    assert_eq!(image.get_pixel(16, 24).0, [0, 0, 0, 255]);
    // the composite carried over, so the new base is not visible yet
    assert_eq!(image.get_pixel(16, 16).0, [0, 0, 0, 0]);

    // a replay starts from the new base, resampled to the canvas
    engine.redraw().unwrap();
    let image = engine.get_image().unwrap();
    assert_eq!(image.get_pixel(16, 16).0, [0, 255, 0, 255]);
    assert_eq!(image.get_pixel(0, 31).0, [0, 255, 0, 255]);
    assert_eq!(image.get_pixel(16, 24).0, [0, 0, 0, 255]);
}

#[test]
fn test_oversized_resize_leaves_canvas_intact() {
    let Some(ctx) = test_context() else {
        return;
    };
    let mut engine = engine(&ctx, (32, 32), DrawingStyle::default());
    engine.set_base_image(Some(solid(32, 32, [255, 255, 255, 255]))).unwrap();
    stroke(&mut engine, (0.0, 16.0), (31.0, 16.0), 0.0);
    let before = engine.get_image().unwrap();

    let too_wide = ctx.device().limits().max_texture_dimension_2d + 1;
    assert!(engine.resize(too_wide, 4).is_err());
    assert_eq!(engine.size(), (32, 32));
    assert_eq!(engine.items().len(), 1);
    assert_eq!(engine.get_image().unwrap().as_raw(), before.as_raw());

    // still usable
    stroke(&mut engine, (16.0, 0.0), (16.0, 31.0), 1.0);
    assert_eq!(engine.items().len(), 2);
}
