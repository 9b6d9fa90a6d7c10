//! Integration tests for the stroke lifecycle: long press, split and finish

use quill_core::lifecycle::{LONG_PRESS_DELAY, SPLIT_SEED_POINTS, SPLIT_THRESHOLD};
use quill_core::{
    Color, CommitKind, Drawing, DrawingStyle, InkKind, Item, LerpSmoother, LifecycleEvent, Point,
    PointerSample, StrokeLifecycle, TipKind, TransformChain, Transforming, Vec2,
};

fn commit(event: Option<LifecycleEvent>) -> (Item, CommitKind) {
    match event {
        Some(LifecycleEvent::Commit { item, kind }) => (item, kind),
        other => panic!("expected a commit, got {:?}", other),
    }
}

#[test]
fn test_tap_and_hold_fills_canvas() {
    let style = DrawingStyle::marker(10.0, Color::BLUE, TipKind::Default);
    let mut lc = StrokeLifecycle::new();
    lc.pointer_began(PointerSample::new(50.0, 50.0, 2.0), &style);

    assert!(lc.tick(2.0 + LONG_PRESS_DELAY - 0.01, (200, 100)).is_none());
    let (item, kind) = commit(lc.tick(2.0 + LONG_PRESS_DELAY, (200, 100)));
    assert_eq!(kind, CommitKind::Fill);
    assert!(!lc.is_active());

    let fill = &item.drawing;
    assert_eq!(fill.ink, InkKind::Draw);
    assert_eq!(fill.color, Color::BLUE);
    let stroke = &fill.strokes[0];
    assert!(stroke.is_closed && stroke.is_filled);
    assert_eq!(stroke.width, 1.0);
    let corners: Vec<Vec2> = stroke.points.iter().map(|p| p.location).collect();
    assert_eq!(
        corners,
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(200.0, 0.0),
            Vec2::new(200.0, 100.0),
            Vec2::new(0.0, 100.0),
        ]
    );

    // fires once only
    assert!(lc.tick(10.0, (200, 100)).is_none());
}

#[test]
fn test_hold_after_movement_finishes_normally() {
    let style = DrawingStyle::pen(10.0, Color::BLACK, TipKind::Default);
    let mut lc = StrokeLifecycle::new();
    lc.pointer_began(PointerSample::new(0.0, 0.0, 0.0), &style);
    for i in 1..5 {
        let event = lc.pointer_moved(PointerSample::new(i as f32 * 10.0, 0.0, i as f64 * 0.01), &[]);
        assert!(matches!(event, Some(LifecycleEvent::Preview(_))));
    }

    let (item, kind) = commit(lc.tick(1.0, (100, 100)));
    assert_eq!(kind, CommitKind::Finish);
    assert!(item.drawing.strokes[0].is_filled);
    assert_eq!(item.drawing.strokes[0].len(), 8);
}

#[test]
fn test_moves_without_begin_are_ignored() {
    let mut lc = StrokeLifecycle::new();
    assert!(lc
        .pointer_moved(PointerSample::new(1.0, 1.0, 0.0), &[])
        .is_none());
    assert!(lc.finish().is_none());
}

#[test]
fn test_split_continuity() {
    let style = DrawingStyle::new(
        Color::BLACK,
        4.0,
        InkKind::Draw,
        TipKind::Default,
        TransformChain::default().then(LerpSmoother::new(3)),
    );
    let sample = |i: usize| {
        let x = i as f32 * 2.0;
        PointerSample::new(x, 20.0 * (x / 100.0).sin(), i as f64 * 0.001)
    };

    let mut lc = StrokeLifecycle::new();
    lc.pointer_began(sample(0), &style);

    let mut split = None;
    for i in 1..1200 {
        if let Some(LifecycleEvent::Commit { item, kind }) = lc.pointer_moved(sample(i), &[]) {
            assert_eq!(kind, CommitKind::Split);
            assert!(split.is_none(), "split more than once");
            split = Some(item);
            assert_eq!(
                lc.active_drawing().map(Drawing::points_count),
                Some(SPLIT_SEED_POINTS)
            );
        }
    }
    let first = split.expect("stroke never split");
    assert_eq!(first.drawing.strokes.len(), 1);
    assert_eq!(first.drawing.points_count(), SPLIT_THRESHOLD + 1);

    let (rest, _) = commit(lc.finish());

    let seam = first.drawing.strokes[0].points.last().unwrap().time;
    let mut joined: Vec<Point> = first.drawing.strokes[0].points.clone();
    joined.extend(
        rest.drawing.strokes[0]
            .points
            .iter()
            .filter(|p| p.time > seam)
            .copied(),
    );
    joined.sort_by(|a, b| a.time.total_cmp(&b.time));

    let raw: Vec<Point> = (0..1200)
        .map(|i| {
            let s = sample(i);
            Point::new(s.location, s.timestamp, s.force)
        })
        .collect();
    let whole = style.chain().transform(Drawing::from_points(
        raw,
        Color::BLACK,
        InkKind::Draw,
        4.0,
        false,
        false,
    ));

    assert_eq!(joined.len(), whole.strokes[0].len());
    for (a, b) in joined.iter().zip(&whole.strokes[0].points) {
        assert!((a.time - b.time).abs() < 1e-9);
        assert!(
            a.location.distance(b.location) < 0.05,
            "diverged at t={}: {:?} vs {:?}",
            a.time,
            a.location,
            b.location
        );
    }
}
