//! Pointer-driven stroke lifecycle
//!
//! [`StrokeLifecycle`] owns the in-progress raw drawing and the long-press
//! debounce. It knows nothing about rasterization: every input returns the
//! [`LifecycleEvent`]s the canvas has to act on (preview the transformed
//! stroke, or commit an [`Item`] to history).
//!
//! ```text
//! Idle --began--> Active --moved--> Active
//!                   |  \--moved (> SPLIT_THRESHOLD points)--> Split commit, Active
//!                   |--ended / cancelled--> Finish commit, Idle
//!                   \--tick past deadline--> Fill or Finish commit, Idle
//! ```

use crate::drawing::Drawing;
use crate::geometry::Vec2;
use crate::item::Item;
use crate::point::Point;
use crate::style::{DrawingStyle, InkKind};
use crate::transform::Transforming;

/// Idle time after the last input before a long press fires (seconds)
pub const LONG_PRESS_DELAY: f64 = 0.3;
/// A stroke is committed and restarted once it holds more points than this
pub const SPLIT_THRESHOLD: usize = 1000;
/// Raw points carried over into the stroke that continues after a split
pub const SPLIT_SEED_POINTS: usize = 50;
/// Pointer travel above which every coalesced sample is kept
pub const COALESCE_DISTANCE: f32 = 1.0;

/// A pointer position in canvas pixels with a monotonic timestamp (seconds)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub location: Vec2,
    pub timestamp: f64,
    pub force: f32,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, timestamp: f64) -> Self {
        Self {
            location: Vec2::new(x, y),
            timestamp,
            force: 0.0,
        }
    }
}

/// Why an item was committed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitKind {
    /// Pointer lifted or cancelled, or the debounce fired on a moving stroke
    Finish,
    /// The stroke grew past [`SPLIT_THRESHOLD`] and continues as a new one
    Split,
    /// Long press without movement: full-canvas fill
    Fill,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    /// Transformed copy of the active stroke for live feedback
    Preview(Drawing),
    Commit { item: Item, kind: CommitKind },
}

/// Deadline guarded by a generation counter.
///
/// Every arm or cancel bumps the generation, so a deadline recorded for an
/// earlier arming never fires.
#[derive(Clone, Debug, Default)]
pub struct Debounce {
    generation: u64,
    armed: Option<(u64, f64)>,
}

impl Debounce {
    pub fn arm(&mut self, deadline: f64) -> u64 {
        self.generation += 1;
        self.armed = Some((self.generation, deadline));
        self.generation
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = None;
    }

    pub fn deadline(&self) -> Option<f64> {
        self.armed.map(|(_, deadline)| deadline)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Consume the armed deadline if it is current and has passed
    pub fn fire(&mut self, now: f64) -> bool {
        match self.armed {
            Some((generation, deadline)) if generation == self.generation && now >= deadline => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug)]
struct ActiveStroke {
    drawing: Drawing,
    style: DrawingStyle,
    began_at: f64,
    last_location: Vec2,
}

impl ActiveStroke {
    fn blank(style: &DrawingStyle, points: Vec<Point>) -> Drawing {
        Drawing::from_points(
            points,
            style.color(),
            style.ink(),
            style.stroke_width(),
            false,
            false,
        )
    }

    fn point(&self, sample: &PointerSample) -> Point {
        Point::new(sample.location, sample.timestamp - self.began_at, sample.force)
    }

    /// Commit the transformed primary stroke and continue from the last
    /// [`SPLIT_SEED_POINTS`] raw points.
    fn split(&mut self) -> LifecycleEvent {
        let seed = self
            .drawing
            .primary()
            .map(|raw| raw.points[raw.len().saturating_sub(SPLIT_SEED_POINTS)..].to_vec())
            .unwrap_or_default();
        let next = Self::blank(&self.style, seed);
        let finished = std::mem::replace(&mut self.drawing, next);

        tracing::debug!("splitting stroke at {} points", finished.points_count());
        let transformed = self.style.chain().transform(finished);
        let primary = transformed.strokes.first().cloned();

        LifecycleEvent::Commit {
            item: Item::new(self.style.clone(), transformed.with_strokes(primary)),
            kind: CommitKind::Split,
        }
    }

    fn commit(self) -> Item {
        let drawing = self.style.chain().transform(self.drawing);
        Item::new(self.style, drawing)
    }
}

#[derive(Debug, Default)]
pub struct StrokeLifecycle {
    active: Option<ActiveStroke>,
    debounce: Debounce,
}

impl StrokeLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Raw (untransformed) geometry of the stroke in progress
    pub fn active_drawing(&self) -> Option<&Drawing> {
        self.active.as_ref().map(|a| &a.drawing)
    }

    /// Pending long-press deadline, if any
    pub fn deadline(&self) -> Option<f64> {
        self.debounce.deadline()
    }

    /// Start a stroke with a single point at time zero.
    ///
    /// A stroke already in progress is dropped without committing.
    pub fn pointer_began(&mut self, sample: PointerSample, style: &DrawingStyle) {
        if self.active.is_some() {
            tracing::debug!("pointer began during an active stroke, discarding it");
        }
        self.debounce.arm(sample.timestamp + LONG_PRESS_DELAY);
        self.active = Some(ActiveStroke {
            drawing: ActiveStroke::blank(
                style,
                vec![Point::new(sample.location, 0.0, sample.force)],
            ),
            style: style.clone(),
            began_at: sample.timestamp,
            last_location: sample.location,
        });
    }

    /// Append the new samples and return either a preview of the
    /// transformed stroke or, past [`SPLIT_THRESHOLD`], a split commit.
    ///
    /// `coalesced` are the intermediate samples delivered with `sample`
    /// (including it); an empty slice means `sample` alone.
    pub fn pointer_moved(
        &mut self,
        sample: PointerSample,
        coalesced: &[PointerSample],
    ) -> Option<LifecycleEvent> {
        let active = self.active.as_mut()?;
        self.debounce.arm(sample.timestamp + LONG_PRESS_DELAY);

        let travelled = active.last_location.distance(sample.location);
        active.last_location = sample.location;

        if travelled > COALESCE_DISTANCE && !coalesced.is_empty() {
            for s in coalesced {
                let point = active.point(s);
                active.drawing.append(point);
            }
        } else {
            let point = active.point(&sample);
            active.drawing.append(point);
        }

        if active.drawing.points_count() > SPLIT_THRESHOLD {
            return Some(active.split());
        }
        Some(LifecycleEvent::Preview(
            active.style.chain().transform(active.drawing.clone()),
        ))
    }

    /// Pointer lifted or cancelled: commit the transformed stroke
    pub fn finish(&mut self) -> Option<LifecycleEvent> {
        self.debounce.cancel();
        let active = self.active.take()?;
        Some(LifecycleEvent::Commit {
            item: active.commit(),
            kind: CommitKind::Finish,
        })
    }

    /// Drop the stroke in progress without committing
    pub fn reset(&mut self) {
        self.debounce.cancel();
        self.active = None;
    }

    /// Drive the long-press debounce. A single-point stroke turns into a
    /// full-canvas fill; anything longer finishes normally.
    pub fn tick(&mut self, now: f64, canvas_size: (u32, u32)) -> Option<LifecycleEvent> {
        if self.active.is_none() || !self.debounce.fire(now) {
            return None;
        }
        let active = self.active.take()?;

        if active.drawing.points_count() != 1 {
            return Some(LifecycleEvent::Commit {
                item: active.commit(),
                kind: CommitKind::Finish,
            });
        }

        let (w, h) = (canvas_size.0 as f32, canvas_size.1 as f32);
        tracing::debug!("long press, filling {}x{} canvas", w, h);
        let fill = Drawing::from_points(
            vec![
                Point::at(0.0, 0.0),
                Point::at(w, 0.0),
                Point::at(w, h),
                Point::at(0.0, h),
            ],
            active.style.color().with_alpha(1.0),
            InkKind::Draw,
            1.0,
            true,
            true,
        );
        Some(LifecycleEvent::Commit {
            item: Item::new(active.style, fill),
            kind: CommitKind::Fill,
        })
    }
}
