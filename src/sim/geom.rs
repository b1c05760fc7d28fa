//! Axis-aligned rectangle geometry
//!
//! World coordinates: +x right, +y down. A rect is stored as its top-left
//! corner plus size; entity positions are rect centers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with floating-point edges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rect of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Move the rect so its center lands on `center` (size unchanged)
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size * 0.5;
    }

    pub fn set_left(&mut self, left: f32) {
        self.pos.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.pos.x = right - self.size.x;
    }

    pub fn set_top(&mut self, top: f32) {
        self.pos.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.pos.y = bottom - self.size.y;
    }

    /// Grow (or shrink, with negative amounts) around the same center.
    ///
    /// `dw`/`dh` are total changes in width/height, split evenly between the
    /// two sides.
    pub fn inflate(&self, dw: f32, dh: f32) -> Rect {
        Rect {
            pos: self.pos - Vec2::new(dw, dh) * 0.5,
            size: self.size + Vec2::new(dw, dh),
        }
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect {
            pos: self.pos + offset,
            size: self.size,
        }
    }

    /// Smallest rect covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let min = self.pos.min(other.pos);
        let max = (self.pos + self.size).max(other.pos + other.size);
        Rect {
            pos: min,
            size: max - min,
        }
    }

    /// Strict overlap test: rects that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open containment: left/top edges inside, right/bottom outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Whether both dimensions are positive
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}
