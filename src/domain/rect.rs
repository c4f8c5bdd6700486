//! Axis-aligned rectangle in world space.
//!
//! `origin` is the bottom-left corner (world Y grows upward), `size` the
//! extent. Plain `Copy` value; every operation returns a new rectangle.

use glam::Vec2;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { origin: Vec2::new(x, y), size: Vec2::new(width, height) }
    }

    /// Rectangle of `size` whose center sits at `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Rect { origin: center - size * 0.5, size }
    }

    #[inline]
    pub fn min_x(&self) -> f32 { self.origin.x }
    #[inline]
    pub fn min_y(&self) -> f32 { self.origin.y }
    #[inline]
    pub fn max_x(&self) -> f32 { self.origin.x + self.size.x }
    #[inline]
    pub fn max_y(&self) -> f32 { self.origin.y + self.size.y }

    pub fn min(&self) -> Vec2 { self.origin }
    pub fn max(&self) -> Vec2 { self.origin + self.size }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Same size, moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Rect { origin: self.origin + delta, size: self.size }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Self {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        Rect { origin: min, size: max - min }
    }

    /// Open-interval overlap on X: touching edges do not count.
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x() && other.min_x() < self.max_x()
    }
}
