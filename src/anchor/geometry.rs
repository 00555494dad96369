//! Geometry in the shared coordinate space.
//!
//! Origin is the top-left corner of the stage; `y` grows downward.

use crate::core::Edge;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Point at `(x, y)`.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    /// Size of `width` by `height`.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Rectangle with top-left corner `(x, y)`.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering `size`.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Left edge.
    pub fn min_x(&self) -> f64 {
        self.x
    }

    /// Horizontal center.
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Right edge.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge.
    pub fn min_y(&self) -> f64 {
        self.y
    }

    /// Vertical center.
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width times height.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Zero or negative extent on either axis.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Overlap of the two rectangles; zero-sized when they do not meet.
    pub fn intersection(&self, other: Rect) -> Rect {
        let x = self.min_x().max(other.min_x());
        let y = self.min_y().max(other.min_y());
        let width = (self.max_x().min(other.max_x()) - x).max(0.0);
        let height = (self.max_y().min(other.max_y()) - y).max(0.0);
        Rect::new(x, y, width, height)
    }

    /// The band of thickness `size` lying just outside this rectangle on `edge`.
    ///
    /// Lets a step point at the space next to an element rather than the
    /// element itself. The band spans the element's full length along the edge.
    pub fn extension(&self, edge: Edge, size: f64) -> Rect {
        match edge {
            Edge::Top => Rect::new(self.x, self.min_y() - size, self.width, size),
            Edge::Bottom => Rect::new(self.x, self.max_y(), self.width, size),
            Edge::Leading => Rect::new(self.min_x() - size, self.y, size, self.height),
            Edge::Trailing => Rect::new(self.max_x(), self.y, size, self.height),
        }
    }
}
