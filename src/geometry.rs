//! Integer geometry shared by panels, list views and the host seam
//!
//! Host window systems work in integer pixels with edge-based rectangles
//! (`left`/`top` inclusive, `right`/`bottom` exclusive), so that is what
//! the whole crate uses.

use serde::{Deserialize, Serialize};

/// A point in screen or client coordinates (the caller knows which)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Keyboard-invoked context menus report this position
    pub const KEYBOARD: Point = Point { x: -1, y: -1 };

    pub fn is_keyboard(&self) -> bool {
        self.x == -1 || self.y == -1
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Width and height in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Edge-based rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// All four edges are zero (the "never positioned" rectangle)
    pub fn is_zero(&self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }

    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x < self.right && pt.y >= self.top && pt.y < self.bottom
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Shift this rectangle so that at least `margin` pixels of it overlap
    /// `screen` on each axis. Size is preserved.
    pub fn nudged_onto(&self, screen: &Rect, margin: i32) -> Self {
        let mut r = *self;
        if r.right < screen.left + margin {
            let dx = screen.left + margin - r.right;
            r = r.offset(dx, 0);
        } else if r.left > screen.right - margin {
            let dx = screen.right - margin - r.left;
            r = r.offset(dx, 0);
        }
        if r.bottom < screen.top + margin {
            let dy = screen.top + margin - r.bottom;
            r = r.offset(0, dy);
        } else if r.top > screen.bottom - margin {
            let dy = screen.bottom - margin - r.top;
            r = r.offset(0, dy);
        }
        r
    }
}
