//! Off-screen paint buffer
//!
//! Panels that draw custom controls record drawing operations into a
//! `Frame`; the host rasterizes it onto the window in one blit. Pixels and
//! fonts stay on the host side.

use crate::geometry::{Point, Rect, Size};

/// Tooltip background (pale yellow, opaque)
pub const TOOLTIP_BG: u32 = 0xFFFF_FFE1;
/// Tooltip text and border
pub const TOOLTIP_FG: u32 = 0xFF00_0000;

const TOOLTIP_BORDER: i32 = 3;
const TOOLTIP_CURSOR_GAP: i32 = 24;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: u32 },
    StrokeRect { rect: Rect, color: u32 },
    Text { rect: Rect, text: String, color: u32 },
}

/// A recorded paint pass for one window
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    size: Size,
    background: u32,
    ops: Vec<DrawOp>,
}

impl Frame {
    pub fn new(size: Size, background: u32) -> Self {
        Self {
            size,
            background,
            ops: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: u32) {
        self.ops.push(DrawOp::StrokeRect { rect, color });
    }

    pub fn text(&mut self, rect: Rect, text: impl Into<String>, color: u32) {
        self.ops.push(DrawOp::Text {
            rect,
            text: text.into(),
            color,
        });
    }

    /// Draw a tooltip box for the mouse at `mouse`, kept inside `bounds`
    ///
    /// The box goes below the cursor; if that would run off the bottom it
    /// flips above the cursor (or pins to the bottom edge) and shifts right
    /// so the pointer does not cover it.
    pub fn tooltip(&mut self, mouse: Point, bounds: Rect, text: &str, text_size: Size) {
        if text.is_empty() {
            return;
        }
        let r = tooltip_text_rect(mouse, bounds, text_size);
        let outer = Rect::new(
            r.left - TOOLTIP_BORDER,
            r.top - TOOLTIP_BORDER,
            r.right + TOOLTIP_BORDER,
            r.bottom + TOOLTIP_BORDER,
        );
        self.fill_rect(outer, TOOLTIP_BG);
        self.stroke_rect(outer, TOOLTIP_FG);
        self.text(r, text, TOOLTIP_FG);
    }
}

/// Placement of the tooltip text rectangle (border excluded)
pub fn tooltip_text_rect(mouse: Point, bounds: Rect, text_size: Size) -> Rect {
    let mut x = mouse.x.max(bounds.left).min(bounds.right);
    let mut y = (mouse.y + TOOLTIP_CURSOR_GAP)
        .max(bounds.top)
        .min(bounds.bottom);

    if y + text_size.height > bounds.bottom - 4 {
        if mouse.y - text_size.height - 12 >= bounds.top {
            y = mouse.y - text_size.height - 12;
        } else {
            y = bounds.bottom - 4 - text_size.height;
        }
        x += 15;
    }
    if x + text_size.width > bounds.right - 4 {
        x = bounds.right - 4 - text_size.width;
    }
    Rect::from_origin_size(Point::new(x, y), text_size)
}
