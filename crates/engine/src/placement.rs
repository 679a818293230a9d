//! Final-piece drop target.
//!
//! The presentation layer owns all pointer math; it hands over the point where a
//! drag ended and the target rectangle it rendered, in the same coordinate space.

/// Axis-aligned target rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TargetRegion {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True iff the point lies inside the region.
    ///
    /// Near edges are inclusive and far edges exclusive, so regions tiling a board
    /// never both claim a shared border.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}
