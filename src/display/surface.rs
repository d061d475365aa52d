//! Drawing surface seam between the simulators and the pixel buffer.
//!
//! Effects only ever draw through this trait, so tests can record draw calls
//! instead of rasterizing them.

/// The 2D drawing operations the backdrops need
pub trait Surface {
    /// Surface width in device pixels
    fn width(&self) -> u32;

    /// Surface height in device pixels
    fn height(&self) -> u32;

    /// Replace every pixel with an opaque color
    fn clear(&mut self, color: (u8, u8, u8));

    /// Blend a translucent color over the whole surface, keeping what was there
    fn veil(&mut self, color: (u8, u8, u8), opacity: f32);

    /// Stroke an axis-aligned ellipse outline `line_width` device pixels thick
    fn stroke_ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        line_width: f32,
        color: (u8, u8, u8),
        opacity: f32,
    );

    /// Fill a circle
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: (u8, u8, u8), opacity: f32);
}

/// Surface that records every call, for tests
#[cfg(test)]
pub mod recording {
    use super::Surface;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Clear((u8, u8, u8)),
        Veil((u8, u8, u8), f32),
        Ellipse { cx: f32, cy: f32, rx: f32, ry: f32, line_width: f32, opacity: f32 },
        Circle { cx: f32, cy: f32, radius: f32, color: (u8, u8, u8), opacity: f32 },
    }

    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ops: Vec::new(),
            }
        }

        pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
        }

        pub fn ellipses(&self) -> impl Iterator<Item = &DrawOp> {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Ellipse { .. }))
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn clear(&mut self, color: (u8, u8, u8)) {
            self.ops.push(DrawOp::Clear(color));
        }

        fn veil(&mut self, color: (u8, u8, u8), opacity: f32) {
            self.ops.push(DrawOp::Veil(color, opacity));
        }

        fn stroke_ellipse(
            &mut self,
            cx: f32,
            cy: f32,
            rx: f32,
            ry: f32,
            line_width: f32,
            _color: (u8, u8, u8),
            opacity: f32,
        ) {
            self.ops.push(DrawOp::Ellipse {
                cx,
                cy,
                rx,
                ry,
                line_width,
                opacity,
            });
        }

        fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: (u8, u8, u8), opacity: f32) {
            self.ops.push(DrawOp::Circle {
                cx,
                cy,
                radius,
                color,
                opacity,
            });
        }
    }
}
