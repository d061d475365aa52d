use super::Surface;
use crate::util::alpha_u8;

// ============================================================================
// Blend Mode
// ============================================================================

/// Compositing blend mode for `composite()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard source-over blending
    Alpha,
    /// Screen: dst = 1 - (1 - dst) * (1 - src); black leaves dst untouched
    Screen,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Screen a single color channel
#[inline]
fn screen_channel(src: u8, dst: u8) -> u8 {
    255 - (((255 - src as u16) * (255 - dst as u16) + 127) / 255) as u8
}

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = 255; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering
/// This is the canvas every backdrop draws into
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid color
    /// Optimized: uses u32 fill for maximum speed
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        // Create ABGR u32 pattern
        let pixel = u32::from_ne_bytes([255, b, g, r]);

        // Safety: pixels.len() is always divisible by 4 (width * height * 4).
        // We use write_unaligned to avoid assuming alignment of Vec<u8>.
        let ptr = self.pixels.as_mut_ptr() as *mut u32;
        let len = self.pixels.len() / 4;

        for i in 0..len {
            // Safety: i < len ensures we stay within bounds
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let alpha = a as u16;
            self.pixels[idx] = 255; // A - always opaque
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
            ))
        } else {
            None
        }
    }

    /// Draw a horizontal line with alpha blending
    pub fn hline_blend(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let alpha = a as u16;
        let mut idx = self.pixel_index(start as u32, y as u32);
        let count = (end - start + 1) as usize;
        for _ in 0..count {
            self.pixels[idx] = 255;
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
            idx += 4;
        }
    }

    /// Blend a color over the whole buffer (translucent full-canvas fill)
    pub fn fill_blend(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let alpha = a as u16;
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[0] = 255;
            chunk[1] = blend_channel(b, chunk[1], alpha);
            chunk[2] = blend_channel(g, chunk[2], alpha);
            chunk[3] = blend_channel(r, chunk[3], alpha);
        }
    }

    /// Fill a circle with alpha blending (for soft particles, glow effects)
    pub fn fill_circle_blend(&mut self, cx: i32, cy: i32, radius: i32, r: u8, g: u8, b: u8, a: u8) {
        if radius <= 0 {
            if radius == 0 {
                self.blend_pixel(cx, cy, r, g, b, a);
            }
            return;
        }

        // Midpoint circle: record the widest span per row first, so rows
        // shared by two octants are only blended once
        let rows = radius as usize + 1;
        let mut stack = [-1i32; 64];
        let mut heap;
        let half: &mut [i32] = if rows <= stack.len() {
            &mut stack[..rows]
        } else {
            heap = vec![-1i32; rows];
            &mut heap
        };

        let mut xi = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while xi >= y {
            half[y as usize] = half[y as usize].max(xi);
            half[xi as usize] = half[xi as usize].max(y);

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                xi -= 1;
                err += 2 * (y - xi) + 1;
            }
        }

        for (dy, &w) in half.iter().enumerate() {
            if w < 0 {
                continue;
            }
            let dy = dy as i32;
            self.hline_blend(cx - w, cx + w, cy + dy, r, g, b, a);
            if dy != 0 {
                self.hline_blend(cx - w, cx + w, cy - dy, r, g, b, a);
            }
        }
    }

    /// Stroke a 1px ellipse outline with alpha blending (midpoint algorithm)
    pub fn stroke_ellipse_blend(
        &mut self,
        cx: i32,
        cy: i32,
        rx: i32,
        ry: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    ) {
        if rx < 0 || ry < 0 {
            return;
        }
        if rx == 0 || ry == 0 {
            // Degenerate ellipse collapses to a line
            if ry == 0 {
                self.hline_blend(cx - rx, cx + rx, cy, r, g, b, a);
            } else {
                for y in (cy - ry)..=(cy + ry) {
                    self.blend_pixel(cx, y, r, g, b, a);
                }
            }
            return;
        }

        let rx2 = (rx as f64) * (rx as f64);
        let ry2 = (ry as f64) * (ry as f64);
        let mut x: i32 = 0;
        let mut y: i32 = ry;
        let mut px = 0.0;
        let mut py = 2.0 * rx2 * y as f64;

        // Region 1: slope shallower than -1
        let mut p = ry2 - rx2 * ry as f64 + 0.25 * rx2;
        while px < py {
            self.plot_quadrants(cx, cy, x, y, r, g, b, a);
            x += 1;
            px += 2.0 * ry2;
            if p < 0.0 {
                p += ry2 + px;
            } else {
                y -= 1;
                py -= 2.0 * rx2;
                p += ry2 + px - py;
            }
        }

        // Region 2: slope steeper than -1
        let xf = x as f64 + 0.5;
        let yf = (y - 1) as f64;
        p = ry2 * xf * xf + rx2 * yf * yf - rx2 * ry2;
        while y >= 0 {
            self.plot_quadrants(cx, cy, x, y, r, g, b, a);
            y -= 1;
            py -= 2.0 * rx2;
            if p > 0.0 {
                p += rx2 - py;
            } else {
                x += 1;
                px += 2.0 * ry2;
                p += rx2 - py + px;
            }
        }
    }

    /// Blend the four symmetric points of an ellipse, skipping duplicates on the axes
    #[inline]
    fn plot_quadrants(&mut self, cx: i32, cy: i32, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        self.blend_pixel(cx + x, cy + y, r, g, b, a);
        if x != 0 {
            self.blend_pixel(cx - x, cy + y, r, g, b, a);
        }
        if y != 0 {
            self.blend_pixel(cx + x, cy - y, r, g, b, a);
            if x != 0 {
                self.blend_pixel(cx - x, cy - y, r, g, b, a);
            }
        }
    }

    // ========================================================================
    // Buffer Operations
    // ========================================================================

    /// Composite a source buffer onto this one at (dst_x, dst_y) with a layer opacity.
    pub fn composite(
        &mut self,
        src: &PixelBuffer,
        dst_x: i32,
        dst_y: i32,
        mode: BlendMode,
        opacity: f32,
    ) {
        if src.width == 0 || src.height == 0 {
            return;
        }
        let layer_alpha = alpha_u8(opacity) as u16;
        if layer_alpha == 0 {
            return;
        }

        let dst_w = self.width as i32;
        let dst_h = self.height as i32;

        for sy in 0..src.height {
            let dy = dst_y + sy as i32;
            if dy < 0 || dy >= dst_h {
                continue;
            }

            for sx in 0..src.width {
                let dx = dst_x + sx as i32;
                if dx < 0 || dx >= dst_w {
                    continue;
                }

                let si = src.pixel_index(sx, sy);
                let sr = src.pixels[si + 3];
                let sg = src.pixels[si + 2];
                let sb = src.pixels[si + 1];

                let di = self.pixel_index(dx as u32, dy as u32);
                let dr = self.pixels[di + 3];
                let dg = self.pixels[di + 2];
                let db = self.pixels[di + 1];

                let (tr, tg, tb) = match mode {
                    BlendMode::Alpha => (sr, sg, sb),
                    BlendMode::Screen => (
                        screen_channel(sr, dr),
                        screen_channel(sg, dg),
                        screen_channel(sb, db),
                    ),
                };

                if layer_alpha == 255 {
                    write_pixel(&mut self.pixels[di..di + 4], tr, tg, tb);
                } else {
                    self.pixels[di] = 255;
                    self.pixels[di + 1] = blend_channel(tb, db, layer_alpha);
                    self.pixels[di + 2] = blend_channel(tg, dg, layer_alpha);
                    self.pixels[di + 3] = blend_channel(tr, dr, layer_alpha);
                }
            }
        }
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: (u8, u8, u8)) {
        PixelBuffer::clear(self, color.0, color.1, color.2);
    }

    fn veil(&mut self, color: (u8, u8, u8), opacity: f32) {
        self.fill_blend(color.0, color.1, color.2, alpha_u8(opacity));
    }

    fn stroke_ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        line_width: f32,
        color: (u8, u8, u8),
        opacity: f32,
    ) {
        let a = alpha_u8(opacity);
        if a == 0 {
            return;
        }
        // Thick lines are concentric 1px rings centred on the path
        let rings = line_width.round().max(1.0) as i32;
        let half = (rings - 1) as f32 / 2.0;
        for k in 0..rings {
            let offset = k as f32 - half;
            let (rx, ry) = (rx + offset, ry + offset);
            if rx < 0.0 || ry < 0.0 {
                continue;
            }
            self.stroke_ellipse_blend(
                cx.round() as i32,
                cy.round() as i32,
                rx.round() as i32,
                ry.round() as i32,
                color.0,
                color.1,
                color.2,
                a,
            );
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: (u8, u8, u8), opacity: f32) {
        let a = alpha_u8(opacity);
        if a == 0 {
            return;
        }
        self.fill_circle_blend(
            cx.round() as i32,
            cy.round() as i32,
            radius.round() as i32,
            color.0,
            color.1,
            color.2,
            a,
        );
    }
}
