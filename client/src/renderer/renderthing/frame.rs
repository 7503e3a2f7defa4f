pub const PIXEL_BYTES: usize = 4;

pub type Color = [u8; PIXEL_BYTES];

/// RGBA view of the pixel buffer of a single frame.
pub struct RenderFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub buffer: &'a mut [u8],
}

impl RenderFrame<'_> {
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = (x as usize + y as usize * self.width as usize) * PIXEL_BYTES;
        self.buffer.get_mut(index..index + PIXEL_BYTES)
    }

    pub fn draw_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(pixel) = self.pixel_mut(x, y) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Clipped at the frame edges.
    pub fn draw_square(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);

        for y in y..y_end {
            for x in x..x_end {
                self.draw_pixel(x, y, color);
            }
        }
    }

    pub fn fill(&mut self, color: Color) {
        for pixel in self.buffer.chunks_exact_mut(PIXEL_BYTES) {
            pixel.copy_from_slice(&color);
        }
    }
}
