use crate::color::{Chip8Color, Palette};

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// 64x32 monochrome frame buffer.
///
/// Pixels are stored row-major, one cell per pixel holding 0 (off) or 1 (on).
/// The only way to change a pixel is through [`Display::draw_byte`] or
/// [`Display::clear`], both of which mark the frame dirty so a renderer knows
/// when a new frame needs presenting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    gfx: Vec<u8>,
    dirty: bool,
}

impl Default for Display {
    fn default() -> Self {
        Display::new()
    }
}

impl Display {
    pub fn new() -> Display {
        Display {
            gfx: vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT],
            dirty: false,
        }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.gfx.iter_mut().for_each(|p| *p = 0);
        self.dirty = true;
    }

    /// XORs one sprite row onto the screen, most significant bit leftmost.
    ///
    /// The origin is wrapped onto the screen first and columns wrap around the
    /// right edge; rows never advance here. Returns `true` if any set bit
    /// turned an already lit pixel off.
    pub fn draw_byte(&mut self, x: u8, y: u8, byte: u8) -> bool {
        let y = y as usize % SCREEN_HEIGHT;
        let mut x = x as usize % SCREEN_WIDTH;
        let mut collision = false;

        for column in 0..8 {
            let bit = (byte >> (7 - column)) & 1;
            let idx = y * SCREEN_WIDTH + x;

            if bit & self.gfx[idx] == 1 {
                collision = true;
            }
            self.gfx[idx] ^= bit;

            x = (x + 1) % SCREEN_WIDTH;
        }

        self.dirty = true;
        collision
    }

    /// Pixel state at `(x, y)`; coordinates wrap like drawing does.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let idx = (y % SCREEN_HEIGHT) * SCREEN_WIDTH + (x % SCREEN_WIDTH);
        self.gfx[idx] == 1
    }

    /// Raw pixel cells, row-major, 0 or 1.
    pub fn pixels(&self) -> &[u8] {
        &self.gfx[..]
    }

    /// True when the frame changed since the last [`Display::clear_dirty`].
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Expands the frame into packed RGBX pixels.
    pub fn render(&self, palette: &Palette) -> Vec<Chip8Color> {
        self.gfx.iter().map(|&p| palette.color(p == 1)).collect()
    }

    /// Same as [`Display::render`] but as bytes, ready for an RGBX8888 texture
    /// with a pitch of `SCREEN_WIDTH * 4`.
    pub fn render_bytes(&self, palette: &Palette) -> Vec<u8> {
        bytemuck::cast_slice(&self.render(palette)[..]).to_vec()
    }
}
