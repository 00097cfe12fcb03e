use std::str::FromStr;

use bytemuck::{Pod, Zeroable};

pub const DEFAULT_BACKGROUND_COLOR: Chip8Color = Chip8Color::new(0, 0, 0);
pub const DEFAULT_FOREGROUND_COLOR: Chip8Color = Chip8Color::new(255, 255, 255);

/// One output pixel, laid out as a little-endian RGBX8888 word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C, packed)]
pub struct Chip8Color {
    padding: u8,
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Chip8Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Chip8Color {
        Chip8Color { r, g, b, padding: 0 }
    }

    pub const fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Chip8Color {
    type Err = Chip8ColorParseError;

    /// Parses `RRGGBB` with an optional `0x` prefix.
    fn from_str(s: &str) -> Result<Chip8Color, Chip8ColorParseError> {
        let hex = s.strip_prefix("0x").unwrap_or(s);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Chip8ColorParseError(s.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| Chip8ColorParseError(s.to_owned()))
        };

        Ok(Chip8Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse hex color: {0:?}")]
pub struct Chip8ColorParseError(String);

/// Colors used to expand the monochrome display for a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Chip8Color,
    pub background: Chip8Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            foreground: DEFAULT_FOREGROUND_COLOR,
            background: DEFAULT_BACKGROUND_COLOR,
        }
    }
}

impl Palette {
    pub fn color(&self, on: bool) -> Chip8Color {
        if on {
            self.foreground
        } else {
            self.background
        }
    }
}
