//! CHIP-8 interpreter core.
//!
//! The host drives a [`Chip8`] by calling [`Chip8::step`] at its instruction
//! rate and [`Chip8::step_timer`] at 60 Hz, writing keys with
//! [`Chip8::set_key`] and presenting [`Chip8::display`] when it is dirty.

mod chip8;
mod color;
mod display;
mod error;
mod instruction;

pub use chip8::{Chip8, Chip8Builder, DEFAULT_FONT, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
pub use color::{
    Chip8Color, Chip8ColorParseError, Palette, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR,
};
pub use display::{Display, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use error::Chip8Error;
pub use instruction::Instruction;
