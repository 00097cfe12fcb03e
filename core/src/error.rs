/// Faults surfaced by the CHIP-8 core.
///
/// A machine that returns one of the execution errors from `Chip8::step` is
/// left as it was before the step: `pc` still points at the faulting
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Chip8Error {
    #[error("unknown instruction 0x{opcode:04x} at 0x{addr:03x}")]
    UnknownOpcode { opcode: u16, addr: u16 },

    #[error("stack overflow: call at 0x{addr:03x} with all 16 slots in use")]
    StackOverflow { addr: u16 },

    #[error("stack underflow: return at 0x{addr:03x} with an empty call stack")]
    StackUnderflow { addr: u16 },

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("font sprite must be 80 bytes, got {size}")]
    InvalidFont { size: usize },
}
