use std::fmt;

/// A decoded CHIP-8 instruction.
///
/// Register operands are 4-bit indices (`x` = bits 8-11, `y` = bits 4-7),
/// addresses are 12 bits and immediates are the low byte of the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1NNN
    Jump { addr: u16 },
    /// 2NNN
    Call { addr: u16 },
    /// 3XNN
    SkipEqImm { x: u8, kk: u8 },
    /// 4XNN
    SkipNeqImm { x: u8, kk: u8 },
    /// 5XY0
    SkipEqReg { x: u8, y: u8 },
    /// 6XNN
    SetImm { x: u8, kk: u8 },
    /// 7XNN
    AddImm { x: u8, kk: u8 },
    /// 8XY0
    SetReg { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddReg { x: u8, y: u8 },
    /// 8XY5
    SubXY { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8 },
    /// 8XY7
    SubYX { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8 },
    /// 9XY0
    SkipNeqReg { x: u8, y: u8 },
    /// ANNN
    SetIndex { addr: u16 },
    /// BNNN
    JumpOffset { addr: u16 },
    /// CXNN
    Random { x: u8, kk: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipKeyDown { x: u8 },
    /// EXA1
    SkipKeyUp { x: u8 },
    /// FX07
    GetDelay { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    SetDelay { x: u8 },
    /// FX18
    SetSound { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    FontGlyph { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    Store { x: u8 },
    /// FX65
    Load { x: u8 },
}

impl Instruction {
    /// Decodes a 16-bit opcode, `None` if it is not part of the instruction set.
    pub fn decode(opcode: u16) -> Option<Instruction> {
        // Instruction split into nibbles(4bits) 1-4
        let n1 = (opcode >> 12) as u8;
        let x = ((opcode >> 8) & 0xF) as u8;
        let y = ((opcode >> 4) & 0xF) as u8;
        let n = (opcode & 0xF) as u8;

        let addr = opcode & 0x0FFF;
        let kk = (opcode & 0xFF) as u8;

        let inst = match (n1, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Clear,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, _, _, _) => Instruction::Jump { addr },
            (0x2, _, _, _) => Instruction::Call { addr },
            (0x3, _, _, _) => Instruction::SkipEqImm { x, kk },
            (0x4, _, _, _) => Instruction::SkipNeqImm { x, kk },
            (0x5, _, _, 0x0) => Instruction::SkipEqReg { x, y },
            (0x6, _, _, _) => Instruction::SetImm { x, kk },
            (0x7, _, _, _) => Instruction::AddImm { x, kk },
            (0x8, _, _, 0x0) => Instruction::SetReg { x, y },
            (0x8, _, _, 0x1) => Instruction::Or { x, y },
            (0x8, _, _, 0x2) => Instruction::And { x, y },
            (0x8, _, _, 0x3) => Instruction::Xor { x, y },
            (0x8, _, _, 0x4) => Instruction::AddReg { x, y },
            (0x8, _, _, 0x5) => Instruction::SubXY { x, y },
            (0x8, _, _, 0x6) => Instruction::ShiftRight { x },
            (0x8, _, _, 0x7) => Instruction::SubYX { x, y },
            (0x8, _, _, 0xE) => Instruction::ShiftLeft { x },
            (0x9, _, _, 0x0) => Instruction::SkipNeqReg { x, y },
            (0xA, _, _, _) => Instruction::SetIndex { addr },
            (0xB, _, _, _) => Instruction::JumpOffset { addr },
            (0xC, _, _, _) => Instruction::Random { x, kk },
            (0xD, _, _, _) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipKeyDown { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipKeyUp { x },
            (0xF, _, 0x0, 0x7) => Instruction::GetDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Instruction::FontGlyph { x },
            (0xF, _, 0x3, 0x3) => Instruction::StoreBcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::Store { x },
            (0xF, _, 0x6, 0x5) => Instruction::Load { x },
            _ => return None,
        };

        Some(inst)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump { addr } => write!(f, "JP 0x{:03x}", addr),
            Instruction::Call { addr } => write!(f, "CALL 0x{:03x}", addr),
            Instruction::SkipEqImm { x, kk } => write!(f, "SE V{:X}, 0x{:02x}", x, kk),
            Instruction::SkipNeqImm { x, kk } => write!(f, "SNE V{:X}, 0x{:02x}", x, kk),
            Instruction::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::SetImm { x, kk } => write!(f, "LD V{:X}, 0x{:02x}", x, kk),
            Instruction::AddImm { x, kk } => write!(f, "ADD V{:X}, 0x{:02x}", x, kk),
            Instruction::SetReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::SubXY { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight { x } => write!(f, "SHR V{:X}", x),
            Instruction::SubYX { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft { x } => write!(f, "SHL V{:X}", x),
            Instruction::SkipNeqReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::SetIndex { addr } => write!(f, "LD I, 0x{:03x}", addr),
            Instruction::JumpOffset { addr } => write!(f, "JP V0, 0x{:03x}", addr),
            Instruction::Random { x, kk } => write!(f, "RND V{:X}, 0x{:02x}", x, kk),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            Instruction::GetDelay { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::FontGlyph { x } => write!(f, "LD F, V{:X}", x),
            Instruction::StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::Store { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::Load { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
