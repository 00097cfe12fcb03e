// CHIP-8 emulator
//
// Useful links:
// * [Guide to making a CHIP-8 emulator](https://tobiasvl.github.io/blog/write-a-chip-8-emulator/)
// * [Cowgod's Chip-8 Technical Reference](http://devernay.free.fr/hacks/chip8/C8TECH10.HTM)
//

use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::display::{Display, SCREEN_HEIGHT};
use crate::error::Chip8Error;
use crate::instruction::Instruction;

pub const MEMORY_SIZE: usize = 0x1000;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
const ADDR_MASK: u16 = 0x0FFF;
const STACK_SIZE: usize = 16;
const FONT_SIZE: usize = 80;
const GLYPH_SIZE: u16 = 5;

pub static DEFAULT_FONT: [u8; FONT_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[derive(Debug, Default)]
pub struct Chip8Builder {
    /// ROM
    rom: Option<Vec<u8>>,
    /// Font sprite
    font: Option<Vec<u8>>,
    // PRNG Seed
    rng_seed: Option<u64>,
    /// Print every executed instruction
    debug: bool,
}

pub struct Chip8 {
    /// General purpose registers
    regs: [u8; 16],
    /// Index register
    index: u16,
    /// Program counter
    pc: u16,
    /// Call stack
    stack: [u16; STACK_SIZE],
    /// Stack pointer
    sp: u8,
    /// Delay Timer
    delay_timer: u8,
    /// Sound Timer
    sound_timer: u8,
    /// Memory
    memory: Vec<u8>,
    /// Display: 64x32 pixels 1 bit monochrome
    display: Display,
    /// Keypad state written by the host
    keypad: [bool; 16],
    /// Last fetched instruction word
    opcode: u16,
    /// Glyphs reloaded into 0x000 on reset
    font: [u8; FONT_SIZE],
    /// Print debug info
    debug: bool,
    /// PRNG Generator
    rng: StdRng,
}

impl Chip8Builder {
    pub fn new() -> Chip8Builder {
        Chip8Builder::default()
    }

    pub fn with_rom(mut self, rom: Vec<u8>) -> Self {
        self.rom = Some(rom);
        self
    }

    pub fn with_font(mut self, font: Vec<u8>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(&self) -> Result<Chip8, Chip8Error> {
        let font = match &self.font {
            Some(font) => <[u8; FONT_SIZE]>::try_from(&font[..])
                .map_err(|_| Chip8Error::InvalidFont { size: font.len() })?,
            None => DEFAULT_FONT,
        };

        // Pseudo random number generator
        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut chip = Chip8 {
            regs: [0u8; 16],
            index: 0,
            pc: PROGRAM_START,
            stack: [0u16; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            memory: vec![0u8; MEMORY_SIZE],
            display: Display::new(),
            keypad: [false; 16],
            opcode: 0,
            font,
            debug: self.debug,
            rng,
        };
        chip.reset();

        if let Some(rom) = &self.rom {
            chip.load_program(rom)?;
        }

        Ok(chip)
    }
}

impl Chip8 {
    /// Re-zeroes all machine state and reloads the font glyphs at 0x000.
    ///
    /// Program memory is wiped too; the host has to load the program again.
    pub fn reset(&mut self) {
        self.regs = [0u8; 16];
        self.index = 0;
        self.pc = PROGRAM_START;
        self.stack = [0u16; STACK_SIZE];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.keypad = [false; 16];
        self.opcode = 0;
        self.display.clear();

        self.memory.iter_mut().for_each(|b| *b = 0);
        self.memory[..FONT_SIZE].copy_from_slice(&self.font);
    }

    /// Copies program bytes into memory at 0x200.
    pub fn load_program(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        let start = PROGRAM_START as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// On error the machine is left untouched except for `opcode`, and `pc`
    /// keeps pointing at the instruction that faulted.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        let addr = self.pc;
        self.opcode = self.read_u16_be(addr);
        self.pc = addr.wrapping_add(2) & ADDR_MASK;

        let result = match Instruction::decode(self.opcode) {
            Some(inst) => {
                if self.debug {
                    println!("0x{:03x}: {:04x} {}", addr, self.opcode, inst);
                }
                self.execute(inst, addr)
            }
            None => Err(Chip8Error::UnknownOpcode {
                opcode: self.opcode,
                addr,
            }),
        };

        if result.is_err() {
            self.pc = addr;
        }
        result
    }

    /// Decrements both timers by one, stopping at zero.
    pub fn step_timer(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    fn execute(&mut self, inst: Instruction, addr: u16) -> Result<(), Chip8Error> {
        match inst {
            Instruction::Clear => self.display.clear(),
            Instruction::Return => {
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow { addr });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp as usize] & ADDR_MASK;
            }
            Instruction::Jump { addr } => self.pc = addr,
            Instruction::Call { addr: target } => {
                if self.sp as usize >= STACK_SIZE {
                    return Err(Chip8Error::StackOverflow { addr });
                }
                self.stack[self.sp as usize] = self.pc;
                self.sp += 1;
                self.pc = target;
            }
            Instruction::SkipEqImm { x, kk } => self.skip_if(self.reg(x) == kk),
            Instruction::SkipNeqImm { x, kk } => self.skip_if(self.reg(x) != kk),
            Instruction::SkipEqReg { x, y } => self.skip_if(self.reg(x) == self.reg(y)),
            Instruction::SetImm { x, kk } => self.regs[x as usize] = kk,
            Instruction::AddImm { x, kk } => {
                self.regs[x as usize] = self.reg(x).wrapping_add(kk);
            }
            Instruction::SetReg { x, y } => self.regs[x as usize] = self.reg(y),
            Instruction::Or { x, y } => {
                let vy = self.reg(y);
                self.regs[x as usize] |= vy;
            }
            Instruction::And { x, y } => {
                let vy = self.reg(y);
                self.regs[x as usize] &= vy;
            }
            Instruction::Xor { x, y } => {
                let vy = self.reg(y);
                self.regs[x as usize] ^= vy;
            }
            Instruction::AddReg { x, y } => {
                let (sum, carry) = self.reg(x).overflowing_add(self.reg(y));
                self.regs[x as usize] = sum;
                self.regs[0xF] = carry as u8;
            }
            Instruction::SubXY { x, y } => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.regs[x as usize] = vx.wrapping_sub(vy);
                self.regs[0xF] = (vx > vy) as u8;
            }
            Instruction::ShiftRight { x } => {
                let vx = self.reg(x);
                self.regs[x as usize] = vx >> 1;
                self.regs[0xF] = vx & 0x01;
            }
            Instruction::SubYX { x, y } => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.regs[x as usize] = vy.wrapping_sub(vx);
                self.regs[0xF] = (vy > vx) as u8;
            }
            Instruction::ShiftLeft { x } => {
                let vx = self.reg(x);
                self.regs[x as usize] = vx << 1;
                self.regs[0xF] = (vx >> 7) & 0x01;
            }
            Instruction::SkipNeqReg { x, y } => self.skip_if(self.reg(x) != self.reg(y)),
            Instruction::SetIndex { addr } => self.index = addr,
            Instruction::JumpOffset { addr } => {
                self.pc = addr.wrapping_add(self.regs[0] as u16) & ADDR_MASK;
            }
            Instruction::Random { x, kk } => {
                let n = self.rng.next_u32() as u8;
                self.regs[x as usize] = n & kk;
            }
            Instruction::Draw { x, y, n } => {
                // Origin where we start to draw
                let ox = self.reg(x);
                let mut row_y = self.reg(y) % SCREEN_HEIGHT as u8;

                let mut collision = false;
                for row in 0..n as u16 {
                    let data = self.read_u8(self.index.wrapping_add(row));
                    collision |= self.display.draw_byte(ox, row_y, data);
                    row_y = (row_y + 1) % SCREEN_HEIGHT as u8;
                }

                self.regs[0xF] = collision as u8;
            }
            Instruction::SkipKeyDown { x } => self.skip_if(self.key(self.reg(x))),
            Instruction::SkipKeyUp { x } => self.skip_if(!self.key(self.reg(x))),
            Instruction::GetDelay { x } => self.regs[x as usize] = self.delay_timer,
            Instruction::WaitKey { x } => {
                // Re-fetch this instruction on the next cycle until a key is down
                self.pc = self.pc.wrapping_sub(2) & ADDR_MASK;
                if let Some(key) = self.keypad.iter().position(|&pressed| pressed) {
                    self.regs[x as usize] = key as u8;
                    self.pc = self.pc.wrapping_add(2) & ADDR_MASK;
                }
            }
            Instruction::SetDelay { x } => self.delay_timer = self.reg(x),
            Instruction::SetSound { x } => self.sound_timer = self.reg(x),
            Instruction::AddIndex { x } => {
                self.index = self.index.wrapping_add(self.reg(x) as u16) & ADDR_MASK;
            }
            Instruction::FontGlyph { x } => {
                self.index = (self.reg(x) as u16 * GLYPH_SIZE) & ADDR_MASK;
            }
            Instruction::StoreBcd { x } => {
                let vx = self.reg(x);
                self.write_u8(self.index, vx / 100);
                self.write_u8(self.index.wrapping_add(1), (vx / 10) % 10);
                self.write_u8(self.index.wrapping_add(2), vx % 10);
            }
            Instruction::Store { x } => {
                for i in 0..=x {
                    self.write_u8(self.index.wrapping_add(i as u16), self.regs[i as usize]);
                }
            }
            Instruction::Load { x } => {
                for i in 0..=x {
                    self.regs[i as usize] = self.read_u8(self.index.wrapping_add(i as u16));
                }
            }
        }

        Ok(())
    }

    /// Writes the state of one keypad key; keys above 0xF wrap.
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keypad[(key & 0xF) as usize] = pressed;
    }

    pub fn keypad(&self) -> &[bool; 16] {
        &self.keypad
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Mutable access for renderers acknowledging a frame via `clear_dirty`.
    pub fn display_mut(&mut self) -> &mut Display {
        &mut self.display
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory[..]
    }

    pub fn regs(&self) -> &[u8; 16] {
        &self.regs
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Return addresses currently on the call stack, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Whether the host should be playing its tone.
    pub fn sound_active(&self) -> bool {
        self.sound_timer != 0
    }

    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    fn reg(&self, x: u8) -> u8 {
        self.regs[x as usize]
    }

    fn key(&self, key: u8) -> bool {
        self.keypad[(key & 0xF) as usize]
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.pc = self.pc.wrapping_add(2) & ADDR_MASK;
        }
    }

    fn read_u8(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    fn read_u16_be(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    fn write_u8(&mut self, addr: u16, data: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = data;
    }
}
