use std::path::Path;

use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{Config, KeyWait},
    display::Display,
    error::{Error, Result},
    instruction::{decode, Instruction},
    keyboard::Keyboard,
    memory::{Memory, ADDRESS_MASK, FONT_GLYPH_SIZE},
    registers::Registers,
};

/// The whole machine: registers, memory, screen and keypad, plus the random
/// source for `RND`. All mutation goes through [`Interpreter::step`],
/// [`Interpreter::tick_timers`] and [`Interpreter::set_key`]; callers must
/// serialize those calls.
#[derive(Debug)]
pub struct Interpreter {
    registers: Registers,
    memory: Memory,
    display: Display,
    keyboard: Keyboard,
    rng: ChaCha8Rng,
    config: Config,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        debug!("Seeding RND with {}", seed);

        Interpreter {
            registers: Registers::new(),
            memory: Memory::new(),
            display: Display::new(),
            keyboard: Keyboard::new(config.keymap),
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        }
    }

    /// A freshly reset machine with `bytes` loaded at 0x200.
    pub fn with_rom(bytes: &[u8], config: Config) -> Result<Self> {
        let mut interpreter = Interpreter::new(config);
        interpreter.load_rom(bytes)?;
        Ok(interpreter)
    }

    /// Zeroes registers, timers, stack, screen and keypad, reinstalls the font
    /// and points PC at 0x200. Any loaded program is wiped as well.
    pub fn reset(&mut self) {
        self.registers = Registers::new();
        self.memory.reset();
        self.display.clear();
        self.keyboard.clear();
        info!("Machine reset");
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        self.memory.load_rom(bytes)?;
        info!("Loaded ROM [size: {}]", bytes.len());
        Ok(())
    }

    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::RomNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_rom(&bytes)
    }

    /// Fetches, decodes and executes a single instruction.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.registers.pc & ADDRESS_MASK;
        let opcode = self.memory.read_word(pc);
        let instruction = decode(opcode);

        trace!("{:#05X}: {:#06X} {:?}", pc, opcode, instruction);

        self.registers.pc = pc.wrapping_add(2) & ADDRESS_MASK;

        // A failed instruction leaves PC on itself.
        let result = self.execute(instruction);
        if result.is_err() {
            self.registers.pc = pc;
        }

        result
    }

    /// Decrements both timers, stopping at zero. Returns `true` while the sound
    /// timer is still running.
    pub fn tick_timers(&mut self) -> bool {
        self.registers.tick_timers();
        self.sound_active()
    }

    /// One display frame: a timer tick followed by `cycles` steps. Stops at
    /// the first failing instruction.
    pub fn run_frame(&mut self, cycles: usize) -> Result<()> {
        self.tick_timers();

        for _ in 0..cycles {
            self.step()?;
        }

        Ok(())
    }

    /// Forwards an input-device key event through the keymap.
    pub fn set_key(&mut self, code: u32, pressed: bool) {
        self.keyboard.set_physical_key(code, pressed);
    }

    pub fn sound_active(&self) -> bool {
        self.registers.sound > 0
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    fn execute(&mut self, instruction: Instruction) -> Result<()> {
        use Instruction::*;

        let x = |r: u8| r as usize;

        match instruction {
            Clear => self.handle_clear(),
            Return => self.handle_ret()?,
            Jump(nnn) => self.handle_jump(nnn),
            Call(nnn) => self.handle_call(nnn)?,
            SkipIfEqualImmediate(vx, kk) => self.handle_skip_if_equal_immediate(x(vx), kk),
            SkipIfNotEqualImmediate(vx, kk) => self.handle_skip_if_not_equal_immediate(x(vx), kk),
            SkipIfEqualRegister(vx, vy) => self.handle_skip_if_equal_register(x(vx), x(vy)),
            LoadRegisterImmediate(vx, kk) => self.handle_load_register_immediate(x(vx), kk),
            AddRegisterImmediate(vx, kk) => self.handle_add_register_immediate(x(vx), kk),
            LoadRegisterRegister(vx, vy) => self.handle_load_register_register(x(vx), x(vy)),
            Or(vx, vy) => self.handle_or_register_register(x(vx), x(vy)),
            And(vx, vy) => self.handle_and_register_register(x(vx), x(vy)),
            Xor(vx, vy) => self.handle_xor_register_register(x(vx), x(vy)),
            AddRegisterRegister(vx, vy) => self.handle_add_register_register(x(vx), x(vy)),
            Sub(vx, vy) => self.handle_sub_register_register(x(vx), x(vy)),
            ShiftRight(vx) => self.handle_shift_right_register_one(x(vx)),
            SubNegated(vx, vy) => self.handle_sub_register_register_negated(x(vx), x(vy)),
            ShiftLeft(vx) => self.handle_shift_left_register_one(x(vx)),
            SkipIfNotEqualRegister(vx, vy) => self.handle_skip_if_not_equal_register(x(vx), x(vy)),
            LoadIndex(nnn) => self.handle_load_immediate(nnn),
            JumpOffset(nnn) => self.handle_jump_offset(nnn),
            Random(vx, kk) => self.handle_random(x(vx), kk),
            Draw(vx, vy, n) => self.handle_draw_sprite(x(vx), x(vy), n),
            SkipIfPressed(vx) => self.handle_skip_if_pressed(x(vx)),
            SkipIfNotPressed(vx) => self.handle_skip_if_not_pressed(x(vx)),
            LoadFromDelayTimer(vx) => self.handle_load_from_delay_timer(x(vx)),
            WaitForKey(vx) => self.handle_wait_for_key(x(vx)),
            SetDelayTimer(vx) => self.handle_set_delay_timer(x(vx)),
            SetSoundTimer(vx) => self.handle_set_sound_timer(x(vx)),
            AddIndex(vx) => self.handle_add_index(x(vx)),
            LoadFontSprite(vx) => self.handle_load_font_sprite(x(vx)),
            StoreBcd(vx) => self.handle_store_bcd(x(vx)),
            StoreRegisters(vx) => self.handle_store_registers(x(vx)),
            LoadRegisters(vx) => self.handle_load_registers(x(vx)),
            Unknown(opcode) => {
                let at = self.registers.pc.wrapping_sub(2) & ADDRESS_MASK;
                warn!("Unknown instruction {:#06X} at {:#05X}", opcode, at);
            }
        }

        Ok(())
    }

    fn skip(&mut self) {
        self.registers.pc = self.registers.pc.wrapping_add(2) & ADDRESS_MASK;
    }

    /// Writes the flag first and the result second, so `x == 0xF` keeps the result.
    fn set_with_flag(&mut self, x: usize, result: u8, flag: bool) {
        self.registers.vx[0xF] = u8::from(flag);
        self.registers.vx[x] = result;
    }

    /// 00E0 - CLS
    /// Clear the display.
    fn handle_clear(&mut self) {
        self.display.clear();
    }

    /// 00EE - RET
    /// Return from a subroutine.
    ///
    /// The interpreter subtracts 1 from the stack pointer, then sets the program counter to the address at the top of the stack.
    fn handle_ret(&mut self) -> Result<()> {
        self.registers.pop()
    }

    /// 1nnn - JP addr
    /// Jump to location nnn.
    ///
    /// The interpreter sets the program counter to nnn.
    fn handle_jump(&mut self, n: u16) {
        self.registers.pc = n;
    }

    /// 2nnn - CALL addr
    /// Call subroutine at nnn.
    ///
    /// The interpreter puts the current PC on the top of the stack, then increments the stack pointer. The PC is then set to nnn.
    fn handle_call(&mut self, n: u16) -> Result<()> {
        self.registers.push(n)
    }

    /// 3xkk - SE Vx, byte
    /// Skip next instruction if Vx = kk.
    fn handle_skip_if_equal_immediate(&mut self, x: usize, k: u8) {
        if self.registers.vx[x] == k {
            self.skip();
        }
    }

    /// 4xkk - SNE Vx, byte
    /// Skip next instruction if Vx != kk.
    fn handle_skip_if_not_equal_immediate(&mut self, x: usize, k: u8) {
        if self.registers.vx[x] != k {
            self.skip();
        }
    }

    /// 5xy0 - SE Vx, Vy
    /// Skip next instruction if Vx = Vy.
    fn handle_skip_if_equal_register(&mut self, x: usize, y: usize) {
        if self.registers.vx[x] == self.registers.vx[y] {
            self.skip();
        }
    }

    /// 6xkk - LD Vx, byte
    /// Set Vx = kk.
    fn handle_load_register_immediate(&mut self, x: usize, k: u8) {
        self.registers.vx[x] = k;
    }

    /// 7xkk - ADD Vx, byte
    /// Set Vx = Vx + kk. VF is not touched.
    fn handle_add_register_immediate(&mut self, x: usize, k: u8) {
        self.registers.vx[x] = self.registers.vx[x].wrapping_add(k);
    }

    /// 8xy0 - LD Vx, Vy
    /// Set Vx = Vy.
    fn handle_load_register_register(&mut self, x: usize, y: usize) {
        self.registers.vx[x] = self.registers.vx[y];
    }

    /// 8xy1 - OR Vx, Vy
    fn handle_or_register_register(&mut self, x: usize, y: usize) {
        self.registers.vx[x] |= self.registers.vx[y];
    }

    /// 8xy2 - AND Vx, Vy
    fn handle_and_register_register(&mut self, x: usize, y: usize) {
        self.registers.vx[x] &= self.registers.vx[y];
    }

    /// 8xy3 - XOR Vx, Vy
    fn handle_xor_register_register(&mut self, x: usize, y: usize) {
        self.registers.vx[x] ^= self.registers.vx[y];
    }

    /// 8xy4 - ADD Vx, Vy
    /// Set Vx = Vx + Vy, set VF = carry.
    ///
    /// The values of Vx and Vy are added together. If the result is greater than 8 bits
    /// (i.e., > 255,) VF is set to 1, otherwise 0. Only the lowest 8 bits of the result are kept, and stored in Vx.
    fn handle_add_register_register(&mut self, x: usize, y: usize) {
        let a = self.registers.vx[x];
        let b = self.registers.vx[y];

        let (result, overflow) = a.overflowing_add(b);
        self.set_with_flag(x, result, overflow);
    }

    /// 8xy5 - SUB Vx, Vy
    /// Set Vx = Vx - Vy, set VF = NOT borrow.
    ///
    /// If Vx > Vy, then VF is set to 1, otherwise 0. Then Vy is subtracted from Vx, and the results stored in Vx.
    fn handle_sub_register_register(&mut self, x: usize, y: usize) {
        let a = self.registers.vx[x];
        let b = self.registers.vx[y];

        self.set_with_flag(x, a.wrapping_sub(b), a > b);
    }

    /// 8xy6 - SHR Vx {, Vy}
    /// Set Vx = Vx SHR 1.
    ///
    /// If the least-significant bit of Vx is 1, then VF is set to 1, otherwise 0. Then Vx is divided by 2.
    fn handle_shift_right_register_one(&mut self, x: usize) {
        let a = self.registers.vx[x];

        self.set_with_flag(x, a >> 1, a & 1 == 1);
    }

    /// 8xy7 - SUBN Vx, Vy
    /// Set Vx = Vy - Vx, set VF = NOT borrow.
    ///
    /// If Vy > Vx, then VF is set to 1, otherwise 0. Then Vx is subtracted from Vy, and the results stored in Vx.
    fn handle_sub_register_register_negated(&mut self, x: usize, y: usize) {
        let a = self.registers.vx[x];
        let b = self.registers.vx[y];

        self.set_with_flag(x, b.wrapping_sub(a), b > a);
    }

    /// 8xyE - SHL Vx {, Vy}
    /// Set Vx = Vx SHL 1.
    ///
    /// If the most-significant bit of Vx is 1, then VF is set to 1, otherwise to 0. Then Vx is multiplied by 2.
    fn handle_shift_left_register_one(&mut self, x: usize) {
        let a = self.registers.vx[x];

        self.set_with_flag(x, a << 1, a & 0b1000_0000 != 0);
    }

    /// 9xy0 - SNE Vx, Vy
    /// Skip next instruction if Vx != Vy.
    fn handle_skip_if_not_equal_register(&mut self, x: usize, y: usize) {
        if self.registers.vx[x] != self.registers.vx[y] {
            self.skip();
        }
    }

    /// Annn - LD I, addr
    /// Set I = nnn.
    fn handle_load_immediate(&mut self, n: u16) {
        self.registers.i = n;
    }

    /// Bnnn - JP V0, addr
    /// Jump to location nnn + V0.
    fn handle_jump_offset(&mut self, n: u16) {
        self.registers.pc = (n + self.registers.vx[0] as u16) & ADDRESS_MASK;
    }

    /// Cxkk - RND Vx, byte
    /// Set Vx = random byte AND kk.
    fn handle_random(&mut self, x: usize, k: u8) {
        let byte: u8 = self.rng.gen();
        self.registers.vx[x] = byte & k;
    }

    /// Dxyn - DRW Vx, Vy, nibble
    /// Display n-byte sprite starting at memory location I at (Vx, Vy), set VF = collision.
    ///
    /// The interpreter reads n bytes from memory, starting at the address stored in I. These bytes
    /// are then displayed as sprites on screen at coordinates (Vx, Vy). Sprites are XORed onto the
    /// existing screen. If this causes any pixels to be erased, VF is set to 1, otherwise it is set
    /// to 0. If the sprite is positioned so part of it is outside the coordinates of the display, it
    /// wraps around to the opposite side of the screen.
    fn handle_draw_sprite(&mut self, x: usize, y: usize, n: u8) {
        let origin_col: usize = self.registers.vx[x].into();
        let origin_row: usize = self.registers.vx[y].into();

        self.registers.vx[0xF] = 0;

        for offset in 0..n {
            let sprite = self.memory.read(self.registers.i.wrapping_add(offset.into()));

            for bit in 0..8 {
                if sprite & (0b1000_0000 >> bit) == 0 {
                    continue;
                }

                if self.display.xor_pixel(origin_col + bit, origin_row + offset as usize) {
                    self.registers.vx[0xF] = 1;
                }
            }
        }
    }

    /// Ex9E - SKP Vx
    /// Skip next instruction if key with the value of Vx is pressed.
    fn handle_skip_if_pressed(&mut self, x: usize) {
        if self.keyboard.is_pressed(self.registers.vx[x]) {
            self.skip();
        }
    }

    /// ExA1 - SKNP Vx
    /// Skip next instruction if key with the value of Vx is not pressed.
    fn handle_skip_if_not_pressed(&mut self, x: usize) {
        if !self.keyboard.is_pressed(self.registers.vx[x]) {
            self.skip();
        }
    }

    /// Fx07 - LD Vx, DT
    fn handle_load_from_delay_timer(&mut self, x: usize) {
        self.registers.vx[x] = self.registers.delay;
    }

    /// Fx0A - LD Vx, K
    /// Wait for a key press, store the value of the key in Vx.
    ///
    /// Scans all 16 keys, including F, and stores the lowest-numbered one held down.
    /// With nothing pressed, [`KeyWait::Poll`]
    /// moves on and [`KeyWait::Block`] rewinds PC so the instruction runs again next step.
    fn handle_wait_for_key(&mut self, x: usize) {
        match self.keyboard.first_pressed() {
            Some(key) => self.registers.vx[x] = key,
            None if self.config.key_wait == KeyWait::Block => {
                trace!("Waiting for key [{}]", self.keyboard);
                self.registers.pc = self.registers.pc.wrapping_sub(2) & ADDRESS_MASK;
            }
            None => {}
        }
    }

    /// Fx15 - LD DT, Vx
    fn handle_set_delay_timer(&mut self, x: usize) {
        self.registers.delay = self.registers.vx[x];
    }

    /// Fx18 - LD ST, Vx
    fn handle_set_sound_timer(&mut self, x: usize) {
        self.registers.sound = self.registers.vx[x];
    }

    /// Fx1E - ADD I, Vx
    /// Set I = I + Vx. VF is not touched.
    fn handle_add_index(&mut self, x: usize) {
        self.registers.i = self.registers.i.wrapping_add(self.registers.vx[x].into());
    }

    /// Fx29 - LD F, Vx
    /// Set I = location of sprite for digit Vx.
    fn handle_load_font_sprite(&mut self, x: usize) {
        self.registers.i = self.registers.vx[x] as u16 * FONT_GLYPH_SIZE;
    }

    /// Fx33 - LD B, Vx
    /// Store BCD representation of Vx in memory locations I, I+1, and I+2.
    fn handle_store_bcd(&mut self, x: usize) {
        let value = self.registers.vx[x];
        let i = self.registers.i;

        self.memory.write(i, value / 100);
        self.memory.write(i.wrapping_add(1), (value / 10) % 10);
        self.memory.write(i.wrapping_add(2), value % 10);
    }

    /// Number of registers moved by Fx55/Fx65.
    fn transfer_count(&self, x: usize) -> usize {
        if self.config.inclusive_register_transfer {
            x + 1
        } else {
            x
        }
    }

    /// Fx55 - LD [I], Vx
    /// Store registers starting at V0 in memory starting at location I. I is left
    /// pointing past the last byte written.
    fn handle_store_registers(&mut self, x: usize) {
        for idx in 0..self.transfer_count(x) {
            self.memory.write(self.registers.i, self.registers.vx[idx]);
            self.registers.i = self.registers.i.wrapping_add(1);
        }
    }

    /// Fx65 - LD Vx, [I]
    /// Read registers starting at V0 from memory starting at location I. I is left
    /// pointing past the last byte read.
    fn handle_load_registers(&mut self, x: usize) {
        for idx in 0..self.transfer_count(x) {
            self.registers.vx[idx] = self.memory.read(self.registers.i);
            self.registers.i = self.registers.i.wrapping_add(1);
        }
    }
}
