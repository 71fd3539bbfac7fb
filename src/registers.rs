use crate::error::{Error, Result};
use crate::memory::START_ROM;

const STACK_DEPTH: usize = 16;

#[derive(Debug)]
pub(crate) struct Registers {
    /// Chip-8 has 16 general purpose 8-bit registers, usually referred to as Vx, where x is a hexadecimal digit (0 through F).
    /// The VF register should not be used by any program, as it is used as a flag by some instructions.
    pub vx: [u8; 16],

    /// Only the lowest 12 bits are used for addressing.
    pub i: u16,
    /// The program counter (PC) should be 16-bit, and is used to store the currently executing address.
    pub pc: u16,
    /// The stack pointer (SP) can be 8-bit, it is used to point to the topmost level of the stack.
    pub sp: u8,

    pub delay: u8,
    pub sound: u8,

    /// The stack is an array of 16 16-bit values, used to store the address that the interpreter should return to when finished with a subroutine. Chip-8 allows for up to 16 levels of nested subroutines.
    pub stack: [u16; STACK_DEPTH],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            vx: [0; 16],
            i: 0,
            pc: START_ROM as u16,
            sp: 0,
            delay: 0,
            sound: 0,
            stack: [0; STACK_DEPTH],
        }
    }

    /// Saves the current PC and jumps to `addr`.
    pub fn push(&mut self, addr: u16) -> Result<()> {
        let sp = self.sp as usize;
        if sp >= STACK_DEPTH {
            return Err(Error::StackOverflow { pc: self.pc });
        }

        self.stack[sp] = self.pc;
        self.sp += 1;
        self.pc = addr;

        Ok(())
    }

    /// Returns to the address on top of the stack.
    pub fn pop(&mut self) -> Result<()> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow { pc: self.pc });
        }

        self.sp -= 1;
        self.pc = self.stack[self.sp as usize];

        Ok(())
    }

    /// Counts both timers down by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_matches, assert_ok};

    #[test]
    fn test_push_pop() {
        let mut registers = Registers::new();
        registers.pc = 0x202;

        assert_ok!(registers.push(0x300));
        assert_eq!(registers.sp, 1);
        assert_eq!(registers.pc, 0x300);
        assert_eq!(registers.stack[0], 0x202);

        assert_ok!(registers.pop());
        assert_eq!(registers.sp, 0);
        assert_eq!(registers.pc, 0x202);
    }

    #[test]
    fn test_push_overflow() {
        let mut registers = Registers::new();

        for _ in 0..STACK_DEPTH {
            assert_ok!(registers.push(0x200));
        }

        assert_matches!(registers.push(0x200), Err(Error::StackOverflow { pc: 0x200 }));
        assert_eq!(registers.sp as usize, STACK_DEPTH);
    }

    #[test]
    fn test_pop_underflow() {
        let mut registers = Registers::new();

        assert_matches!(registers.pop(), Err(Error::StackUnderflow { pc: 0x200 }));
        assert_eq!(registers.sp, 0);
        assert_eq!(registers.pc, 0x200);
    }

    #[test]
    fn test_tick_timers_saturates() {
        let mut registers = Registers::new();
        registers.delay = 2;
        registers.sound = 1;

        registers.tick_timers();
        assert_eq!((registers.delay, registers.sound), (1, 0));

        registers.tick_timers();
        registers.tick_timers();
        assert_eq!((registers.delay, registers.sound), (0, 0));
    }
}
