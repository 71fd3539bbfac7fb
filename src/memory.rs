use log::debug;

use crate::error::{Error, Result};

pub const MEMORY_SIZE: usize = 4096;
pub const START_ROM: usize = 0x200;
const ROM_SIZE: usize = MEMORY_SIZE - START_ROM;

/// Addresses produced by instructions are 12 bits wide.
pub(crate) const ADDRESS_MASK: u16 = 0x0FFF;

/// Bytes per glyph in the built-in font.
pub(crate) const FONT_GLYPH_SIZE: u16 = 5;

const FONT_DATA: &'static [u8] = &[
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

/// 4KB of RAM, from location 0x000 to 0xFFF. The font lives at the bottom,
/// programs start at 0x200.
///
/// Every access goes through the 12-bit address mask, so reads and writes past
/// 0xFFF wrap around to the start of memory.
#[derive(Debug)]
pub(crate) struct Memory(pub [u8; MEMORY_SIZE]);

impl Memory {
    pub fn new() -> Self {
        let mut memory = Memory([0; MEMORY_SIZE]);
        memory.reset();
        memory
    }

    /// Zeroes memory and reinstalls the font.
    pub fn reset(&mut self) {
        self.0.fill(0);
        self.0[0..FONT_DATA.len()].copy_from_slice(FONT_DATA);
    }

    /// Copies `bytes` to 0x200 onwards. Memory is left untouched when the
    /// image does not fit.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        let rom_size = bytes.len();
        if rom_size > ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom_size,
                max: ROM_SIZE,
            });
        }

        self.0[START_ROM..START_ROM + rom_size].copy_from_slice(bytes);
        debug!("Copied {} bytes to {:#05X}", rom_size, START_ROM);

        Ok(())
    }

    pub fn read(&self, address: u16) -> u8 {
        self.0[(address & ADDRESS_MASK) as usize]
    }

    pub fn write(&mut self, address: u16, value: u8) {
        self.0[(address & ADDRESS_MASK) as usize] = value;
    }

    /// Big-endian 16 bit word at `address`; the second byte wraps independently.
    pub fn read_word(&self, address: u16) -> u16 {
        u16::from_be_bytes([self.read(address), self.read(address.wrapping_add(1))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_matches, assert_ok};
    use fake::{Dummy, Fake, Faker};
    use quickcheck_macros::quickcheck;
    use rand::{rngs::StdRng, SeedableRng};

    #[derive(Debug, Clone, Dummy)]
    struct RomFixture {
        #[dummy(faker = "(Faker, 1..3584)")]
        bytes: Vec<u8>,
    }

    impl quickcheck::Arbitrary for RomFixture {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));

            Faker.fake_with_rng(&mut rng)
        }
    }

    #[quickcheck]
    fn test_load_rom(rom: RomFixture) {
        let num_bytes = rom.bytes.len();

        let mut memory = Memory::new();
        assert_ok!(memory.load_rom(&rom.bytes));

        assert_eq!(memory.0[START_ROM..START_ROM + num_bytes], rom.bytes);
        assert_eq!(memory.0[0..FONT_DATA.len()], *FONT_DATA);
    }

    #[test]
    fn test_load_rom_fills_memory_exactly() {
        let mut memory = Memory::new();
        let rom = vec![0xAB; ROM_SIZE];

        assert_ok!(memory.load_rom(&rom));

        assert_eq!(memory.0[MEMORY_SIZE - 1], 0xAB);
    }

    #[test]
    fn test_load_rom_too_large_leaves_memory_unmodified() {
        let mut memory = Memory::new();
        let rom = vec![0xAB; ROM_SIZE + 1];

        let result = memory.load_rom(&rom);

        assert_matches!(
            result,
            Err(Error::RomTooLarge {
                size: 3585,
                max: 3584
            })
        );
        assert!(memory.0[START_ROM..].iter().all(|b| *b == 0));
        assert_err!(Memory::new().load_rom(&vec![0; 5000]));
    }

    #[test]
    fn test_reset_restores_font() {
        let mut memory = Memory::new();
        memory.0.fill(0xFF);

        memory.reset();

        assert_eq!(memory.0[0..FONT_DATA.len()], *FONT_DATA);
        assert!(memory.0[FONT_DATA.len()..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_access_wraps_to_12_bits() {
        let mut memory = Memory::new();

        memory.write(0x1234, 0x42);

        assert_eq!(memory.0[0x234], 0x42);
        assert_eq!(memory.read(0xF234), 0x42);
    }

    #[test]
    fn test_read_word_wraps() {
        let mut memory = Memory::new();
        memory.write(0xFFF, 0x12);
        memory.write(0x000, 0x34);

        assert_eq!(memory.read_word(0xFFF), 0x1234);
    }
}
