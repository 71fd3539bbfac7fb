//! Decoding of raw 16 bit opcodes into [`Instruction`]s.
//!
//! Decoding is pure bit masking; executing the result is the interpreter's job.

/// A decoded Chip-8 instruction. `x`/`y` are register indices, `kk` an
/// immediate byte, `nnn` a 12 bit address and `n` a 4 bit nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 - CLS
    Clear,
    /// 00EE - RET
    Return,
    /// 1nnn - JP addr
    Jump(u16),
    /// 2nnn - CALL addr
    Call(u16),
    /// 3xkk - SE Vx, byte
    SkipIfEqualImmediate(u8, u8),
    /// 4xkk - SNE Vx, byte
    SkipIfNotEqualImmediate(u8, u8),
    /// 5xy0 - SE Vx, Vy
    SkipIfEqualRegister(u8, u8),
    /// 6xkk - LD Vx, byte
    LoadRegisterImmediate(u8, u8),
    /// 7xkk - ADD Vx, byte
    AddRegisterImmediate(u8, u8),
    /// 8xy0 - LD Vx, Vy
    LoadRegisterRegister(u8, u8),
    /// 8xy1 - OR Vx, Vy
    Or(u8, u8),
    /// 8xy2 - AND Vx, Vy
    And(u8, u8),
    /// 8xy3 - XOR Vx, Vy
    Xor(u8, u8),
    /// 8xy4 - ADD Vx, Vy
    AddRegisterRegister(u8, u8),
    /// 8xy5 - SUB Vx, Vy
    Sub(u8, u8),
    /// 8xy6 - SHR Vx {, Vy}
    ShiftRight(u8),
    /// 8xy7 - SUBN Vx, Vy
    SubNegated(u8, u8),
    /// 8xyE - SHL Vx {, Vy}
    ShiftLeft(u8),
    /// 9xy0 - SNE Vx, Vy
    SkipIfNotEqualRegister(u8, u8),
    /// Annn - LD I, addr
    LoadIndex(u16),
    /// Bnnn - JP V0, addr
    JumpOffset(u16),
    /// Cxkk - RND Vx, byte
    Random(u8, u8),
    /// Dxyn - DRW Vx, Vy, nibble
    Draw(u8, u8, u8),
    /// Ex9E - SKP Vx
    SkipIfPressed(u8),
    /// ExA1 - SKNP Vx
    SkipIfNotPressed(u8),
    /// Fx07 - LD Vx, DT
    LoadFromDelayTimer(u8),
    /// Fx0A - LD Vx, K
    WaitForKey(u8),
    /// Fx15 - LD DT, Vx
    SetDelayTimer(u8),
    /// Fx18 - LD ST, Vx
    SetSoundTimer(u8),
    /// Fx1E - ADD I, Vx
    AddIndex(u8),
    /// Fx29 - LD F, Vx
    LoadFontSprite(u8),
    /// Fx33 - LD B, Vx
    StoreBcd(u8),
    /// Fx55 - LD [I], Vx
    StoreRegisters(u8),
    /// Fx65 - LD Vx, [I]
    LoadRegisters(u8),
    /// Anything else. Executes as a no-op.
    Unknown(u16),
}

/// The operand fields of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    /// `[t___]`
    pub kind: u8,
    /// `[_x__]`
    pub x: u8,
    /// `[__y_]`
    pub y: u8,
    /// `[___n]`
    pub n: u8,
    /// `[__kk]`
    pub kk: u8,
    /// `[_nnn]`
    pub nnn: u16,
}

impl From<u16> for Fields {
    fn from(opcode: u16) -> Self {
        Fields {
            kind: ((opcode & 0xF000) >> 12) as u8,
            x: ((opcode & 0x0F00) >> 8) as u8,
            y: ((opcode & 0x00F0) >> 4) as u8,
            n: (opcode & 0x000F) as u8,
            kk: (opcode & 0x00FF) as u8,
            nnn: opcode & 0x0FFF,
        }
    }
}

/// Decodes a big-endian opcode. Never fails: unassigned encodings become
/// [`Instruction::Unknown`].
pub fn decode(opcode: u16) -> Instruction {
    use Instruction::*;

    let Fields {
        kind,
        x,
        y,
        n,
        kk,
        nnn,
    } = Fields::from(opcode);

    match kind {
        0x0 => match nnn {
            0x0E0 => Clear,
            0x0EE => Return,
            _ => Unknown(opcode),
        },
        0x1 => Jump(nnn),
        0x2 => Call(nnn),
        0x3 => SkipIfEqualImmediate(x, kk),
        0x4 => SkipIfNotEqualImmediate(x, kk),
        0x5 => SkipIfEqualRegister(x, y),
        0x6 => LoadRegisterImmediate(x, kk),
        0x7 => AddRegisterImmediate(x, kk),
        0x8 => match n {
            0x0 => LoadRegisterRegister(x, y),
            0x1 => Or(x, y),
            0x2 => And(x, y),
            0x3 => Xor(x, y),
            0x4 => AddRegisterRegister(x, y),
            0x5 => Sub(x, y),
            0x6 => ShiftRight(x),
            0x7 => SubNegated(x, y),
            0xE => ShiftLeft(x),
            _ => Unknown(opcode),
        },
        0x9 => SkipIfNotEqualRegister(x, y),
        0xA => LoadIndex(nnn),
        0xB => JumpOffset(nnn),
        0xC => Random(x, kk),
        0xD => Draw(x, y, n),
        0xE => match kk {
            0x9E => SkipIfPressed(x),
            0xA1 => SkipIfNotPressed(x),
            _ => Unknown(opcode),
        },
        0xF => match kk {
            0x07 => LoadFromDelayTimer(x),
            0x0A => WaitForKey(x),
            0x15 => SetDelayTimer(x),
            0x18 => SetSoundTimer(x),
            0x1E => AddIndex(x),
            0x29 => LoadFontSprite(x),
            0x33 => StoreBcd(x),
            0x55 => StoreRegisters(x),
            0x65 => LoadRegisters(x),
            _ => Unknown(opcode),
        },
        _ => Unknown(opcode),
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;
    use quickcheck_macros::quickcheck;
    use test_case::test_case;

    #[test]
    fn test_fields() {
        let fields = Fields::from(0xABCD);

        assert_eq!(fields.kind, 0xA);
        assert_eq!(fields.x, 0xB);
        assert_eq!(fields.y, 0xC);
        assert_eq!(fields.n, 0xD);
        assert_eq!(fields.kk, 0xCD);
        assert_eq!(fields.nnn, 0xBCD);
    }

    #[test_case(0x00E0, Clear; "CLS")]
    #[test_case(0x00EE, Return; "RET")]
    #[test_case(0x1789, Jump(0x789); "JP addr")]
    #[test_case(0x2123, Call(0x123); "CALL addr")]
    #[test_case(0x3A42, SkipIfEqualImmediate(0xA, 0x42); "SE Vx, byte")]
    #[test_case(0x4B13, SkipIfNotEqualImmediate(0xB, 0x13); "SNE Vx, byte")]
    #[test_case(0x5120, SkipIfEqualRegister(0x1, 0x2); "SE Vx, Vy")]
    #[test_case(0x5127, SkipIfEqualRegister(0x1, 0x2); "SE Vx, Vy ignores low nibble")]
    #[test_case(0x6C23, LoadRegisterImmediate(0xC, 0x23); "LD Vx, byte")]
    #[test_case(0x7310, AddRegisterImmediate(0x3, 0x10); "ADD Vx, byte")]
    #[test_case(0x8AC0, LoadRegisterRegister(0xA, 0xC); "LD Vx, Vy")]
    #[test_case(0x8BD1, Or(0xB, 0xD); "OR")]
    #[test_case(0x8E12, And(0xE, 0x1); "AND")]
    #[test_case(0x8973, Xor(0x9, 0x7); "XOR")]
    #[test_case(0x8234, AddRegisterRegister(0x2, 0x3); "ADD Vx, Vy")]
    #[test_case(0x8235, Sub(0x2, 0x3); "SUB")]
    #[test_case(0x8236, ShiftRight(0x2); "SHR")]
    #[test_case(0x8237, SubNegated(0x2, 0x3); "SUBN")]
    #[test_case(0x823E, ShiftLeft(0x2); "SHL")]
    #[test_case(0x9560, SkipIfNotEqualRegister(0x5, 0x6); "SNE Vx, Vy")]
    #[test_case(0xA678, LoadIndex(0x678); "LD I, addr")]
    #[test_case(0xB300, JumpOffset(0x300); "JP V0, addr")]
    #[test_case(0xC40F, Random(0x4, 0x0F); "RND")]
    #[test_case(0xD125, Draw(0x1, 0x2, 0x5); "DRW")]
    #[test_case(0xE59E, SkipIfPressed(0x5); "SKP")]
    #[test_case(0xE5A1, SkipIfNotPressed(0x5); "SKNP")]
    #[test_case(0xF307, LoadFromDelayTimer(0x3); "LD Vx, DT")]
    #[test_case(0xF30A, WaitForKey(0x3); "LD Vx, K")]
    #[test_case(0xF315, SetDelayTimer(0x3); "LD DT, Vx")]
    #[test_case(0xF318, SetSoundTimer(0x3); "LD ST, Vx")]
    #[test_case(0xF31E, AddIndex(0x3); "ADD I, Vx")]
    #[test_case(0xF329, LoadFontSprite(0x3); "LD F, Vx")]
    #[test_case(0xF333, StoreBcd(0x3); "LD B, Vx")]
    #[test_case(0xF355, StoreRegisters(0x3); "LD [I], Vx")]
    #[test_case(0xF365, LoadRegisters(0x3); "LD Vx, [I]")]
    fn test_decode(opcode: u16, instruction: Instruction) {
        assert_eq!(decode(opcode), instruction);
    }

    #[test_case(0x0000; "SYS 000")]
    #[test_case(0x0123; "SYS addr")]
    #[test_case(0x8008; "8xy8")]
    #[test_case(0x800F; "8xyF")]
    #[test_case(0xE000; "Ex00")]
    #[test_case(0xE007; "Ex07 does not fall through to Fx07")]
    #[test_case(0xF000; "Fx00")]
    #[test_case(0xFFFF; "FFFF")]
    fn test_decode_unknown(opcode: u16) {
        assert_eq!(decode(opcode), Unknown(opcode));
    }

    #[quickcheck]
    fn test_jump_targets_are_12_bit(opcode: u16) -> bool {
        match decode(opcode) {
            Jump(nnn) | Call(nnn) | LoadIndex(nnn) | JumpOffset(nnn) => nnn <= 0x0FFF,
            _ => true,
        }
    }

    #[quickcheck]
    fn test_register_operands_are_nibbles(opcode: u16) -> bool {
        match decode(opcode) {
            SkipIfEqualRegister(x, y)
            | SkipIfNotEqualRegister(x, y)
            | LoadRegisterRegister(x, y)
            | Or(x, y)
            | And(x, y)
            | Xor(x, y)
            | AddRegisterRegister(x, y)
            | Sub(x, y)
            | SubNegated(x, y) => x < 16 && y < 16,
            Draw(x, y, n) => x < 16 && y < 16 && n < 16,
            _ => true,
        }
    }
}
