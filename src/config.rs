/// Translation table from raw input-device key codes to the 16 logical keys.
///
/// Entry `i` holds the raw code that presses logical key `i`. The codes are opaque
/// to the interpreter, so any input back end can supply its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap([u32; 16]);

impl Keymap {
    pub fn new(codes: [u32; 16]) -> Self {
        Keymap(codes)
    }

    /// Returns the logical key bound to `code`, if any.
    pub fn logical_key(&self, code: u32) -> Option<u8> {
        self.0.iter().position(|&c| c == code).map(|idx| idx as u8)
    }

    /// Returns the raw code bound to logical key `key`.
    pub fn raw_code(&self, key: u8) -> u32 {
        self.0[(key & 0xF) as usize]
    }
}

impl Default for Keymap {
    /// The QWERTY layout, as ASCII codes:
    ///
    /// ```text
    /// 1 2 3 4        1 2 3 C
    /// q w e r   ->   4 5 6 D
    /// a s d f        7 8 9 E
    /// z x c v        A 0 B F
    /// ```
    fn default() -> Self {
        Keymap([
            b'x' as u32,
            b'1' as u32,
            b'2' as u32,
            b'3' as u32,
            b'q' as u32,
            b'w' as u32,
            b'e' as u32,
            b'a' as u32,
            b's' as u32,
            b'd' as u32,
            b'z' as u32,
            b'c' as u32,
            b'4' as u32,
            b'r' as u32,
            b'f' as u32,
            b'v' as u32,
        ])
    }
}

/// How `Fx0A - LD Vx, K` behaves when no key is held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyWait {
    /// Scan the keypad once and carry on; Vx is left untouched if nothing is pressed.
    #[default]
    Poll,
    /// Re-execute the instruction on every step until a key is pressed.
    Block,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub keymap: Keymap,
    pub key_wait: KeyWait,
    /// Seed for `Cxkk - RND`. `None` draws a seed from the OS.
    pub seed: Option<u64>,
    /// Make `Fx55`/`Fx65` transfer V0 through Vx instead of V0 through V(x-1).
    pub inclusive_register_transfer: bool,
}

impl Config {
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn with_key_wait(mut self, key_wait: KeyWait) -> Self {
        self.key_wait = key_wait;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_inclusive_register_transfer(mut self, inclusive: bool) -> Self {
        self.inclusive_register_transfer = inclusive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_some_eq};

    #[test]
    fn test_default_keymap() {
        let keymap = Keymap::default();

        assert_some_eq!(keymap.logical_key(b'x' as u32), 0x0);
        assert_some_eq!(keymap.logical_key(b'1' as u32), 0x1);
        assert_some_eq!(keymap.logical_key(b'4' as u32), 0xC);
        assert_some_eq!(keymap.logical_key(b'v' as u32), 0xF);
        assert_none!(keymap.logical_key(b'p' as u32));
    }

    #[test]
    fn test_custom_keymap() {
        let codes: [u32; 16] = core::array::from_fn(|i| 100 + i as u32);
        let keymap = Keymap::new(codes);

        for key in 0..16u8 {
            assert_eq!(keymap.raw_code(key), 100 + key as u32);
            assert_some_eq!(keymap.logical_key(100 + key as u32), key);
        }
        assert_none!(keymap.logical_key(b'x' as u32));
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_key_wait(KeyWait::Block)
            .with_seed(42)
            .with_inclusive_register_transfer(true);

        assert_eq!(config.key_wait, KeyWait::Block);
        assert_eq!(config.seed, Some(42));
        assert!(config.inclusive_register_transfer);
        assert_eq!(config.keymap, Keymap::default());
    }
}
