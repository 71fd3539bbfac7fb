use std::fmt::Display;

use crate::config::Keymap;

/// The 16-key hexadecimal keypad. Raw input codes are translated through the
/// configured [`Keymap`]; codes it does not know are ignored.
#[derive(Debug)]
pub struct Keyboard {
    pressed_keys: [bool; 16],
    keymap: Keymap,
}

impl Keyboard {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            pressed_keys: [false; 16],
            keymap,
        }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed_keys[(key & 0xF) as usize]
    }

    /// Records the state of the input-device key `code`.
    pub fn set_physical_key(&mut self, code: u32, pressed: bool) {
        if let Some(key) = self.keymap.logical_key(code) {
            self.set_key(key, pressed);
        }
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.pressed_keys[(key & 0xF) as usize] = pressed;
    }

    /// The lowest-numbered key currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.pressed_keys.iter().position(|k| *k).map(|key| key as u8)
    }

    pub fn clear(&mut self) {
        self.pressed_keys = [false; 16];
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }
}

impl Display for Keyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pressed_keys.map(|k| if k { "o" } else { " " }).join(""))
    }
}
