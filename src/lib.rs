pub mod config;
pub mod display;
mod error;
pub mod instruction;
pub mod interpreter;
pub mod keyboard;
mod memory;
mod registers;

pub use config::{Config, KeyWait, Keymap};
pub use error::{Error, Result};
pub use interpreter::Interpreter;
pub use memory::{MEMORY_SIZE, START_ROM};
