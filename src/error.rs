use std::path::PathBuf;

/// Failures surfaced by loading a program image or executing an instruction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read ROM {path:?}")]
    RomNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    /// `CALL` with all 16 stack slots in use. `pc` is the address following the
    /// failing instruction; the machine's PC is left on the instruction itself.
    #[error("stack overflow: CALL with a full call stack, returning to {pc:#05X}")]
    StackOverflow { pc: u16 },

    /// `RET` with an empty call stack. `pc` is the address following the failing
    /// instruction; the machine's PC is left on the instruction itself.
    #[error("stack underflow: RET with an empty call stack, next instruction at {pc:#05X}")]
    StackUnderflow { pc: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;
