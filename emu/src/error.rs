use arch::{ImageError, Triple, Word};
use color_print::cprintln;
use std::io;
use thiserror::Error;

/// Run-time failure of a single cycle.
#[derive(Error, Debug)]
pub enum Fault {
    #[error("Address {addr} is out of bounds (memory length {len})")]
    OutOfBounds { addr: Word, len: usize },

    #[error("Double indirection: word {cell} holds negative address {value}")]
    DoubleIndirection { cell: usize, value: Word },

    #[error("Cannot pop from an empty data stack")]
    EmptyDataStack,

    #[error("Attempted to return from an empty return stack")]
    EmptyReturnStack,

    #[error("Invalid character: {0}")]
    InvalidCharacter(Word),

    #[error("Instruction pointer {ip} is outside 1..={max}")]
    PointerOutOfRange { ip: Word, max: Word },

    #[error("Entry pointer {entry} is outside 1..={max}")]
    EntryOutOfRange { entry: Word, max: Word },

    #[error("Console failed: {0}")]
    Io(#[from] io::Error),
}

/// A fault together with the instruction that raised it.
#[derive(Error, Debug)]
#[error("{fault} @ {addr}")]
pub struct Trap {
    pub addr: usize,
    pub triple: Option<Triple>,
    pub fault: Fault,
}

impl Trap {
    pub fn print_diag(&self, file: &str) {
        cprintln!("<red,bold>error</>: {}", self.fault);
        cprintln!("     <blue>--></> <underline>{}</> @ {}", file, self.addr);
        if let Some(triple) = &self.triple {
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", self.addr, triple.cformat());
            cprintln!("      <blue>|</>");
        }
    }
}

/// Anything that stops the emulator before the first cycle.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open dump config: {0}")]
    ConfigOpen(String, #[source] io::Error),

    #[error("Failed to parse dump config: {0}")]
    ConfigParse(String, #[source] serde_yaml::Error),

    #[error("Failed to read input tape: {0}")]
    TapeOpen(String, #[source] io::Error),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Asm(#[from] sqasm::Error),

    #[error(transparent)]
    Fault(#[from] Fault),
}

impl Error {
    pub fn print_diag(&self, file: &str) {
        match self {
            Error::Asm(e) => e.print_diag(file),
            e => {
                cprintln!("<red,bold>error</>: {}", e);
                cprintln!("     <blue>--></> <underline>{}</>", file);
            }
        }
    }
}
