use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory cell. Every word of the image, every operand and every value is one of these.
pub type Word = i64;

/// Operand address.
///
/// On the wire an operand is a signed word: a non-negative word addresses memory
/// directly, a negative word `-k` means "the real address is stored at word `k`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Addr {
    Direct(usize),
    Indirect(usize),
}

impl Addr {
    pub fn decode(word: Word) -> Addr {
        if word < 0 {
            Addr::Indirect(word.unsigned_abs() as usize)
        } else {
            Addr::Direct(word as usize)
        }
    }

    pub fn encode(self) -> Word {
        match self {
            Addr::Direct(n) => n as Word,
            Addr::Indirect(n) => -(n as Word),
        }
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addr::Direct(n) => write!(f, "{}", n),
            Addr::Indirect(n) => write!(f, "*{}", n),
        }
    }
}
