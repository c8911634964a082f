use crate::word::{Addr, Word};

use color_print::cformat;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Three consecutive words fetched at the instruction pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Triple {
    pub a: Word,
    pub b: Word,
    pub c: Word,
}

impl Triple {
    pub fn new(a: Word, b: Word, c: Word) -> Self {
        Triple { a, b, c }
    }

    pub fn from_slice(words: &[Word]) -> Option<Self> {
        match words {
            [a, b, c, ..] => Some(Triple::new(*a, *b, *c)),
            _ => None,
        }
    }

    pub fn addrs(&self) -> [Addr; 3] {
        [
            Addr::decode(self.a),
            Addr::decode(self.b),
            Addr::decode(self.c),
        ]
    }

    pub fn op(&self) -> Op {
        Op::decode(self)
    }

    pub fn cformat(&self) -> String {
        let [a, b, c] = self.addrs();
        cformat!(
            "<r>{:<7}</><b>{:>6} {:>6} {:>6}</>",
            self.op(),
            a.to_string(),
            b.to_string(),
            c.to_string()
        )
    }
}

/// Operation selected by the zero/nonzero pattern of a raw triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Op {
    /// `0 0 0`
    Halt,
    /// `A 0 0`
    Push,
    /// `0 B 0`
    Pop,
    /// `0 0 C`, returns if `[C] <= 0`
    Ret,
    /// `A B 0`
    Move,
    /// `A 0 C`, calls `C` if `[A] <= 0`
    Call,
    /// `0 B C`
    Io,
    /// `A B C`
    Subleq,
}

impl Op {
    pub fn decode(t: &Triple) -> Op {
        match (t.a != 0, t.b != 0, t.c != 0) {
            (false, false, false) => Op::Halt,
            (true, false, false) => Op::Push,
            (false, true, false) => Op::Pop,
            (false, false, true) => Op::Ret,
            (true, true, false) => Op::Move,
            (true, false, true) => Op::Call,
            (false, true, true) => Op::Io,
            (true, true, true) => Op::Subleq,
        }
    }
}
