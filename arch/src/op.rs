use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Extended mnemonics, written `/name` in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, EnumIter, Display)]
pub enum Macro {
    #[strum(to_string = "sub", serialize = "subleq")]
    Subleq,
    #[strum(to_string = "move", serialize = "copy")]
    Move,
    #[strum(to_string = "jsr", serialize = "jsr?", serialize = "call", serialize = "call?")]
    Call,
    #[strum(to_string = "jmp", serialize = "goto")]
    Jump,
    #[strum(to_string = "halt")]
    Halt,
    #[strum(to_string = "push")]
    Push,
    #[strum(to_string = "pop")]
    Pop,
    #[strum(to_string = "io", serialize = "i/o", serialize = "inout", serialize = "in/out")]
    Io,
    #[strum(to_string = "print", serialize = "output", serialize = "out")]
    Print,
    #[strum(to_string = "input", serialize = "in")]
    Input,
    #[strum(to_string = "ret", serialize = "ret?")]
    Ret,
}

impl Macro {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(m) => Ok(m),
            Err(_) => Err(format!("Undefined macro: /{s}")),
        }
    }

    /// Operand counts the mnemonic accepts.
    pub fn arity(&self) -> &'static [usize] {
        use Macro::*;
        match self {
            Subleq => &[1, 2, 3],
            Move => &[2],
            Call => &[1, 2],
            Jump => &[1],
            Halt => &[0],
            Push => &[1],
            Pop => &[1],
            Io => &[2],
            Print => &[1, 2],
            Input => &[1, 2],
            Ret => &[0, 1],
        }
    }
}
