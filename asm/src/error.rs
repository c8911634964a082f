use arch::ImageError;
use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Macro `/{mnemonic}` failed at statement {statement}: `{words}`")]
    MacroArity {
        mnemonic: String,
        statement: usize,
        words: String,
    },

    #[error("Unknown macro `/{mnemonic}` at statement {statement}: `{words}`")]
    UnknownMacro {
        mnemonic: String,
        statement: usize,
        words: String,
    },

    #[error("Unmatched label: `{token}` @ {position}")]
    UnmatchedLabel { token: String, position: usize },

    #[error("Address of `{token}` @ {position} overflows a word")]
    ModifierOverflow { token: String, position: usize },

    #[error("Cannot parse modifier of `{token}` at statement {statement}")]
    BadModifier { token: String, statement: usize },

    #[error("Re-defined label: `{name}` at statement {statement}")]
    RedefinedLabel { name: String, statement: usize },

    #[error("Label `{0}` is not followed by any statement")]
    DanglingLabel(String),

    #[error("Too many operands ({count}) at statement {statement}: `{words}`")]
    TooManyOperands {
        count: usize,
        statement: usize,
        words: String,
    },

    #[error("Data marker must start the statement at statement {statement}: `{words}`")]
    MisplacedDataMarker { statement: usize, words: String },

    #[error("Statement {0} has no operands")]
    EmptyStatement(usize),

    #[error("Entry pointer {entry} is outside 1..={max}")]
    InvalidEntry { entry: i64, max: i64 },

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error(transparent)]
    Image(#[from] ImageError),
}

impl Error {
    /// Print error with the source file it came from
    pub fn print_diag(&self, file: &str) {
        cprintln!("<red,bold>error</>: {}", self);
        cprintln!("     <blue>--></> <underline>{}</>", file);
        if let Some(hint) = self.hint() {
            cprintln!("      <blue>=</> {}", hint);
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            Error::MacroArity { .. } => Some("check the operand count of the macro"),
            Error::UnmatchedLabel { .. } => Some("labels are defined as `name:`"),
            Error::InvalidEntry { .. } => {
                Some("the first statement must hold the address of the first instruction")
            }
            Error::ModifierOverflow { .. } => Some("the modifier is too large for this address"),
            Error::Image(_) => Some("check that the output path is writable"),
            Error::DanglingLabel(_) => Some("a label cannot be the only thing on the last line"),
            _ => None,
        }
    }
}
