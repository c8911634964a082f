pub mod console;
pub mod error;
pub mod hooks;
pub mod model;

pub use console::{Console, Tape, Terminal};
pub use error::{Error, Fault, Trap};
pub use model::{Cycle, Exit, Format, State};
