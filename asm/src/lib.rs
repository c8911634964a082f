pub mod assembler;
pub mod error;
pub mod label;
pub mod lexer;
pub mod literal;
pub mod macros;
pub mod normalize;
pub mod resolve;
pub mod token;
pub mod util;

pub use assembler::{assemble, assemble_file, Assembly};
pub use error::Error;
pub use label::{Labels, Location};
pub use normalize::Line;
pub use token::Token;
