pub mod image;
pub mod inst;
pub mod op;
pub mod word;

pub use image::{Image, ImageError};
pub use inst::{Op, Triple};
pub use op::Macro;
pub use word::{Addr, Word};
