pub use chip8::Chip8;
pub use error::{Error, Fault};
pub use quirks::Quirks;

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod quirks;
pub mod state;
