//! IRC message types and parsing.

mod parse;
mod serialize;
mod types;

pub use self::parse::parse;
pub use self::types::Message;
