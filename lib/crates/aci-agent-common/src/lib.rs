pub mod inputs;
pub mod types;

pub use types::*;
