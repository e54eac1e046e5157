pub mod commands;

pub use commands::{Calculator, add};
