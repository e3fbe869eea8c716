pub mod config;
pub mod engine;
pub mod games;
pub mod identifiers;
pub mod logger;

pub use identifiers::*;
