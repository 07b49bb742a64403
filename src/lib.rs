// Typing-test session engine. The terminal driver in main.rs is a thin
// consumer of this library; everything it needs is public here.
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod session;

pub use error::{EngineError, EngineResult};
