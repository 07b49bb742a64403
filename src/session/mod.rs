pub mod clock;
pub mod input;
pub mod judge;
pub mod progress;
pub mod result;
pub mod state;
pub mod words;

pub use input::{EventOutcome, IgnoreReason, SessionEvent, handle_event};
pub use result::TestReport;
pub use state::{Phase, SessionConfig, SessionSnapshot, TypingSession};
