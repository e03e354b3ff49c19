//! Session Orchestrator and its seams to the real terminal.

mod console;
mod events;
mod orchestrator;

pub use console::{clear_screen, write_banner, Console, StdConsole, DEFAULT_SIZE};
pub use events::{TerminalEvent, TerminalEvents};
pub use orchestrator::{Orchestrator, RelayMode, SessionConfig};
