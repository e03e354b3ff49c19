//! Real terminal ownership.

mod guard;

pub use guard::{connect_terminal, TerminalGuard};
