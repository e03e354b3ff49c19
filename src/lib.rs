//! Son of Anton: a PTY wrapper that hides an interactive agent's boot
//! banner behind a scripted intro, then hands the terminal back.

pub mod animation;
pub mod args;
pub mod assets;
pub mod brand;
pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod pty;
pub mod readiness;
pub mod session;
pub mod terminal;
