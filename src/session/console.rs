//! The real terminal as seen by the orchestrator.

use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use ratatui::backend::CrosstermBackend;

use crate::animation::{RatatuiSurface, Surface};
use crate::session::events::TerminalEvents;

/// Used when the terminal cannot report its size.
pub const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Everything the orchestrator needs from the user's terminal.
pub trait Console {
    /// Current `(cols, rows)`.
    fn size(&self) -> (u16, u16);

    /// A handle for raw bytes to the screen.
    fn writer(&self) -> Box<dyn Write>;

    /// A frame surface for the intro animation.
    fn surface(&self) -> io::Result<Box<dyn Surface>>;

    /// Input, resize and termination events.
    fn events(&self) -> io::Result<TerminalEvents>;

    /// Drop any keystrokes typed before passthrough began.
    fn discard_input(&self) {}
}

/// The process's own stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn size(&self) -> (u16, u16) {
        match crossterm::terminal::size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => (cols, rows),
            Ok(_) => DEFAULT_SIZE,
            Err(err) => {
                tracing::warn!("Could not read terminal size: {}", err);
                DEFAULT_SIZE
            }
        }
    }

    fn writer(&self) -> Box<dyn Write> {
        Box::new(io::stdout())
    }

    fn surface(&self) -> io::Result<Box<dyn Surface>> {
        let surface: RatatuiSurface<CrosstermBackend<Stdout>> =
            RatatuiSurface::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Box::new(surface))
    }

    fn events(&self) -> io::Result<TerminalEvents> {
        TerminalEvents::system()
    }

    fn discard_input(&self) {
        #[cfg(unix)]
        // SAFETY: tcflush on our own stdin descriptor has no memory effects.
        unsafe {
            libc::tcflush(libc::STDIN_FILENO, libc::TCIFLUSH);
        }
    }
}

/// Clear the screen and scrollback, cursor home.
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0))?;
    out.flush()
}

/// Write the banner in cyan.
///
/// Raw mode disables output post-processing, so bare `\n` becomes
/// `\r\n` here.
pub fn write_banner<W: Write>(out: &mut W, banner: &str) -> io::Result<()> {
    let text = to_crlf(banner.trim_end_matches('\n'));
    queue!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(text),
        ResetColor,
        Print("\r\n")
    )?;
    out.flush()
}

fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut previous = None;
    for ch in text.chars() {
        if ch == '\n' && previous != Some('\r') {
            out.push('\r');
        }
        out.push(ch);
        previous = Some(ch);
    }
    out
}
