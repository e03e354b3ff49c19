use std::io::{self, Write};
use std::sync::Arc;

use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::ExecutableCommand;
use parking_lot::Mutex;

type Cleanup = Box<dyn FnOnce() + Send + 'static>;

/// Owns raw mode and cursor visibility of the real terminal.
///
/// Restoration runs exactly once: on drop, from the panic hook, or via
/// [`TerminalGuard::restore`], whichever comes first.
pub struct TerminalGuard {
    cleanup: Arc<Mutex<Option<Cleanup>>>,
}

impl TerminalGuard {
    fn new() -> Self {
        Self {
            cleanup: Arc::new(Mutex::new(None)),
        }
    }

    fn set_cleanup<F: FnOnce() + Send + 'static>(&self, cleanup: F) {
        *self.cleanup.lock() = Some(Box::new(cleanup));
    }

    fn install_panic_hook(&self) {
        let cleanup = Arc::clone(&self.cleanup);
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(cleanup) = cleanup.lock().take() {
                cleanup();
            }
            default_hook(info);
        }));
    }

    /// Put the terminal back into cooked mode with a visible cursor.
    pub fn restore(&self) {
        let cleanup = self.cleanup.lock().take();
        if let Some(cleanup) = cleanup {
            cleanup();
            tracing::debug!("Terminal restored");
        }
    }

    pub fn is_active(&self) -> bool {
        self.cleanup.lock().is_some()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Enter raw mode and hide the cursor.
///
/// The session stays on the main screen: the wrapped program's own UI
/// continues there after the intro.
pub fn connect_terminal() -> io::Result<TerminalGuard> {
    enable_raw_mode()?;
    // Leave raw mode again if hiding the cursor fails.
    let raw_mode = scopeguard::guard((), |_| {
        let _ = disable_raw_mode();
    });
    let mut stdout = io::stdout();
    stdout.execute(Hide)?;
    stdout.flush()?;
    scopeguard::ScopeGuard::into_inner(raw_mode);

    let guard = TerminalGuard::new();
    guard.set_cleanup(|| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(Show);
        let _ = stdout.flush();
    });
    guard.install_panic_hook();

    Ok(guard)
}
