//! Shared test utilities: an in-memory console and `sh`-backed sessions.

#![allow(dead_code, unused_imports)]

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anton::animation::{AnimationTiming, RatatuiSurface, Surface};
use anton::args::SpawnParams;
use anton::assets::LogoTemplate;
use anton::readiness::ReadinessPolicy;
use anton::session::{Console, SessionConfig, TerminalEvent, TerminalEvents};
use ratatui::backend::TestBackend;
use tokio::sync::mpsc::UnboundedSender;

/// Prompt as written by a `printf` in a child script.
pub const PROMPT_PRINTF: &str = r"────────\n> ";
/// The same prompt as it comes out of the PTY (ONLCR turns `\n` into `\r\n`).
pub const PROMPT: &str = "────────\r\n> ";

pub fn raw_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Writer that appends into a shared byte vector.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Console backed by memory; frames go to a ratatui `TestBackend`.
pub struct MemoryConsole {
    pub output: SharedOutput,
    /// Shared so a test can change the size while a session runs.
    pub size: Rc<Cell<(u16, u16)>>,
    pub surfaces: Cell<usize>,
    events: RefCell<Option<TerminalEvents>>,
    sender: UnboundedSender<TerminalEvent>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        let (events, sender) = TerminalEvents::detached();
        Self {
            output: SharedOutput::default(),
            size: Rc::new(Cell::new((80, 24))),
            surfaces: Cell::new(0),
            events: RefCell::new(Some(events)),
            sender,
        }
    }

    pub fn sender(&self) -> UnboundedSender<TerminalEvent> {
        self.sender.clone()
    }

    pub fn size_handle(&self) -> Rc<Cell<(u16, u16)>> {
        Rc::clone(&self.size)
    }
}

impl Console for MemoryConsole {
    fn size(&self) -> (u16, u16) {
        self.size.get()
    }

    fn writer(&self) -> Box<dyn Write> {
        Box::new(self.output.clone())
    }

    fn surface(&self) -> io::Result<Box<dyn Surface>> {
        self.surfaces.set(self.surfaces.get() + 1);
        let (cols, rows) = self.size.get();
        Ok(Box::new(RatatuiSurface::new(TestBackend::new(cols, rows))?))
    }

    fn events(&self) -> io::Result<TerminalEvents> {
        Ok(self
            .events
            .borrow_mut()
            .take()
            .unwrap_or_else(|| TerminalEvents::detached().0))
    }
}

/// Session running `sh -c script` with fast timings and no probing.
pub fn sh_session(script: &str) -> SessionConfig {
    SessionConfig {
        spawn: SpawnParams {
            command: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), script.to_string()],
            env: vec![("TERM".to_string(), "xterm-256color".to_string())],
        },
        cwd: std::env::temp_dir(),
        readiness: ReadinessPolicy {
            timeout: Duration::from_millis(500),
            ..ReadinessPolicy::default()
        },
        timing: AnimationTiming::instant(),
        skip_intro: true,
        patch_output: false,
        logo: LogoTemplate::from_text("<<{VERSION}>>"),
        probe: None,
        dialogue_cache: PathBuf::from("/nonexistent/anton/dialogues-cache.json"),
    }
}
