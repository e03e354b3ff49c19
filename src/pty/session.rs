use std::cell::RefCell;
use std::io::{self, Read};
use std::path::Path;
use std::rc::Rc;
use std::thread;

use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use tokio::sync::mpsc;

use crate::args::SpawnParams;
use crate::error::LaunchError;
use crate::pty::handle::PtyHandle;
use crate::pty::subscription::{Subscribers, Subscription};

/// Event surfaced by the proxy, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PtyEvent {
    /// One chunk of child output, already delivered to subscribers.
    Data(Vec<u8>),
    /// The child terminated with this code. Delivered exactly once, last.
    Exit(i32),
}

/// A child process attached to a pseudo-terminal.
///
/// Output is read on a dedicated thread that only forwards chunks into a
/// channel; subscribers run on the task that calls [`PtyProxy::next_event`].
pub struct PtyProxy {
    handle: PtyHandle,
    events: mpsc::UnboundedReceiver<PtyEvent>,
    subscribers: Rc<RefCell<Subscribers>>,
    exited: bool,
}

impl PtyProxy {
    /// Start `params.command` on a new `cols`×`rows` pseudo-terminal.
    pub fn spawn(
        params: &SpawnParams,
        cols: u16,
        rows: u16,
        cwd: &Path,
    ) -> Result<Self, LaunchError> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: rows.max(1),
                cols: cols.max(1),
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|err| LaunchError::Pty(err.to_string()))?;

        let mut cmd = CommandBuilder::new(&params.command);
        cmd.args(&params.args);
        cmd.cwd(cwd);
        for (key, value) in &params.env {
            cmd.env(key, value);
        }

        let spawn_error = |err: &dyn std::fmt::Display| LaunchError::Spawn {
            command: params.command.display().to_string(),
            reason: err.to_string(),
        };

        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|err| spawn_error(&err))?;
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|err| spawn_error(&err))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|err| spawn_error(&err))?;
        let killer = child.clone_killer();

        let (tx, events) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("pty-reader".to_string())
            .spawn(move || {
                let mut reader = reader;
                let mut buffer = [0u8; 8192];
                loop {
                    match reader.read(&mut buffer) {
                        Ok(0) => break,
                        Ok(count) => {
                            if tx.send(PtyEvent::Data(buffer[..count].to_vec())).is_err() {
                                break;
                            }
                        }
                        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                        // EIO once the child side closes on Linux.
                        Err(_) => break,
                    }
                }
                let code = match child.wait() {
                    Ok(status) => status.exit_code() as i32,
                    Err(err) => {
                        tracing::warn!("Failed to wait for child: {}", err);
                        1
                    }
                };
                let _ = tx.send(PtyEvent::Exit(code));
            })
            .map_err(|err| spawn_error(&err))?;

        tracing::info!(
            command = %params.command.display(),
            args = params.args.len(),
            cols,
            rows,
            "Child spawned on PTY"
        );

        Ok(Self {
            handle: PtyHandle::new(writer, pair.master, killer),
            events,
            subscribers: Rc::new(RefCell::new(Subscribers::default())),
            exited: false,
        })
    }

    /// Register a consumer for every future output chunk.
    ///
    /// Callbacks run synchronously inside [`PtyProxy::next_event`] and must
    /// not subscribe or dispose from within the callback.
    pub fn on_data<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&[u8]) + 'static,
    {
        let id = self.subscribers.borrow_mut().add(Box::new(callback));
        Subscription::new(id, &self.subscribers)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Write/resize/kill side of the proxy.
    pub fn handle(&self) -> PtyHandle {
        self.handle.clone()
    }

    /// Wait for the next event, delivering data to subscribers first.
    ///
    /// Returns `None` once the exit event has been handed out.
    pub async fn next_event(&mut self) -> Option<PtyEvent> {
        if self.exited {
            return None;
        }
        let event = match self.events.recv().await {
            Some(event) => event,
            None => {
                tracing::warn!("PTY reader vanished without an exit status");
                PtyEvent::Exit(1)
            }
        };
        match &event {
            PtyEvent::Data(chunk) => self.subscribers.borrow_mut().dispatch(chunk),
            PtyEvent::Exit(code) => {
                tracing::info!(code, "Child exited");
                self.exited = true;
            }
        }
        Some(event)
    }

    /// Drop every queued chunk without dispatching it.
    ///
    /// Returns the exit code if the exit event was among them.
    pub fn discard_pending(&mut self) -> Option<i32> {
        if self.exited {
            return None;
        }
        let mut dropped = 0;
        while let Ok(event) = self.events.try_recv() {
            match event {
                PtyEvent::Data(chunk) => dropped += chunk.len(),
                PtyEvent::Exit(code) => {
                    tracing::info!(code, "Child exited");
                    self.exited = true;
                    return Some(code);
                }
            }
        }
        if dropped > 0 {
            tracing::debug!(bytes = dropped, "Discarded queued output");
        }
        None
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }
}
