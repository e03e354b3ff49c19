use std::io::{self, Read};
use std::thread;

use tokio::sync::mpsc;

/// Something the user's terminal did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// Raw keystrokes.
    Input(Vec<u8>),
    /// The window changed size.
    Resize,
    /// A termination signal arrived.
    Shutdown(&'static str),
}

/// Merged stream of terminal events.
///
/// Signals are watched from creation; stdin is only read after
/// [`TerminalEvents::start_input`], so keystrokes typed during the intro
/// stay in the tty queue where they can be discarded.
pub struct TerminalEvents {
    rx: mpsc::UnboundedReceiver<TerminalEvent>,
    stdin_tx: Option<mpsc::UnboundedSender<TerminalEvent>>,
}

impl TerminalEvents {
    /// Events fed only through the returned sender.
    pub fn detached() -> (Self, mpsc::UnboundedSender<TerminalEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx, stdin_tx: None }, tx)
    }

    /// Signals and stdin of the current process. Must run inside the runtime.
    pub fn system() -> io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            forward_signal(
                signal(SignalKind::window_change())?,
                tx.clone(),
                TerminalEvent::Resize,
            );
            forward_signal(
                signal(SignalKind::terminate())?,
                tx.clone(),
                TerminalEvent::Shutdown("SIGTERM"),
            );
            forward_signal(
                signal(SignalKind::hangup())?,
                tx.clone(),
                TerminalEvent::Shutdown("SIGHUP"),
            );
        }

        Ok(Self {
            rx,
            stdin_tx: Some(tx),
        })
    }

    /// Begin forwarding stdin. Later calls do nothing.
    pub fn start_input(&mut self) {
        let Some(tx) = self.stdin_tx.take() else {
            return;
        };
        let spawned = thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let mut stdin = io::stdin();
                let mut buffer = [0u8; 1024];
                loop {
                    match stdin.read(&mut buffer) {
                        Ok(0) => break,
                        Ok(count) => {
                            if tx.send(TerminalEvent::Input(buffer[..count].to_vec())).is_err() {
                                break;
                            }
                        }
                        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                        Err(err) => {
                            tracing::warn!("stdin read failed: {}", err);
                            break;
                        }
                    }
                }
                tracing::debug!("stdin reader finished");
            });
        if let Err(err) = spawned {
            tracing::warn!("Failed to start stdin reader: {}", err);
        }
    }

    /// Next event, or `None` once every source is gone.
    pub async fn next(&mut self) -> Option<TerminalEvent> {
        self.rx.recv().await
    }
}

#[cfg(unix)]
fn forward_signal(
    mut stream: tokio::signal::unix::Signal,
    tx: mpsc::UnboundedSender<TerminalEvent>,
    event: TerminalEvent,
) {
    tokio::spawn(async move {
        while stream.recv().await.is_some() {
            if tx.send(event.clone()).is_err() {
                break;
            }
        }
    });
}
