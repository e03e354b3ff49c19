//! Session Orchestrator: spawn, suppress, detect, animate, replay, relay.

use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::animation::{play, AnimationTiming, Sequencer};
use crate::args::SpawnParams;
use crate::assets::{select_record, version_line, LogoTemplate, LOADING_TEXT};
use crate::brand::BrandPatcher;
use crate::config::WrapperConfig;
use crate::probe::{resolve_banner, ProbeRequest, UNKNOWN_MODEL, UNKNOWN_VERSION};
use crate::pty::{PtyEvent, PtyHandle, PtyProxy, Subscription};
use crate::readiness::{OutputBuffer, ReadinessDetector, ReadinessPolicy, ReadyReason};
use crate::session::console::{clear_screen, write_banner, Console};
use crate::session::events::{TerminalEvent, TerminalEvents};

/// How long a partial line may sit in the brand patcher.
const PATCH_FLUSH_DELAY: Duration = Duration::from_millis(25);
/// Spacing written when no prompt tail was captured.
const BLANK_SPACING: &[u8] = b"\r\n\r\n";

/// Everything a session needs, resolved up front.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub spawn: SpawnParams,
    pub cwd: PathBuf,
    pub readiness: ReadinessPolicy,
    pub timing: AnimationTiming,
    pub skip_intro: bool,
    pub patch_output: bool,
    pub logo: LogoTemplate,
    /// `None` skips probing and shows placeholder version text.
    pub probe: Option<ProbeRequest>,
    pub dialogue_cache: PathBuf,
}

impl SessionConfig {
    /// Assemble a session from the loaded wrapper configuration.
    pub fn from_config(
        config: &WrapperConfig,
        spawn: SpawnParams,
        cwd: PathBuf,
        skip_intro: bool,
    ) -> Self {
        let probe = ProbeRequest {
            binary: spawn.command.clone(),
            include_model: config.agent.probe_model,
            timeout: config.agent.probe_timeout(),
        };
        Self {
            spawn,
            cwd,
            readiness: ReadinessPolicy::from(&config.readiness),
            timing: AnimationTiming::default(),
            skip_intro: skip_intro || config.animation.skip,
            patch_output: config.branding.patch_output,
            logo: LogoTemplate::load(config.assets.logo.as_deref()),
            probe: Some(probe),
            dialogue_cache: config.assets.dialogue_cache_path(),
        }
    }
}

/// Where child output currently goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Captured into the output buffer, nothing reaches the screen.
    Suppressed,
    /// Written straight to the screen.
    Passthrough,
}

/// How the suppressed phase ended.
enum Boot {
    Ready(ReadyReason),
    Exited(i32),
}

struct ScreenSink {
    out: Box<dyn Write>,
    patcher: Option<BrandPatcher>,
    flush_at: Option<Instant>,
}

impl ScreenSink {
    fn write(&mut self, chunk: &[u8]) {
        let result = match self.patcher.as_mut() {
            Some(patcher) => {
                let patched = patcher.push(chunk);
                if patcher.has_pending() {
                    self.flush_at = Some(Instant::now() + PATCH_FLUSH_DELAY);
                }
                self.out.write_all(&patched)
            }
            None => self.out.write_all(chunk),
        };
        if let Err(err) = result.and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write child output: {}", err);
        }
    }

    fn flush_pending(&mut self) {
        self.flush_at = None;
        if let Some(patcher) = self.patcher.as_mut() {
            let rest = patcher.flush();
            if let Err(err) = self.out.write_all(&rest).and_then(|_| self.out.flush()) {
                tracing::warn!("Failed to write child output: {}", err);
            }
        }
    }
}

/// Runs one wrapped session against a [`Console`].
pub struct Orchestrator<C: Console> {
    config: SessionConfig,
    console: C,
    mode: RelayMode,
    /// The one live output subscription: buffering, then passthrough.
    sink: Option<Subscription>,
}

impl<C: Console> Orchestrator<C> {
    pub fn new(config: SessionConfig, console: C) -> Self {
        Self {
            config,
            console,
            mode: RelayMode::Suppressed,
            sink: None,
        }
    }

    pub fn mode(&self) -> RelayMode {
        self.mode
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Full protocol. Returns the child's exit code.
    pub async fn run(&mut self) -> anyhow::Result<i32> {
        let mut events = self.console.events()?;
        let (cols, rows) = self.console.size();
        let mut proxy = PtyProxy::spawn(&self.config.spawn, cols, rows, &self.config.cwd)?;
        let pty = proxy.handle();

        let initial_logo = match self.config.probe {
            Some(_) => self.config.logo.render(LOADING_TEXT),
            None => self.placeholder_banner(),
        };
        let (logo_tx, logo_rx) = watch::channel(initial_logo);
        let banner = self.start_banner_probe(logo_tx);

        let buffer = Rc::new(RefCell::new(OutputBuffer::new()));
        let subscription = {
            let buffer = Rc::clone(&buffer);
            proxy.on_data(move |chunk| buffer.borrow_mut().append(chunk))
        };
        self.mode = RelayMode::Suppressed;
        self.sink = Some(subscription);

        let boot = self.await_readiness(&mut proxy, &buffer, &mut events).await;
        self.dispose_sink();
        let captured = buffer.take();

        let reason = match boot {
            Boot::Exited(code) => {
                tracing::info!(code, bytes = captured.len(), "Child exited before readiness");
                let mut out = self.console.writer();
                out.write_all(captured.as_bytes())?;
                out.flush()?;
                return Ok(code);
            }
            Boot::Ready(reason) => reason,
        };
        tracing::info!(?reason, bytes = captured.len(), "Child ready");

        let mut exited = None;
        if !self.config.skip_intro {
            let logo = logo_rx.borrow().clone();
            let record = select_record(&self.config.dialogue_cache, &mut rand::thread_rng());
            let sequencer = Sequencer::new(record, &logo, self.config.timing.clone());
            exited = self
                .play_intro(sequencer, logo_rx, &mut proxy, &mut events)
                .await;
        }

        let banner = self.finish_banner(banner).await;
        if let Some(code) = proxy.discard_pending() {
            exited = exited.or(Some(code));
        }
        let policy = &self.config.readiness;
        let tail = captured.prompt_tail(&policy.separator, &policy.prompt_marker);
        let mut out = self.console.writer();
        clear_screen(&mut out)?;
        write_banner(&mut out, &banner)?;
        out.write_all(tail.unwrap_or(BLANK_SPACING))?;
        out.flush()?;
        drop(captured);

        if let Some(code) = exited {
            tracing::info!(code, "Child exited during the intro");
            return Ok(code);
        }

        let (cols, rows) = self.console.size();
        if let Err(err) = pty.force_redraw(cols, rows) {
            tracing::warn!("Forced redraw failed: {}", err);
        }

        self.console.discard_input();
        self.passthrough(proxy, events).await
    }

    /// Skip suppression and the intro: relay from the first byte.
    pub async fn run_direct(&mut self) -> anyhow::Result<i32> {
        let events = self.console.events()?;
        let (cols, rows) = self.console.size();
        let proxy = PtyProxy::spawn(&self.config.spawn, cols, rows, &self.config.cwd)?;
        self.passthrough(proxy, events).await
    }

    fn start_banner_probe(&self, logo_tx: watch::Sender<String>) -> Option<JoinHandle<String>> {
        let request = self.config.probe.clone()?;
        let template = self.config.logo.clone();
        Some(tokio::spawn(async move {
            let banner = resolve_banner(template, request).await;
            let _ = logo_tx.send(banner.clone());
            banner
        }))
    }

    fn placeholder_banner(&self) -> String {
        self.config
            .logo
            .render(&version_line(UNKNOWN_VERSION, UNKNOWN_MODEL))
    }

    async fn finish_banner(&self, probe: Option<JoinHandle<String>>) -> String {
        match probe {
            Some(handle) => handle.await.unwrap_or_else(|err| {
                tracing::warn!("Banner probe task failed: {}", err);
                self.placeholder_banner()
            }),
            None => self.placeholder_banner(),
        }
    }

    async fn await_readiness(
        &self,
        proxy: &mut PtyProxy,
        buffer: &RefCell<OutputBuffer>,
        events: &mut TerminalEvents,
    ) -> Boot {
        let pty = proxy.handle();
        let mut detector = ReadinessDetector::new(self.config.readiness.clone(), Instant::now());
        let deadline = detector.deadline();
        let period = detector.policy().poll_interval.max(Duration::from_millis(1));
        let mut poll = time::interval_at(Instant::now() + period, period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = proxy.next_event() => match event {
                    Some(PtyEvent::Data(_)) => {
                        if let Some(reason) = detector.observe(&buffer.borrow()) {
                            return Boot::Ready(reason);
                        }
                    }
                    Some(PtyEvent::Exit(code)) => return Boot::Exited(code),
                    None => return Boot::Exited(1),
                },
                _ = poll.tick() => {
                    if let Some(reason) = detector.poll(&buffer.borrow(), Instant::now()) {
                        return Boot::Ready(reason);
                    }
                }
                _ = time::sleep_until(deadline) => {
                    if let Some(reason) = detector.poll(&buffer.borrow(), Instant::now()) {
                        return Boot::Ready(reason);
                    }
                }
                Some(event) = events.next() => self.handle_control(event, &pty),
            }
        }
    }

    async fn play_intro(
        &self,
        sequencer: Sequencer,
        logo: watch::Receiver<String>,
        proxy: &mut PtyProxy,
        events: &mut TerminalEvents,
    ) -> Option<i32> {
        let mut surface = match self.console.surface() {
            Ok(surface) => surface,
            Err(err) => {
                tracing::warn!("Cannot draw the intro: {}", err);
                return None;
            }
        };
        let pty = proxy.handle();
        let animation = play(sequencer, surface.as_mut(), logo);
        tokio::pin!(animation);

        let mut exited = None;
        loop {
            tokio::select! {
                state = &mut animation => {
                    tracing::debug!(lines = state.history.len(), "Intro complete");
                    break;
                }
                // Output is discarded until the replay; the exit still counts.
                event = proxy.next_event(), if exited.is_none() => match event {
                    Some(PtyEvent::Data(_)) => {}
                    Some(PtyEvent::Exit(code)) => exited = Some(code),
                    None => exited = Some(1),
                },
                Some(event) = events.next() => {
                    if let TerminalEvent::Shutdown(signal) = event {
                        tracing::info!(signal, "Shutdown requested during intro");
                        kill_child(&pty);
                    }
                }
            }
        }
        exited
    }

    async fn passthrough(
        &mut self,
        mut proxy: PtyProxy,
        mut events: TerminalEvents,
    ) -> anyhow::Result<i32> {
        let pty = proxy.handle();
        let screen = Rc::new(RefCell::new(ScreenSink {
            out: self.console.writer(),
            patcher: self.config.patch_output.then(BrandPatcher::new),
            flush_at: None,
        }));
        let subscription = {
            let screen = Rc::clone(&screen);
            proxy.on_data(move |chunk| screen.borrow_mut().write(chunk))
        };
        self.mode = RelayMode::Passthrough;
        self.sink = Some(subscription);
        events.start_input();
        tracing::info!("Passthrough started");

        let code = loop {
            let flush_at = screen.borrow().flush_at;
            tokio::select! {
                event = proxy.next_event() => match event {
                    Some(PtyEvent::Data(_)) => {}
                    Some(PtyEvent::Exit(code)) => break code,
                    None => break 1,
                },
                Some(event) = events.next() => match event {
                    TerminalEvent::Input(bytes) => {
                        if let Err(err) = pty.write(&bytes) {
                            tracing::warn!("Failed to forward input: {}", err);
                        }
                    }
                    TerminalEvent::Resize => self.handle_control(TerminalEvent::Resize, &pty),
                    shutdown @ TerminalEvent::Shutdown(_) => self.handle_control(shutdown, &pty),
                },
                _ = time::sleep_until(flush_at.unwrap_or_else(Instant::now)), if flush_at.is_some() => {
                    screen.borrow_mut().flush_pending();
                }
            }
        };

        screen.borrow_mut().flush_pending();
        self.dispose_sink();
        pty.close_writer();
        Ok(code)
    }

    /// Resize and termination handling shared by every phase.
    fn handle_control(&self, event: TerminalEvent, pty: &PtyHandle) {
        match event {
            TerminalEvent::Resize => {
                let (cols, rows) = self.console.size();
                if let Err(err) = pty.resize(cols, rows) {
                    tracing::warn!("Failed to resize PTY: {}", err);
                }
            }
            TerminalEvent::Shutdown(signal) => {
                tracing::info!(signal, "Shutdown requested");
                kill_child(pty);
            }
            TerminalEvent::Input(bytes) => {
                tracing::debug!(bytes = bytes.len(), "Input dropped before passthrough");
            }
        }
    }

    fn dispose_sink(&mut self) {
        if let Some(subscription) = self.sink.take() {
            let removed = subscription.dispose();
            tracing::debug!(mode = ?self.mode, removed, "Output sink disposed");
        }
    }
}

fn kill_child(pty: &PtyHandle) {
    if let Err(err) = pty.kill() {
        tracing::warn!("Failed to kill child: {}", err);
    }
}
