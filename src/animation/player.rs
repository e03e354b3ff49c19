use std::io;

use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::watch;

use crate::animation::render::Arena;
use crate::animation::sequencer::{AnimationState, Sequencer, Tick};

/// Where animation frames go.
pub trait Surface {
    fn show(&mut self, state: &AnimationState) -> io::Result<()>;
}

/// Full-frame redraw through a ratatui terminal.
pub struct RatatuiSurface<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> RatatuiSurface<B> {
    pub fn new(backend: B) -> io::Result<Self> {
        let mut terminal = Terminal::new(backend).map_err(to_io)?;
        terminal.clear().map_err(to_io)?;
        Ok(Self { terminal })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Surface for RatatuiSurface<B> {
    fn show(&mut self, state: &AnimationState) -> io::Result<()> {
        self.terminal
            .draw(|frame| frame.render_widget(Arena::new(state), frame.area()))
            .map(|_| ())
            .map_err(to_io)
    }
}

fn to_io(err: impl std::fmt::Display) -> io::Error {
    io::Error::other(err.to_string())
}

/// Run the sequencer to `Done`, drawing after every tick.
///
/// The logo text is taken from `logo` whenever it changes, up to the
/// moment the reveal starts. Draw failures are logged and skipped; the
/// run always completes.
pub async fn play<S>(
    mut sequencer: Sequencer,
    surface: &mut S,
    mut logo: watch::Receiver<String>,
) -> AnimationState
where
    S: Surface + ?Sized,
{
    let mut draw_failed = false;
    let mut draw = |surface: &mut S, state: &AnimationState| {
        if let Err(err) = surface.show(state) {
            if !draw_failed {
                tracing::warn!("Animation frame failed to draw: {}", err);
                draw_failed = true;
            }
        }
    };

    tracing::debug!(record = sequencer.record_id(), "Animation started");
    draw(surface, sequencer.state());
    let mut delay = sequencer.initial_delay();
    loop {
        tokio::time::sleep(delay).await;
        if logo.has_changed().unwrap_or(false) {
            let text = logo.borrow_and_update().clone();
            sequencer.set_logo(&text);
        }
        let tick = sequencer.advance();
        draw(surface, sequencer.state());
        match tick {
            Tick::Continue(next) => delay = next,
            Tick::Done => break,
        }
    }
    tracing::debug!("Animation finished");
    sequencer.into_state()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::animation::sequencer::{AnimationTiming, Phase};
    use crate::assets::DialogueRecord;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Phase, usize, String)>,
    }

    impl Surface for Recorder {
        fn show(&mut self, state: &AnimationState) -> io::Result<()> {
            self.frames
                .push((state.phase, state.history.len(), state.logo.clone()));
            Ok(())
        }
    }

    struct Broken;

    impl Surface for Broken {
        fn show(&mut self, _state: &AnimationState) -> io::Result<()> {
            Err(io::Error::other("gone"))
        }
    }

    fn fallback(timing: AnimationTiming) -> Sequencer {
        Sequencer::new(DialogueRecord::fallback(), "Loading...", timing)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_done_and_returns_final_state() {
        let (_tx, rx) = watch::channel("Loading...".to_string());
        let mut recorder = Recorder::default();
        let state = play(fallback(AnimationTiming::instant()), &mut recorder, rx).await;
        assert_eq!(state.phase, Phase::Done);
        assert_eq!(state.history.len(), 6);
        assert_eq!(state.logo, "Loading...");
        let last = recorder.frames.last().unwrap();
        assert_eq!(last.0, Phase::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn history_never_shrinks_between_frames() {
        let (_tx, rx) = watch::channel(String::new());
        let mut recorder = Recorder::default();
        play(fallback(AnimationTiming::instant()), &mut recorder, rx).await;
        let lengths: Vec<usize> = recorder.frames.iter().map(|f| f.1).collect();
        assert!(lengths.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(lengths.first(), Some(&0));
        assert_eq!(lengths.last(), Some(&6));
    }

    #[tokio::test(start_paused = true)]
    async fn logo_update_before_reveal_is_used() {
        let (tx, rx) = watch::channel("Loading...".to_string());
        tx.send("v2.0 (model)".to_string()).unwrap();
        let mut recorder = Recorder::default();
        let state = play(fallback(AnimationTiming::instant()), &mut recorder, rx).await;
        assert_eq!(state.logo, "v2.0 (model)");
    }

    #[tokio::test(start_paused = true)]
    async fn default_timing_takes_expected_virtual_time() {
        let record = DialogueRecord {
            id: 1,
            rounds: vec![crate::assets::Round {
                opener_line: "ab".into(),
                responder_line: "c".into(),
            }],
        };
        let (_tx, rx) = watch::channel("L".to_string());
        let start = tokio::time::Instant::now();
        play(
            Sequencer::new(record, "L", AnimationTiming::default()),
            &mut Recorder::default(),
            rx,
        )
        .await;
        // 2×25 + 800 + 60 + 800 + 1500 + 5 + 2000, with timer-wheel rounding
        let expected = Duration::from_millis(5215);
        let elapsed = start.elapsed();
        assert!(elapsed >= expected, "{:?}", elapsed);
        assert!(elapsed < expected + Duration::from_millis(20), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn draw_errors_do_not_stop_the_run() {
        let (_tx, rx) = watch::channel(String::new());
        let state = play(fallback(AnimationTiming::instant()), &mut Broken, rx).await;
        assert_eq!(state.phase, Phase::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn ratatui_surface_draws_frames() {
        let (_tx, rx) = watch::channel(String::new());
        let mut surface = RatatuiSurface::new(TestBackend::new(90, 30)).unwrap();
        play(
            Sequencer::new(DialogueRecord::fallback(), "SON OF ANTON", AnimationTiming::instant()),
            &mut surface,
            rx,
        )
        .await;
        let screen: String = surface
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("SON OF ANTON"));
    }
}
