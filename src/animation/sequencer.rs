//! Timer-free state machine behind the intro animation.
//!
//! [`Sequencer::advance`] performs one tick and reports how long to wait
//! before the next one. Nothing here sleeps; the player owns the clock.

use std::time::Duration;

use crate::assets::DialogueRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Opener,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing { round: usize, speaker: Speaker },
    Pausing { round: usize, speaker: Speaker },
    RevealPending,
    Revealing,
    Done,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Wait this long, then call `advance` again.
    Continue(Duration),
    /// The run is over. Returned once; the sequencer is then spent.
    Done,
}

/// A line that finished typing. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub round: usize,
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationTiming {
    pub opener_char: Duration,
    pub responder_char: Duration,
    pub final_responder_char: Duration,
    pub pause: Duration,
    pub suspense: Duration,
    pub logo_char: Duration,
    pub hold: Duration,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            opener_char: Duration::from_millis(25),
            responder_char: Duration::from_millis(35),
            final_responder_char: Duration::from_millis(60),
            pause: Duration::from_millis(800),
            suspense: Duration::from_millis(1500),
            logo_char: Duration::from_millis(5),
            hold: Duration::from_millis(2000),
        }
    }
}

impl AnimationTiming {
    /// Every delay set to zero, for tests that only care about order.
    pub fn instant() -> Self {
        Self {
            opener_char: Duration::ZERO,
            responder_char: Duration::ZERO,
            final_responder_char: Duration::ZERO,
            pause: Duration::ZERO,
            suspense: Duration::ZERO,
            logo_char: Duration::ZERO,
            hold: Duration::ZERO,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationState {
    pub phase: Phase,
    pub round: usize,
    pub total_rounds: usize,
    pub speaker: Speaker,
    pub history: Vec<HistoryEntry>,
    /// Set when the reveal phase starts; never cleared.
    pub revealing: bool,
    /// Revealed prefix of the line being typed.
    pub typed: String,
    /// Revealed prefix of the logo.
    pub logo: String,
}

impl AnimationState {
    /// True while the current line still has characters to type.
    pub fn is_mid_line(&self) -> bool {
        matches!(self.phase, Phase::Typing { .. })
    }

    /// The closing exchange has been delivered.
    pub fn final_blow_landed(&self) -> bool {
        self.history.len() == self.total_rounds * 2
    }
}

pub struct Sequencer {
    record: DialogueRecord,
    timing: AnimationTiming,
    logo: Vec<char>,
    line: Vec<char>,
    typed_chars: usize,
    logo_chars: usize,
    logo_complete: bool,
    state: AnimationState,
}

impl Sequencer {
    /// Start a run at `Typing(0, opener)`.
    ///
    /// A record without rounds is replaced by the built-in fallback so the
    /// round index always stays in range.
    pub fn new(record: DialogueRecord, logo: &str, timing: AnimationTiming) -> Self {
        let record = if record.is_playable() {
            record
        } else {
            tracing::warn!(id = record.id, "Dialogue record has no rounds; using fallback");
            DialogueRecord::fallback()
        };
        let total_rounds = record.rounds.len();
        let line = record.rounds[0].opener_line.chars().collect();
        Self {
            record,
            timing,
            logo: logo.chars().collect(),
            line,
            typed_chars: 0,
            logo_chars: 0,
            logo_complete: false,
            state: AnimationState {
                phase: Phase::Typing {
                    round: 0,
                    speaker: Speaker::Opener,
                },
                round: 0,
                total_rounds,
                speaker: Speaker::Opener,
                history: Vec::with_capacity(total_rounds * 2),
                revealing: false,
                typed: String::new(),
                logo: String::new(),
            },
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn into_state(self) -> AnimationState {
        self.state
    }

    pub fn record_id(&self) -> u64 {
        self.record.id
    }

    /// Delay before the first tick.
    pub fn initial_delay(&self) -> Duration {
        self.char_delay(0, Speaker::Opener)
    }

    /// Swap the logo text. Ignored once the reveal has started.
    pub fn set_logo(&mut self, logo: &str) -> bool {
        if self.state.revealing {
            return false;
        }
        self.logo = logo.chars().collect();
        true
    }

    pub fn advance(&mut self) -> Tick {
        match self.state.phase {
            Phase::Typing { round, speaker } => {
                if self.typed_chars < self.line.len() {
                    self.state.typed.push(self.line[self.typed_chars]);
                    self.typed_chars += 1;
                }
                if self.typed_chars >= self.line.len() {
                    self.state.phase = Phase::Pausing { round, speaker };
                    return Tick::Continue(self.timing.pause);
                }
                Tick::Continue(self.char_delay(round, speaker))
            }
            Phase::Pausing { round, speaker } => {
                self.state.history.push(HistoryEntry {
                    round,
                    speaker,
                    text: std::mem::take(&mut self.state.typed),
                });
                match speaker {
                    Speaker::Opener => self.start_line(round, Speaker::Responder),
                    Speaker::Responder if round + 1 < self.state.total_rounds => {
                        self.start_line(round + 1, Speaker::Opener)
                    }
                    Speaker::Responder => {
                        self.state.phase = Phase::RevealPending;
                        Tick::Continue(self.timing.suspense)
                    }
                }
            }
            Phase::RevealPending => {
                self.state.phase = Phase::Revealing;
                self.state.revealing = true;
                Tick::Continue(self.timing.logo_char)
            }
            Phase::Revealing => {
                if self.logo_complete {
                    self.state.phase = Phase::Done;
                    return Tick::Done;
                }
                if self.logo_chars < self.logo.len() {
                    self.state.logo.push(self.logo[self.logo_chars]);
                    self.logo_chars += 1;
                }
                if self.logo_chars >= self.logo.len() {
                    self.logo_complete = true;
                    return Tick::Continue(self.timing.hold);
                }
                Tick::Continue(self.timing.logo_char)
            }
            Phase::Done => Tick::Done,
        }
    }

    fn start_line(&mut self, round: usize, speaker: Speaker) -> Tick {
        let round_lines = &self.record.rounds[round];
        let text = match speaker {
            Speaker::Opener => &round_lines.opener_line,
            Speaker::Responder => &round_lines.responder_line,
        };
        self.line = text.chars().collect();
        self.typed_chars = 0;
        self.state.round = round;
        self.state.speaker = speaker;
        self.state.phase = Phase::Typing { round, speaker };
        Tick::Continue(self.char_delay(round, speaker))
    }

    fn char_delay(&self, round: usize, speaker: Speaker) -> Duration {
        match speaker {
            Speaker::Opener => self.timing.opener_char,
            Speaker::Responder if round + 1 == self.state.total_rounds => {
                self.timing.final_responder_char
            }
            Speaker::Responder => self.timing.responder_char,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Round;

    fn record(lines: &[(&str, &str)]) -> DialogueRecord {
        DialogueRecord {
            id: 7,
            rounds: lines
                .iter()
                .map(|(opener, responder)| Round {
                    opener_line: opener.to_string(),
                    responder_line: responder.to_string(),
                })
                .collect(),
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn typing_reveals_one_char_per_tick() {
        let mut seq = Sequencer::new(record(&[("abc", "xy")]), "L", AnimationTiming::default());
        assert_eq!(seq.initial_delay(), ms(25));
        assert_eq!(seq.advance(), Tick::Continue(ms(25)));
        assert_eq!(seq.state().typed, "a");
        assert!(seq.state().is_mid_line());
        assert_eq!(seq.advance(), Tick::Continue(ms(25)));
        assert_eq!(seq.advance(), Tick::Continue(ms(800)));
        assert_eq!(seq.state().typed, "abc");
        assert_eq!(
            seq.state().phase,
            Phase::Pausing {
                round: 0,
                speaker: Speaker::Opener
            }
        );
        assert!(seq.state().history.is_empty());
    }

    #[test]
    fn history_is_appended_when_pause_ends() {
        let mut seq = Sequencer::new(record(&[("a", "b")]), "L", AnimationTiming::default());
        seq.advance();
        // final round: the responder types slowly
        assert_eq!(seq.advance(), Tick::Continue(ms(60)));
        assert_eq!(seq.state().history.len(), 1);
        assert_eq!(seq.state().history[0].text, "a");
        assert_eq!(seq.state().typed, "");
        assert_eq!(seq.state().speaker, Speaker::Responder);
    }

    #[test]
    fn responder_speed_depends_on_round() {
        let mut seq = Sequencer::new(
            record(&[("a", "bb"), ("c", "dd")]),
            "L",
            AnimationTiming::default(),
        );
        seq.advance();
        assert_eq!(seq.advance(), Tick::Continue(ms(35)));
        assert_eq!(seq.advance(), Tick::Continue(ms(35)));
        seq.advance();
        assert_eq!(seq.advance(), Tick::Continue(ms(25)));
        seq.advance();
        assert_eq!(seq.advance(), Tick::Continue(ms(60)));
    }

    #[test]
    fn empty_line_goes_straight_to_pause() {
        let mut seq = Sequencer::new(record(&[("", "b")]), "L", AnimationTiming::default());
        assert_eq!(seq.advance(), Tick::Continue(ms(800)));
        seq.advance();
        assert_eq!(seq.state().history[0].text, "");
    }

    #[test]
    fn reveal_then_hold_then_done() {
        let mut seq = Sequencer::new(record(&[("a", "b")]), "LO", AnimationTiming::default());
        for _ in 0..3 {
            seq.advance();
        }
        assert_eq!(seq.advance(), Tick::Continue(ms(1500)));
        assert_eq!(seq.state().phase, Phase::RevealPending);
        assert!(seq.state().final_blow_landed());
        assert_eq!(seq.advance(), Tick::Continue(ms(5)));
        assert!(seq.state().revealing);
        assert_eq!(seq.advance(), Tick::Continue(ms(5)));
        assert_eq!(seq.state().logo, "L");
        assert_eq!(seq.advance(), Tick::Continue(ms(2000)));
        assert_eq!(seq.state().logo, "LO");
        assert_eq!(seq.advance(), Tick::Done);
        assert_eq!(seq.state().phase, Phase::Done);
    }

    #[test]
    fn logo_can_change_until_reveal() {
        let mut seq = Sequencer::new(record(&[("a", "b")]), "Loading...", AnimationTiming::default());
        assert!(seq.set_logo("v1"));
        for _ in 0..5 {
            seq.advance();
        }
        assert!(seq.state().revealing);
        assert!(!seq.set_logo("v2"));
        seq.advance();
        seq.advance();
        assert_eq!(seq.state().logo, "v1");
    }

    #[test]
    fn unplayable_record_falls_back() {
        let seq = Sequencer::new(
            DialogueRecord {
                id: 9,
                rounds: Vec::new(),
            },
            "L",
            AnimationTiming::default(),
        );
        assert_eq!(seq.record_id(), 0);
        assert_eq!(seq.state().total_rounds, 3);
    }

    #[test]
    fn multibyte_chars_reveal_whole() {
        let mut seq = Sequencer::new(record(&[("⚔é", "b")]), "L", AnimationTiming::default());
        seq.advance();
        assert_eq!(seq.state().typed, "⚔");
        seq.advance();
        assert_eq!(seq.state().typed, "⚔é");
    }
}
