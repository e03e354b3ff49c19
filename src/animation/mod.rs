//! Intro animation: a scripted multi-round dialogue with typewriter reveal,
//! closed by the branded logo.

mod player;
mod render;
mod sequencer;

pub use player::{play, RatatuiSurface, Surface};
pub use render::{Arena, ARENA_WIDTH};
pub use sequencer::{
    AnimationState, AnimationTiming, HistoryEntry, Phase, Sequencer, Speaker, Tick,
};
