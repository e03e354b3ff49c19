use ratatui::buffer::Buffer;
use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget, Wrap};

use crate::animation::sequencer::{AnimationState, Phase, Speaker};

pub const ARENA_WIDTH: u16 = 80;

const OPENER_COLOR: Color = Color::Cyan;
const OPENER_CURSOR: Color = Color::LightCyan;
const RESPONDER_COLOR: Color = Color::Rgb(0xff, 0x8c, 0x00);
const RESPONDER_CURSOR: Color = Color::Rgb(0xff, 0xa5, 0x00);
const FINAL_BLOW_COLOR: Color = Color::DarkGray;

const CURSOR: &str = "▋";
const PROCESSING: &str = "⏳ Processing...";
const TERMINATED: &str = "💀 Claude Code has been terminated...";

/// One full frame of the intro: the arena while the dialogue plays, the
/// logo alone once the reveal starts.
pub struct Arena<'a> {
    state: &'a AnimationState,
}

impl<'a> Arena<'a> {
    pub fn new(state: &'a AnimationState) -> Self {
        Self { state }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let state = self.state;
        let mut lines = vec![
            Line::styled(
                format!(" ⚔️  ROUND {} / {} ⚔️ ", state.round + 1, state.total_rounds),
                Style::default()
                    .fg(OPENER_COLOR)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
        ];

        for entry in &state.history {
            let color = match entry.speaker {
                Speaker::Opener => OPENER_COLOR,
                Speaker::Responder => RESPONDER_COLOR,
            };
            lines.push(label(entry.speaker, color));
            lines.push(Line::styled(entry.text.clone(), Style::default().fg(color)));
            lines.push(Line::default());
        }

        if matches!(state.phase, Phase::Typing { .. } | Phase::Pausing { .. }) {
            let (color, cursor) = match state.speaker {
                Speaker::Opener => (OPENER_COLOR, OPENER_CURSOR),
                Speaker::Responder if is_final_round(state) => {
                    (FINAL_BLOW_COLOR, FINAL_BLOW_COLOR)
                }
                Speaker::Responder => (RESPONDER_COLOR, RESPONDER_CURSOR),
            };
            lines.push(label(state.speaker, color));
            let mut spans = vec![Span::styled(
                state.typed.clone(),
                Style::default().fg(color),
            )];
            if state.is_mid_line() {
                spans.push(Span::styled(CURSOR, Style::default().fg(cursor)));
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn render_logo(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Text::from(self.state.logo.clone()))
            .style(Style::default().fg(OPENER_COLOR))
            .render(area.inner(Margin::new(1, 1)), buf);
    }

    fn render_arena(&self, area: Rect, buf: &mut Buffer) {
        let outer = area.inner(Margin::new(1, 1));
        let width = outer.width.min(ARENA_WIDTH);
        let lines = self.lines();

        let content_height = wrapped_height(&lines, width.saturating_sub(4));
        // keep two rows under the arena for the status line
        let arena_height = content_height
            .saturating_add(4)
            .min(outer.height.saturating_sub(2));
        let arena = Rect::new(outer.x, outer.y, width, arena_height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(OPENER_COLOR))
            .padding(Padding::uniform(1));
        let visible = block.inner(arena).height;
        let scroll = content_height.saturating_sub(visible);

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(arena, buf);

        let status_y = arena.bottom().saturating_add(1);
        if status_y < outer.bottom() {
            Paragraph::new(Line::styled(
                status(self.state),
                Style::default().add_modifier(Modifier::DIM),
            ))
            .render(Rect::new(outer.x, status_y, width, 1), buf);
        }
    }
}

impl Widget for Arena<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.state.revealing {
            self.render_logo(area, buf);
        } else {
            self.render_arena(area, buf);
        }
    }
}

fn label(speaker: Speaker, color: Color) -> Line<'static> {
    let text = match speaker {
        Speaker::Opener => "ANTON:",
        Speaker::Responder => "CLAUDE CODE:",
    };
    Line::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn is_final_round(state: &AnimationState) -> bool {
    state.round + 1 == state.total_rounds
}

fn status(state: &AnimationState) -> &'static str {
    match state.phase {
        Phase::Pausing {
            speaker: Speaker::Responder,
            ..
        } if is_final_round(state) => TERMINATED,
        Phase::RevealPending if state.final_blow_landed() => TERMINATED,
        Phase::Pausing { .. } => PROCESSING,
        _ => "",
    }
}

fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    if width == 0 {
        return lines.len() as u16;
    }
    let width = width as usize;
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}
