//! Transport bar widget - mute, scheduler state, clock, next chord, and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use ambience::graph::GraphState;

use super::UiState;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, state: &UiState, audio_stats: &AudioStats) {
    let block = Block::default().title(" ambience ").borders(Borders::ALL);

    let (mute_symbol, mute_str, mute_color) = if state.status.muted {
        ("🔇", "Muted", Color::Yellow)
    } else {
        ("🔊", "Sound on", Color::Green)
    };

    let graph_str = match state.status.graph {
        None => "no device",
        Some(GraphState::Suspended) => "suspended",
        Some(GraphState::Running) => "running",
        Some(GraphState::Closed) => "closed",
    };

    let clock_str = match state.status.clock {
        Some(clock) => format!("{clock:7.2}s"),
        None => "   --   ".to_string(),
    };

    let next_str = if state.is_playing() {
        format!(
            "Next: {} @ {:.2}s  ",
            state.next_chord_name(),
            state.status.next_chord_time
        )
    } else {
        "Next: --  ".to_string()
    };

    let rate_str = match state.sample_rate {
        Some(rate) => format!("{:.1}kHz  ", rate / 1000.0),
        None => String::new(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" BPM: {:.0}  ", state.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{mute_symbol} {mute_str}  "),
            Style::default().fg(mute_color),
        ),
        Span::styled(
            format!("Graph: {graph_str}  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Clock: {clock_str}  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(next_str, Style::default().fg(Color::White)),
        Span::styled(rate_str, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
