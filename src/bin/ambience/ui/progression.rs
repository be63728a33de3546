//! Progression widget - the four chords with the sounding one highlighted

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use ambience::sequencing::PROGRESSION;

use super::UiState;

/// Render the chord strip and a bar counting down to the next change
pub fn render_progression(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" Progression ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 || inner.width < 20 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(2),    // Chord cells
            Constraint::Length(1), // Measure progress
        ])
        .split(inner);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, PROGRESSION.len() as u32); PROGRESSION.len()])
        .split(rows[0]);

    let current = state.current_chord().filter(|_| state.is_playing());

    for (i, (chord, cell)) in PROGRESSION.iter().zip(cells.iter()).enumerate() {
        let style = if current == Some(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let notes = chord
            .notes
            .iter()
            .map(|hz| format!("{hz:.0}"))
            .collect::<Vec<_>>()
            .join(" ");

        let lines = vec![
            Line::from(Span::styled(format!("{:>3}  {}", chord.numeral, chord.name), style)),
            Line::from(Span::styled(notes, style)),
        ];
        frame.render_widget(Paragraph::new(lines).style(style), *cell);
    }

    let progress = if state.is_playing() {
        state.measure_progress()
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Yellow))
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!("{} chords played", state.status.chords_played));
    frame.render_widget(gauge, rows[1]);
}
