//! TUI module for ambience
//!
//! Drives the engine once per frame and visualizes what it plays.

mod progression;
mod spectrum;
pub mod state;
mod transport;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::{Duration, Instant};

use ambience::{graph::CpalHost, AmbientEngine};

pub use state::UiState;

use progression::render_progression;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size, also the FFT size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Roughly one display refresh
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct UiApp {
    /// Mono mix copied out of the audio callback
    scope_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    /// Built once the device reports its sample rate
    spectrum: Option<(f32, SpectrumAnalyzer)>,
    started: Instant,
    last_action: Option<&'static str>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(scope_rx: Consumer<f32>) -> Self {
        Self {
            scope_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: None,
            started: Instant::now(),
            last_action: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop; every iteration is one engine frame.
    pub fn run(
        &mut self,
        terminal: &mut DefaultTerminal,
        engine: &mut AmbientEngine<CpalHost>,
    ) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            engine.run_frame(self.started.elapsed().as_secs_f64());

            let state = self.snapshot(engine);
            self.update_spectrum(state.sample_rate);

            terminal.draw(|frame| self.render(frame, &state))?;

            if event::poll(FRAME_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, engine);
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain the scope ring, keeping the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let available = self.scope_rx.slots();
        if available == 0 {
            return;
        }
        if let Ok(chunk) = self.scope_rx.read_chunk(available) {
            self.audio_buffer.extend(chunk);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn snapshot(&self, engine: &AmbientEngine<CpalHost>) -> UiState {
        let tempo = engine.config().schedule.tempo;
        UiState {
            status: engine.status(),
            bpm: tempo.bpm(),
            measure: tempo.measure_duration(),
            sample_rate: engine.device().map(|device| device.sample_rate()),
            last_action: self.last_action,
        }
    }

    fn update_spectrum(&mut self, sample_rate: Option<f32>) {
        let Some(rate) = sample_rate else {
            return;
        };
        let stale = !matches!(&self.spectrum, Some((built_for, _)) if *built_for == rate);
        if stale {
            self.spectrum = Some((rate, SpectrumAnalyzer::new(VIS_BUFFER_SIZE, rate)));
        }
        if let Some((_, analyzer)) = self.spectrum.as_mut() {
            analyzer.update(&self.audio_buffer);
        }
    }

    fn handle_key(&mut self, key: KeyCode, engine: &mut AmbientEngine<CpalHost>) {
        let action = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                if engine.toggle_mute() {
                    "muted"
                } else {
                    "unmuted"
                }
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                engine.play_ambient();
                "ambient"
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                engine.play_hover();
                "hover"
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                engine.play_click();
                "click"
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                engine.play_success();
                "success"
            }
            _ => return,
        };
        self.last_action = Some(action);
    }

    fn render(&self, frame: &mut Frame, state: &UiState) {
        let area = frame.area();

        // Main layout: transport, progression, scope + spectrum, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(5), // Progression
                Constraint::Min(8),    // Visualizers
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, chunks[0], state, &stats);
        render_progression(frame, chunks[1], state);

        let visuals = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, visuals[0], &self.audio_buffer, stats.peak);
        let spectrum = self
            .spectrum
            .as_ref()
            .map(|(_, analyzer)| analyzer.data())
            .unwrap_or(&[]);
        render_spectrum(frame, visuals[1], spectrum);

        let mut help =
            String::from(" [M] Mute  [A] Ambient  [H] Hover  [C] Click  [S] Success  [Q] Quit");
        if let Some(action) = state.last_action {
            help.push_str(&format!("    last: {action}"));
        }
        let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
