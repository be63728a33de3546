//! Spectrum analyzer widget
//!
//! Windowed FFT of the scope buffer, sampled at log-spaced frequencies over
//! the range the progression actually occupies.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of points on the curve
const SPECTRUM_POINTS: usize = 64;
/// Below the lowest chord tone (F3 ≈ 175 Hz) with room to spare
const MIN_FREQ: f64 = 60.0;
/// Well above the highest effect tone (800 Hz hover) and its harmonics
const MAX_FREQ: f64 = 5_000.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    /// Hann window
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin for each plotted point
    bins: Vec<usize>,
    /// (log10 frequency, magnitude in dB) per point
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the buffers passed to
    /// [`update`](Self::update).
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let nyquist = sample_rate as f64 / 2.0;
        let top = MAX_FREQ.min(nyquist).max(MIN_FREQ * 2.0);
        let ratio = top / MIN_FREQ;
        let last_bin = buffer_len / 2 - 1;

        let mut bins = Vec::with_capacity(SPECTRUM_POINTS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_POINTS);
        for i in 0..SPECTRUM_POINTS {
            let t = i as f64 / (SPECTRUM_POINTS - 1) as f64;
            let freq = MIN_FREQ * ratio.powf(t);
            let bin = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bins.push(bin.min(last_bin));
            spectrum.push((freq.log10(), FLOOR_DB));
        }

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            bins,
            spectrum,
        }
    }

    /// Recompute from `buffer`. Ignored if the length does not match.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (point, &bin) in self.spectrum.iter_mut().zip(&self.bins) {
            let power = self.scratch[bin].norm_sqr().max(1e-12);
            point.1 = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum analyzer widget
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let max_db = spectrum.iter().map(|(_, db)| *db).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([MIN_FREQ.log10(), MAX_FREQ.log10()])
                .labels(vec!["60", "500", "5k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
