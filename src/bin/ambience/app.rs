//! Ambience - application builder and runner

use color_eyre::eyre::Result as EyreResult;

use ambience::{graph::CpalHost, AmbientEngine, EngineConfig};

use super::ui::{UiApp, VIS_BUFFER_SIZE};

/// Main application builder
pub struct Ambience {
    config: EngineConfig,
}

impl Ambience {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Run the application until the user quits
    pub fn run(self) -> EyreResult<()> {
        // Several frames of slack so the UI can miss a draw without gaps
        let (host, scope) = CpalHost::with_scope(VIS_BUFFER_SIZE * 8);
        let mut engine = AmbientEngine::new(host, self.config);

        let mut terminal = ratatui::init();
        let result = UiApp::new(scope).run(&mut terminal, &mut engine);
        ratatui::restore();

        engine.shutdown();
        result
    }
}

impl Default for Ambience {
    fn default() -> Self {
        Self::new()
    }
}
