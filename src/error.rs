/// Failures while opening an audio output device.
///
/// These never escape the engine: the graph manager logs them and carries on
/// with audio disabled.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("failed to query default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("unsupported output sample format: {0}")]
    UnsupportedFormat(String),
}
