use tracing::{debug, info, warn};

use crate::graph::{AudioDevice, AudioHost, GraphState};

enum Slot<D> {
    Unopened,
    Open(D),
    /// The host had no audio to offer; stays this way for the session.
    Unavailable,
    Released,
}

/// Owns the one audio device of a session.
///
/// The device is opened lazily on the first [`acquire`](Self::acquire). If the
/// host cannot provide one, the failure is logged once and every later call
/// quietly returns `None`: audio is an enhancement, never a requirement.
pub struct GraphManager<H: AudioHost> {
    host: H,
    slot: Slot<H::Device>,
}

impl<H: AudioHost> GraphManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            slot: Slot::Unopened,
        }
    }

    /// Shared device handle, opening it on first use.
    pub fn acquire(&mut self) -> Option<&mut H::Device> {
        if matches!(self.slot, Slot::Unopened) {
            self.slot = match self.host.open() {
                Ok(device) => {
                    debug!(state = ?device.state(), "Audio graph created.");
                    Slot::Open(device)
                }
                Err(err) => {
                    warn!(%err, "Audio unavailable, continuing without sound.");
                    Slot::Unavailable
                }
            };
        }

        self.device_mut()
    }

    /// Device handle if one is already open. Never opens.
    pub fn device_mut(&mut self) -> Option<&mut H::Device> {
        match &mut self.slot {
            Slot::Open(device) => Some(device),
            _ => None,
        }
    }

    pub fn device(&self) -> Option<&H::Device> {
        match &self.slot {
            Slot::Open(device) => Some(device),
            _ => None,
        }
    }

    pub fn state(&self) -> Option<GraphState> {
        self.device().map(|device| device.state())
    }

    /// Nudge a suspended device into running. Does not wait for it.
    pub fn resume_if_suspended(&mut self) {
        if let Some(device) = self.device_mut() {
            if device.state() == GraphState::Suspended {
                debug!("Resuming suspended audio graph.");
                device.resume();
            }
        }
    }

    /// Close and drop the device. Safe to call repeatedly; once released the
    /// manager stays released.
    pub fn release(&mut self) {
        if let Slot::Open(mut device) = std::mem::replace(&mut self.slot, Slot::Released) {
            device.close();
            info!("Audio graph released.");
        }
    }

    pub fn is_released(&self) -> bool {
        matches!(self.slot, Slot::Released)
    }
}
