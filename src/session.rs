//! Session sequencer: packet order, framing and recovery.
//!
//! A run walks a [`FrameList`] and sends it to the sign as one sequence:
//!
//! ```text
//! sequence header                 00 00 00 00 00 01 'Z' '0' '0'
//! [memory configuration]          Initialize only
//! per-frame packets               Update sends STRING fragments only
//! [run sequence]                  Initialize only
//! sequence footer                 04
//! ```
//!
//! Every packet goes out as `02`, a pause, then `payload 03`. If the sequence
//! header cannot be sent, the device is reset once and the header retried.
//! Any other failed send ends the run.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use signwire::compiler::Compiler;
//! use signwire::session::{RunMode, SessionBuilder};
//! use signwire::transport::MockTransport;
//!
//! let frames = Compiler::new().compile("txt a Hello").unwrap();
//! let mut session = SessionBuilder::new()
//!     .packet_delay(Duration::ZERO)
//!     .build(MockTransport::new());
//! session.run(&frames, RunMode::Initialize).unwrap();
//! assert_eq!(session.transport().sends().count(), 8);
//! ```

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::error::{Result, SignError};
use crate::profile::{DeviceProfile, DEFAULT_ENDPOINT};
use crate::protocol::{
    build_frame_packet, build_memory_config, build_run_sequence, EncodedPacket, FrameList,
    PACKET_DELAY, PACKET_FOOTER, PACKET_HEADER, SEQUENCE_FOOTER, SEQUENCE_HEADER,
};
use crate::transport::{hex_preview, Transport};

/// What a run sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Allocate sign memory and send every frame and the display order.
    /// Needed whenever the config changed since the sign was last set up.
    Initialize,
    /// Refresh STRING fragments only, without interrupting the display.
    Update,
}

/// Where a session is in its current (or last) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    SequenceOpen,
    MemConfigSent,
    /// Number of per-frame packets sent so far.
    PerFrameSent(usize),
    RunSeqSent,
    SequenceClosed,
    /// The last run failed.
    Aborted,
}

/// Session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bulk OUT endpoint packets are written to.
    pub endpoint: u8,
    /// Pause after each packet header.
    pub packet_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT,
            packet_delay: PACKET_DELAY,
        }
    }
}

impl SessionConfig {
    pub fn from_profile(profile: &DeviceProfile) -> Self {
        Self {
            endpoint: profile.endpoint,
            packet_delay: profile.packet_delay(),
        }
    }
}

/// Builder for a [`SignSession`].
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take endpoint and packet delay from a device profile.
    pub fn profile(mut self, profile: &DeviceProfile) -> Self {
        self.config = SessionConfig::from_profile(profile);
        self
    }

    /// Set the bulk OUT endpoint.
    ///
    /// Default: 2
    pub fn endpoint(mut self, endpoint: u8) -> Self {
        self.config.endpoint = endpoint;
        self
    }

    /// Set the pause between a packet header and its body.
    ///
    /// Default: 100 ms. The sign drops packets sent faster than this.
    pub fn packet_delay(mut self, delay: Duration) -> Self {
        self.config.packet_delay = delay;
        self
    }

    /// Build a session that owns `transport`.
    pub fn build<T: Transport>(self, transport: T) -> SignSession<T> {
        SignSession {
            transport,
            config: self.config,
            state: SessionState::Idle,
        }
    }
}

/// Sends compiled frames to one sign.
///
/// The session owns its transport, so the device is closed exactly once,
/// when the session is dropped.
pub struct SignSession<T: Transport> {
    transport: T,
    config: SessionConfig,
    state: SessionState,
}

impl<T: Transport> SignSession<T> {
    /// Session with default settings.
    pub fn new(transport: T) -> Self {
        SessionBuilder::new().build(transport)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport, closing nothing.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send `frames` as one sequence.
    ///
    /// An empty list sends nothing. On error no further packets are sent and
    /// the state becomes [`SessionState::Aborted`].
    pub fn run(&mut self, frames: &FrameList, mode: RunMode) -> Result<()> {
        if frames.is_empty() {
            info!("Empty config, nothing to do");
            return Ok(());
        }

        self.state = SessionState::Idle;
        let result = self.run_sequence(frames, mode);
        if let Err(e) = &result {
            error!("Run aborted in state {:?}: {}", self.state, e);
            self.state = SessionState::Aborted;
        }
        result
    }

    fn run_sequence(&mut self, frames: &FrameList, mode: RunMode) -> Result<()> {
        info!(?mode, frames = frames.len(), "Starting sequence");
        self.open_sequence()?;

        if mode == RunMode::Initialize {
            self.send_packet(&build_memory_config(frames))?;
            self.transition(SessionState::MemConfigSent);
        }

        let mut sent = 0;
        for frame in frames {
            if mode == RunMode::Update && frame.is_text() {
                debug!(label = frame.label, "Skipping init-only text frame");
                continue;
            }
            self.send_packet(&build_frame_packet(frame)?)?;
            sent += 1;
            self.state = SessionState::PerFrameSent(sent);
        }
        info!("Sent {} frame packets", sent);

        if mode == RunMode::Initialize {
            self.send_packet(&build_run_sequence(frames))?;
            self.transition(SessionState::RunSeqSent);
        }

        self.send_raw(&SEQUENCE_FOOTER, "sequence footer")?;
        self.transition(SessionState::SequenceClosed);
        Ok(())
    }

    /// Send the sequence header, resetting the device once if that fails.
    fn open_sequence(&mut self) -> Result<()> {
        if let Err(first) = self.send_raw(&SEQUENCE_HEADER, "sequence header") {
            warn!("Sequence header failed ({}), resetting device", first);
            self.transport.reset()?;
            self.send_raw(&SEQUENCE_HEADER, "sequence header")?;
        }
        self.transition(SessionState::SequenceOpen);
        Ok(())
    }

    fn send_packet(&mut self, packet: &EncodedPacket) -> Result<()> {
        let context = packet.kind().describe();
        self.send_raw(&PACKET_HEADER, "packet header")?;
        if !self.config.packet_delay.is_zero() {
            std::thread::sleep(self.config.packet_delay);
        }

        let mut body = Vec::with_capacity(packet.len() + PACKET_FOOTER.len());
        body.extend_from_slice(packet.bytes());
        body.extend_from_slice(&PACKET_FOOTER);
        self.send_raw(&body, context)
    }

    /// One blocking write that must be accepted in full.
    fn send_raw(&mut self, data: &[u8], context: &'static str) -> Result<()> {
        debug!(
            endpoint = self.config.endpoint,
            bytes = data.len(),
            "Sending {}: {}",
            context,
            hex_preview(data)
        );
        let sent = self.transport.send(self.config.endpoint, data)?;
        if sent != data.len() {
            error!("Bad send size {} of {} bytes for {}", sent, data.len(), context);
            return Err(SignError::Transport {
                context,
                requested: data.len(),
                sent,
            });
        }
        Ok(())
    }

    fn transition(&mut self, state: SessionState) {
        info!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
