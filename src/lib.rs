//! # signwire
//!
//! Driver for BetaBrite Prism LED message signs over USB.
//!
//! Messages are described in a small line-based config language, compiled to
//! a list of sign frames, encoded to the sign's binary protocol and sent over
//! a bulk USB endpoint.
//!
//! ## Architecture
//!
//! - **Compiler** ([`compiler`]): `txt`/`cmd` lines to a [`FrameList`], with
//!   inline [`markup`] and label allocation
//! - **Protocol** ([`protocol`]): frame model, label pool and the four packet
//!   encoders
//! - **Session** ([`session`]): sequence framing, timing and reset-retry
//! - **Transport** ([`transport`]): USB (`usb` feature), null and mock links
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use signwire::{Compiler, NullTransport, RunMode, SessionBuilder};
//!
//! let config = "\
//! // clock
//! txt b <color030>Time:
//! txt nX
//! ";
//!
//! let frames = Compiler::new().compile(config).unwrap();
//! let mut session = SessionBuilder::new()
//!     .packet_delay(Duration::ZERO)
//!     .build(NullTransport::new());
//! session.run(&frames, RunMode::Initialize).unwrap();
//! ```

pub mod compiler;
pub mod error;
pub mod markup;
pub mod profile;
pub mod protocol;
pub mod session;
pub mod transport;

#[cfg(test)]
mod log_capture;

pub use compiler::{CommandRunner, Compiler, CompilerOptions, ShellCommandRunner};
pub use error::{Result, SignError};
pub use profile::DeviceProfile;
pub use protocol::{Frame, FrameKind, FrameList};
pub use session::{RunMode, SessionBuilder, SessionConfig, SessionState, SignSession};
pub use transport::{MockTransport, NullTransport, Transport};
#[cfg(feature = "usb")]
pub use transport::{UsbFlavor, UsbTransport};
