//! Scriptable in-memory transport.
//!
//! Each send consumes the next scripted [`SendOutcome`]; once the script runs
//! out every send is accepted in full. Every call is recorded in order.
//!
//! # Example
//!
//! ```
//! use signwire::transport::{MockTransport, SendOutcome, Transport};
//!
//! let mut mock = MockTransport::new().with_outcomes([SendOutcome::Short(0)]);
//! assert_eq!(mock.send(2, b"abc").unwrap(), 0);
//! assert_eq!(mock.send(2, b"abc").unwrap(), 3);
//! assert_eq!(mock.sends().count(), 2);
//! ```

use std::collections::VecDeque;

use bytes::Bytes;

use super::Transport;
use crate::error::{Result, SignError};

/// What the next send reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Accept every byte.
    Full,
    /// Accept only this many bytes.
    Short(usize),
    /// Fail with a device error.
    Fail,
}

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Send { endpoint: u8, data: Bytes },
    Reset,
}

/// Test transport with scripted send results.
#[derive(Debug, Default)]
pub struct MockTransport {
    outcomes: VecDeque<SendOutcome>,
    fail_reset: bool,
    events: Vec<MockEvent>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for the next sends.
    pub fn with_outcomes(mut self, outcomes: impl IntoIterator<Item = SendOutcome>) -> Self {
        self.outcomes.extend(outcomes);
        self
    }

    /// Make every reset fail.
    pub fn with_failing_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// All recorded calls, in order.
    pub fn events(&self) -> &[MockEvent] {
        &self.events
    }

    /// Data of every send, in order.
    pub fn sends(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.events.iter().filter_map(|event| match event {
            MockEvent::Send { data, .. } => Some(&data[..]),
            MockEvent::Reset => None,
        })
    }

    /// Number of resets requested.
    pub fn reset_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, MockEvent::Reset))
            .count()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, endpoint: u8, data: &[u8]) -> Result<usize> {
        self.events.push(MockEvent::Send {
            endpoint,
            data: Bytes::copy_from_slice(data),
        });
        match self.outcomes.pop_front().unwrap_or(SendOutcome::Full) {
            SendOutcome::Full => Ok(data.len()),
            SendOutcome::Short(n) => Ok(n.min(data.len())),
            SendOutcome::Fail => Err(SignError::Device {
                code: -1,
                message: "scripted send failure".into(),
            }),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.events.push(MockEvent::Reset);
        if self.fail_reset {
            return Err(SignError::Device {
                code: -4,
                message: "scripted reset failure".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_sends_in_order() {
        let mut mock = MockTransport::new();
        mock.send(2, b"one").unwrap();
        mock.reset().unwrap();
        mock.send(3, b"two").unwrap();

        assert_eq!(
            mock.events()[0],
            MockEvent::Send {
                endpoint: 2,
                data: Bytes::from_static(b"one")
            }
        );
        assert_eq!(mock.events()[1], MockEvent::Reset);
        assert_eq!(mock.sends().collect::<Vec<_>>(), vec![&b"one"[..], &b"two"[..]]);
        assert_eq!(mock.reset_count(), 1);
    }

    #[test]
    fn test_scripted_outcomes() {
        let mut mock = MockTransport::new().with_outcomes([
            SendOutcome::Fail,
            SendOutcome::Short(1),
            SendOutcome::Short(99),
        ]);
        assert!(mock.send(2, b"abc").is_err());
        assert_eq!(mock.send(2, b"abc").unwrap(), 1);
        assert_eq!(mock.send(2, b"abc").unwrap(), 3);
        assert_eq!(mock.send(2, b"abc").unwrap(), 3);
    }

    #[test]
    fn test_failing_reset() {
        let mut mock = MockTransport::new().with_failing_reset();
        assert!(mock.reset().is_err());
        assert_eq!(mock.reset_count(), 1);
    }
}
