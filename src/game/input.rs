//! Lock-free input buffer between the input collaborator and the tick loop
//!
//! Uses crossbeam-channel so any number of producers can submit commands
//! without blocking; the session drains everything at the start of a tick.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::game::constants::input::{BUFFER_CAPACITY, DOUBLE_TAP_MS};
use crate::util::vec2::Vec2;

/// Command from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// World-space steering target; `None` holds the current centroid
    MoveTarget(Option<Vec2>),
    Split,
    Eject,
}

/// Bounded command buffer owned by the session
pub struct InputBuffer {
    sender: Sender<InputCommand>,
    receiver: Receiver<InputCommand>,
    capacity: usize,
}

impl InputBuffer {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Create a new sender handle for a producer
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Try to submit a command (non-blocking)
    #[inline]
    pub fn try_submit(&self, command: InputCommand) -> Result<(), InputBufferError> {
        self.sender.try_send(command).map_err(InputBufferError::from)
    }

    /// Drain all pending commands for this tick, in submission order
    pub fn drain(&self) -> Vec<InputCommand> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(BUFFER_CAPACITY)
    }
}

/// Clonable sender handle
#[derive(Clone)]
pub struct InputSender {
    sender: Sender<InputCommand>,
}

impl InputSender {
    /// Submit a command (non-blocking)
    #[inline]
    pub fn try_send(&self, command: InputCommand) -> Result<(), InputBufferError> {
        self.sender.try_send(command).map_err(InputBufferError::from)
    }
}

/// Input buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputBufferError {
    /// Buffer is full (backpressure)
    #[error("input buffer is full")]
    Full,
    /// Session was dropped
    #[error("input buffer is disconnected")]
    Disconnected,
}

impl<T> From<TrySendError<T>> for InputBufferError {
    fn from(e: TrySendError<T>) -> Self {
        match e {
            TrySendError::Full(_) => InputBufferError::Full,
            TrySendError::Disconnected(_) => InputBufferError::Disconnected,
        }
    }
}

/// Turns raw taps into split commands: two taps within the double-tap
/// window produce one `Split`.
#[derive(Debug, Clone)]
pub struct TapDetector {
    last_tap: Option<u64>,
    window_ms: u64,
}

impl TapDetector {
    pub fn new(window_ms: u64) -> Self {
        Self {
            last_tap: None,
            window_ms,
        }
    }

    /// Register a tap at `now` (ms)
    pub fn tap(&mut self, now: u64) -> Option<InputCommand> {
        match self.last_tap {
            Some(previous) if now.saturating_sub(previous) < self.window_ms => {
                self.last_tap = None;
                Some(InputCommand::Split)
            }
            _ => {
                self.last_tap = Some(now);
                None
            }
        }
    }
}

impl Default for TapDetector {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_MS)
    }
}
