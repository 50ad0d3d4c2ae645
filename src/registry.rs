//! Ownership of LED output channels and pins.
//!
//! A portable claim table built on `critical-section` and `heapless::Vec`.
//! Only setup paths touch it, never the frame path.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use heapless::Vec;

/// Maximum number of ports claimed at the same time.
pub const MAX_CLAIMS: usize = 8;

/// Hardware output channel and data pin of an LED strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPort {
    pub channel: u8,
    pub pin: u8,
}

impl LedPort {
    pub const fn new(channel: u8, pin: u8) -> Self {
        Self { channel, pin }
    }

    /// Whether both ports share a channel or a pin
    pub const fn overlaps(self, other: LedPort) -> bool {
        self.channel == other.channel || self.pin == other.pin
    }
}

/// Error returned when a port cannot be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    /// The channel or pin is owned by the given port
    Conflict(LedPort),
    /// The claim table is full
    Full,
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimError::Conflict(owner) => write!(
                f,
                "Port is owned by channel {} pin {}",
                owner.channel, owner.pin
            ),
            ClaimError::Full => write!(f, "Claim table is full"),
        }
    }
}

/// Table of claimed LED ports.
///
/// Thread/interrupt safe via critical sections.
pub struct PeripheralRegistry {
    claimed: Mutex<RefCell<Vec<LedPort, MAX_CLAIMS>>>,
}

impl PeripheralRegistry {
    /// Create a new empty registry.
    pub const fn new() -> Self {
        Self {
            claimed: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Claim `port`, returning a guard that releases it on drop.
    pub fn claim(&self, port: LedPort) -> Result<PortClaim<'_>, ClaimError> {
        critical_section::with(|cs| {
            let mut claimed = self.claimed.borrow(cs).borrow_mut();
            if let Some(owner) = claimed.iter().find(|owner| owner.overlaps(port)) {
                return Err(ClaimError::Conflict(*owner));
            }
            claimed.push(port).map_err(|_| ClaimError::Full)
        })?;

        Ok(PortClaim {
            registry: self,
            port,
        })
    }

    /// Check if any claim covers the port's channel or pin.
    pub fn is_claimed(&self, port: LedPort) -> bool {
        critical_section::with(|cs| {
            self.claimed
                .borrow(cs)
                .borrow()
                .iter()
                .any(|owner| owner.overlaps(port))
        })
    }

    fn release(&self, port: LedPort) {
        critical_section::with(|cs| {
            self.claimed
                .borrow(cs)
                .borrow_mut()
                .retain(|owner| *owner != port);
        });
    }
}

impl Default for PeripheralRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive ownership of a claimed [`LedPort`].
pub struct PortClaim<'a> {
    registry: &'a PeripheralRegistry,
    port: LedPort,
}

impl PortClaim<'_> {
    pub const fn port(&self) -> LedPort {
        self.port
    }
}

impl Drop for PortClaim<'_> {
    fn drop(&mut self) {
        self.registry.release(self.port);
    }
}
