//! Channel configuration types.
//!
//! [`ChannelConfig`] collects everything [`SgChannel::configure`] programs in
//! one go: the two coalescing registers, the interrupt enable mask, and the
//! software timing used while stopping the engine.
//!
//! [`SgChannel::configure`]: super::SgChannel::configure

use super::error::{ConfigError, ConfigResult};
use super::interrupt::InterruptStatus;
use crate::constants::{DEFAULT_STOP_POLL_INTERVAL_US, DEFAULT_STOP_TIMEOUT_US, MAX_WAIT_BOUND_MS};

// =============================================================================
// Channel Configuration
// =============================================================================

/// Scatter-gather channel configuration
///
/// # Example
///
/// ```ignore
/// let config = ChannelConfig::new()
///     .with_packet_threshold(8)
///     .with_wait_bound_ms(5);
/// channel.configure(&config)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Unserviced packets that raise the threshold interrupt
    ///
    /// Not range checked; the register keeps the low ten bits, so values
    /// above [`MAX_PACKET_THRESHOLD`](crate::constants::MAX_PACKET_THRESHOLD)
    /// wrap.
    pub packet_threshold: u16,
    /// Milliseconds a packet may wait before the wait-bound interrupt, 0 disables
    pub wait_bound_ms: u16,
    /// Delay between SG-busy polls while stopping, 0 spins without delay
    pub stop_poll_interval_us: u32,
    /// Deadline used by bounded stops
    pub stop_timeout_us: u32,
    /// Interrupt sources to enable
    pub interrupt_enable: InterruptStatus,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelConfig {
    /// Create a configuration with default values
    ///
    /// One packet per interrupt, wait bound disabled, coalescing and error
    /// interrupts enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            packet_threshold: 1,
            wait_bound_ms: 0,
            stop_poll_interval_us: DEFAULT_STOP_POLL_INTERVAL_US,
            stop_timeout_us: DEFAULT_STOP_TIMEOUT_US,
            interrupt_enable: InterruptStatus::coalescing(),
        }
    }

    /// Set the packet count threshold
    #[must_use]
    pub const fn with_packet_threshold(mut self, threshold: u16) -> Self {
        self.packet_threshold = threshold;
        self
    }

    /// Set the packet wait bound in milliseconds
    #[must_use]
    pub const fn with_wait_bound_ms(mut self, ms: u16) -> Self {
        self.wait_bound_ms = ms;
        self
    }

    /// Set the delay between SG-busy polls while stopping
    #[must_use]
    pub const fn with_stop_poll_interval_us(mut self, us: u32) -> Self {
        self.stop_poll_interval_us = us;
        self
    }

    /// Set the deadline used by bounded stops
    #[must_use]
    pub const fn with_stop_timeout_us(mut self, us: u32) -> Self {
        self.stop_timeout_us = us;
        self
    }

    /// Set the interrupt sources to enable
    #[must_use]
    pub const fn with_interrupt_enable(mut self, enable: InterruptStatus) -> Self {
        self.interrupt_enable = enable;
        self
    }

    /// Check the configuration against the hardware ranges
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidWaitBound`] if the wait bound exceeds 1023 ms
    /// - [`ConfigError::InvalidPollInterval`] if the poll interval is longer
    ///   than the stop timeout
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.wait_bound_ms > MAX_WAIT_BOUND_MS {
            return Err(ConfigError::InvalidWaitBound);
        }
        if self.stop_poll_interval_us > self.stop_timeout_us {
            return Err(ConfigError::InvalidPollInterval);
        }
        Ok(())
    }
}

// =============================================================================
// Channel State
// =============================================================================

/// Scatter-gather channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No descriptor list yet
    #[default]
    Uninitialized,
    /// List created, engine never pointed at it
    ListCreated,
    /// Engine stopped with a known position in the list
    Idle,
    /// Engine enabled
    Running,
}

// =============================================================================
// Unit Tests
// =============================================================================
