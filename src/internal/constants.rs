//! Internal constants
//!
//! Timing defaults and field ranges used by the channel driver. Re-exported
//! publicly through [`crate::constants`].
//!
//! # Note
//!
//! Register offsets and bit definitions live in
//! [`register::channel`](crate::register::channel) and
//! [`dma::descriptor::bits`](crate::dma::descriptor::bits).

// =============================================================================
// Coalescing Ranges
// =============================================================================

/// Largest packet wait bound the hardware accepts, in milliseconds
pub const MAX_WAIT_BOUND_MS: u16 = 1023;

/// Largest packet count threshold the register field holds
pub const MAX_PACKET_THRESHOLD: u16 = 1023;

// =============================================================================
// Timing Constants
// =============================================================================

/// Default delay between SG-busy polls while stopping, in microseconds
pub const DEFAULT_STOP_POLL_INTERVAL_US: u32 = 1;

/// Default deadline for a bounded stop, in microseconds
pub const DEFAULT_STOP_TIMEOUT_US: u32 = 10_000;
