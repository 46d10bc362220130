//! Core driver components for the scatter-gather DMA channel.
//!
//! This module contains the building blocks for operating one channel:
//!
//! - [`channel`] - [`SgChannel`] and descriptor list operations
//! - [`config`] - Configuration builder and channel state
//! - [`error`] - Error types and result aliases
//! - [`interrupt`] - Interrupt status parsing
//!
//! Start/stop sequencing and the packet coalescing counters are further
//! `impl` blocks on [`SgChannel`].
//!
//! # Example
//!
//! ```ignore
//! use xps_sgdma::driver::{ChannelConfig, SgChannel};
//!
//! let config = ChannelConfig::new()
//!     .with_packet_threshold(4)
//!     .with_wait_bound_ms(2);
//! channel.configure(&config)?;
//! ```

// Submodules
pub mod channel;
mod coalesce;
pub mod config;
pub mod error;
pub mod interrupt;
mod sequencer;

// Re-exports for convenience
pub use channel::SgChannel;
pub use config::{ChannelConfig, State};
pub use error::{
    ConfigError, ConfigResult, Error, Result, RingError, RingResult, TransferError, TransferResult,
};
pub use interrupt::InterruptStatus;
