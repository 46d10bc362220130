//! Scatter-Gather DMA Channel Driver
//!
//! A `no_std`, `no_alloc` driver for a descriptor-based scatter-gather DMA
//! channel with packet interrupt coalescing.
//!
//! Software queues transfers as descriptors in a circular list carved from
//! caller memory. The engine walks the list through each descriptor's next
//! link and halts after any descriptor marked "stop after me". Descriptors
//! are exposed to the engine in committed batches, so a packet spanning
//! several descriptors is never started half-written.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Descriptor Layer** ([`dma`]): descriptor record, ring protocol, address translation
//! 2. **Register Layer** ([`register`]): [`RegisterIo`] capability and the channel register map
//! 3. **Channel Layer** ([`driver`]): [`SgChannel`] with list operations, start/stop
//!    sequencing and coalescing counters
//!
//! # Descriptor Protocol
//!
//! - **put** copies a descriptor into the next free slot, forced to stop the
//!   engine and marked busy
//! - **commit** clears the one stop bit that lets the engine flow into the
//!   descriptors put since the previous commit
//! - **get** hands back the oldest slot; its status word tells whether the
//!   engine has finished with it
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and lifecycle logging
//! - `log`: Enable warnings for hardware anomalies through the `log` facade
//! - `critical-section`: Enable the ISR-safe `SharedChannel` wrapper
//!
//! # Example
//!
//! ```ignore
//! use xps_sgdma::{BufDescriptor, IdentityTranslator, Mmio, SgChannel};
//! use xps_sgdma::dma::descriptor::bits::control;
//!
//! static mut BDS: [BufDescriptor; 16] = [const { BufDescriptor::new() }; 16];
//!
//! let io = unsafe { Mmio::new(0x8060_0000) };
//! let mut channel = SgChannel::new(io, IdentityTranslator);
//! channel.create_list_in(unsafe { &mut *core::ptr::addr_of_mut!(BDS) })?;
//!
//! let desc = BufDescriptor::new();
//! desc.set_control(control::SOURCE_INCR | control::DEST_LOCAL);
//! desc.set_source_address(frame_addr);
//! desc.set_length(frame_len);
//! desc.set_packet_end(true);
//!
//! channel.put_descriptor(&desc)?;
//! channel.commit_puts()?;
//! channel.start()?;
//!
//! // Later, from the coalescing interrupt
//! channel.service_packets(0, |done| recycle(done))?;
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports
)]

// =============================================================================
// Modules
// =============================================================================

pub mod dma;
pub mod driver;
pub mod register;

// Internal implementation details
mod internal;

// Synchronization primitives (requires critical-section)
#[cfg(feature = "critical-section")]
pub mod sync;

#[cfg(test)]
pub mod testing;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use dma::{AddressTranslator, BufDescriptor, DescriptorRing, IdentityTranslator, OffsetTranslator};
pub use driver::config::{ChannelConfig, State};
pub use driver::error::{
    ConfigError, ConfigResult, Error, Result, RingError, RingResult, TransferError, TransferResult,
};
pub use driver::interrupt::InterruptStatus;
pub use driver::SgChannel;
pub use register::{Mmio, RegisterIo};

#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedChannel};

/// Shared driver constants.
///
/// Timing defaults and coalescing field ranges.
pub mod constants {
    pub use crate::internal::constants::{
        // Timing
        DEFAULT_STOP_POLL_INTERVAL_US,
        DEFAULT_STOP_TIMEOUT_US,
        // Coalescing ranges
        MAX_PACKET_THRESHOLD,
        MAX_WAIT_BOUND_MS,
    };
}
