//! Synchronization Support
//!
//! The descriptor list has no lock of its own. When puts happen in task
//! context and gets in an interrupt handler, wrap the channel in
//! [`SharedChannel`] so every access runs inside a critical section.
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedChannel`] - critical-section protected [`SgChannel`]
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use xps_sgdma::sync::SharedChannel;
//!
//! static CHANNEL: SharedChannel<'static, Mmio, IdentityTranslator> =
//!     SharedChannel::new(unsafe { Mmio::new(0x8060_0000) }, IdentityTranslator);
//!
//! #[interrupt]
//! fn DMA_IRQ() {
//!     CHANNEL.with(|channel| {
//!         let status = channel.interrupt_status();
//!         let _ = channel.service_packets(0, |desc| recycle(desc));
//!         channel.clear_interrupts(status);
//!     });
//! }
//! ```
//!
//! [`SgChannel`]: crate::SgChannel

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::SharedChannel;
