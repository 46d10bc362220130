//! Descriptor memory
//!
//! This module provides the pieces shared between software and the
//! scatter-gather engine:
//! - [`BufDescriptor`]: the in-memory descriptor record
//! - [`DescriptorRing`]: the circular list and its put/commit/get protocol
//! - [`AddressTranslator`]: CPU to bus address mapping for descriptor links
//!
//! # Example
//!
//! ```ignore
//! use xps_sgdma::dma::{BufDescriptor, DescriptorRing, IdentityTranslator};
//!
//! let slots = [const { BufDescriptor::new() }; 8];
//! let mut ring = DescriptorRing::new(&slots, &IdentityTranslator);
//! ring.put(&desc)?;
//! ring.commit()?;
//! ```

pub mod descriptor;
pub mod ring;
pub mod translate;

pub use descriptor::BufDescriptor;
pub use ring::DescriptorRing;
pub use translate::{AddressTranslator, IdentityTranslator, OffsetTranslator};
