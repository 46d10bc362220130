//! Interrupt status handling for the scatter-gather channel.
//!
//! This module provides the [`InterruptStatus`] structure for parsing
//! and managing channel interrupt flags.

use crate::register::channel::{
    INTR_BD, INTR_DMA_DONE, INTR_DMA_ERROR, INTR_PKT_DONE, INTR_PKT_THRESHOLD,
    INTR_PKT_WAIT_BOUND, INTR_SG_DISABLE_ACK, INTR_SG_END,
};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt flags parsed from the interrupt status or enable register.
///
/// The same layout serves both registers, so a value read from one can be
/// written back to clear (status) or to enable (enable) the same sources.
///
/// # Example
///
/// ```ignore
/// let status = channel.interrupt_status();
/// if status.packet_threshold || status.packet_wait_bound {
///     channel.service_packets(0, |desc| handle(desc))?;
/// }
/// channel.clear_interrupts(status);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// Simple DMA transfer done
    pub dma_done: bool,
    /// DMA bus error
    pub dma_error: bool,
    /// A packet finished
    pub packet_done: bool,
    /// Unserviced packet count reached the threshold
    pub packet_threshold: bool,
    /// Packet wait bound expired with packets unserviced
    pub packet_wait_bound: bool,
    /// Engine honoured a stop-after-descriptor bit
    pub sg_disable_ack: bool,
    /// Engine reached the end of the list
    pub sg_end: bool,
    /// Descriptor with interrupt request completed
    pub descriptor_done: bool,
}

impl InterruptStatus {
    /// Create from raw register value
    #[inline]
    pub fn from_raw(status: u32) -> Self {
        Self {
            dma_done: (status & INTR_DMA_DONE) != 0,
            dma_error: (status & INTR_DMA_ERROR) != 0,
            packet_done: (status & INTR_PKT_DONE) != 0,
            packet_threshold: (status & INTR_PKT_THRESHOLD) != 0,
            packet_wait_bound: (status & INTR_PKT_WAIT_BOUND) != 0,
            sg_disable_ack: (status & INTR_SG_DISABLE_ACK) != 0,
            sg_end: (status & INTR_SG_END) != 0,
            descriptor_done: (status & INTR_BD) != 0,
        }
    }

    /// Convert to raw value (write-1-to-clear for status, mask for enable)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.dma_done {
            val |= INTR_DMA_DONE;
        }
        if self.dma_error {
            val |= INTR_DMA_ERROR;
        }
        if self.packet_done {
            val |= INTR_PKT_DONE;
        }
        if self.packet_threshold {
            val |= INTR_PKT_THRESHOLD;
        }
        if self.packet_wait_bound {
            val |= INTR_PKT_WAIT_BOUND;
        }
        if self.sg_disable_ack {
            val |= INTR_SG_DISABLE_ACK;
        }
        if self.sg_end {
            val |= INTR_SG_END;
        }
        if self.descriptor_done {
            val |= INTR_BD;
        }
        val
    }

    /// Packet coalescing sources: threshold reached or wait bound expired
    #[inline]
    #[must_use]
    pub const fn coalescing() -> Self {
        Self {
            dma_done: false,
            dma_error: true,
            packet_done: false,
            packet_threshold: true,
            packet_wait_bound: true,
            sg_disable_ack: false,
            sg_end: false,
            descriptor_done: false,
        }
    }

    /// Check if any interrupt occurred
    #[inline]
    pub fn any(&self) -> bool {
        self.to_raw() != 0
    }

    /// Check if there's a packet ready to service
    #[inline]
    pub fn has_packets(&self) -> bool {
        self.packet_done || self.packet_threshold || self.packet_wait_bound
    }

    /// Check if there's an error condition
    #[inline]
    pub fn has_error(&self) -> bool {
        self.dma_error
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
