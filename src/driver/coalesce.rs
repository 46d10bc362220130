//! Packet coalescing counters.
//!
//! The engine counts completed packets in the unserviced packet count
//! register. An interrupt fires when the count reaches the threshold, or when
//! the oldest unserviced packet has waited longer than the wait bound. Each
//! write of 1 to the count register acknowledges one packet.

#[cfg(feature = "log")]
use log::warn;

use super::SgChannel;
use super::error::Result;
use crate::constants::MAX_WAIT_BOUND_MS;
use crate::dma::descriptor::BufDescriptor;
use crate::dma::translate::AddressTranslator;
use crate::register::RegisterIo;
use crate::register::channel::{PCT_MASK, PWB_MASK, UPC_MASK};

impl<'a, R: RegisterIo, T: AddressTranslator> SgChannel<'a, R, T> {
    /// Packets completed by the engine and not yet acknowledged
    #[inline]
    #[must_use]
    pub fn packet_count(&self) -> u32 {
        self.regs.packet_count() & UPC_MASK
    }

    /// Acknowledge one serviced packet
    ///
    /// Does nothing when the count is already zero.
    pub fn decrement_packet_count(&mut self) {
        if self.packet_count() > 0 {
            self.regs.set_packet_count(1);
        }
    }

    /// Set the packet count threshold
    ///
    /// Any value is accepted. A threshold above the list capacity can never
    /// be reached, leaving the wait bound as the only interrupt source. The
    /// register field holds values up to
    /// [`MAX_PACKET_THRESHOLD`](crate::constants::MAX_PACKET_THRESHOLD);
    /// higher bits are dropped by the hardware.
    pub fn set_packet_threshold(&mut self, threshold: u16) {
        #[cfg(feature = "log")]
        if threshold > crate::constants::MAX_PACKET_THRESHOLD {
            warn!(
                "SG: packet threshold {} wider than the {} register field",
                threshold,
                crate::constants::MAX_PACKET_THRESHOLD
            );
        } else if let Some(ring) = &self.ring
            && usize::from(threshold) > ring.capacity()
        {
            warn!(
                "SG: packet threshold {} exceeds list capacity {}",
                threshold,
                ring.capacity()
            );
        }

        self.regs.set_packet_threshold(u32::from(threshold));
    }

    /// Current packet count threshold
    #[inline]
    #[must_use]
    pub fn packet_threshold(&self) -> u16 {
        (self.regs.packet_threshold() & PCT_MASK) as u16
    }

    /// Set the packet wait bound in milliseconds, 0 disables it
    ///
    /// # Panics
    ///
    /// Panics if `ms` is above 1023.
    pub fn set_wait_bound(&mut self, ms: u16) {
        assert!(
            ms <= MAX_WAIT_BOUND_MS,
            "wait bound {ms}ms above {MAX_WAIT_BOUND_MS}ms"
        );
        self.regs.set_wait_bound(u32::from(ms));
    }

    /// Current packet wait bound in milliseconds
    #[inline]
    #[must_use]
    pub fn wait_bound(&self) -> u16 {
        (self.regs.wait_bound() & PWB_MASK) as u16
    }

    /// Drain completed packets until at most `stop_at` remain unserviced
    ///
    /// Each packet is retrieved descriptor by descriptor up to and including
    /// its packet-terminal descriptor, every descriptor is handed to `f`,
    /// then the packet is acknowledged. Returns the number of packets
    /// serviced.
    ///
    /// # Errors
    ///
    /// Propagates [`get_descriptor`](Self::get_descriptor) errors; packets
    /// acknowledged before the error stay acknowledged.
    pub fn service_packets<F>(&mut self, stop_at: u32, mut f: F) -> Result<usize>
    where
        F: FnMut(&'a BufDescriptor),
    {
        let mut serviced = 0;
        while self.packet_count() > stop_at {
            loop {
                let desc = self.get_descriptor()?;
                f(desc);
                if desc.is_packet_end() {
                    break;
                }
            }
            self.decrement_packet_count();
            serviced += 1;
        }
        Ok(serviced)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
