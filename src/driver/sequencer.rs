//! Starting and stopping the scatter-gather engine.
//!
//! Start checks that the engine has somewhere committed to go, then enables
//! it. Stop clears the enable bit and waits for the engine to finish the
//! descriptor it is working on, which is the only blocking operation in the
//! driver.

use embedded_hal::delay::DelayNs;

#[cfg(feature = "log")]
use log::warn;

use super::SgChannel;
use super::error::{Result, RingError, TransferError};
use crate::dma::descriptor::BufDescriptor;
use crate::dma::ring::DescriptorRing;
use crate::dma::translate::AddressTranslator;
use crate::internal::barrier::full_barrier;
use crate::register::RegisterIo;

/// Map a last-processed register value onto a slot index.
fn slot_of_bda<T: AddressTranslator>(
    ring: &DescriptorRing<'_>,
    translator: &T,
    bda: u32,
) -> Result<usize> {
    match ring.index_of_address(translator.to_virtual(bda)) {
        Some(index) => Ok(index),
        None => {
            #[cfg(feature = "log")]
            warn!("SG: last-processed descriptor 0x{:08x} is outside the list", bda);

            Err(TransferError::UnknownDescriptor.into())
        }
    }
}

impl<'a, R: RegisterIo, T: AddressTranslator> SgChannel<'a, R, T> {
    /// Start the engine on the committed descriptors
    ///
    /// The first start after list creation points the engine at the oldest
    /// active slot. Later starts resume after the slot the engine last
    /// processed, so completed descriptors should be drained with
    /// [`get_descriptor`](Self::get_descriptor) after each stop.
    ///
    /// # Errors
    ///
    /// - [`RingError::NoList`] / [`RingError::ListEmpty`]
    /// - [`TransferError::AlreadyStarted`] if the engine is still busy
    /// - [`TransferError::NoData`] if the engine already consumed every
    ///   descriptor put so far
    /// - [`TransferError::NotCommitted`] if the next descriptor belongs to a
    ///   run that has not been committed
    /// - [`TransferError::UnknownDescriptor`] if the last-processed register
    ///   points outside the list
    pub fn start(&mut self) -> Result<()> {
        let ring = self.ring.as_ref().ok_or(RingError::NoList)?;
        if ring.is_empty() {
            return Err(RingError::ListEmpty.into());
        }
        if self.regs.is_sg_busy() {
            return Err(TransferError::AlreadyStarted.into());
        }

        let bda = self.regs.bd_address();
        if bda == 0 {
            // A gate left by an earlier commit is committed work; only a head
            // put since creation and never committed blocks the first start.
            let head = ring.get_index();
            let committed_gate = ring.is_committed() && ring.commit_index() == Some(head);
            if ring.is_pending(head) && !committed_gate {
                return Err(TransferError::NotCommitted.into());
            }
            let phys = self.translator.to_physical(ring.slot_address(head));
            self.regs.set_bd_address(phys);
        } else {
            let next = ring.next_index(slot_of_bda(ring, &self.translator, bda)?);
            if !ring.slots()[next].is_busy() {
                return Err(TransferError::NoData.into());
            }
            if ring.is_pending(next) {
                return Err(TransferError::NotCommitted.into());
            }
        }

        full_barrier();
        self.regs.enable_sg();
        self.regs.clear_sg_disable();

        #[cfg(feature = "defmt")]
        defmt::debug!("SG engine started");

        Ok(())
    }

    /// Stop the engine and wait for it to go idle
    ///
    /// Polls the SG-busy flag with the configured poll interval and no
    /// deadline; a wedged engine hangs here. Returns the descriptor the
    /// engine processed last, or `None` if it never processed one.
    ///
    /// # Errors
    ///
    /// - [`TransferError::AlreadyStopped`] if the engine is not enabled
    /// - [`TransferError::UnknownDescriptor`] if the last-processed register
    ///   points outside the list
    pub fn stop<D: DelayNs>(&mut self, delay: &mut D) -> Result<Option<&'a BufDescriptor>> {
        if !self.regs.is_sg_enabled() {
            return Err(TransferError::AlreadyStopped.into());
        }
        self.regs.disable_sg();

        while self.regs.is_sg_busy() {
            self.poll_pause(delay);
        }

        self.finish_stop()
    }

    /// Stop the engine, giving up after `timeout_us`
    ///
    /// The enable bit stays cleared on timeout, so the engine halts at the
    /// next descriptor boundary even though this call has returned.
    ///
    /// # Errors
    ///
    /// As [`stop`](Self::stop), plus [`TransferError::Timeout`].
    pub fn stop_timeout<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<Option<&'a BufDescriptor>> {
        if !self.regs.is_sg_enabled() {
            return Err(TransferError::AlreadyStopped.into());
        }
        self.regs.disable_sg();

        let step = self.stop_poll_interval_us.max(1);
        let mut elapsed = 0u32;
        while self.regs.is_sg_busy() {
            if elapsed >= timeout_us {
                #[cfg(feature = "log")]
                warn!("SG: engine still busy {}us after stop", elapsed);

                return Err(TransferError::Timeout.into());
            }
            delay.delay_us(step);
            elapsed = elapsed.saturating_add(step);
        }

        self.finish_stop()
    }

    /// Stop the engine using the configured stop timeout
    ///
    /// # Errors
    ///
    /// As [`stop_timeout`](Self::stop_timeout).
    pub fn stop_bounded<D: DelayNs>(&mut self, delay: &mut D) -> Result<Option<&'a BufDescriptor>> {
        self.stop_timeout(delay, self.stop_timeout_us)
    }

    /// Descriptor named by the last-processed register
    ///
    /// `None` until the engine has been pointed at the list.
    ///
    /// # Errors
    ///
    /// [`RingError::NoList`] or [`TransferError::UnknownDescriptor`].
    pub fn last_processed(&self) -> Result<Option<&'a BufDescriptor>> {
        let bda = self.regs.bd_address();
        if bda == 0 {
            return Ok(None);
        }
        let ring = self.ring.as_ref().ok_or(RingError::NoList)?;
        let index = slot_of_bda(ring, &self.translator, bda)?;
        Ok(Some(&ring.slots()[index]))
    }

    /// True while the engine is walking the list
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.regs.is_sg_busy()
    }

    fn poll_pause<D: DelayNs>(&self, delay: &mut D) {
        if self.stop_poll_interval_us == 0 {
            core::hint::spin_loop();
        } else {
            delay.delay_us(self.stop_poll_interval_us);
        }
    }

    fn finish_stop(&self) -> Result<Option<&'a BufDescriptor>> {
        full_barrier();

        #[cfg(feature = "defmt")]
        defmt::debug!("SG engine stopped");

        self.last_processed()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
