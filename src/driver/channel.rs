//! Scatter-gather channel driver.
//!
//! [`SgChannel`] owns one channel's register block and, once created, its
//! descriptor list. Descriptor bookkeeping lives here; starting and stopping
//! the engine is in the sequencer module and the packet counters in the
//! coalescing module.

use crate::dma::descriptor::BufDescriptor;
use crate::dma::ring::DescriptorRing;
use crate::dma::translate::AddressTranslator;
use crate::register::channel::{ChannelRegs, RST_RESET_MASK};
use crate::register::RegisterIo;

use super::config::{ChannelConfig, State};
use super::error::{Result, RingError};
use super::interrupt::InterruptStatus;
use crate::constants::{DEFAULT_STOP_POLL_INTERVAL_US, DEFAULT_STOP_TIMEOUT_US};

/// One scatter-gather DMA channel
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the descriptor memory
/// * `R` - Register access, [`Mmio`](crate::register::Mmio) on hardware
/// * `T` - Address translation between CPU and engine views of memory
///
/// # Example
///
/// ```ignore
/// static mut BDS: [BufDescriptor; 16] = [const { BufDescriptor::new() }; 16];
///
/// let io = unsafe { Mmio::new(0x8060_0000) };
/// let mut channel = SgChannel::new(io, IdentityTranslator);
/// channel.create_list_in(unsafe { &mut *addr_of_mut!(BDS) })?;
///
/// channel.put_descriptor(&first)?;
/// channel.put_descriptor(&last)?;
/// channel.commit_puts()?;
/// channel.start()?;
/// ```
pub struct SgChannel<'a, R, T> {
    pub(super) regs: ChannelRegs<R>,
    pub(super) translator: T,
    pub(super) ring: Option<DescriptorRing<'a>>,
    pub(super) stop_poll_interval_us: u32,
    pub(super) stop_timeout_us: u32,
}

impl<'a, R: RegisterIo, T: AddressTranslator> SgChannel<'a, R, T> {
    /// Create a channel with no descriptor list
    #[must_use]
    pub const fn new(io: R, translator: T) -> Self {
        Self {
            regs: ChannelRegs::new(io),
            translator,
            ring: None,
            stop_poll_interval_us: DEFAULT_STOP_POLL_INTERVAL_US,
            stop_timeout_us: DEFAULT_STOP_TIMEOUT_US,
        }
    }

    // =========================================================================
    // List creation
    // =========================================================================

    /// Carve a descriptor list out of raw memory
    ///
    /// The memory is split into as many whole descriptors as fit; trailing
    /// bytes are ignored. Returns the number of slots.
    ///
    /// # Errors
    ///
    /// [`RingError::ListExists`] if this channel already has a list.
    ///
    /// # Panics
    ///
    /// Panics if `memory` is not aligned to [`BufDescriptor::ALIGN`] or is
    /// shorter than one descriptor.
    pub fn create_list(&mut self, memory: &'a mut [u8]) -> Result<usize> {
        if self.ring.is_some() {
            return Err(RingError::ListExists.into());
        }

        assert!(
            (memory.as_ptr() as usize).is_multiple_of(BufDescriptor::ALIGN),
            "descriptor memory must be {}-byte aligned",
            BufDescriptor::ALIGN
        );
        let count = memory.len() / BufDescriptor::SIZE;
        assert!(count > 0, "descriptor memory smaller than one descriptor");

        // SAFETY: alignment and length are checked above, every bit pattern
        // is a valid BufDescriptor, and the exclusive borrow is held for 'a.
        let slots: &'a [BufDescriptor] = unsafe {
            core::slice::from_raw_parts(memory.as_mut_ptr().cast::<BufDescriptor>(), count)
        };
        Ok(self.install(slots))
    }

    /// Build the descriptor list over already-typed slots
    ///
    /// Returns the number of slots.
    ///
    /// # Errors
    ///
    /// [`RingError::ListExists`] if this channel already has a list.
    ///
    /// # Panics
    ///
    /// Panics if `slots` is empty.
    pub fn create_list_in(&mut self, slots: &'a mut [BufDescriptor]) -> Result<usize> {
        if self.ring.is_some() {
            return Err(RingError::ListExists.into());
        }
        Ok(self.install(slots))
    }

    fn install(&mut self, slots: &'a [BufDescriptor]) -> usize {
        let ring = DescriptorRing::new(slots, &self.translator);
        let count = ring.capacity();
        self.ring = Some(ring);

        #[cfg(feature = "defmt")]
        defmt::debug!("SG list created: {} descriptors", count);

        count
    }

    // =========================================================================
    // Descriptor list operations
    // =========================================================================

    /// True when the list holds no active descriptor, or there is no list
    #[must_use]
    pub fn is_list_empty(&self) -> bool {
        self.ring.as_ref().is_none_or(DescriptorRing::is_empty)
    }

    /// Copy a descriptor into the list without exposing it to the engine
    ///
    /// See [`DescriptorRing::put`].
    ///
    /// # Errors
    ///
    /// [`RingError::NoList`], [`RingError::ListFull`] or
    /// [`RingError::DescriptorLocked`].
    pub fn put_descriptor(&mut self, desc: &BufDescriptor) -> Result<()> {
        self.ring_mut()?.put(desc)?;
        Ok(())
    }

    /// Expose every descriptor put since the previous commit
    ///
    /// # Errors
    ///
    /// [`RingError::NoList`] or [`RingError::NothingToCommit`].
    pub fn commit_puts(&mut self) -> Result<()> {
        self.ring_mut()?.commit()?;
        Ok(())
    }

    /// Retrieve the oldest active descriptor
    ///
    /// The caller decides from its status word whether the engine has
    /// finished with it.
    ///
    /// # Errors
    ///
    /// [`RingError::NoList`] or [`RingError::ListEmpty`].
    pub fn get_descriptor(&mut self) -> Result<&'a BufDescriptor> {
        Ok(self.ring_mut()?.get()?)
    }

    /// The descriptor list, if created
    #[inline]
    #[must_use]
    pub fn ring(&self) -> Option<&DescriptorRing<'a>> {
        self.ring.as_ref()
    }

    pub(super) fn ring_mut(&mut self) -> Result<&mut DescriptorRing<'a>> {
        Ok(self.ring.as_mut().ok_or(RingError::NoList)?)
    }

    /// Address translator used for next links and the BDA register
    #[inline]
    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Typed register block
    #[inline]
    pub fn regs(&self) -> &ChannelRegs<R> {
        &self.regs
    }

    // =========================================================================
    // Channel control
    // =========================================================================

    /// Reset the channel hardware
    ///
    /// The descriptor list is left as is.
    pub fn reset(&mut self) {
        self.regs.write_reset(RST_RESET_MASK);

        #[cfg(feature = "defmt")]
        defmt::debug!("SG channel reset");
    }

    /// Apply a configuration
    ///
    /// # Errors
    ///
    /// Returns the validation error; no register is written in that case.
    pub fn configure(&mut self, config: &ChannelConfig) -> Result<()> {
        config.validate()?;

        self.set_packet_threshold(config.packet_threshold);
        self.set_wait_bound(config.wait_bound_ms);
        self.set_interrupt_enable(config.interrupt_enable);
        self.stop_poll_interval_us = config.stop_poll_interval_us;
        self.stop_timeout_us = config.stop_timeout_us;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "SG channel configured: threshold={} wait_bound={}ms",
            config.packet_threshold,
            config.wait_bound_ms
        );

        Ok(())
    }

    /// Current channel state
    #[must_use]
    pub fn state(&self) -> State {
        if self.ring.is_none() {
            State::Uninitialized
        } else if self.regs.is_sg_enabled() {
            State::Running
        } else if self.regs.bd_address() == 0 {
            State::ListCreated
        } else {
            State::Idle
        }
    }

    // =========================================================================
    // Interrupts
    // =========================================================================

    /// Read pending interrupt sources
    #[inline]
    pub fn interrupt_status(&self) -> InterruptStatus {
        InterruptStatus::from_raw(self.regs.interrupt_status())
    }

    /// Acknowledge the given interrupt sources
    #[inline]
    pub fn clear_interrupts(&mut self, status: InterruptStatus) {
        self.regs.set_interrupt_status(status.to_raw());
    }

    /// Read enabled interrupt sources
    #[inline]
    pub fn interrupt_enable(&self) -> InterruptStatus {
        InterruptStatus::from_raw(self.regs.interrupt_enable())
    }

    /// Replace the set of enabled interrupt sources
    #[inline]
    pub fn set_interrupt_enable(&mut self, enable: InterruptStatus) {
        self.regs.set_interrupt_enable(enable.to_raw());
    }
}

impl<R, T> core::fmt::Debug for SgChannel<'_, R, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SgChannel")
            .field("ring", &self.ring)
            .field("stop_poll_interval_us", &self.stop_poll_interval_us)
            .field("stop_timeout_us", &self.stop_timeout_us)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
