//! Register access for the scatter-gather DMA channel
//!
//! The channel never touches an address directly. All register traffic goes
//! through [`RegisterIo`], a 32-bit read/write interface addressed by byte
//! offset from the channel base. [`Mmio`] is the volatile implementation for
//! real hardware; host tests substitute a recording mock.

pub mod channel;

pub use channel::ChannelRegs;

/// 32-bit register read/write at byte offsets from a channel base
///
/// Implementors must perform each access exactly once and in program order;
/// the start and stop sequences depend on it.
pub trait RegisterIo {
    /// Read the register at `offset`
    fn read32(&self, offset: usize) -> u32;

    /// Write `value` to the register at `offset`
    fn write32(&mut self, offset: usize, value: u32);

    /// Read-modify-write the register at `offset`
    #[inline]
    fn modify32<F>(&mut self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read32(offset);
        self.write32(offset, f(value));
    }

    /// Set `bits` in the register at `offset`
    #[inline]
    fn set_bits32(&mut self, offset: usize, bits: u32) {
        self.modify32(offset, |v| v | bits);
    }

    /// Clear `bits` in the register at `offset`
    #[inline]
    fn clear_bits32(&mut self, offset: usize, bits: u32) {
        self.modify32(offset, |v| v & !bits);
    }
}

/// Volatile memory-mapped register window
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register window at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the 4-byte aligned address of a channel register block
    /// that stays mapped for the life of this value, and no other `Mmio`
    /// may write the same block concurrently.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the window
    #[inline(always)]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterIo for Mmio {
    #[inline(always)]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: validity of base + offset was promised by Mmio::new
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    #[inline(always)]
    fn write32(&mut self, offset: usize, value: u32) {
        // SAFETY: validity of base + offset was promised by Mmio::new
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}
