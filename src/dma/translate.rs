//! Virtual/physical address translation for descriptor memory.
//!
//! Software walks the ring by index, but the engine only understands bus
//! addresses. Translation happens at the two places a pointer crosses that
//! boundary: the next links written at list creation and the last-processed
//! descriptor register.

/// Converts between CPU addresses and the addresses the engine sees.
///
/// Both directions are total and map `0` to `0`, so a null register value
/// stays null after translation.
pub trait AddressTranslator {
    /// Convert a CPU address into a bus address.
    fn to_physical(&self, virt: usize) -> u32;

    /// Convert a bus address into a CPU address.
    fn to_virtual(&self, phys: u32) -> usize;
}

/// Translator for targets where the engine sees CPU addresses unchanged.
///
/// Only meaningful when CPU addresses fit in 32 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdentityTranslator;

impl AddressTranslator for IdentityTranslator {
    #[inline(always)]
    fn to_physical(&self, virt: usize) -> u32 {
        virt as u32
    }

    #[inline(always)]
    fn to_virtual(&self, phys: u32) -> usize {
        phys as usize
    }
}

/// Translator for a single memory window mapped at different CPU and bus bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OffsetTranslator {
    virt_base: usize,
    phys_base: u32,
}

impl OffsetTranslator {
    /// Create a translator mapping `virt_base` onto `phys_base`.
    #[must_use]
    pub const fn new(virt_base: usize, phys_base: u32) -> Self {
        Self {
            virt_base,
            phys_base,
        }
    }

    /// CPU address of the window start.
    #[inline(always)]
    #[must_use]
    pub const fn virt_base(&self) -> usize {
        self.virt_base
    }

    /// Bus address of the window start.
    #[inline(always)]
    #[must_use]
    pub const fn phys_base(&self) -> u32 {
        self.phys_base
    }
}

impl AddressTranslator for OffsetTranslator {
    #[inline]
    fn to_physical(&self, virt: usize) -> u32 {
        if virt == 0 {
            return 0;
        }
        self.phys_base
            .wrapping_add(virt.wrapping_sub(self.virt_base) as u32)
    }

    #[inline]
    fn to_virtual(&self, phys: u32) -> usize {
        if phys == 0 {
            return 0;
        }
        self.virt_base
            .wrapping_add(phys.wrapping_sub(self.phys_base) as usize)
    }
}
