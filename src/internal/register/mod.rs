//! Register accessor macros
//!
//! Every accessor is generated against a `self.io` field implementing
//! [`RegisterIo`](crate::register::RegisterIo), so the same register block
//! works over real memory-mapped IO and over the host-side mock.

/// Generate read/write accessor methods for a register.
///
/// # Example
/// ```ignore
/// impl<R: RegisterIo> ChannelRegs<R> {
///     reg_rw!(dma_control, set_dma_control, DMAC_OFFSET, "DMA control register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.io.read32($offset)
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&mut self, value: u32) {
            self.io.write32($offset, value)
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.io.read32($offset)
        }
    };
}

/// Generate a write-only accessor method for a register.
macro_rules! reg_wo {
    ($write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&mut self, value: u32) {
            self.io.write32($offset, value)
        }
    };
}

/// Generate set/clear bit operation methods for a register.
///
/// # Example
/// ```ignore
/// impl<R: RegisterIo> ChannelRegs<R> {
///     reg_bit_ops!(enable_sg, disable_sg, SWCR_OFFSET, SWCR_SG_ENABLE,
///                  "scatter-gather engine", "Enable", "Disable");
/// }
/// ```
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $offset:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn(&mut self) {
            self.io.set_bits32($offset, $bit)
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn(&mut self) {
            self.io.clear_bits32($offset, $bit)
        }
    };
}

/// Generate a bit check method (true when bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn(&self) -> bool {
            (self.io.read32($offset) & $bit) != 0
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_bit_check;
pub(crate) use reg_bit_ops;
pub(crate) use reg_ro;
pub(crate) use reg_rw;
pub(crate) use reg_wo;
