//! Channel register map
//!
//! One channel occupies a small block of 32-bit registers. The DMA control
//! and status registers share their bit layout with the descriptor control
//! and status words.

use super::RegisterIo;
use crate::dma::descriptor::bits::{control, status};
use crate::internal::register::{reg_bit_check, reg_bit_ops, reg_ro, reg_rw, reg_wo};

// =============================================================================
// Register Offsets
// =============================================================================

/// Reset Register offset (write-only)
pub const RST_OFFSET: usize = 0x00;
/// DMA Control Register offset
pub const DMAC_OFFSET: usize = 0x04;
/// Source Address Register offset
pub const SA_OFFSET: usize = 0x08;
/// Destination Address Register offset
pub const DA_OFFSET: usize = 0x0C;
/// Length Register offset
pub const LEN_OFFSET: usize = 0x10;
/// DMA Status Register offset (read-only)
pub const DMAS_OFFSET: usize = 0x14;
/// Last-processed Buffer Descriptor Address Register offset
pub const BDA_OFFSET: usize = 0x18;
/// Software Control Register offset
pub const SWCR_OFFSET: usize = 0x1C;
/// Unserviced Packet Count Register offset
pub const UPC_OFFSET: usize = 0x20;
/// Packet Count Threshold Register offset
pub const PCT_OFFSET: usize = 0x24;
/// Packet Wait Bound Register offset
pub const PWB_OFFSET: usize = 0x28;
/// Interrupt Status Register offset (write 1 to clear)
pub const IS_OFFSET: usize = 0x2C;
/// Interrupt Enable Register offset
pub const IE_OFFSET: usize = 0x30;

// =============================================================================
// Register Bits
// =============================================================================

/// Value written to RST to reset the channel
pub const RST_RESET_MASK: u32 = 0x0000_000A;

/// DMACR: stop after the current descriptor
pub const DMACR_SG_DISABLE: u32 = control::SG_DISABLE;

/// DMASR: a transfer is in progress
pub const DMASR_BUSY: u32 = status::BUSY;
/// DMASR: the scatter-gather engine is walking the list
pub const DMASR_SG_BUSY: u32 = status::SG_BUSY;

/// SWCR: scatter-gather engine enable
pub const SWCR_SG_ENABLE: u32 = 1 << 31;

/// UPC field mask
pub const UPC_MASK: u32 = 0x0000_03FF;
/// PCT field mask
pub const PCT_MASK: u32 = 0x0000_03FF;
/// PWB field mask
pub const PWB_MASK: u32 = 0x0000_03FF;

/// IS/IE: simple DMA transfer done
pub const INTR_DMA_DONE: u32 = 1 << 0;
/// IS/IE: DMA bus error
pub const INTR_DMA_ERROR: u32 = 1 << 1;
/// IS/IE: a packet finished
pub const INTR_PKT_DONE: u32 = 1 << 2;
/// IS/IE: unserviced packet count reached the threshold
pub const INTR_PKT_THRESHOLD: u32 = 1 << 3;
/// IS/IE: packet wait bound expired
pub const INTR_PKT_WAIT_BOUND: u32 = 1 << 4;
/// IS/IE: engine acknowledged a stop-after-descriptor
pub const INTR_SG_DISABLE_ACK: u32 = 1 << 5;
/// IS/IE: engine reached the end of the list
pub const INTR_SG_END: u32 = 1 << 6;
/// IS/IE: descriptor with interrupt request completed
pub const INTR_BD: u32 = 1 << 7;
/// All interrupt bits
pub const INTR_ALL: u32 = 0x0000_00FF;

// =============================================================================
// Register Block
// =============================================================================

/// Typed accessors over one channel's register block
#[derive(Debug)]
pub struct ChannelRegs<R> {
    io: R,
}

impl<R: RegisterIo> ChannelRegs<R> {
    /// Wrap a register window
    #[must_use]
    pub const fn new(io: R) -> Self {
        Self { io }
    }

    /// Underlying register window
    #[inline(always)]
    pub fn io(&self) -> &R {
        &self.io
    }

    /// Release the underlying register window
    pub fn into_inner(self) -> R {
        self.io
    }

    reg_wo!(write_reset, RST_OFFSET, "Reset register");
    reg_rw!(dma_control, set_dma_control, DMAC_OFFSET, "DMA control register");
    reg_ro!(dma_status, DMAS_OFFSET, "DMA status register");
    reg_rw!(bd_address, set_bd_address, BDA_OFFSET, "last-processed descriptor address");
    reg_rw!(sw_control, set_sw_control, SWCR_OFFSET, "software control register");
    reg_rw!(packet_count, set_packet_count, UPC_OFFSET, "unserviced packet count");
    reg_rw!(packet_threshold, set_packet_threshold, PCT_OFFSET, "packet count threshold");
    reg_rw!(wait_bound, set_wait_bound, PWB_OFFSET, "packet wait bound");
    reg_rw!(interrupt_status, set_interrupt_status, IS_OFFSET, "interrupt status register");
    reg_rw!(interrupt_enable, set_interrupt_enable, IE_OFFSET, "interrupt enable register");

    reg_bit_ops!(
        enable_sg,
        disable_sg,
        SWCR_OFFSET,
        SWCR_SG_ENABLE,
        "scatter-gather engine",
        "Enable",
        "Disable"
    );
    reg_bit_ops!(
        set_sg_disable,
        clear_sg_disable,
        DMAC_OFFSET,
        DMACR_SG_DISABLE,
        "the DMACR stop-after-descriptor bit",
        "Set",
        "Clear"
    );

    reg_bit_check!(
        is_sg_enabled,
        SWCR_OFFSET,
        SWCR_SG_ENABLE,
        "Check if the scatter-gather engine is enabled"
    );
    reg_bit_check!(
        is_sg_busy,
        DMAS_OFFSET,
        DMASR_SG_BUSY,
        "Check if the scatter-gather engine is still walking the list"
    );
    reg_bit_check!(is_busy, DMAS_OFFSET, DMASR_BUSY, "Check if a transfer is in progress");
}
