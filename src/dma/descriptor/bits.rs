//! Descriptor word bit field constants.
//!
//! The control and status words of a buffer descriptor share their layout
//! with the channel's DMA control (DMACR) and DMA status (DMASR) registers,
//! so the same masks are used for both.

#![allow(dead_code)]

// =============================================================================
// Control Word (mirrors DMACR)
// =============================================================================

/// Control word bit field constants
pub mod control {
    /// Source Increment - advance the source address after each transfer
    pub const SOURCE_INCR: u32 = 1 << 31;
    /// Destination Increment - advance the destination address after each transfer
    pub const DEST_INCR: u32 = 1 << 30;
    /// Source Local - source is the local (device) side of the bus
    pub const SOURCE_LOCAL: u32 = 1 << 29;
    /// Destination Local - destination is the local (device) side of the bus
    pub const DEST_LOCAL: u32 = 1 << 28;
    /// SG Disable - engine halts after this descriptor ("stop after me")
    pub const SG_DISABLE: u32 = 1 << 27;
    /// Generate an interrupt when this descriptor completes
    pub const GEN_BD_INTR: u32 = 1 << 26;
    /// Last BD - this descriptor terminates a packet
    pub const LAST_BD: u32 = 1 << 25;
}

// =============================================================================
// Status Word (mirrors DMASR)
// =============================================================================

/// Status word bit field constants
pub mod status {
    /// Busy - descriptor is owned by the engine (set by software on put)
    pub const BUSY: u32 = 1 << 31;
    /// Bus Error - a bus error terminated the transfer
    pub const BUS_ERROR: u32 = 1 << 30;
    /// Bus Timeout - a bus timeout terminated the transfer
    pub const BUS_TIMEOUT: u32 = 1 << 29;
    /// Last BD - the engine completed a packet-terminal descriptor
    pub const LAST_BD: u32 = 1 << 28;
    /// SG Busy - the scatter-gather engine is running (register only)
    pub const SG_BUSY: u32 = 1 << 27;

    /// All error bits reported in a completed descriptor
    pub const ALL_ERRORS: u32 = BUS_ERROR | BUS_TIMEOUT;
}

// =============================================================================
// Flags Word (software only)
// =============================================================================

/// Software flags word bit field constants
pub mod flags {
    /// Locked - slot is still in use downstream and must not be overwritten
    pub const LOCKED: u32 = 1 << 0;
}
