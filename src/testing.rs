//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the channel driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::vec::Vec;

use crate::dma::descriptor::BufDescriptor;
use crate::dma::descriptor::bits::control;
use crate::dma::translate::OffsetTranslator;
use crate::register::RegisterIo;
use crate::register::channel::{IS_OFFSET, UPC_OFFSET};

/// Bus address the engine sees for the first byte of every test pool
pub const TEST_PHYS_BASE: u32 = 0x1000_0000;

// =============================================================================
// Mock Register File
// =============================================================================

#[derive(Debug, Default)]
struct MockRegisterState {
    /// Current register values: offset -> value
    values: HashMap<usize, u32>,
    /// Values returned by upcoming reads before falling back to `values`
    scripted: HashMap<usize, VecDeque<u32>>,
    /// Record of writes: (offset, value)
    write_log: Vec<(usize, u32)>,
    /// Number of reads per offset
    reads: HashMap<usize, usize>,
}

/// Mock channel register file
///
/// Clones share the same state, so a test can keep one handle for setup and
/// inspection while the channel owns another.
///
/// Two registers model their hardware side effects: the interrupt status
/// register clears the bits written to it, and a write to the unserviced
/// packet counter decrements it by the value written.
///
/// # Example
///
/// ```ignore
/// let regs = MockRegisters::new();
/// regs.script_reads(DMAS_OFFSET, &[DMASR_SG_BUSY, DMASR_SG_BUSY]);
/// let mut channel = SgChannel::new(regs.clone(), translator);
/// // stop() now polls three times before seeing the engine idle
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRegisters {
    state: Rc<RefCell<MockRegisterState>>,
}

impl MockRegisters {
    /// Create a register file with every register reading zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register value without recording a write
    pub fn set(&self, offset: usize, value: u32) {
        self.state.borrow_mut().values.insert(offset, value);
    }

    /// Current value of a register (for test verification)
    pub fn get(&self, offset: usize) -> u32 {
        self.state
            .borrow()
            .values
            .get(&offset)
            .copied()
            .unwrap_or(0)
    }

    /// Queue values returned by the next reads of `offset`
    pub fn script_reads(&self, offset: usize, values: &[u32]) {
        self.state
            .borrow_mut()
            .scripted
            .entry(offset)
            .or_default()
            .extend(values.iter().copied());
    }

    /// Get all writes that have been made
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.state.borrow().write_log.clone()
    }

    /// Get the values written to one register, in order
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.state
            .borrow()
            .write_log
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Number of reads of `offset` so far
    pub fn read_count(&self, offset: usize) -> usize {
        self.state
            .borrow()
            .reads
            .get(&offset)
            .copied()
            .unwrap_or(0)
    }

    /// Clear the write log and read counters
    pub fn clear_log(&self) {
        let mut state = self.state.borrow_mut();
        state.write_log.clear();
        state.reads.clear();
    }
}

impl RegisterIo for MockRegisters {
    fn read32(&self, offset: usize) -> u32 {
        let mut state = self.state.borrow_mut();
        *state.reads.entry(offset).or_default() += 1;
        if let Some(value) = state.scripted.get_mut(&offset).and_then(VecDeque::pop_front) {
            return value;
        }
        state.values.get(&offset).copied().unwrap_or(0)
    }

    fn write32(&mut self, offset: usize, value: u32) {
        let mut state = self.state.borrow_mut();
        state.write_log.push((offset, value));
        let current = state.values.get(&offset).copied().unwrap_or(0);
        let next = match offset {
            IS_OFFSET => current & !value,
            UPC_OFFSET if value != 0 => current.saturating_sub(1),
            UPC_OFFSET => current,
            _ => value,
        };
        state.values.insert(offset, next);
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay provider for testing
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
    /// Number of delay calls
    calls: RefCell<usize>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }

    /// Number of delay calls made
    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
        *self.calls.borrow_mut() += 1;
    }
}

// =============================================================================
// Descriptor Memory
// =============================================================================

/// Aligned byte buffer standing in for DMA-capable descriptor memory
///
/// The pool pretends to live at [`TEST_PHYS_BASE`] on the bus, so next links
/// and the last-processed register hold small predictable values.
#[repr(C, align(8))]
pub struct DescriptorPool<const BYTES: usize> {
    bytes: [u8; BYTES],
}

impl<const BYTES: usize> DescriptorPool<BYTES> {
    /// Create a zeroed pool
    pub const fn new() -> Self {
        Self { bytes: [0; BYTES] }
    }

    /// Translator mapping this pool onto [`TEST_PHYS_BASE`]
    ///
    /// The pool must not move after the translator is taken.
    pub fn translator(&self) -> OffsetTranslator {
        OffsetTranslator::new(self.bytes.as_ptr() as usize, TEST_PHYS_BASE)
    }

    /// Raw memory to hand to `create_list`
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

// =============================================================================
// Descriptor Helpers
// =============================================================================

/// Bus address of slot `index` in a pool mapped at [`TEST_PHYS_BASE`]
pub fn slot_phys(index: usize) -> u32 {
    TEST_PHYS_BASE + (index * BufDescriptor::SIZE) as u32
}

/// Build a plain memory-to-memory descriptor tagged with `id`
pub fn sample_descriptor(id: u32, packet_end: bool) -> BufDescriptor {
    let desc = BufDescriptor::new();
    desc.set_control(control::SOURCE_INCR | control::DEST_INCR);
    desc.set_source_address(0x2000_0000 + id * 0x100);
    desc.set_destination_address(0x3000_0000 + id * 0x100);
    desc.set_length(64);
    desc.set_requested_length(64);
    desc.set_id(id);
    desc.set_packet_end(packet_end);
    desc
}

/// Mark a slot as processed the way the engine would
pub fn complete(desc: &BufDescriptor) {
    desc.set_status(0);
    desc.set_device_status(0x0000_0040);
}
