//! Scatter-gather buffer descriptor.
//!
//! A [`BufDescriptor`] describes one buffer transfer. The engine reads the
//! control, address, and length words, writes the status words back when the
//! transfer finishes, and follows the next link to the following descriptor.
//! Every word is accessed volatilely since the engine updates the record
//! behind the compiler's back.

pub mod bits;

use bits::{control, flags, status};

/// Volatile cell wrapper for descriptor fields
///
/// Ensures all accesses are volatile to prevent compiler optimization
/// from reordering or caching descriptor field accesses.
#[repr(transparent)]
pub(crate) struct VolatileCell<T: Copy> {
    value: core::cell::UnsafeCell<T>,
}

// Safety: descriptor words are 32-bit and every access is a single volatile
// load or store; ordering against the engine is handled with explicit fences.
unsafe impl<T: Copy> Sync for VolatileCell<T> {}

impl<T: Copy> VolatileCell<T> {
    /// Create a new volatile cell with the given initial value
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: core::cell::UnsafeCell::new(value),
        }
    }

    /// Read the value (volatile read)
    #[inline(always)]
    pub fn get(&self) -> T {
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    /// Write a value (volatile write)
    #[inline(always)]
    pub fn set(&self, value: T) {
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }

    /// Update the value using a function (read-modify-write)
    #[inline(always)]
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let old = self.get();
        self.set(f(old));
    }
}

/// Scatter-gather buffer descriptor (40 bytes).
///
/// Words are laid out in the order the engine expects. The next link is owned
/// by the descriptor ring; [`BufDescriptor::copy_from`] never touches it.
#[repr(C, align(4))]
pub struct BufDescriptor {
    /// Control word (see [`bits::control`])
    control: VolatileCell<u32>,
    /// Source address
    source: VolatileCell<u32>,
    /// Destination address
    destination: VolatileCell<u32>,
    /// Transfer length in bytes
    length: VolatileCell<u32>,
    /// Status word written back by the engine (see [`bits::status`])
    status: VolatileCell<u32>,
    /// Device-specific status written back by the engine
    device_status: VolatileCell<u32>,
    /// Physical address of the next descriptor
    next: VolatileCell<u32>,
    /// Opaque caller identifier
    id: VolatileCell<u32>,
    /// Software flags (see [`bits::flags`])
    flags: VolatileCell<u32>,
    /// Length originally requested by the caller
    requested_length: VolatileCell<u32>,
}

impl BufDescriptor {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = 40;

    /// Required alignment of descriptor memory in bytes
    pub const ALIGN: usize = 4;

    /// Create a new zeroed descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            control: VolatileCell::new(0),
            source: VolatileCell::new(0),
            destination: VolatileCell::new(0),
            length: VolatileCell::new(0),
            status: VolatileCell::new(0),
            device_status: VolatileCell::new(0),
            next: VolatileCell::new(0),
            id: VolatileCell::new(0),
            flags: VolatileCell::new(0),
            requested_length: VolatileCell::new(0),
        }
    }

    /// Reset every word except the next link to zero.
    pub fn initialize(&self) {
        self.control.set(0);
        self.source.set(0);
        self.destination.set(0);
        self.length.set(0);
        self.status.set(0);
        self.device_status.set(0);
        self.id.set(0);
        self.flags.set(0);
        self.requested_length.set(0);
    }

    /// Copy every word except the next link from `other`.
    pub fn copy_from(&self, other: &BufDescriptor) {
        self.control.set(other.control.get());
        self.source.set(other.source.get());
        self.destination.set(other.destination.get());
        self.length.set(other.length.get());
        self.status.set(other.status.get());
        self.device_status.set(other.device_status.get());
        self.id.set(other.id.get());
        self.flags.set(other.flags.get());
        self.requested_length.set(other.requested_length.get());
    }

    // -------------------------------------------------------------------------
    // Raw word accessors
    // -------------------------------------------------------------------------

    /// Get the control word.
    #[inline(always)]
    #[must_use]
    pub fn control(&self) -> u32 {
        self.control.get()
    }

    /// Set the control word.
    #[inline(always)]
    pub fn set_control(&self, value: u32) {
        self.control.set(value);
    }

    /// Get the source address.
    #[inline(always)]
    #[must_use]
    pub fn source_address(&self) -> u32 {
        self.source.get()
    }

    /// Set the source address.
    #[inline(always)]
    pub fn set_source_address(&self, addr: u32) {
        self.source.set(addr);
    }

    /// Get the destination address.
    #[inline(always)]
    #[must_use]
    pub fn destination_address(&self) -> u32 {
        self.destination.get()
    }

    /// Set the destination address.
    #[inline(always)]
    pub fn set_destination_address(&self, addr: u32) {
        self.destination.set(addr);
    }

    /// Get the transfer length.
    #[inline(always)]
    #[must_use]
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// Set the transfer length.
    #[inline(always)]
    pub fn set_length(&self, len: u32) {
        self.length.set(len);
    }

    /// Get the status word.
    #[inline(always)]
    #[must_use]
    pub fn status(&self) -> u32 {
        self.status.get()
    }

    /// Set the status word.
    #[inline(always)]
    pub fn set_status(&self, value: u32) {
        self.status.set(value);
    }

    /// Get the device status word.
    #[inline(always)]
    #[must_use]
    pub fn device_status(&self) -> u32 {
        self.device_status.get()
    }

    /// Set the device status word.
    #[inline(always)]
    pub fn set_device_status(&self, value: u32) {
        self.device_status.set(value);
    }

    /// Get the physical address of the next descriptor.
    #[inline(always)]
    #[must_use]
    pub fn next_address(&self) -> u32 {
        self.next.get()
    }

    /// Set the next link. Only the ring writes this.
    #[inline(always)]
    pub(crate) fn set_next_address(&self, addr: u32) {
        self.next.set(addr);
    }

    /// Get the caller identifier.
    #[inline(always)]
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id.get()
    }

    /// Set the caller identifier.
    #[inline(always)]
    pub fn set_id(&self, id: u32) {
        self.id.set(id);
    }

    /// Get the software flags word.
    #[inline(always)]
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.flags.get()
    }

    /// Set the software flags word.
    #[inline(always)]
    pub fn set_flags(&self, value: u32) {
        self.flags.set(value);
    }

    /// Get the requested length.
    #[inline(always)]
    #[must_use]
    pub fn requested_length(&self) -> u32 {
        self.requested_length.get()
    }

    /// Set the requested length.
    #[inline(always)]
    pub fn set_requested_length(&self, len: u32) {
        self.requested_length.set(len);
    }

    // -------------------------------------------------------------------------
    // Flag helpers
    // -------------------------------------------------------------------------

    /// Check if the slot is locked by the caller.
    #[inline(always)]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        (self.flags.get() & flags::LOCKED) != 0
    }

    /// Mark the slot as still in use downstream.
    #[inline(always)]
    pub fn lock(&self) {
        self.flags.update(|v| v | flags::LOCKED);
    }

    /// Release the slot for reuse by a later put.
    #[inline(always)]
    pub fn unlock(&self) {
        self.flags.update(|v| v & !flags::LOCKED);
    }

    /// Check if this descriptor terminates a packet.
    #[inline(always)]
    #[must_use]
    pub fn is_packet_end(&self) -> bool {
        (self.control.get() & control::LAST_BD) != 0
    }

    /// Mark or unmark this descriptor as packet-terminal.
    pub fn set_packet_end(&self, last: bool) {
        if last {
            self.control.update(|v| v | control::LAST_BD);
        } else {
            self.control.update(|v| v & !control::LAST_BD);
        }
    }

    /// Check if the engine halts after this descriptor.
    #[inline(always)]
    #[must_use]
    pub fn stops_after(&self) -> bool {
        (self.control.get() & control::SG_DISABLE) != 0
    }

    /// Make the engine halt after this descriptor.
    #[inline(always)]
    pub(crate) fn set_stop_after(&self) {
        self.control.update(|v| v | control::SG_DISABLE);
    }

    /// Let the engine continue to the next descriptor.
    #[inline(always)]
    pub(crate) fn clear_stop_after(&self) {
        self.control.update(|v| v & !control::SG_DISABLE);
    }

    /// Check if the descriptor is still waiting on the engine.
    #[inline(always)]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        (self.status.get() & status::BUSY) != 0
    }

    /// Check if the engine reported a bus error or timeout.
    #[inline(always)]
    #[must_use]
    pub fn has_error(&self) -> bool {
        (self.status.get() & status::ALL_ERRORS) != 0
    }
}

impl Default for BufDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for BufDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufDescriptor")
            .field("control", &format_args!("{:#010x}", self.control()))
            .field("source", &format_args!("{:#010x}", self.source_address()))
            .field("destination", &format_args!("{:#010x}", self.destination_address()))
            .field("length", &self.length())
            .field("status", &format_args!("{:#010x}", self.status()))
            .field("device_status", &self.device_status())
            .field("next", &format_args!("{:#010x}", self.next_address()))
            .field("id", &self.id())
            .field("flags", &self.flags())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BufDescriptor {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "BufDescriptor {{ control: {=u32:#x}, status: {=u32:#x}, len: {=u32}, id: {=u32} }}",
            self.control(),
            self.status(),
            self.length(),
            self.id()
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
