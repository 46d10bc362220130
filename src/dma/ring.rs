//! Scatter-gather descriptor ring.
//!
//! The ring is carved from caller memory once and never resized. Software
//! tracks four cursors over it:
//!
//! - `put`: next slot to receive a descriptor
//! - `get`: next slot to hand back to the caller
//! - `last`: most recently written slot (the tail the engine stops on)
//! - `commit`: slot whose stop bit gates the current uncommitted run
//!
//! The engine walks the same slots through their next links and halts after
//! any descriptor carrying the SG-disable ("stop after me") control bit.
//! Put keeps every freshly written descriptor stopped; commit clears the one
//! bit that lets the engine flow into the new run.

use super::descriptor::BufDescriptor;
use super::descriptor::bits::status;
use super::translate::AddressTranslator;
use crate::driver::error::{RingError, RingResult};
use crate::internal::barrier::{read_barrier, write_barrier};

/// Circular descriptor list with commit tracking.
pub struct DescriptorRing<'a> {
    /// Descriptor slots, linked in index order
    slots: &'a [BufDescriptor],
    /// Next slot to receive a put
    put: usize,
    /// Next slot to be retrieved
    get: usize,
    /// Gate of the pending run, `None` when nothing is pending
    commit: Option<usize>,
    /// Most recently put slot
    last: usize,
    /// Slots holding a put that has not been retrieved
    active: usize,
    /// Packet-terminal descriptors among the active slots
    active_packets: usize,
    /// Whether any commit has happened
    committed: bool,
}

impl<'a> DescriptorRing<'a> {
    /// Link `slots` into a cycle and reset every slot to an inert state.
    ///
    /// The next link of each slot receives the bus address of its successor,
    /// the last slot pointing back at the first.
    ///
    /// # Panics
    ///
    /// Panics if `slots` is empty.
    pub fn new<T: AddressTranslator>(slots: &'a [BufDescriptor], translator: &T) -> Self {
        assert!(!slots.is_empty(), "descriptor list needs at least one slot");

        let count = slots.len();
        for (i, slot) in slots.iter().enumerate() {
            slot.initialize();
            let next = core::ptr::from_ref(&slots[(i + 1) % count]) as usize;
            slot.set_next_address(translator.to_physical(next));
        }
        write_barrier();

        Self {
            slots,
            put: 0,
            get: 0,
            commit: None,
            last: 0,
            active: 0,
            active_packets: 0,
            committed: false,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Total number of slots
    #[inline(always)]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding a put that has not been retrieved
    #[inline(always)]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Number of complete packets among the active slots
    #[inline(always)]
    #[must_use]
    pub fn active_packet_count(&self) -> usize {
        self.active_packets
    }

    /// True when no slot is active
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// True when every slot is active
    #[inline(always)]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.active == self.slots.len()
    }

    /// True once at least one commit has succeeded
    #[inline(always)]
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Index of the next slot to receive a put
    #[inline(always)]
    #[must_use]
    pub fn put_index(&self) -> usize {
        self.put
    }

    /// Index of the next slot to be retrieved
    #[inline(always)]
    #[must_use]
    pub fn get_index(&self) -> usize {
        self.get
    }

    /// Index of the current tail
    #[inline(always)]
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.last
    }

    /// Index gating the pending run, if any
    #[inline(always)]
    #[must_use]
    pub fn commit_index(&self) -> Option<usize> {
        self.commit
    }

    /// True when slot `index` belongs to the run put since the last commit
    ///
    /// The gate slot itself counts as pending; the engine must not be
    /// started toward it.
    #[must_use]
    pub fn is_pending(&self, index: usize) -> bool {
        let Some(gate) = self.commit else {
            return false;
        };
        let count = self.slots.len();
        let offset = (index % count + count - gate) % count;
        offset <= (self.last + count - gate) % count
    }

    /// Index following `index` in the cycle
    #[inline(always)]
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }

    /// Slot at `index`
    #[inline]
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&'a BufDescriptor> {
        let slots = self.slots;
        slots.get(index)
    }

    /// All slots in link order
    #[inline(always)]
    #[must_use]
    pub fn slots(&self) -> &'a [BufDescriptor] {
        self.slots
    }

    /// CPU address of the slot at `index`
    #[inline]
    #[must_use]
    pub fn slot_address(&self, index: usize) -> usize {
        self.slots.as_ptr() as usize + (index % self.slots.len()) * BufDescriptor::SIZE
    }

    /// Slot index for a CPU address inside the list
    ///
    /// Returns `None` for addresses outside the list or not on a slot boundary.
    #[must_use]
    pub fn index_of_address(&self, addr: usize) -> Option<usize> {
        let offset = addr.checked_sub(self.slots.as_ptr() as usize)?;
        if offset % BufDescriptor::SIZE != 0 {
            return None;
        }
        let index = offset / BufDescriptor::SIZE;
        (index < self.slots.len()).then_some(index)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Copy `desc` into the next free slot without exposing it to the engine.
    ///
    /// The copy is forced to stop the engine, marked busy, and its device
    /// status cleared, so completion can later be detected from the status
    /// word alone. The slot's next link is left untouched.
    ///
    /// # Errors
    ///
    /// - [`RingError::ListFull`] if every slot is active
    /// - [`RingError::DescriptorLocked`] if the destination slot is locked
    pub fn put(&mut self, desc: &BufDescriptor) -> RingResult<()> {
        if self.is_full() {
            return Err(RingError::ListFull);
        }

        let slot = &self.slots[self.put];
        if slot.is_locked() {
            return Err(RingError::DescriptorLocked);
        }

        slot.copy_from(desc);
        slot.set_stop_after();
        slot.set_status(status::BUSY);
        slot.set_device_status(0);

        if slot.is_packet_end() {
            self.active_packets += 1;
        }

        // Release the previous tail only when it sits strictly inside a
        // pending run; the gate slot itself stays stopped until commit.
        if matches!(self.commit, Some(gate) if gate != self.last) {
            write_barrier();
            self.slots[self.last].clear_stop_after();
        }

        // Order matters: the gate is the tail *before* this put.
        self.active += 1;
        if self.commit.is_none() {
            self.commit = Some(self.last);
        }
        self.last = self.put;
        self.put = self.next_index(self.put);

        Ok(())
    }

    /// Expose every descriptor put since the previous commit.
    ///
    /// A multi-slot run is released by clearing the stop bit of its gate slot;
    /// intermediate slots were already released by put and the tail keeps its
    /// stop bit. A single-slot run needs no flag change.
    ///
    /// # Errors
    ///
    /// [`RingError::NothingToCommit`] if no run is pending or the list is empty.
    pub fn commit(&mut self) -> RingResult<()> {
        let Some(gate) = self.commit else {
            return Err(RingError::NothingToCommit);
        };
        if self.is_empty() {
            return Err(RingError::NothingToCommit);
        }

        if gate != self.last {
            write_barrier();
            self.slots[gate].clear_stop_after();
        }

        self.committed = true;
        self.commit = None;
        Ok(())
    }

    /// Hand back the oldest active slot and advance past it.
    ///
    /// The slot is returned in place, not copied; it stays valid until a later
    /// put recycles it. Lock the slot to keep put from overwriting it.
    ///
    /// # Errors
    ///
    /// [`RingError::ListEmpty`] if no slot is active.
    pub fn get(&mut self) -> RingResult<&'a BufDescriptor> {
        if self.is_empty() {
            return Err(RingError::ListEmpty);
        }

        read_barrier();
        let slots = self.slots;
        let slot = &slots[self.get];

        if slot.is_packet_end() {
            self.active_packets = self.active_packets.saturating_sub(1);
        }
        self.get = self.next_index(self.get);
        self.active -= 1;

        Ok(slot)
    }
}

impl core::fmt::Debug for DescriptorRing<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DescriptorRing")
            .field("capacity", &self.slots.len())
            .field("put", &self.put)
            .field("get", &self.get)
            .field("commit", &self.commit)
            .field("last", &self.last)
            .field("active", &self.active)
            .field("active_packets", &self.active_packets)
            .field("committed", &self.committed)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dma::translate::OffsetTranslator;
    use crate::testing::{TEST_PHYS_BASE, sample_descriptor};

    fn ring_over(slots: &[BufDescriptor]) -> DescriptorRing<'_> {
        let translator = OffsetTranslator::new(slots.as_ptr() as usize, TEST_PHYS_BASE);
        DescriptorRing::new(slots, &translator)
    }

    fn stop_flags(ring: &DescriptorRing<'_>) -> [bool; 4] {
        let mut flags = [false; 4];
        for (i, flag) in flags.iter_mut().enumerate() {
            *flag = ring.slot(i).unwrap().stops_after();
        }
        flags
    }

    // =========================================================================
    // Creation
    // =========================================================================

    #[test]
    fn new_ring_initial_state() {
        let slots = [const { BufDescriptor::new() }; 4];
        let ring = ring_over(&slots);

        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.put_index(), 0);
        assert_eq!(ring.get_index(), 0);
        assert_eq!(ring.last_index(), 0);
        assert_eq!(ring.commit_index(), None);
        assert_eq!(ring.active_count(), 0);
        assert_eq!(ring.active_packet_count(), 0);
        assert!(!ring.is_committed());
        assert!(ring.is_empty());
    }

    #[test]
    fn new_ring_links_form_exact_cycle() {
        let slots = [const { BufDescriptor::new() }; 5];
        let ring = ring_over(&slots);

        for i in 0..5 {
            let expected = TEST_PHYS_BASE + (((i + 1) % 5) * BufDescriptor::SIZE) as u32;
            assert_eq!(ring.slot(i).unwrap().next_address(), expected);
        }

        // Walking the next links returns to slot 0 after exactly five hops
        let mut index = 0usize;
        for hop in 1..=5 {
            let next = ring.slot(index).unwrap().next_address();
            index = ((next - TEST_PHYS_BASE) as usize) / BufDescriptor::SIZE;
            assert_eq!(index == 0, hop == 5);
        }
    }

    #[test]
    fn new_ring_clears_stale_content() {
        let slots = [const { BufDescriptor::new() }; 2];
        slots[1].set_control(u32::MAX);
        slots[1].lock();
        let ring = ring_over(&slots);
        assert_eq!(ring.slot(1).unwrap().control(), 0);
        assert!(!ring.slot(1).unwrap().is_locked());
    }

    #[test]
    fn single_slot_ring_links_to_itself() {
        let slots = [const { BufDescriptor::new() }; 1];
        let ring = ring_over(&slots);
        assert_eq!(ring.slot(0).unwrap().next_address(), TEST_PHYS_BASE);
        assert_eq!(ring.next_index(0), 0);
    }

    // =========================================================================
    // Emptiness
    // =========================================================================

    #[test]
    fn is_empty_tracks_put_and_get() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);
        assert!(ring.is_empty());

        ring.put(&sample_descriptor(1, false)).unwrap();
        assert!(!ring.is_empty());
        ring.put(&sample_descriptor(2, true)).unwrap();
        ring.commit().unwrap();

        ring.get().unwrap();
        assert!(!ring.is_empty());
        ring.get().unwrap();
        assert!(ring.is_empty());
    }

    // =========================================================================
    // Put / Commit flag protocol
    // =========================================================================

    #[test]
    fn put_forces_stop_busy_and_clear_device_status() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        let desc = sample_descriptor(9, false);
        desc.set_status(0);
        desc.set_device_status(0xABCD);
        ring.put(&desc).unwrap();

        let slot = ring.slot(0).unwrap();
        assert!(slot.stops_after());
        assert!(slot.is_busy());
        assert_eq!(slot.device_status(), 0);
        // Caller's descriptor is not modified
        assert!(!desc.stops_after());
        assert_eq!(desc.device_status(), 0xABCD);
    }

    #[test]
    fn single_put_then_commit_changes_no_flags() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, true)).unwrap();
        assert_eq!(ring.commit_index(), Some(0));
        assert_eq!(ring.last_index(), 0);

        let before = ring.slot(0).unwrap().control();
        ring.commit().unwrap();

        assert_eq!(ring.slot(0).unwrap().control(), before);
        assert!(ring.slot(0).unwrap().stops_after());
        assert_eq!(ring.commit_index(), None);
        assert!(ring.is_committed());
    }

    #[test]
    fn two_puts_then_commit_releases_first() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, false)).unwrap();
        ring.put(&sample_descriptor(2, true)).unwrap();
        assert_eq!(stop_flags(&ring), [true, true, false, false]);

        ring.commit().unwrap();
        assert_eq!(stop_flags(&ring), [false, true, false, false]);
    }

    #[test]
    fn three_puts_then_commit_follows_continuation_rule() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, false)).unwrap();
        ring.put(&sample_descriptor(2, false)).unwrap();
        // P2 still stops until a third put arrives
        assert_eq!(stop_flags(&ring), [true, true, false, false]);

        ring.put(&sample_descriptor(3, true)).unwrap();
        // The put of P3 released P2; P1 still gates the run
        assert_eq!(stop_flags(&ring), [true, false, true, false]);

        let p2_before = ring.slot(1).unwrap().control();
        let p3_before = ring.slot(2).unwrap().control();
        ring.commit().unwrap();

        // Only P1 changed during commit
        assert!(!ring.slot(0).unwrap().stops_after());
        assert_eq!(ring.slot(1).unwrap().control(), p2_before);
        assert_eq!(ring.slot(2).unwrap().control(), p3_before);
        assert!(ring.slot(2).unwrap().stops_after());
    }

    #[test]
    fn first_put_after_creation_marks_written_slot() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, true)).unwrap();
        assert_eq!(ring.commit_index(), Some(0));
    }

    #[test]
    fn first_put_after_commit_marks_previous_tail() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, true)).unwrap();
        ring.commit().unwrap();
        assert_eq!(ring.commit_index(), None);

        ring.put(&sample_descriptor(2, true)).unwrap();
        // The old tail gates the new run
        assert_eq!(ring.commit_index(), Some(0));
        assert_eq!(ring.last_index(), 1);
        assert_eq!(stop_flags(&ring), [true, true, false, false]);

        ring.commit().unwrap();
        // Releasing the old tail lets the engine flow into slot 1
        assert_eq!(stop_flags(&ring), [false, true, false, false]);
    }

    #[test]
    fn long_run_after_commit_keeps_only_tail_stopped() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, true)).unwrap();
        ring.commit().unwrap();
        ring.get().unwrap();

        ring.put(&sample_descriptor(2, false)).unwrap();
        ring.put(&sample_descriptor(3, false)).unwrap();
        ring.put(&sample_descriptor(4, true)).unwrap();
        ring.commit().unwrap();

        assert_eq!(stop_flags(&ring), [false, false, false, true]);
    }

    #[test]
    fn commit_without_puts_fails() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);
        assert_eq!(ring.commit(), Err(RingError::NothingToCommit));

        ring.put(&sample_descriptor(1, true)).unwrap();
        ring.commit().unwrap();
        assert_eq!(ring.commit(), Err(RingError::NothingToCommit));
    }

    #[test]
    fn commit_after_draining_uncommitted_run_fails() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, true)).unwrap();
        ring.get().unwrap();
        assert_eq!(ring.commit(), Err(RingError::NothingToCommit));
        assert_eq!(ring.commit_index(), Some(0));
    }

    // =========================================================================
    // Full / locked
    // =========================================================================

    #[test]
    fn list_full_reported_regardless_of_lock() {
        let slots = [const { BufDescriptor::new() }; 3];
        let mut ring = ring_over(&slots);

        for id in 0..3 {
            ring.put(&sample_descriptor(id, true)).unwrap();
        }
        assert!(ring.is_full());

        // Wrapped put slot is slot 0; lock it and fullness still wins
        ring.slot(0).unwrap().lock();
        assert_eq!(ring.put(&sample_descriptor(9, true)), Err(RingError::ListFull));
        ring.slot(0).unwrap().unlock();
        assert_eq!(ring.put(&sample_descriptor(9, true)), Err(RingError::ListFull));
    }

    #[test]
    fn locked_slot_rejected_when_not_full() {
        let slots = [const { BufDescriptor::new() }; 3];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, true)).unwrap();
        ring.commit().unwrap();
        let done = ring.get().unwrap();
        done.lock();

        ring.put(&sample_descriptor(2, true)).unwrap();
        ring.put(&sample_descriptor(3, true)).unwrap();

        // Put has wrapped to slot 0, which the caller still holds
        assert_eq!(ring.put_index(), 0);
        assert_eq!(ring.put(&sample_descriptor(4, true)), Err(RingError::DescriptorLocked));
        assert_eq!(ring.active_count(), 2);

        done.unlock();
        ring.put(&sample_descriptor(4, true)).unwrap();
        assert!(ring.is_full());
    }

    #[test]
    fn rejected_put_leaves_state_unchanged() {
        let slots = [const { BufDescriptor::new() }; 2];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, true)).unwrap();
        ring.put(&sample_descriptor(2, true)).unwrap();
        let (put, last, commit) = (ring.put_index(), ring.last_index(), ring.commit_index());

        assert_eq!(ring.put(&sample_descriptor(3, true)), Err(RingError::ListFull));
        assert_eq!(ring.put_index(), put);
        assert_eq!(ring.last_index(), last);
        assert_eq!(ring.commit_index(), commit);
        assert_eq!(ring.active_packet_count(), 2);
    }

    // =========================================================================
    // Get
    // =========================================================================

    #[test]
    fn get_on_empty_ring_fails() {
        let slots = [const { BufDescriptor::new() }; 2];
        let mut ring = ring_over(&slots);
        assert_eq!(ring.get().unwrap_err(), RingError::ListEmpty);
    }

    #[test]
    fn put_then_get_returns_original_content() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        let d = sample_descriptor(0xC0DE, false);
        d.set_source_address(0x1111_0000);
        d.set_destination_address(0x2222_0000);
        d.set_length(1514);
        d.set_requested_length(1600);
        d.set_flags(0x40);

        ring.put(&d).unwrap();
        for id in 1..4 {
            ring.put(&sample_descriptor(id, id == 3)).unwrap();
        }
        ring.commit().unwrap();

        let first = ring.get().unwrap();
        for _ in 1..4 {
            ring.get().unwrap();
        }

        assert_eq!(first.id(), 0xC0DE);
        assert_eq!(first.source_address(), 0x1111_0000);
        assert_eq!(first.destination_address(), 0x2222_0000);
        assert_eq!(first.length(), 1514);
        assert_eq!(first.requested_length(), 1600);
        assert_eq!(first.flags(), 0x40);
        assert_eq!(first.next_address(), TEST_PHYS_BASE + BufDescriptor::SIZE as u32);
    }

    #[test]
    fn get_returns_slots_in_put_order_across_wrap() {
        let slots = [const { BufDescriptor::new() }; 3];
        let mut ring = ring_over(&slots);

        let mut next_id = 0;
        let mut expected = 0;
        for _ in 0..4 {
            for _ in 0..2 {
                ring.put(&sample_descriptor(next_id, true)).unwrap();
                next_id += 1;
            }
            ring.commit().unwrap();
            for _ in 0..2 {
                assert_eq!(ring.get().unwrap().id(), expected);
                expected += 1;
            }
        }
        assert!(ring.is_empty());
        assert_eq!(ring.get_index(), ring.put_index());
    }

    #[test]
    fn packet_count_follows_terminal_descriptors() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);

        ring.put(&sample_descriptor(1, false)).unwrap();
        ring.put(&sample_descriptor(2, true)).unwrap();
        ring.put(&sample_descriptor(3, true)).unwrap();
        assert_eq!(ring.active_packet_count(), 2);

        ring.commit().unwrap();
        ring.get().unwrap();
        assert_eq!(ring.active_packet_count(), 2);
        ring.get().unwrap();
        assert_eq!(ring.active_packet_count(), 1);
        ring.get().unwrap();
        assert_eq!(ring.active_packet_count(), 0);
    }

    #[test]
    fn pending_run_spans_gate_through_tail() {
        let slots = [const { BufDescriptor::new() }; 4];
        let mut ring = ring_over(&slots);
        assert!(!ring.is_pending(0));

        ring.put(&sample_descriptor(1, true)).unwrap();
        assert!(ring.is_pending(0));
        assert!(!ring.is_pending(1));
        ring.commit().unwrap();
        assert!(!ring.is_pending(0));

        ring.put(&sample_descriptor(2, false)).unwrap();
        ring.put(&sample_descriptor(3, true)).unwrap();
        // Gate is slot 0, run is slots 1..=2
        assert!(ring.is_pending(0));
        assert!(ring.is_pending(1));
        assert!(ring.is_pending(2));
        assert!(!ring.is_pending(3));
    }

    // =========================================================================
    // Addressing
    // =========================================================================

    #[test]
    fn index_of_address_accepts_slot_boundaries_only() {
        let slots = [const { BufDescriptor::new() }; 4];
        let ring = ring_over(&slots);
        let base = slots.as_ptr() as usize;

        assert_eq!(ring.index_of_address(base), Some(0));
        assert_eq!(ring.index_of_address(base + 3 * BufDescriptor::SIZE), Some(3));
        assert_eq!(ring.index_of_address(base + 4 * BufDescriptor::SIZE), None);
        assert_eq!(ring.index_of_address(base + 4), None);
        assert_eq!(ring.index_of_address(base - BufDescriptor::SIZE), None);
        assert_eq!(ring.slot_address(2), base + 2 * BufDescriptor::SIZE);
    }
}
