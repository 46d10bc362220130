//! Memory barrier helpers for descriptor hand-off.
//!
//! Descriptor memory is shared with the engine without a lock. These fences
//! order the plain descriptor writes against the single flag write (or
//! register write) that makes them visible to the engine.

use core::sync::atomic::{Ordering, fence};

/// Read barrier (acquire semantics).
///
/// Use before reading descriptor words the engine may have written.
#[inline]
pub(crate) fn read_barrier() {
    fence(Ordering::Acquire);
}

/// Write barrier (release semantics).
///
/// Use after filling a descriptor and before the write that exposes it.
#[inline]
pub(crate) fn write_barrier() {
    fence(Ordering::Release);
}

/// Full memory barrier.
///
/// Use around engine enable and disable.
#[inline]
pub(crate) fn full_barrier() {
    fence(Ordering::SeqCst);
}
