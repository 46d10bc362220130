//! ISR-safe channel wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::dma::translate::AddressTranslator;
use crate::driver::channel::SgChannel;
use crate::register::RegisterIo;

/// ISR-safe channel wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, disabling interrupts
/// for the duration of the closure.
///
/// # Example
///
/// ```ignore
/// CHANNEL.with(|channel| {
///     channel.put_descriptor(&desc)?;
///     channel.commit_puts()
/// })?;
/// ```
pub struct SharedChannel<'a, R, T> {
    inner: CriticalSectionCell<SgChannel<'a, R, T>>,
}

impl<'a, R: RegisterIo, T: AddressTranslator> SharedChannel<'a, R, T> {
    /// Create a new shared channel (const, suitable for static initialization).
    pub const fn new(io: R, translator: T) -> Self {
        Self {
            inner: CriticalSectionCell::new(SgChannel::new(io, translator)),
        }
    }

    /// Execute a closure with exclusive access to the channel.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<U, F>(&self, f: F) -> U
    where
        F: FnOnce(&mut SgChannel<'a, R, T>) -> U,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<U, F>(&self, f: F) -> Option<U>
    where
        F: FnOnce(&mut SgChannel<'a, R, T>) -> U,
    {
        self.inner.try_with(f)
    }
}
