//! Interrupt-masked storage behind [`SharedDmac`](super::SharedDmac).

use core::cell::RefCell;
use critical_section::{CriticalSection, Mutex};

/// A `static`-friendly slot whose contents are only reachable inside a
/// critical section.
///
/// Register read-modify-write sequences run with interrupts masked, so a
/// handler cannot observe a half-applied update. `Sync` follows from
/// `T: Send`.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Wrap `value`. Usable in `static` initializers.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    fn slot<'cs>(&'cs self, cs: CriticalSection<'cs>) -> &'cs RefCell<T> {
        self.inner.borrow(cs)
    }

    /// Run `f` on the contents with interrupts masked.
    ///
    /// # Panics
    ///
    /// If the cell is already borrowed by an enclosing `with` (for example a
    /// handler nested inside a locked section on a platform that allows it).
    /// [`try_with`](Self::try_with) reports that case instead.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| f(&mut self.slot(cs).borrow_mut()))
    }

    /// Run `f` on the contents, or return `None` if they are already
    /// borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut guard = self.slot(cs).try_borrow_mut().ok()?;
            Some(f(&mut guard))
        })
    }
}
