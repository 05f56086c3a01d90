//! ISR-safe register accessor wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::driver::bus::{Mmio, RegisterBus};
use crate::driver::dmac::Dmac;
use crate::register::map::RegisterMap;

/// ISR-safe DMA controller accessor.
///
/// Holds the single [`Dmac`] once it has been installed with
/// [`init`](Self::init). All access goes through `critical_section::with()`,
/// disabling interrupts for the duration of the closure, so read-modify-write
/// sequences cannot be interleaved with an interrupt handler.
///
/// # Example
///
/// ```ignore
/// static DMAC: SharedDmac<DmacReg> = SharedDmac::new();
///
/// fn main() {
///     DMAC.init(Dmac::take().unwrap());
///     DMAC.with(|dmac| dmac.write(DmacReg::Ctrl, 1));
/// }
///
/// #[interrupt]
/// fn DMA_IRQ() {
///     DMAC.with(|dmac| {
///         let status = dmac.read(DmacReg::IntStatus);
///         dmac.write(DmacReg::IntClear, status);
///     });
/// }
/// ```
pub struct SharedDmac<R, B = Mmio> {
    inner: CriticalSectionCell<Option<Dmac<R, B>>>,
}

impl<R, B> SharedDmac<R, B> {
    /// Create an empty shared accessor (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }
}

impl<R: RegisterMap, B: RegisterBus> SharedDmac<R, B> {
    /// Install the accessor, returning the previously installed one, if any.
    pub fn init(&self, dmac: Dmac<R, B>) -> Option<Dmac<R, B>> {
        self.inner.with(|slot| slot.replace(dmac))
    }

    /// Remove and return the installed accessor.
    pub fn release(&self) -> Option<Dmac<R, B>> {
        self.inner.with(Option::take)
    }

    /// Whether an accessor is installed
    pub fn is_initialized(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the accessor.
    ///
    /// Returns `None` without calling `f` if nothing is installed.
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Dmac<R, B>) -> T,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Like [`with`](Self::with), but also returns `None` if the accessor is
    /// already borrowed (e.g. from a nested call).
    #[inline]
    pub fn try_with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Dmac<R, B>) -> T,
    {
        self.inner.try_with(|slot| slot.as_mut().map(f)).flatten()
    }
}

impl<R, B> Default for SharedDmac<R, B> {
    fn default() -> Self {
        Self::new()
    }
}
