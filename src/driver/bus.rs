//! Register bus abstraction
//!
//! The [`RegisterBus`] trait is the seam between address arithmetic (done by
//! [`Dmac`](crate::Dmac)) and the memory transaction itself. On hardware the
//! transaction is a volatile load or store ([`Mmio`]); on the host it can be a
//! simulated memory that records every access.

use crate::register::{read_reg, write_reg};

// =============================================================================
// Register Bus Trait
// =============================================================================

/// Trait for 32-bit register bus transactions
///
/// Each call must perform exactly one transaction at exactly the given
/// address. Implementations must not cache, merge or skip accesses: reads of
/// status registers can have side effects, and writes can start hardware
/// operations. Both methods take `&mut self` so that register traffic is
/// serialized through a single owner.
pub trait RegisterBus {
    /// Perform one 32-bit load from `addr`
    fn read(&mut self, addr: usize) -> u32;

    /// Perform one 32-bit store of `value` to `addr`
    fn write(&mut self, addr: usize, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    #[inline(always)]
    fn read(&mut self, addr: usize) -> u32 {
        (**self).read(addr)
    }

    #[inline(always)]
    fn write(&mut self, addr: usize, value: u32) {
        (**self).write(addr, value);
    }
}

// =============================================================================
// Volatile MMIO Bus
// =============================================================================

/// Volatile memory-mapped I/O bus
///
/// Every read and write compiles to a single `read_volatile` /
/// `write_volatile` of a `u32`. No memory barriers are issued; ordering
/// against normal memory (e.g. DMA buffers) is the caller's responsibility.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create a volatile MMIO bus.
    ///
    /// # Safety
    ///
    /// Every address later passed to [`RegisterBus::read`] or
    /// [`RegisterBus::write`] on this bus must be a valid, 4-byte aligned
    /// register or memory word for the whole lifetime of the bus. Using it
    /// through [`Dmac`](crate::Dmac) with a register map generated from the
    /// hardware configuration satisfies this for the real peripheral.
    #[inline(always)]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read(&mut self, addr: usize) -> u32 {
        // SAFETY: `Mmio::new` requires every address used with this bus to be valid
        unsafe { read_reg(addr) }
    }

    #[inline(always)]
    fn write(&mut self, addr: usize, value: u32) {
        // SAFETY: `Mmio::new` requires every address used with this bus to be valid
        unsafe { write_reg(addr, value) }
    }
}
