//! DMA controller register accessor
//!
//! [`Dmac`] resolves a register from a [`RegisterMap`] to `base + offset` and
//! performs exactly one 32-bit transaction on its [`RegisterBus`] per
//! primitive operation. Derived operations (read-modify-write, bit and field
//! helpers) are built only from those primitives, so the transaction count of
//! every call is fixed and visible in its documentation.
//!
//! # Ownership
//!
//! The register file is global, mutable hardware state with no locking of its
//! own. [`Dmac::take`] hands out the accessor for the fixed base once per
//! program, and every operation needs `&mut Dmac`, so register traffic is
//! serialized through a single owner. Use
//! [`SharedDmac`](crate::sync::SharedDmac) to share it with interrupt handlers.
//!
//! # Example
//!
//! ```ignore
//! dmac_sfr::dmac_registers! {
//!     pub enum DmacReg {
//!         Ctrl = 0x10,
//!         Status = 0x14,
//!     }
//! }
//!
//! let mut dmac = Dmac::<DmacReg>::take().unwrap();
//! dmac.write(DmacReg::Ctrl, 0x0000_0001);
//! let status = dmac.read(DmacReg::Status);
//! ```

use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::constants::{DMAC_BASE_ADDR, REG_WIDTH};
use crate::driver::bus::{Mmio, RegisterBus};
use crate::error::{Error, Result};
use crate::register::field::Field;
use crate::register::map::RegisterMap;

/// Set once the fixed-base accessor has been handed out
static TAKEN: AtomicBool = AtomicBool::new(false);

/// Typed accessor for a DMA controller register block
///
/// `R` is the register map (usually generated with
/// [`dmac_registers!`](crate::dmac_registers)); `B` is the bus that performs
/// the transactions, volatile [`Mmio`] by default.
#[derive(Debug)]
pub struct Dmac<R, B = Mmio> {
    bus: B,
    base: usize,
    _regs: PhantomData<R>,
}

impl<R: RegisterMap> Dmac<R, Mmio> {
    /// Take the accessor for the register block at [`DMAC_BASE_ADDR`].
    ///
    /// Returns `Some` on the first call in the program and `None` afterwards,
    /// whatever register map is requested: there is a single hardware block.
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            return None;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("DMAC register block taken at {=usize:#010x}", DMAC_BASE_ADDR);

        // SAFETY: first and only hand-out; offsets are validated by the register map
        Some(unsafe { Self::steal() })
    }

    /// Create the accessor for the register block at [`DMAC_BASE_ADDR`]
    /// without checking whether it was already taken.
    ///
    /// # Safety
    ///
    /// The caller must ensure no other accessor for the block is used
    /// concurrently, and that the register map matches the hardware.
    pub unsafe fn steal() -> Self {
        Self {
            // SAFETY: forwarded to the caller
            bus: unsafe { Mmio::new() },
            base: DMAC_BASE_ADDR,
            _regs: PhantomData,
        }
    }
}

impl<R: RegisterMap, B: RegisterBus> Dmac<R, B> {
    /// Create an accessor on `bus` for the block at [`DMAC_BASE_ADDR`].
    ///
    /// The register map already checks every address at compile time, so this
    /// cannot fail.
    pub fn with_bus(bus: B) -> Self {
        Self {
            bus,
            base: DMAC_BASE_ADDR,
            _regs: PhantomData,
        }
    }

    /// Create an accessor on `bus` for a register block at `base`.
    ///
    /// # Errors
    ///
    /// - [`Error::MisalignedBase`] if `base` is not 4-byte aligned
    /// - [`Error::AddressOverflow`] if `base` plus the highest register offset
    ///   does not fit in `usize`
    pub fn new(bus: B, base: usize) -> Result<Self> {
        if base % REG_WIDTH != 0 {
            return Err(Error::MisalignedBase);
        }
        base.checked_add(R::max_offset())
            .and_then(|last| last.checked_add(REG_WIDTH - 1))
            .ok_or(Error::AddressOverflow)?;

        Ok(Self {
            bus,
            base,
            _regs: PhantomData,
        })
    }

    /// Base address of the register block
    #[inline(always)]
    pub fn base(&self) -> usize {
        self.base
    }

    /// Effective address of `reg` (no bus access)
    #[inline(always)]
    pub fn address(&self, reg: R) -> usize {
        self.base + reg.offset()
    }

    /// Shared access to the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Exclusive access to the underlying bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the underlying bus
    pub fn free(self) -> B {
        self.bus
    }

    // -------------------------------------------------------------------------
    // Primitive accesses
    // -------------------------------------------------------------------------

    /// Read a register: one 32-bit load from `base + offset`.
    ///
    /// The load is always performed, even if the value is discarded, so
    /// clear-on-read side effects happen exactly once per call.
    #[inline(always)]
    pub fn read(&mut self, reg: R) -> u32 {
        let addr = self.address(reg);
        self.bus.read(addr)
    }

    /// Write a register: one 32-bit store to `base + offset`.
    #[inline(always)]
    pub fn write(&mut self, reg: R, value: u32) {
        let addr = self.address(reg);

        #[cfg(feature = "defmt")]
        defmt::trace!("DMAC {=str} <- {=u32:#010x}", reg.name(), value);

        self.bus.write(addr, value);
    }

    // -------------------------------------------------------------------------
    // Derived operations
    // -------------------------------------------------------------------------

    /// Read-modify-write: one load, then one store of `f(old)`.
    ///
    /// Not atomic: an interrupt touching the same register between the two
    /// transactions will be overwritten.
    #[inline]
    pub fn modify<F>(&mut self, reg: R, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Set `bits` in a register (read-modify-write)
    #[inline]
    pub fn set_bits(&mut self, reg: R, bits: u32) {
        self.modify(reg, |v| v | bits);
    }

    /// Clear `bits` in a register (read-modify-write)
    #[inline]
    pub fn clear_bits(&mut self, reg: R, bits: u32) {
        self.modify(reg, |v| v & !bits);
    }

    /// Check whether every bit in `mask` is set (one load)
    #[inline]
    pub fn is_set(&mut self, reg: R, mask: u32) -> bool {
        self.read(reg) & mask == mask
    }

    /// Read a bit field (one load)
    #[inline]
    pub fn read_field(&mut self, reg: R, field: Field) -> u32 {
        field.extract(self.read(reg))
    }

    /// Write a bit field, preserving the other bits (read-modify-write).
    ///
    /// # Errors
    ///
    /// [`Error::FieldOverflow`] if `value` does not fit in `field`; the
    /// register is not accessed in that case.
    pub fn write_field(&mut self, reg: R, field: Field, value: u32) -> Result<()> {
        if !field.fits(value) {
            return Err(Error::FieldOverflow);
        }
        self.modify(reg, |v| field.insert(v, value));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Name-based access (debug consoles and tooling)
    // -------------------------------------------------------------------------

    /// Read a register by its declared name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownRegister`] if no register has that name; nothing is
    /// read in that case.
    pub fn read_named(&mut self, name: &str) -> Result<u32> {
        let reg = R::from_name(name).ok_or(Error::UnknownRegister)?;
        Ok(self.read(reg))
    }

    /// Write a register by its declared name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownRegister`] if no register has that name; nothing is
    /// written in that case.
    pub fn write_named(&mut self, name: &str, value: u32) -> Result<()> {
        let reg = R::from_name(name).ok_or(Error::UnknownRegister)?;
        self.write(reg, value);
        Ok(())
    }
}
