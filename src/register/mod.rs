//! Memory-mapped register primitives for the DMA controller
//!
//! This module provides the raw volatile accesses everything else is built on,
//! plus the typed register map ([`map`]) and bit-field ([`field`]) helpers.
//! All register access is volatile to ensure proper hardware interaction: the
//! compiler may not elide, merge, cache or reorder these loads and stores.

pub mod field;
pub mod map;

use crate::constants::REG_WIDTH;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is a valid, 4-byte aligned register
/// (or memory word) for the duration of the access.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    debug_assert!(addr % REG_WIDTH == 0, "unaligned register address");
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is a valid, 4-byte aligned register
/// (or memory word) for the duration of the access.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    debug_assert!(addr % REG_WIDTH == 0, "unaligned register address");
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Modify a register using a read-modify-write operation
///
/// Exactly one load followed by one store. Not atomic with respect to
/// interrupts or other cores.
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn modify_reg<F>(addr: usize, f: F)
where
    F: FnOnce(u32) -> u32,
{
    // SAFETY: caller guarantees address validity
    let value = unsafe { read_reg(addr) };
    unsafe { write_reg(addr, f(value)) }
}

/// Set bits in a register (read-modify-write)
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn set_bits(addr: usize, bits: u32) {
    // SAFETY: caller guarantees address validity
    unsafe { modify_reg(addr, |v| v | bits) }
}

/// Clear bits in a register (read-modify-write)
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn clear_bits(addr: usize, bits: u32) {
    // SAFETY: caller guarantees address validity
    unsafe { modify_reg(addr, |v| v & !bits) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RamBlock;

    #[test]
    fn write_then_read_round_trips() {
        let ram = RamBlock::<4>::new();
        let addr = ram.addr_of(0x8);

        // SAFETY: addr points into `ram`, which outlives the accesses.
        unsafe {
            write_reg(addr, 0xDEAD_BEEF);
            assert_eq!(read_reg(addr), 0xDEAD_BEEF);
        }
        assert_eq!(ram.words(), [0, 0, 0xDEAD_BEEF, 0]);
    }

    #[test]
    fn write_touches_only_the_addressed_word() {
        let ram = RamBlock::<4>::filled(0x5555_5555);
        let addr = ram.addr_of(0x4);

        // SAFETY: addr points into `ram`.
        unsafe { write_reg(addr, 0) };

        assert_eq!(ram.words(), [0x5555_5555, 0, 0x5555_5555, 0x5555_5555]);
    }

    #[test]
    fn modify_applies_closure_to_current_value() {
        let ram = RamBlock::<1>::filled(0x10);
        let addr = ram.addr_of(0);

        // SAFETY: addr points into `ram`.
        unsafe { modify_reg(addr, |v| v * 3 + 1) };

        assert_eq!(ram.words(), [0x31]);
    }

    #[test]
    fn set_and_clear_bits() {
        let ram = RamBlock::<1>::filled(0b1010);
        let addr = ram.addr_of(0);

        // SAFETY: addr points into `ram`.
        unsafe {
            set_bits(addr, 0b0101);
            assert_eq!(read_reg(addr), 0b1111);
            clear_bits(addr, 0b1001);
            assert_eq!(read_reg(addr), 0b0110);
        }
    }
}
