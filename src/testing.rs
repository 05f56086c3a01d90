//! Testing utilities and mock implementations
//!
//! This module provides simulated register memory for testing the accessor
//! on the host without hardware access:
//!
//! - [`MockBus`]: sparse simulated memory that records every transaction
//! - [`RamBlock`]: a real, word-aligned RAM region for exercising the volatile
//!   [`Mmio`](crate::Mmio) path
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::UnsafeCell;
use std::collections::HashMap;
use std::vec::Vec;

use crate::constants::REG_WIDTH;
use crate::driver::bus::RegisterBus;

// =============================================================================
// Mock Register Bus
// =============================================================================

/// One bus transaction as seen by [`MockBus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Load from `addr` that returned `value`
    Read { addr: usize, value: u32 },
    /// Store of `value` to `addr`
    Write { addr: usize, value: u32 },
}

impl Access {
    /// Address touched by the transaction
    pub fn addr(&self) -> usize {
        match *self {
            Access::Read { addr, .. } | Access::Write { addr, .. } => addr,
        }
    }
}

/// Simulated register memory with a transaction trace
///
/// Unwritten words read as zero. Words can be configured as clear-on-read to
/// model status registers whose loads have side effects.
///
/// # Example
///
/// ```ignore
/// let mut bus = MockBus::new();
/// bus.preload(0x3F00_0014, 0x3);
/// bus.set_clear_on_read(0x3F00_0014, 0x1);
///
/// let mut dmac = Dmac::<TestReg, _>::with_bus(&mut bus);
/// assert_eq!(dmac.read(TestReg::Status), 0x3);
/// assert_eq!(dmac.read(TestReg::Status), 0x2);
/// ```
#[derive(Debug, Default)]
pub struct MockBus {
    /// Word values: addr -> value
    memory: HashMap<usize, u32>,
    /// Bits cleared by a read: addr -> mask
    clear_on_read: HashMap<usize, u32>,
    /// Every transaction in program order
    trace: Vec<Access>,
}

impl MockBus {
    /// Create an empty mock bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a word without recording a transaction
    pub fn preload(&mut self, addr: usize, value: u32) {
        self.memory.insert(addr, value);
    }

    /// Current value of a word, if it was ever written or preloaded
    pub fn peek(&self, addr: usize) -> Option<u32> {
        self.memory.get(&addr).copied()
    }

    /// Clear `mask` bits of the word at `addr` whenever it is read
    pub fn set_clear_on_read(&mut self, addr: usize, mask: u32) {
        self.clear_on_read.insert(addr, mask);
    }

    /// All transactions so far, in order
    pub fn trace(&self) -> &[Access] {
        &self.trace
    }

    /// Forget recorded transactions (memory contents are kept)
    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Number of reads recorded at `addr`
    pub fn reads_at(&self, addr: usize) -> usize {
        self.trace
            .iter()
            .filter(|a| matches!(a, Access::Read { addr: at, .. } if *at == addr))
            .count()
    }

    /// Number of writes recorded at `addr`
    pub fn writes_at(&self, addr: usize) -> usize {
        self.trace
            .iter()
            .filter(|a| matches!(a, Access::Write { addr: at, .. } if *at == addr))
            .count()
    }
}

impl RegisterBus for MockBus {
    fn read(&mut self, addr: usize) -> u32 {
        let value = self.memory.get(&addr).copied().unwrap_or(0);

        if let Some(mask) = self.clear_on_read.get(&addr) {
            self.memory.insert(addr, value & !mask);
        }

        self.trace.push(Access::Read { addr, value });
        value
    }

    fn write(&mut self, addr: usize, value: u32) {
        self.trace.push(Access::Write { addr, value });
        self.memory.insert(addr, value);
    }
}

// =============================================================================
// RAM-backed Register Block
// =============================================================================

/// Word-aligned RAM standing in for a register block
///
/// Gives the volatile [`Mmio`](crate::Mmio) bus real memory to hit on the
/// host. Offsets are byte offsets, as in a register map.
pub struct RamBlock<const N: usize> {
    words: UnsafeCell<[u32; N]>,
}

impl<const N: usize> RamBlock<N> {
    /// Zero-filled block
    pub fn new() -> Self {
        Self::filled(0)
    }

    /// Block with every word set to `value`
    pub fn filled(value: u32) -> Self {
        Self {
            words: UnsafeCell::new([value; N]),
        }
    }

    /// Address of the first word
    pub fn base(&self) -> usize {
        self.words.get() as usize
    }

    /// Size of the block in bytes
    pub fn len_bytes(&self) -> usize {
        N * REG_WIDTH
    }

    /// Absolute address of the word at byte `offset`
    ///
    /// # Panics
    ///
    /// Panics if `offset` is unaligned or outside the block.
    pub fn addr_of(&self, offset: usize) -> usize {
        assert!(offset % REG_WIDTH == 0, "unaligned offset {offset:#x}");
        assert!(offset < self.len_bytes(), "offset {offset:#x} outside block");
        self.base() + offset
    }

    /// Volatile read of the word at byte `offset`
    pub fn word(&self, offset: usize) -> u32 {
        let addr = self.addr_of(offset);
        // SAFETY: addr_of bounds-checks and aligns the address inside `words`
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    /// Snapshot of every word
    pub fn words(&self) -> [u32; N] {
        core::array::from_fn(|i| self.word(i * REG_WIDTH))
    }
}

impl<const N: usize> Default for RamBlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_bus_reads_zero_when_unset() {
        let mut bus = MockBus::new();
        assert_eq!(bus.read(0x40), 0);
        assert_eq!(bus.peek(0x40), None);
    }

    #[test]
    fn mock_bus_preload_is_not_traced() {
        let mut bus = MockBus::new();
        bus.preload(0x40, 9);
        assert!(bus.trace().is_empty());
        assert_eq!(bus.read(0x40), 9);
    }

    #[test]
    fn mock_bus_clear_on_read() {
        let mut bus = MockBus::new();
        bus.preload(0x8, 0b111);
        bus.set_clear_on_read(0x8, 0b011);

        assert_eq!(bus.read(0x8), 0b111);
        assert_eq!(bus.read(0x8), 0b100);
    }

    #[test]
    fn mock_bus_counts_accesses_per_address() {
        let mut bus = MockBus::new();
        bus.write(0x0, 1);
        bus.read(0x0);
        bus.read(0x0);
        bus.read(0x4);

        assert_eq!(bus.writes_at(0x0), 1);
        assert_eq!(bus.reads_at(0x0), 2);
        assert_eq!(bus.reads_at(0x4), 1);
        assert_eq!(bus.writes_at(0x4), 0);
        assert_eq!(bus.trace()[3].addr(), 0x4);
    }

    #[test]
    fn mock_bus_clear_trace_keeps_memory() {
        let mut bus = MockBus::new();
        bus.write(0x8, 0xAB);
        bus.clear_trace();

        assert!(bus.trace().is_empty());
        assert_eq!(bus.read(0x8), 0xAB);
        assert_eq!(bus.trace().len(), 1);
    }

    #[test]
    fn ram_block_is_word_aligned() {
        let ram = RamBlock::<3>::new();
        assert_eq!(ram.base() % REG_WIDTH, 0);
        assert_eq!(ram.len_bytes(), 12);
    }

    #[test]
    #[should_panic(expected = "outside block")]
    fn ram_block_rejects_out_of_range_offset() {
        let ram = RamBlock::<2>::new();
        let _ = ram.addr_of(0x8);
    }
}
