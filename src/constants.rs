//! Centralized Constants
//!
//! Address-space constants shared by the raw register primitives, the
//! register map macro and the accessor.
//!
//! # Note
//!
//! Register offsets are not defined here. They come from the generated
//! `DMAC_CFG.h` configuration and are turned into a register map with
//! [`dmac_registers!`](crate::dmac_registers).

// =============================================================================
// Address Space
// =============================================================================

/// DMA controller register block base address
///
/// This is the peripheral window of the BCM2836/BCM2837 (Raspberry Pi 2/3)
/// address map where the controller is instantiated.
pub const DMAC_BASE_ADDR: usize = 0x3F00_0000;

/// Width of every register in bytes
///
/// All accesses are single 32-bit loads or stores, so every register offset
/// must be a multiple of this value.
pub const REG_WIDTH: usize = core::mem::size_of::<u32>();

/// Number of bits in a register word
pub const REG_BITS: u32 = u32::BITS;
