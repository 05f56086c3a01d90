//! DMA Controller Register Access
//!
//! A `no_std`, `no_alloc` crate for typed, volatile access to the
//! memory-mapped registers of a DMA controller whose register block sits at
//! [`DMAC_BASE_ADDR`](constants::DMAC_BASE_ADDR) (`0x3F00_0000`).
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! 1. **Register Layer** ([`register`]): raw volatile primitives, the
//!    [`RegisterMap`] trait with the [`dmac_registers!`] macro, and [`Field`]
//! 2. **Bus Layer** ([`driver::bus`]): the [`RegisterBus`] seam with the
//!    volatile [`Mmio`] implementation
//! 3. **Accessor Layer** ([`driver::dmac`]): [`Dmac`], which turns a register
//!    name into `base + offset` and performs exactly one 32-bit transaction
//!    per primitive access
//!
//! ## Register Set
//!
//! Register offsets are not part of this crate. They come from the generated
//! `DMAC_CFG.h` configuration header (one `DMAC_CFG_<NAME>_ADDRESS` define per
//! register). `cargo xtask gen-regs` turns that header into a
//! [`dmac_registers!`] invocation, so every register name is checked at
//! compile time and an unknown name is a build error.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and trace logging of
//!   register writes
//! - `critical-section`: Enable the ISR-safe [`SharedDmac`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use dmac_sfr::{Dmac, RegisterMap, dmac_registers};
//!
//! dmac_registers! {
//!     /// DMA controller registers
//!     pub enum DmacReg {
//!         Ctrl = 0x10,
//!         Status = 0x14,
//!     }
//! }
//!
//! let mut dmac = Dmac::<DmacReg>::take().unwrap();
//!
//! dmac.write(DmacReg::Ctrl, 0x0000_0001);
//! let status = dmac.read(DmacReg::Status);
//! ```
//!
//! # Concurrency
//!
//! The register file is shared, global hardware state and the accessor does
//! no locking. [`Dmac::take`] hands out a single owner and every access needs
//! `&mut Dmac`. To share the owner with interrupt handlers, enable
//! `critical-section` and store it in a [`SharedDmac`]. No memory barriers are
//! issued: ordering register writes against DMA buffer writes is the
//! caller's job.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions
)]

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod driver;
pub mod error;
pub mod register;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use constants::{DMAC_BASE_ADDR, REG_WIDTH};
pub use driver::{Dmac, Mmio, RegisterBus};
pub use error::{Error, Result};
pub use register::field::Field;
pub use register::map::RegisterMap;

#[cfg(feature = "critical-section")]
pub use sync::SharedDmac;

/// Low-level register accessors for advanced use.
///
/// These bypass the typed register map. Most users should go through
/// [`Dmac`] instead.
///
/// # Safety
///
/// Every function here dereferences a raw address. The caller is
/// responsible for the address being a valid, aligned register and for
/// serializing access with any other owner of the block.
pub mod unsafe_registers {
    pub use crate::register::{clear_bits, modify_reg, read_reg, set_bits, write_reg};
}
