//! Core driver components for the DMA controller register block.
//!
//! - [`bus`] - The [`RegisterBus`] transaction seam and the volatile [`Mmio`] bus
//! - [`dmac`] - The typed [`Dmac`] register accessor
//!
//! # Example
//!
//! ```ignore
//! use dmac_sfr::driver::Dmac;
//!
//! let mut dmac = Dmac::<DmacReg>::take().unwrap();
//! dmac.set_bits(DmacReg::Ctrl, 1 << 0);
//! ```

// Submodules
pub mod bus;
pub mod dmac;

// Re-exports for convenience
pub use bus::{Mmio, RegisterBus};
pub use dmac::Dmac;
