//! Synchronization Support
//!
//! The accessor itself performs no locking: register traffic is serialized by
//! ownership of the single [`Dmac`](crate::Dmac). This module provides the
//! ISR-safe way to share that owner between thread mode and interrupt
//! handlers:
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`], ISR-safe
//!   interior mutability
//! - **Shared Wrapper** (`shared`): [`SharedDmac`], a critical-section
//!   protected `static` slot for the accessor
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module. The critical-section
//!   implementation is provided by the target's HAL crate.

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::SharedDmac;
