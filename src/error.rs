//! Error types for DMA controller register access
//!
//! The typed access path ([`Dmac::read`](crate::Dmac::read),
//! [`Dmac::write`](crate::Dmac::write)) cannot fail at runtime: unknown
//! registers and misaligned offsets are rejected at compile time. The errors
//! here cover the checks that can only happen at runtime: placing a register
//! block at an arbitrary base, looking registers up by name, and writing
//! values into bit fields.
//!
//! A failed check never touches the bus.

/// Register access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Register block base is not 4-byte aligned
    MisalignedBase,
    /// Base plus the highest register offset overflows the address space
    AddressOverflow,
    /// No register with the requested name exists in the register map
    UnknownRegister,
    /// Value does not fit in the target bit field
    FieldOverflow,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::MisalignedBase => "register block base is not word aligned",
            Error::AddressOverflow => "register address overflows the address space",
            Error::UnknownRegister => "unknown register name",
            Error::FieldOverflow => "value does not fit in field",
        }
    }
}

/// Result type alias for register operations
pub type Result<T> = core::result::Result<T, Error>;
