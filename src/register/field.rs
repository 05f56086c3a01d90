//! Register bit fields
//!
//! A [`Field`] names a contiguous bit range inside a 32-bit register, replacing
//! hand-maintained `_SHIFT` / `_MASK` constant pairs.
//!
//! ```ignore
//! const CH_ENABLE: Field = Field::new(0, 1);
//! const BURST_LEN: Field = Field::new(8, 6);
//!
//! dmac.write_field(DmacReg::Ctrl, BURST_LEN, 16)?;
//! ```

use crate::constants::REG_BITS;

/// A contiguous bit range inside a register word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    shift: u32,
    width: u32,
}

impl Field {
    /// Create a field starting at bit `shift` spanning `width` bits.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or the field extends past bit 31. Declare
    /// fields in a `const` so the check happens at compile time.
    pub const fn new(shift: u32, width: u32) -> Self {
        assert!(width > 0, "field width must be non-zero");
        assert!(
            shift < REG_BITS && width <= REG_BITS - shift,
            "field does not fit in a 32-bit register"
        );
        Self { shift, width }
    }

    /// A single-bit field
    pub const fn bit(bit: u32) -> Self {
        Self::new(bit, 1)
    }

    /// Bit position of the least significant bit
    #[inline(always)]
    pub const fn shift(&self) -> u32 {
        self.shift
    }

    /// Number of bits in the field
    #[inline(always)]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Largest value the field can hold
    #[inline(always)]
    pub const fn max_value(&self) -> u32 {
        u32::MAX >> (REG_BITS - self.width)
    }

    /// Field mask in register position
    #[inline(always)]
    pub const fn mask(&self) -> u32 {
        self.max_value() << self.shift
    }

    /// Whether `value` fits in the field without truncation
    #[inline(always)]
    pub const fn fits(&self, value: u32) -> bool {
        value <= self.max_value()
    }

    /// Extract the field value from a register word
    #[inline(always)]
    pub const fn extract(&self, word: u32) -> u32 {
        (word & self.mask()) >> self.shift
    }

    /// Replace the field inside `word` with `value`, leaving other bits alone.
    ///
    /// Bits of `value` above the field width are discarded; check with
    /// [`fits`](Self::fits) first when that matters.
    #[inline(always)]
    pub const fn insert(&self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | ((value << self.shift) & self.mask())
    }
}
