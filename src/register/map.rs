//! Typed register maps
//!
//! The DMA controller's register set is defined outside this crate, in the
//! generated `DMAC_CFG.h` header. [`dmac_registers!`](crate::dmac_registers)
//! turns a list of `Name = offset` pairs into a closed enum implementing
//! [`RegisterMap`], so a misspelled register is a compile error rather than a
//! wild pointer.
//!
//! The invocation is normally produced by `cargo xtask gen-regs`.

use crate::constants::DMAC_BASE_ADDR;

/// A closed set of registers within one register block.
///
/// Implemented by the enums generated with
/// [`dmac_registers!`](crate::dmac_registers). Implementations must return
/// offsets that are multiples of [`REG_WIDTH`](crate::constants::REG_WIDTH).
pub trait RegisterMap: Copy + Eq + 'static {
    /// Every register in the block, in declaration order
    const ALL: &'static [Self];

    /// Byte offset of the register from the block base
    fn offset(self) -> usize;

    /// Register name as declared
    fn name(self) -> &'static str;

    /// Address of the register in the fixed DMA controller block
    #[inline(always)]
    fn address(self) -> usize {
        DMAC_BASE_ADDR + self.offset()
    }

    /// Look a register up by its declared name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|reg| reg.name() == name)
    }

    /// Look a register up by its byte offset.
    fn from_offset(offset: usize) -> Option<Self> {
        Self::ALL.iter().copied().find(|reg| reg.offset() == offset)
    }

    /// Largest offset in the block (zero for an empty block)
    fn max_offset() -> usize {
        Self::ALL
            .iter()
            .map(|reg| reg.offset())
            .max()
            .unwrap_or(0)
    }
}

/// Declare the DMA controller register map.
///
/// Generates an enum with one variant per register and its [`RegisterMap`]
/// implementation. Compilation fails if an offset is not a multiple of the
/// register width or if the register address overflows `usize`.
///
/// # Example
///
/// ```ignore
/// dmac_sfr::dmac_registers! {
///     /// DMA controller registers
///     pub enum DmacReg {
///         /// Global control
///         Ctrl = 0x10,
///         /// Interrupt status (clear on read)
///         IntStatus = 0x14,
///     }
/// }
///
/// let mut dmac = Dmac::<DmacReg>::take().unwrap();
/// dmac.write(DmacReg::Ctrl, 1);
/// ```
#[macro_export]
macro_rules! dmac_registers {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $offset:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::RegisterMap for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[inline(always)]
            fn offset(self) -> usize {
                match self {
                    $(Self::$variant => $offset as usize,)+
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        const _: () = {
            $(
                assert!(
                    ($offset as usize) % $crate::constants::REG_WIDTH == 0,
                    "register offset is not a multiple of the register width"
                );
                assert!(
                    $crate::constants::DMAC_BASE_ADDR
                        .checked_add($offset as usize)
                        .is_some(),
                    "register address overflows the address space"
                );
            )+
        };
    };
}
