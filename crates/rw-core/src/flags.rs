//! The packed control word carried by every entity record.
//!
//! Single-bit flags gate optional per-tick work; `SUB_MODE` is a 2-bit
//! field packed into the same word. No combination is invalid at this
//! layer, callers decide what a combination means.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Control word of an entity record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ControlFlags: u16 {
        /// Pursuit solver runs for this record.
        const ATTRACTION_ACTIVE = 1 << 0;
        /// Pursuit uses the secondary reference target.
        const SECONDARY_PATH    = 1 << 1;
        /// 2-bit sub-mode selector (bits 2..=3).
        const SUB_MODE          = 0b11 << 2;
        /// A timer fired and its code is pending re-broadcast.
        const EVENT_LATCH       = 1 << 4;
        /// Last dispatch completed without a division fault.
        const DIVISION_SAFE     = 1 << 5;
        /// The dispatcher took the fallback path.
        const TRANSITIONED      = 1 << 6;
        /// The path buffer should be refilled from its asset.
        const RELOAD_PATH       = 1 << 7;
    }
}

const SUB_MODE_SHIFT: u16 = 2;

impl ControlFlags {
    /// Read the packed 2-bit sub-mode (0..=3).
    pub fn sub_mode(self) -> u8 {
        ((self.bits() & Self::SUB_MODE.bits()) >> SUB_MODE_SHIFT) as u8
    }

    /// Overwrite the packed sub-mode. Only the low 2 bits of `value` are kept.
    pub fn set_sub_mode(&mut self, value: u8) {
        let packed = (u16::from(value) << SUB_MODE_SHIFT) & Self::SUB_MODE.bits();
        *self = Self::from_bits_retain((self.bits() & !Self::SUB_MODE.bits()) | packed);
    }
}
