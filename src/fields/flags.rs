//! Field flags for interactive PDF form fields.
//!
//! Only the bits this crate reads are named. Unknown bits are kept when
//! converting from the raw `/Ff` value so the record carries the original
//! bitmask untouched.

use bitflags::bitflags;

bitflags! {
    /// Common field flags applicable to all field types.
    ///
    /// Per PDF spec Table 221 (Field flags common to all field types).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u32 {
        /// Bit 1: Field is read-only; user cannot change the value
        const READ_ONLY = 1 << 0;

        /// Bit 2: Field is required; must have a value before submit
        const REQUIRED = 1 << 1;

        /// Bit 3: Field should not be exported by submit-form action
        const NO_EXPORT = 1 << 2;

        // Keep every other bit when round-tripping the raw value
        const _ = !0;
    }
}

bitflags! {
    /// Button field flags (field type Btn).
    ///
    /// Per PDF spec Table 226 (Field flags specific to button fields).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ButtonFieldFlags: u32 {
        /// Bit 16: This is a radio button (if not set and not PUSHBUTTON, it's a checkbox)
        const RADIO = 1 << 15;

        /// Bit 17: This is a push button (performs action, doesn't retain value)
        const PUSHBUTTON = 1 << 16;

        const _ = !0;
    }
}

impl FieldFlags {
    /// Interpret a raw `/Ff` value.
    pub fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Whether the read-only bit (bit 1) is set.
    pub fn is_readonly(&self) -> bool {
        self.contains(FieldFlags::READ_ONLY)
    }

    /// Whether the required bit (bit 2) is set.
    pub fn is_required(&self) -> bool {
        self.contains(FieldFlags::REQUIRED)
    }
}

impl ButtonFieldFlags {
    /// Interpret a raw `/Ff` value of a button field.
    pub fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Check box: neither radio nor push button.
    pub fn is_checkbox(&self) -> bool {
        !self.intersects(ButtonFieldFlags::RADIO | ButtonFieldFlags::PUSHBUTTON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_flags() {
        let flags = FieldFlags::from_raw(1);
        assert!(flags.is_readonly());
        assert!(!flags.is_required());

        let flags = FieldFlags::from_raw(2);
        assert!(!flags.is_readonly());
        assert!(flags.is_required());

        let flags = FieldFlags::from_raw(3);
        assert!(flags.is_readonly());
        assert!(flags.is_required());
    }

    #[test]
    fn test_raw_bits_retained() {
        let raw = (1 << 12) | 2;
        assert_eq!(FieldFlags::from_raw(raw).bits(), raw);
    }

    #[test]
    fn test_button_kinds() {
        assert!(ButtonFieldFlags::from_raw(0).is_checkbox());
        assert!(!ButtonFieldFlags::from_raw(1 << 15).is_checkbox());
        assert!(!ButtonFieldFlags::from_raw(1 << 16).is_checkbox());
    }
}
